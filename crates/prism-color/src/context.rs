//! Per-evaluation string variables and file resolution.
//!
//! A context expands `$VAR` / `${VAR}` references in transform sources
//! and locates files on the config's search path. Variables come from
//! the config's `environment` section, overridden by the process
//! environment, then by explicit `set_var` calls.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct Context {
    vars: BTreeMap<String, String>,
    search_path: Vec<PathBuf>,
    working_dir: PathBuf,
}

impl Context {
    /// Seeds variables from the config's declared environment, letting
    /// real environment variables override the declared defaults.
    pub fn new(config: &Config) -> Context {
        let mut vars = BTreeMap::new();
        for (name, default) in config.environment() {
            let value = std::env::var(name).unwrap_or_else(|_| default.clone());
            vars.insert(name.clone(), value);
        }
        Context {
            vars,
            search_path: config.search_path().iter().map(PathBuf::from).collect(),
            working_dir: config.working_dir().to_path_buf(),
        }
    }

    pub fn set_var(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set_working_dir(&mut self, dir: &Path) {
        self.working_dir = dir.to_path_buf();
    }

    /// Expands `$VAR` and `${VAR}` references. Unknown variables are
    /// left in place so the failure surfaces at file lookup with the
    /// un-expanded name visible.
    pub fn resolve(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut chars = input.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }
            let rest = &input[i + 1..];
            let (name, consumed) = if let Some(stripped) = rest.strip_prefix('{') {
                match stripped.find('}') {
                    Some(end) => (&stripped[..end], end + 2),
                    None => {
                        out.push('$');
                        continue;
                    }
                }
            } else {
                let end = rest
                    .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                    .unwrap_or(rest.len());
                (&rest[..end], end)
            };
            if name.is_empty() {
                out.push('$');
                continue;
            }
            match self.vars.get(name) {
                Some(value) => {
                    out.push_str(value);
                    for _ in 0..consumed {
                        chars.next();
                    }
                }
                None => out.push('$'),
            }
        }
        out
    }

    /// Expands variables in `src` then finds the file: absolute paths
    /// are used as-is, relative ones are tried against each search-path
    /// entry rooted at the working directory.
    pub fn resolve_file(&self, src: &str) -> Result<PathBuf> {
        let expanded = self.resolve(src);
        let path = Path::new(&expanded);
        if path.is_absolute() {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
            return Err(Error::FileNotFound(expanded));
        }
        for entry in &self.search_path {
            let dir = if entry.is_absolute() {
                entry.clone()
            } else {
                self.working_dir.join(entry)
            };
            let candidate = dir.join(path);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        let fallback = self.working_dir.join(path);
        if fallback.is_file() {
            return Ok(fallback);
        }
        Err(Error::FileNotFound(expanded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with(vars: &[(&str, &str)]) -> Context {
        let mut ctx = Context::default();
        for (k, v) in vars {
            ctx.set_var(k, v);
        }
        ctx
    }

    #[test]
    fn expands_both_reference_styles() {
        let ctx = ctx_with(&[("SHOT", "sh010"), ("SEQ", "fx")]);
        assert_eq!(ctx.resolve("$SEQ/${SHOT}_grade.spi1d"), "fx/sh010_grade.spi1d");
    }

    #[test]
    fn unknown_variables_stay_literal() {
        let ctx = ctx_with(&[]);
        assert_eq!(ctx.resolve("luts/$SHOT.spi1d"), "luts/$SHOT.spi1d");
    }

    #[test]
    fn finds_files_on_the_search_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("luts")).unwrap();
        std::fs::write(dir.path().join("luts/a.spi1d"), "x").unwrap();

        let mut ctx = Context::default();
        ctx.set_working_dir(dir.path());
        ctx.search_path.push(PathBuf::from("luts"));

        let found = ctx.resolve_file("a.spi1d").unwrap();
        assert!(found.ends_with("luts/a.spi1d"));
        assert!(matches!(
            ctx.resolve_file("missing.spi1d"),
            Err(Error::FileNotFound(_))
        ));
    }
}
