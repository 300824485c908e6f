//! Color space definitions as they appear in a config document.

use serde::{Deserialize, Serialize};

/// How pixel values in a space relate to light, used by menu filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    #[default]
    #[serde(rename = "")]
    Unknown,
    SceneLinear,
    DisplayLinear,
    Log,
    Sdr,
    Hdr,
    Data,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Unknown => "",
            Encoding::SceneLinear => "scene-linear",
            Encoding::DisplayLinear => "display-linear",
            Encoding::Log => "log",
            Encoding::Sdr => "sdr",
            Encoding::Hdr => "hdr",
            Encoding::Data => "data",
        }
    }
}

/// One step of a color space's conversion to the reference space.
/// Untagged: the field names disambiguate the variants in YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Matrix {
        /// Row-major 3x3.
        matrix: [f64; 9],
        #[serde(default)]
        offset: [f64; 3],
    },
    Exponent {
        exponent: [f64; 3],
    },
    File {
        src: String,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSpace {
    pub name: String,
    pub family: String,
    pub description: String,
    pub encoding: Encoding,
    pub categories: Vec<String>,
    /// Marks non-color data (mattes, normals); processors over a data
    /// space are no-ops.
    pub is_data: bool,
    pub to_reference: Vec<Step>,
}

impl ColorSpace {
    pub fn named(name: &str) -> ColorSpace {
        ColorSpace {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c.eq_ignore_ascii_case(category))
    }

    /// The family broken at `separator`, for building menu hierarchies.
    pub fn hierarchy_levels(&self, separator: char) -> Vec<&str> {
        if self.family.is_empty() {
            return Vec::new();
        }
        self.family
            .split(separator)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_levels_split_on_the_separator() {
        let cs = ColorSpace {
            family: "Display / Standard".to_string(),
            ..ColorSpace::named("sRGB - Display")
        };
        assert_eq!(cs.hierarchy_levels('/'), vec!["Display", "Standard"]);
    }

    #[test]
    fn empty_family_has_no_levels() {
        let cs = ColorSpace::named("raw");
        assert!(cs.hierarchy_levels('/').is_empty());
    }

    #[test]
    fn category_match_ignores_case() {
        let cs = ColorSpace {
            categories: vec!["file-io".to_string()],
            ..ColorSpace::named("lin")
        };
        assert!(cs.has_category("File-IO"));
        assert!(!cs.has_category("working-space"));
    }
}
