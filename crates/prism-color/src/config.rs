//! The config document: color spaces, roles, displays and views, plus
//! the process-wide current config and processor building.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::colorspace::{ColorSpace, Step};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::lut::Lut1d;
use crate::processor::{Op, Processor};
use crate::transform::{Direction, Transform};

/// Names a config file to load when no current config was set.
pub const CONFIG_ENVVAR: &str = "PRISM";
/// Overrides the config's active display list, comma separated.
pub const ACTIVE_DISPLAYS_ENVVAR: &str = "PRISM_ACTIVE_DISPLAYS";
/// Overrides the config's active view list, comma separated.
pub const ACTIVE_VIEWS_ENVVAR: &str = "PRISM_ACTIVE_VIEWS";

/// The built-in fallback config: one no-op data space.
pub const RAW_CONFIG: &str = "\
name: raw
description: A minimal config with a single no-op color space.
roles:
  default: raw
displays:
  - name: Default
    views:
      - {name: Raw, colorspace: raw}
active_displays: [Default]
active_views: [Raw]
colorspaces:
  - name: raw
    family: raw
    description: Passes pixel values through unchanged.
    encoding: data
    is_data: true
";

// ============================================================================
// Document types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    pub colorspace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Display {
    pub name: String,
    #[serde(default)]
    pub views: Vec<View>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub name: String,
    pub description: String,
    pub search_path: Vec<String>,
    pub environment: BTreeMap<String, String>,
    pub family_separator: char,
    pub roles: BTreeMap<String, String>,
    pub displays: Vec<Display>,
    pub active_displays: Vec<String>,
    pub active_views: Vec<String>,
    pub colorspaces: Vec<ColorSpace>,
    #[serde(skip)]
    working_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            name: String::new(),
            description: String::new(),
            search_path: Vec::new(),
            environment: BTreeMap::new(),
            family_separator: '/',
            roles: BTreeMap::new(),
            displays: Vec::new(),
            active_displays: Vec::new(),
            active_views: Vec::new(),
            colorspaces: Vec::new(),
            working_dir: PathBuf::from("."),
        }
    }
}

// ============================================================================
// Loading and the current config
// ============================================================================

static CURRENT: RwLock<Option<Arc<Config>>> = RwLock::new(None);

impl Config {
    pub fn from_yaml(text: &str) -> Result<Config> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a config file; relative search-path entries
    /// resolve against the file's directory.
    pub fn from_file(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Config::from_yaml(&text)?;
        if let Some(dir) = path.parent() {
            config.working_dir = dir.to_path_buf();
        }
        Ok(config)
    }

    /// The built-in raw config.
    pub fn raw() -> Config {
        // The embedded document is tested, so a parse failure here is a
        // build defect, not a runtime condition.
        Config::from_yaml(RAW_CONFIG).unwrap_or_default()
    }

    /// The process-wide config: whatever was set, else the file named
    /// by `$PRISM`, else the raw fallback.
    pub fn current() -> Result<Arc<Config>> {
        if let Some(config) = read_lock().clone() {
            return Ok(config);
        }
        let config = match std::env::var(CONFIG_ENVVAR) {
            Ok(path) if !path.is_empty() => {
                log::info!("loading config from ${}: {}", CONFIG_ENVVAR, path);
                Config::from_file(Path::new(&path))?
            }
            _ => Config::raw(),
        };
        let config = Arc::new(config);
        *write_lock() = Some(Arc::clone(&config));
        Ok(config)
    }

    pub fn set_current(config: Arc<Config>) {
        *write_lock() = Some(config);
    }

    pub fn clear_current() {
        *write_lock() = None;
    }

    pub fn validate(&self) -> Result<()> {
        for (i, cs) in self.colorspaces.iter().enumerate() {
            if cs.name.is_empty() {
                return Err(Error::Validation("a color space has no name".into()));
            }
            if self.colorspaces[..i].iter().any(|o| o.name == cs.name) {
                return Err(Error::Validation(format!(
                    "color space {:?} is defined twice",
                    cs.name
                )));
            }
        }
        for (role, target) in &self.roles {
            if self.find_color_space(target).is_none() {
                return Err(Error::Validation(format!(
                    "role {:?} points at undefined color space {:?}",
                    role, target
                )));
            }
        }
        for display in &self.displays {
            for view in &display.views {
                if self.find_color_space(&view.colorspace).is_none() {
                    return Err(Error::Validation(format!(
                        "view {:?} of display {:?} uses undefined color space {:?}",
                        view.name, display.name, view.colorspace
                    )));
                }
            }
        }
        Ok(())
    }
}

fn read_lock() -> std::sync::RwLockReadGuard<'static, Option<Arc<Config>>> {
    CURRENT.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock() -> std::sync::RwLockWriteGuard<'static, Option<Arc<Config>>> {
    CURRENT.write().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Queries
// ============================================================================

impl Config {
    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    pub fn search_path(&self) -> &[String] {
        &self.search_path
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    fn find_color_space(&self, name: &str) -> Option<&ColorSpace> {
        self.colorspaces.iter().find(|cs| cs.name == name)
    }

    /// Looks up a color space by name or by role.
    pub fn color_space(&self, name: &str) -> Result<&ColorSpace> {
        if let Some(cs) = self.find_color_space(name) {
            return Ok(cs);
        }
        if let Some(target) = self.roles.get(name) {
            if let Some(cs) = self.find_color_space(target) {
                return Ok(cs);
            }
        }
        Err(Error::UnknownColorSpace(name.to_string()))
    }

    pub fn color_space_names(&self) -> Vec<&str> {
        self.colorspaces.iter().map(|cs| cs.name.as_str()).collect()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    pub fn role_color_space(&self, role: &str) -> Result<&ColorSpace> {
        let target = self
            .roles
            .get(role)
            .ok_or_else(|| Error::UnknownColorSpace(role.to_string()))?;
        self.color_space(target)
    }

    pub fn display_names(&self) -> Vec<&str> {
        self.displays.iter().map(|d| d.name.as_str()).collect()
    }

    fn find_display(&self, name: &str) -> Result<&Display> {
        self.displays
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| Error::UnknownDisplay(name.to_string()))
    }

    fn find_view<'c>(&'c self, display: &str, view: &str) -> Result<&'c View> {
        self.find_display(display)?
            .views
            .iter()
            .find(|v| v.name == view)
            .ok_or_else(|| Error::UnknownView {
                display: display.to_string(),
                view: view.to_string(),
            })
    }

    /// The display list the UI should show: the env override, else the
    /// config's active list, else every display.
    pub fn active_display_names(&self) -> Vec<String> {
        let all: Vec<String> = self.displays.iter().map(|d| d.name.clone()).collect();
        filter_active(&all, &self.active_displays, env_list(ACTIVE_DISPLAYS_ENVVAR))
    }

    pub fn view_names(&self, display: &str) -> Result<Vec<String>> {
        let display = self.find_display(display)?;
        let all: Vec<String> = display.views.iter().map(|v| v.name.clone()).collect();
        Ok(filter_active(
            &all,
            &self.active_views,
            env_list(ACTIVE_VIEWS_ENVVAR),
        ))
    }

    pub fn default_display(&self) -> Result<String> {
        self.active_display_names()
            .into_iter()
            .next()
            .ok_or(Error::NoDisplays)
    }

    pub fn default_view(&self, display: &str) -> Result<String> {
        self.view_names(display)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::UnknownView {
                display: display.to_string(),
                view: "<none>".to_string(),
            })
    }

    /// The color space a display/view pair presents.
    pub fn display_view_color_space(&self, display: &str, view: &str) -> Result<&ColorSpace> {
        let view = self.find_view(display, view)?;
        self.color_space(&view.colorspace)
    }
}

/// Intersects `all` with `active` keeping the active order; an empty
/// active list means everything. `env` wins over `active` entirely.
fn filter_active(all: &[String], active: &[String], env: Option<Vec<String>>) -> Vec<String> {
    let chosen = match &env {
        Some(list) => list.as_slice(),
        None => active,
    };
    if chosen.is_empty() {
        return all.to_vec();
    }
    chosen
        .iter()
        .filter(|name| all.iter().any(|a| a == *name))
        .cloned()
        .collect()
}

fn env_list(var: &str) -> Option<Vec<String>> {
    let value = std::env::var(var).ok()?;
    if value.trim().is_empty() {
        return None;
    }
    Some(
        value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

fn active_list_locked(list: &'static str, var: &'static str) -> Result<()> {
    if env_list(var).is_some() {
        return Err(Error::ActiveListLocked { list, envvar: var });
    }
    Ok(())
}

// ============================================================================
// Editing
// ============================================================================

impl Config {
    /// Adds a color space, replacing any existing one of the same name.
    pub fn add_color_space(&mut self, cs: ColorSpace) {
        match self.colorspaces.iter_mut().find(|o| o.name == cs.name) {
            Some(slot) => *slot = cs,
            None => self.colorspaces.push(cs),
        }
    }

    /// Removes a color space; refuses while a role or view references it.
    pub fn remove_color_space(&mut self, name: &str) -> Result<()> {
        if self.find_color_space(name).is_none() {
            return Err(Error::UnknownColorSpace(name.to_string()));
        }
        if let Some((role, _)) = self.roles.iter().find(|(_, t)| t.as_str() == name) {
            return Err(Error::Validation(format!(
                "color space {:?} is used by role {:?}",
                name, role
            )));
        }
        for display in &self.displays {
            if let Some(view) = display.views.iter().find(|v| v.colorspace == name) {
                return Err(Error::Validation(format!(
                    "color space {:?} is used by view {:?} of display {:?}",
                    name, view.name, display.name
                )));
            }
        }
        self.colorspaces.retain(|cs| cs.name != name);
        Ok(())
    }

    /// Adds or replaces a view on a display, creating the display when
    /// needed. The color space must already exist.
    pub fn add_display_view(&mut self, display: &str, view: &str, colorspace: &str) -> Result<()> {
        if self.find_color_space(colorspace).is_none() {
            return Err(Error::UnknownColorSpace(colorspace.to_string()));
        }
        let entry = View {
            name: view.to_string(),
            colorspace: colorspace.to_string(),
        };
        match self.displays.iter_mut().find(|d| d.name == display) {
            Some(d) => match d.views.iter_mut().find(|v| v.name == view) {
                Some(slot) => *slot = entry,
                None => d.views.push(entry),
            },
            None => self.displays.push(Display {
                name: display.to_string(),
                views: vec![entry],
            }),
        }
        Ok(())
    }

    /// Removes a view; an emptied display is dropped with it.
    pub fn remove_display_view(&mut self, display: &str, view: &str) -> Result<()> {
        self.find_view(display, view)?;
        if let Some(d) = self.displays.iter_mut().find(|d| d.name == display) {
            d.views.retain(|v| v.name != view);
        }
        self.displays.retain(|d| !d.views.is_empty());
        Ok(())
    }

    /// Appends to the active display list, unless the env var owns it.
    pub fn add_active_display(&mut self, display: &str) -> Result<()> {
        active_list_locked("display", ACTIVE_DISPLAYS_ENVVAR)?;
        if !self.active_displays.iter().any(|d| d == display) {
            self.active_displays.push(display.to_string());
        }
        Ok(())
    }

    pub fn remove_active_display(&mut self, display: &str) -> Result<()> {
        active_list_locked("display", ACTIVE_DISPLAYS_ENVVAR)?;
        self.active_displays.retain(|d| d != display);
        Ok(())
    }

    pub fn add_active_view(&mut self, view: &str) -> Result<()> {
        active_list_locked("view", ACTIVE_VIEWS_ENVVAR)?;
        if !self.active_views.iter().any(|v| v == view) {
            self.active_views.push(view.to_string());
        }
        Ok(())
    }

    pub fn remove_active_view(&mut self, view: &str) -> Result<()> {
        active_list_locked("view", ACTIVE_VIEWS_ENVVAR)?;
        self.active_views.retain(|v| v != view);
        Ok(())
    }
}

// ============================================================================
// Processor building
// ============================================================================

impl Config {
    /// Bakes a transform into a processor, resolving color spaces,
    /// loading LUT files, and collapsing ops.
    pub fn processor(&self, context: &Context, transform: &Transform) -> Result<Processor> {
        let ops = self.transform_ops(context, transform, Direction::Forward)?;
        Ok(Processor::from_ops(ops))
    }

    /// Shorthand for a forward color-space conversion.
    pub fn processor_between(
        &self,
        context: &Context,
        src: &str,
        dst: &str,
    ) -> Result<Processor> {
        self.processor(context, &Transform::color_space(src, dst))
    }

    fn transform_ops(
        &self,
        context: &Context,
        transform: &Transform,
        outer: Direction,
    ) -> Result<Vec<Op>> {
        let dir = transform.direction().combine(outer);
        match transform {
            Transform::ColorSpace(t) => {
                let (src, dst) = match dir {
                    Direction::Forward => (&t.src, &t.dst),
                    Direction::Inverse => (&t.dst, &t.src),
                };
                self.conversion_ops(context, src, dst)
            }
            Transform::DisplayView(t) => {
                let view_space = self
                    .display_view_color_space(&t.display, &t.view)?
                    .name
                    .clone();
                let (src, dst) = match dir {
                    Direction::Forward => (t.src.as_str(), view_space.as_str()),
                    Direction::Inverse => (view_space.as_str(), t.src.as_str()),
                };
                self.conversion_ops(context, src, dst)
            }
            Transform::File(t) => {
                let path = context.resolve_file(&t.src)?;
                let lut = load_lut(&path)?;
                Ok(vec![Op::Lut1d {
                    lut,
                    inverse: dir == Direction::Inverse,
                }])
            }
            Transform::Group(t) => {
                let mut ops = Vec::new();
                match dir {
                    Direction::Forward => {
                        for child in &t.children {
                            ops.extend(self.transform_ops(context, child, Direction::Forward)?);
                        }
                    }
                    Direction::Inverse => {
                        for child in t.children.iter().rev() {
                            ops.extend(self.transform_ops(context, child, Direction::Inverse)?);
                        }
                    }
                }
                Ok(ops)
            }
        }
    }

    fn conversion_ops(&self, context: &Context, src: &str, dst: &str) -> Result<Vec<Op>> {
        let src = self.color_space(src)?;
        let dst = self.color_space(dst)?;
        // Data spaces carry non-color payloads and bypass conversion.
        if src.name == dst.name || src.is_data || dst.is_data {
            return Ok(Vec::new());
        }
        let mut ops = self.to_reference_ops(context, src)?;
        let from_ref = self.to_reference_ops(context, dst)?;
        for op in from_ref.into_iter().rev() {
            ops.push(op.inverted()?);
        }
        Ok(ops)
    }

    fn to_reference_ops(&self, context: &Context, cs: &ColorSpace) -> Result<Vec<Op>> {
        cs.to_reference
            .iter()
            .map(|step| match step {
                Step::Matrix { matrix, offset } => Ok(Op::Matrix {
                    m: *matrix,
                    offset: *offset,
                }),
                Step::Exponent { exponent } => Ok(Op::Exponent { e: *exponent }),
                Step::File { src } => {
                    let path = context.resolve_file(src)?;
                    Ok(Op::Lut1d {
                        lut: load_lut(&path)?,
                        inverse: false,
                    })
                }
            })
            .collect()
    }
}

fn load_lut(path: &Path) -> Result<Arc<Lut1d>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if ext.eq_ignore_ascii_case("spi1d") {
        Lut1d::from_spi1d_file(path)
    } else {
        Err(Error::UnsupportedFormat(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TEST_CONFIG: &str = "\
name: studio
search_path: [luts]
environment:
  SHOT: none
family_separator: '/'
roles:
  scene_linear: lin
  compositing_log: lg2
displays:
  - name: sRGB
    views:
      - {name: Standard, colorspace: srgb}
      - {name: Raw, colorspace: raw}
  - name: P3
    views:
      - {name: Standard, colorspace: srgb}
active_displays: [sRGB, P3]
active_views: [Standard, Raw]
colorspaces:
  - name: lin
    family: Working
    encoding: scene-linear
    categories: [working-space]
  - name: lg2
    family: Working/Log
    encoding: log
    categories: [working-space, file-io]
    to_reference:
      - exponent: [2.0, 2.0, 2.0]
  - name: srgb
    family: Display/Standard
    encoding: sdr
    categories: [file-io]
    to_reference:
      - exponent: [2.2, 2.2, 2.2]
      - matrix: [0.5, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.5]
  - name: raw
    family: Utility
    encoding: data
    is_data: true
";

    fn test_config() -> Config {
        Config::from_yaml(TEST_CONFIG).unwrap()
    }

    #[test]
    fn parses_and_validates_the_test_document() {
        let config = test_config();
        assert_eq!(config.name, "studio");
        assert_eq!(config.color_space_names(), vec!["lin", "lg2", "srgb", "raw"]);
        assert_eq!(config.display_names(), vec!["sRGB", "P3"]);
    }

    #[test]
    fn roles_resolve_to_their_target_space() {
        let config = test_config();
        assert_eq!(config.color_space("scene_linear").unwrap().name, "lin");
        assert_eq!(config.role_color_space("compositing_log").unwrap().name, "lg2");
        assert!(matches!(
            config.color_space("nope"),
            Err(Error::UnknownColorSpace(_))
        ));
    }

    #[test]
    fn dangling_role_fails_validation() {
        let text = "roles: {default: ghost}\ncolorspaces: [{name: raw}]\n";
        assert!(matches!(
            Config::from_yaml(text),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn duplicate_color_space_fails_validation() {
        let text = "colorspaces: [{name: a}, {name: a}]\n";
        assert!(Config::from_yaml(text).is_err());
    }

    #[test]
    fn view_filtering_keeps_active_order() {
        let all = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let active = vec!["C".to_string(), "A".to_string(), "Ghost".to_string()];
        assert_eq!(filter_active(&all, &active, None), vec!["C", "A"]);
        assert_eq!(filter_active(&all, &[], None), vec!["A", "B", "C"]);
        let env = Some(vec!["B".to_string()]);
        assert_eq!(filter_active(&all, &active, env), vec!["B"]);
    }

    #[test]
    fn conversion_through_the_reference_space() {
        let config = test_config();
        let ctx = Context::new(&config);
        // lg2 -> reference squares, srgb <- reference takes the 1/2.2
        // root of the halved value.
        let p = config.processor_between(&ctx, "lg2", "srgb").unwrap();
        let mut rgb = [0.5f32, 0.5, 0.5];
        p.apply_rgb(&mut rgb);
        let expected = (0.25f32 / 0.5).powf(1.0 / 2.2);
        assert_relative_eq!(rgb[0], expected, epsilon = 1e-5);
    }

    #[test]
    fn same_space_and_data_spaces_are_noops() {
        let config = test_config();
        let ctx = Context::new(&config);
        assert!(config.processor_between(&ctx, "lin", "lin").unwrap().is_noop());
        assert!(config.processor_between(&ctx, "raw", "srgb").unwrap().is_noop());
    }

    #[test]
    fn display_view_transform_uses_the_view_space() {
        let config = test_config();
        let ctx = Context::new(&config);
        let t = Transform::display_view("lg2", "sRGB", "Standard");
        let forward = config.processor(&ctx, &t).unwrap();
        let equivalent = config.processor_between(&ctx, "lg2", "srgb").unwrap();
        let mut a = [0.3f32, 0.3, 0.3];
        let mut b = a;
        forward.apply_rgb(&mut a);
        equivalent.apply_rgb(&mut b);
        assert_relative_eq!(a[0], b[0], epsilon = 1e-6);
    }

    #[test]
    fn inverse_group_round_trips() {
        let config = test_config();
        let ctx = Context::new(&config);
        let group = Transform::group(vec![
            Transform::color_space("lg2", "lin"),
            Transform::color_space("lin", "srgb"),
        ]);
        let forward = config.processor(&ctx, &group).unwrap();
        let inverse = config
            .processor(&ctx, &group.with_direction(Direction::Inverse))
            .unwrap();
        let mut rgb = [0.4f32, 0.4, 0.4];
        forward.apply_rgb(&mut rgb);
        inverse.apply_rgb(&mut rgb);
        assert_relative_eq!(rgb[0], 0.4, epsilon = 1e-4);
    }

    #[test]
    fn unknown_display_and_view_are_reported() {
        let config = test_config();
        assert!(matches!(
            config.view_names("Ghost"),
            Err(Error::UnknownDisplay(_))
        ));
        assert!(matches!(
            config.display_view_color_space("sRGB", "Ghost"),
            Err(Error::UnknownView { .. })
        ));
    }

    #[test]
    fn editing_displays_and_views() {
        let mut config = test_config();
        config.add_display_view("Cinema", "Filmic", "srgb").unwrap();
        assert!(config.display_names().contains(&"Cinema"));
        assert!(matches!(
            config.add_display_view("Cinema", "Bad", "ghost"),
            Err(Error::UnknownColorSpace(_))
        ));
        config.remove_display_view("Cinema", "Filmic").unwrap();
        assert!(!config.display_names().contains(&"Cinema"));
    }

    #[test]
    fn referenced_color_spaces_cannot_be_removed() {
        let mut config = test_config();
        assert!(config.remove_color_space("srgb").is_err());
        assert!(config.remove_color_space("lin").is_err());
        config.roles.remove("scene_linear");
        config.remove_color_space("lin").unwrap();
        assert!(!config.color_space_names().contains(&"lin"));
    }

    #[test]
    fn the_raw_fallback_parses_and_is_inert() {
        let config = Config::raw();
        let ctx = Context::new(&config);
        assert_eq!(config.default_display().unwrap(), "Default");
        assert_eq!(config.default_view("Default").unwrap(), "Raw");
        let p = config
            .processor(&ctx, &Transform::display_view("raw", "Default", "Raw"))
            .unwrap();
        assert!(p.is_noop());
    }

    #[test]
    fn file_transforms_load_from_the_search_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("luts")).unwrap();
        std::fs::write(
            dir.path().join("luts/double.spi1d"),
            "Version 1\nFrom 0.0 1.0\nComponents 1\nLength 2\n{\n0.0\n2.0\n}\n",
        )
        .unwrap();
        let mut config = test_config();
        config.working_dir = dir.path().to_path_buf();
        let ctx = Context::new(&config);

        let p = config.processor(&ctx, &Transform::file("double.spi1d")).unwrap();
        let mut rgb = [0.5f32, 0.25, 1.0];
        p.apply_rgb(&mut rgb);
        assert_relative_eq!(rgb[0], 1.0, epsilon = 1e-6);

        assert!(matches!(
            config.processor(&ctx, &Transform::file("missing.spi1d")),
            Err(Error::FileNotFound(_))
        ));
        std::fs::write(dir.path().join("luts/x.cube"), "x").unwrap();
        assert!(matches!(
            config.processor(&ctx, &Transform::file("x.cube")),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
