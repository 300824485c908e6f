//! Builds the color-space list an application shows in a menu.
//!
//! Selection runs in stages: a single role short-circuits everything;
//! otherwise candidates are filtered by app categories and encodings
//! with fallbacks when a filter would empty the menu, intersected with
//! user categories, then role items and explicitly requested spaces are
//! appended.

use prism_color::{ColorSpace, Config};

use crate::error::{Error, Result};

/// What the application and the user want in the menu. Empty fields do
/// not filter.
#[derive(Debug, Clone, Default)]
pub struct MenuParams {
    /// When set and defined in the config, the menu is that single role.
    pub role: String,
    pub app_categories: Vec<String>,
    pub user_categories: Vec<String>,
    pub encodings: Vec<String>,
    /// Appends one item per config role, under a "Roles" hierarchy.
    pub include_roles: bool,
    /// Spaces to append even when the filters would exclude them.
    pub additional_spaces: Vec<String>,
}

/// One menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// The config name to store and evaluate with.
    pub name: String,
    /// What the menu displays; differs from `name` for role items.
    pub ui_name: String,
    /// Family levels for hosts that support nested menus.
    pub hierarchy: Vec<String>,
    pub description: String,
}

impl MenuEntry {
    fn from_space(cs: &ColorSpace, separator: char) -> MenuEntry {
        MenuEntry {
            name: cs.name.clone(),
            ui_name: cs.name.clone(),
            hierarchy: cs
                .hierarchy_levels(separator)
                .into_iter()
                .map(str::to_string)
                .collect(),
            description: cs.description.clone(),
        }
    }
}

/// An ordered, filtered menu of color spaces.
#[derive(Debug, Clone, Default)]
pub struct ColorSpaceMenu {
    entries: Vec<MenuEntry>,
}

impl ColorSpaceMenu {
    pub fn new(config: &Config, params: &MenuParams) -> Result<ColorSpaceMenu> {
        let mut entries = Vec::new();

        // A defined role pins the menu to that one space.
        if !params.role.is_empty() && config.has_role(&params.role) {
            let cs = config.role_color_space(&params.role)?;
            entries.push(MenuEntry {
                name: cs.name.clone(),
                ui_name: format!("{} ({})", params.role, cs.name),
                hierarchy: Vec::new(),
                description: String::new(),
            });
            return Ok(ColorSpaceMenu { entries });
        }

        let separator = config.family_separator;
        for cs in filtered_spaces(config, params) {
            entries.push(MenuEntry::from_space(cs, separator));
        }

        if params.include_roles {
            for (role, target) in &config.roles {
                let cs = config.color_space(target)?;
                entries.push(MenuEntry {
                    name: role.clone(),
                    ui_name: format!("{} ({})", role, cs.name),
                    hierarchy: vec!["Roles".to_string()],
                    description: String::new(),
                });
            }
        }

        for name in &params.additional_spaces {
            if entries.iter().any(|e| &e.name == name) {
                continue;
            }
            let cs = config
                .color_space(name)
                .map_err(|_| Error::UnknownMenuItem(name.clone()))?;
            entries.push(MenuEntry::from_space(cs, separator));
        }

        Ok(ColorSpaceMenu { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&MenuEntry> {
        self.entries.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// The display strings, in menu order; feeds choice parameters.
    pub fn ui_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.ui_name.as_str()).collect()
    }
}

fn matches_any_category(cs: &ColorSpace, categories: &[String]) -> bool {
    categories.iter().any(|c| cs.has_category(c))
}

fn matches_any_encoding(cs: &ColorSpace, encodings: &[String]) -> bool {
    encodings
        .iter()
        .any(|e| cs.encoding.as_str().eq_ignore_ascii_case(e))
}

/// The staged filter: app categories narrowed by encodings, each
/// dropped in turn when it would empty the result, then intersected
/// with user categories unless that intersection is empty.
fn filtered_spaces<'c>(config: &'c Config, params: &MenuParams) -> Vec<&'c ColorSpace> {
    let all: Vec<&ColorSpace> = config.colorspaces.iter().collect();

    let app: Vec<&ColorSpace> = if !params.app_categories.is_empty() {
        let with_enc: Vec<&ColorSpace> = all
            .iter()
            .copied()
            .filter(|cs| {
                matches_any_category(cs, &params.app_categories)
                    && (params.encodings.is_empty() || matches_any_encoding(cs, &params.encodings))
            })
            .collect();
        if !with_enc.is_empty() {
            with_enc
        } else {
            let cats_only: Vec<&ColorSpace> = all
                .iter()
                .copied()
                .filter(|cs| matches_any_category(cs, &params.app_categories))
                .collect();
            if !cats_only.is_empty() {
                log::info!("no color space matched both app categories and encodings; encodings ignored");
                cats_only
            } else if !params.encodings.is_empty() {
                all.iter()
                    .copied()
                    .filter(|cs| matches_any_encoding(cs, &params.encodings))
                    .collect()
            } else {
                Vec::new()
            }
        }
    } else if !params.encodings.is_empty() {
        all.iter()
            .copied()
            .filter(|cs| matches_any_encoding(cs, &params.encodings))
            .collect()
    } else {
        Vec::new()
    };

    let user: Vec<&ColorSpace> = if params.user_categories.is_empty() {
        Vec::new()
    } else {
        all.iter()
            .copied()
            .filter(|cs| matches_any_category(cs, &params.user_categories))
            .collect()
    };

    match (app.is_empty(), user.is_empty()) {
        (false, false) => {
            let both: Vec<&ColorSpace> = app
                .iter()
                .copied()
                .filter(|cs| user.iter().any(|u| u.name == cs.name))
                .collect();
            if !both.is_empty() {
                both
            } else {
                log::info!("app and user category filters do not overlap; user categories ignored");
                app
            }
        }
        (false, true) => app,
        (true, false) => user,
        // No filter matched anything: show the whole config.
        (true, true) => all,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;

    #[test]
    fn no_filters_lists_every_space() {
        let config = test_config();
        let menu = ColorSpaceMenu::new(&config, &MenuParams::default()).unwrap();
        assert_eq!(menu.len(), config.colorspaces.len());
        assert_eq!(menu.index_of("lin"), Some(0));
    }

    #[test]
    fn a_defined_role_pins_the_menu() {
        let config = test_config();
        let params = MenuParams {
            role: "scene_linear".to_string(),
            ..Default::default()
        };
        let menu = ColorSpaceMenu::new(&config, &params).unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu.entry(0).unwrap().name, "lin");
        assert_eq!(menu.entry(0).unwrap().ui_name, "scene_linear (lin)");
    }

    #[test]
    fn an_undefined_role_falls_through_to_filtering() {
        let config = test_config();
        let params = MenuParams {
            role: "made_up".to_string(),
            ..Default::default()
        };
        let menu = ColorSpaceMenu::new(&config, &params).unwrap();
        assert!(menu.len() > 1);
    }

    #[test]
    fn categories_and_encodings_narrow_the_menu() {
        let config = test_config();
        let params = MenuParams {
            app_categories: vec!["file-io".to_string()],
            encodings: vec!["log".to_string()],
            ..Default::default()
        };
        let menu = ColorSpaceMenu::new(&config, &params).unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu.entry(0).unwrap().name, "lg2");
    }

    #[test]
    fn impossible_encodings_fall_back_to_categories_alone() {
        let config = test_config();
        let params = MenuParams {
            app_categories: vec!["file-io".to_string()],
            encodings: vec!["hdr".to_string()],
            ..Default::default()
        };
        let menu = ColorSpaceMenu::new(&config, &params).unwrap();
        let names: Vec<_> = menu.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["lg2", "srgb"]);
    }

    #[test]
    fn user_categories_intersect_with_app_categories() {
        let config = test_config();
        let params = MenuParams {
            app_categories: vec!["file-io".to_string()],
            user_categories: vec!["working-space".to_string()],
            ..Default::default()
        };
        let menu = ColorSpaceMenu::new(&config, &params).unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu.entry(0).unwrap().name, "lg2");
    }

    #[test]
    fn roles_append_under_their_own_hierarchy() {
        let config = test_config();
        let params = MenuParams {
            include_roles: true,
            ..Default::default()
        };
        let menu = ColorSpaceMenu::new(&config, &params).unwrap();
        let role = menu
            .entries()
            .iter()
            .find(|e| e.name == "scene_linear")
            .unwrap();
        assert_eq!(role.hierarchy, vec!["Roles"]);
        assert_eq!(role.ui_name, "scene_linear (lin)");
    }

    #[test]
    fn additional_spaces_append_without_duplicates() {
        let config = test_config();
        let params = MenuParams {
            app_categories: vec!["file-io".to_string()],
            additional_spaces: vec!["raw".to_string(), "srgb".to_string()],
            ..Default::default()
        };
        let menu = ColorSpaceMenu::new(&config, &params).unwrap();
        let names: Vec<_> = menu.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["lg2", "srgb", "raw"]);

        let bad = MenuParams {
            additional_spaces: vec!["ghost".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            ColorSpaceMenu::new(&config, &bad),
            Err(Error::UnknownMenuItem(_))
        ));
    }

    #[test]
    fn hierarchy_comes_from_the_family() {
        let config = test_config();
        let menu = ColorSpaceMenu::new(&config, &MenuParams::default()).unwrap();
        let srgb = menu.entries().iter().find(|e| e.name == "srgb").unwrap();
        assert_eq!(srgb.hierarchy, vec!["Display", "Standard"]);
    }
}
