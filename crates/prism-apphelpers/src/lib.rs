//! Application-facing helpers over the color engine: building the
//! color-space menus a UI presents, and editing a config's display and
//! view lists in place.

pub mod display_view;
pub mod error;
pub mod menu;

pub use display_view::{add_display_view, remove_display_view, viewing_processor};
pub use error::{Error, Result};
pub use menu::{ColorSpaceMenu, MenuEntry, MenuParams};

#[cfg(test)]
pub(crate) mod test_support {
    use prism_color::Config;

    const TEST_CONFIG: &str = "\
name: studio
roles:
  scene_linear: lin
displays:
  - name: sRGB
    views:
      - {name: Standard, colorspace: srgb}
      - {name: Raw, colorspace: srgb}
active_displays: [sRGB]
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
  - name: raw
    family: Utility
    encoding: data
    is_data: true
";

    pub fn test_config() -> Config {
        Config::from_yaml(TEST_CONFIG).unwrap()
    }
}
