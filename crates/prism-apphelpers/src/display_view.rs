//! Editing display/view pairs on a config, and the viewing processor.
//!
//! Adding a pair installs the view's color space when it is new and
//! appends to the active lists; removal walks the same steps backwards,
//! dropping the color space once nothing else references it.

use prism_color::{ColorSpace, Config, Context, Direction, Processor, Transform};

use crate::error::Result;

/// The processor an application uses to show `working` through a
/// display/view pair. Inverse goes from the display back to working.
pub fn viewing_processor(
    config: &Config,
    context: &Context,
    working: &str,
    display: &str,
    view: &str,
    direction: Direction,
) -> Result<Processor> {
    let transform = Transform::display_view(working, display, view).with_direction(direction);
    Ok(config.processor(context, &transform)?)
}

/// Installs `color_space` (unless already defined) and registers it as
/// the `display`/`view` pair, activating both names.
pub fn add_display_view(
    config: &mut Config,
    display: &str,
    view: &str,
    color_space: ColorSpace,
) -> Result<()> {
    let cs_name = color_space.name.clone();
    if config.color_space(&cs_name).is_err() {
        config.add_color_space(color_space);
    }
    config.add_display_view(display, view, &cs_name)?;
    activate(config, display, view)?;
    Ok(())
}

/// Removes the pair, deactivates orphaned names, and drops the view's
/// color space when no other view, role or space still uses it.
pub fn remove_display_view(config: &mut Config, display: &str, view: &str) -> Result<()> {
    let cs_name = config.display_view_color_space(display, view)?.name.clone();
    config.remove_display_view(display, view)?;
    deactivate(config, display, view)?;
    // Best effort: a still-referenced space simply stays.
    if config.remove_color_space(&cs_name).is_err() {
        log::debug!("color space {:?} is still referenced; keeping it", cs_name);
    }
    Ok(())
}

/// An empty active list means "everything", so only a non-empty list
/// needs the new names appended.
fn activate(config: &mut Config, display: &str, view: &str) -> Result<()> {
    if !config.active_displays.is_empty() {
        config.add_active_display(display)?;
    }
    if !config.active_views.is_empty() {
        config.add_active_view(view)?;
    }
    Ok(())
}

fn deactivate(config: &mut Config, display: &str, view: &str) -> Result<()> {
    // The display may survive under other views; the view name may be
    // shared by other displays.
    if !config.display_names().contains(&display) {
        config.remove_active_display(display)?;
    }
    let view_still_used = config
        .display_names()
        .iter()
        .any(|d| config.view_names(d).map(|v| v.iter().any(|n| n == view)).unwrap_or(false));
    if !view_still_used {
        config.remove_active_view(view)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;
    use approx::assert_relative_eq;
    use prism_color::Step;

    fn film_space() -> ColorSpace {
        ColorSpace {
            name: "film_look".to_string(),
            family: "Display".to_string(),
            to_reference: vec![Step::Exponent {
                exponent: [2.0, 2.0, 2.0],
            }],
            ..ColorSpace::named("film_look")
        }
    }

    #[test]
    fn adding_a_pair_installs_space_view_and_active_names() {
        let mut config = test_config();
        add_display_view(&mut config, "Cinema", "Film", film_space()).unwrap();

        assert!(config.color_space("film_look").is_ok());
        assert_eq!(
            config.display_view_color_space("Cinema", "Film").unwrap().name,
            "film_look"
        );
        assert!(config.active_display_names().contains(&"Cinema".to_string()));
        assert!(config.view_names("Cinema").unwrap().contains(&"Film".to_string()));
    }

    #[test]
    fn removing_the_pair_undoes_everything() {
        let mut config = test_config();
        add_display_view(&mut config, "Cinema", "Film", film_space()).unwrap();
        remove_display_view(&mut config, "Cinema", "Film").unwrap();

        assert!(config.color_space("film_look").is_err());
        assert!(!config.display_names().contains(&"Cinema"));
        assert!(!config.active_display_names().contains(&"Cinema".to_string()));
    }

    #[test]
    fn removal_keeps_a_space_other_views_still_use() {
        let mut config = test_config();
        // Both views of the pre-existing sRGB display use "srgb".
        add_display_view(
            &mut config,
            "Cinema",
            "Film",
            ColorSpace::named("srgb"),
        )
        .unwrap();
        remove_display_view(&mut config, "Cinema", "Film").unwrap();
        assert!(config.color_space("srgb").is_ok());
    }

    #[test]
    fn viewing_processor_round_trips_through_the_display() {
        let config = test_config();
        let ctx = Context::new(&config);
        let forward =
            viewing_processor(&config, &ctx, "lin", "sRGB", "Standard", Direction::Forward)
                .unwrap();
        let inverse =
            viewing_processor(&config, &ctx, "lin", "sRGB", "Standard", Direction::Inverse)
                .unwrap();
        let mut rgb = [0.18f32, 0.18, 0.18];
        forward.apply_rgb(&mut rgb);
        inverse.apply_rgb(&mut rgb);
        assert_relative_eq!(rgb[0], 0.18, epsilon = 1e-4);
    }
}
