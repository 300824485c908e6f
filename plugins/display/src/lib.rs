//! Shows footage through a display/view pair of the current config,
//! with exposure applied before the viewing pipeline and gamma after,
//! the way a review session tweaks a shot without touching the grade.

use std::ffi::CStr;
use std::sync::Arc;

use ofx::ofx_sys::OfxRectI;
use ofx::{
    BitDepth, ChangeReason, ClipPreferencesSetter, Context, EffectDescriptor, EffectInstance,
    Error, HostDescription, Image, ImageEffect, InstanceChangedArgs, MessageType, OfxResult,
    ParamDescriptor, PixelComponent, PixelProcessor, PluginFactory, PreMultiplication, RenderArgs,
    RenderSafety,
};
use prism_apphelpers::{viewing_processor, ColorSpaceMenu, MenuParams};
use prism_color::{Config, Direction, Processor};

const PARAM_SRC: &str = "src_space";
const PARAM_DISPLAY: &str = "display";
const PARAM_VIEW: &str = "view";
const PARAM_EXPOSURE: &str = "exposure";
const PARAM_GAMMA: &str = "gamma";

fn engine_error(effect: &EffectInstance, err: &prism_color::Error) -> Error {
    log::error!("color engine: {}", err);
    effect
        .message(MessageType::Error, "prism", &err.to_string())
        .ok();
    Error::Suite(ofx::ofx_sys::status::FAILED)
}

fn failed(err: &dyn std::fmt::Display) -> Error {
    log::error!("color engine: {}", err);
    Error::Suite(ofx::ofx_sys::status::FAILED)
}

// ============================================================================
// Factory
// ============================================================================

#[derive(Default)]
struct DisplayFactory;

impl PluginFactory for DisplayFactory {
    fn identifier(&self) -> &'static CStr {
        c"org.prism.Display"
    }

    fn version(&self) -> (u32, u32) {
        (1, 0)
    }

    fn describe(&self, _host: &HostDescription, desc: &mut EffectDescriptor) -> OfxResult<()> {
        desc.set_labels("Display", "Display", "Prism Display")?;
        desc.set_grouping("Color/Prism")?;
        desc.set_description(
            "Applies a display/view pipeline with review exposure and gamma.",
        )?;
        desc.add_supported_context(Context::Filter)?;
        desc.add_supported_bit_depth(BitDepth::Float)?;
        desc.set_supports_tiles(true)?;
        desc.set_render_thread_safety(RenderSafety::FullySafe)?;
        Ok(())
    }

    fn describe_in_context(
        &self,
        _host: &HostDescription,
        _context: Context,
        desc: &mut EffectDescriptor,
    ) -> OfxResult<()> {
        let mut src = desc.define_clip("Source")?;
        src.add_supported_component(PixelComponent::Rgba)?;
        let mut out = desc.define_clip("Output")?;
        out.add_supported_component(PixelComponent::Rgba)?;

        let config = Config::current().map_err(|e| failed(&e))?;
        let menu = ColorSpaceMenu::new(&config, &MenuParams::default()).map_err(|e| failed(&e))?;

        let mut src_space = desc.params().define_choice_param(PARAM_SRC)?;
        src_space.set_label("Input Space")?;
        src_space.set_hint("The working color space of the footage")?;
        for entry in menu.entries() {
            src_space.append_option(&entry.ui_name, &entry.description)?;
        }

        let mut display = desc.params().define_choice_param(PARAM_DISPLAY)?;
        display.set_label("Display")?;
        display.set_hint("The display device to preview on")?;
        for name in config.active_display_names() {
            display.append_option(&name, "")?;
        }

        let mut view = desc.params().define_choice_param(PARAM_VIEW)?;
        view.set_label("View")?;
        view.set_hint("The view of the chosen display")?;
        if let Ok(default_display) = config.default_display() {
            for name in config.view_names(&default_display).map_err(|e| failed(&e))? {
                view.append_option(&name, "")?;
            }
        }

        let mut exposure = desc.params().define_double_param(PARAM_EXPOSURE)?;
        exposure.set_label("Exposure")?;
        exposure.set_hint("Stops applied before the viewing pipeline")?;
        exposure.set_default(0.0)?;
        exposure.set_display_range(-6.0, 6.0)?;

        let mut gamma = desc.params().define_double_param(PARAM_GAMMA)?;
        gamma.set_label("Gamma")?;
        gamma.set_hint("Display gamma applied after the viewing pipeline")?;
        gamma.set_default(1.0)?;
        gamma.set_range(0.01, 4.0)?;
        gamma.set_display_range(0.01, 4.0)?;
        Ok(())
    }

    fn create_instance(
        &self,
        _host: &HostDescription,
        effect: &mut EffectInstance,
    ) -> OfxResult<Box<dyn ImageEffect>> {
        let config = Config::current().map_err(|e| engine_error(effect, &e))?;
        let menu =
            ColorSpaceMenu::new(&config, &MenuParams::default()).map_err(|e| failed(&e))?;
        Ok(Box::new(DisplayEffect { config, menu }))
    }
}

// ============================================================================
// Effect
// ============================================================================

struct DisplayEffect {
    config: Arc<Config>,
    menu: ColorSpaceMenu,
}

impl DisplayEffect {
    fn choice_text(
        &self,
        effect: &EffectInstance,
        param: &str,
        options: &[String],
    ) -> OfxResult<String> {
        let index = effect.params().fetch_choice_param(param)?.get_value()?;
        options
            .get(index.max(0) as usize)
            .cloned()
            .ok_or_else(|| Error::TypeRequest(format!("choice index {} out of menu", index)))
    }

    fn chosen_display(&self, effect: &EffectInstance) -> OfxResult<String> {
        self.choice_text(effect, PARAM_DISPLAY, &self.config.active_display_names())
    }
}

impl ImageEffect for DisplayEffect {
    fn render(&mut self, effect: &mut EffectInstance, args: &RenderArgs) -> OfxResult<()> {
        let params = effect.params();
        let src_index = params.fetch_choice_param(PARAM_SRC)?.get_value()?;
        let src_space = self
            .menu
            .entry(src_index.max(0) as usize)
            .map(|e| e.name.clone())
            .ok_or_else(|| Error::TypeRequest(format!("choice index {} out of menu", src_index)))?;
        let display = self.chosen_display(effect)?;
        let views = self
            .config
            .view_names(&display)
            .map_err(|e| engine_error(effect, &e))?;
        let view = self.choice_text(effect, PARAM_VIEW, &views)?;
        let exposure = params
            .fetch_double_param(PARAM_EXPOSURE)?
            .get_value_at_time(args.time)?[0];
        let gamma = params
            .fetch_double_param(PARAM_GAMMA)?
            .get_value_at_time(args.time)?[0];

        let context = prism_color::Context::new(&self.config);
        let processor = viewing_processor(
            &self.config,
            &context,
            &src_space,
            &display,
            &view,
            Direction::Forward,
        )
        .map_err(|e| failed(&e))?;

        let src_clip = effect.fetch_clip("Source")?;
        let dst_clip = effect.fetch_clip("Output")?;
        let src = src_clip.fetch_image(args.time, None)?.ok_or(Error::BadHandle)?;
        let dst = dst_clip.fetch_image(args.time, None)?.ok_or(Error::BadHandle)?;

        let worker = ViewingPixelProcessor {
            src: &src,
            dst: &dst,
            window: args.render_window,
            processor: &processor,
            scale: 2f32.powf(exposure as f32),
            inv_gamma: 1.0 / (gamma as f32).max(0.01),
        };
        ofx::thread::process(effect.suites(), &worker, 0)
    }

    /// Keeps the view menu in step when the display changes.
    fn instance_changed(
        &mut self,
        effect: &mut EffectInstance,
        args: &InstanceChangedArgs,
    ) -> OfxResult<()> {
        if args.name != PARAM_DISPLAY || args.reason == ChangeReason::TimeChanged {
            return Ok(());
        }
        let display = self.chosen_display(effect)?;
        let views = self
            .config
            .view_names(&display)
            .map_err(|e| engine_error(effect, &e))?;
        let options: Vec<&str> = views.iter().map(String::as_str).collect();
        let view = effect.params().fetch_choice_param(PARAM_VIEW)?;
        view.reset_options(&options)?;
        view.set_value(0)?;
        Ok(())
    }

    fn get_clip_preferences(
        &mut self,
        _effect: &mut EffectInstance,
        prefs: &mut ClipPreferencesSetter,
    ) -> OfxResult<()> {
        prefs.set_clip_bit_depth("Source", BitDepth::Float)?;
        prefs.set_clip_bit_depth("Output", BitDepth::Float)?;
        prefs.set_output_premultiplication(PreMultiplication::PreMultiplied)?;
        Ok(())
    }
}

// ============================================================================
// Pixel loop
// ============================================================================

struct ViewingPixelProcessor<'a> {
    src: &'a Image,
    dst: &'a Image,
    window: OfxRectI,
    processor: &'a Processor,
    scale: f32,
    inv_gamma: f32,
}

impl PixelProcessor for ViewingPixelProcessor<'_> {
    fn render_window(&self) -> OfxRectI {
        self.window
    }

    fn process_window(&self, window: OfxRectI) {
        for y in window.y1..window.y2 {
            for x in window.x1..window.x2 {
                let s = self.src.pixel_address(x, y) as *const f32;
                let d = self.dst.pixel_address(x, y) as *mut f32;
                if s.is_null() || d.is_null() {
                    continue;
                }
                let mut rgb = unsafe {
                    [
                        *s * self.scale,
                        *s.add(1) * self.scale,
                        *s.add(2) * self.scale,
                    ]
                };
                self.processor.apply_rgb(&mut rgb);
                for v in &mut rgb {
                    *v = v.max(0.0).powf(self.inv_gamma);
                }
                unsafe {
                    *d = rgb[0];
                    *d.add(1) = rgb[1];
                    *d.add(2) = rgb[2];
                    *d.add(3) = *s.add(3);
                }
            }
        }
    }
}

ofx::export_ofx!(DisplayFactory);
