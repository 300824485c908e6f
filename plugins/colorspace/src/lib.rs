//! Converts footage between two color spaces of the current config.
//!
//! Both ends of the conversion are choice menus built from the config,
//! with roles listed under their own submenu.

use std::ffi::CStr;
use std::sync::Arc;

use ofx::ofx_sys::OfxRectI;
use ofx::{
    BitDepth, ClipPreferencesSetter, Context, EffectDescriptor, EffectInstance, Error,
    HostDescription, IdentityResult, Image, ImageEffect, IsIdentityArgs, MessageType, OfxResult,
    ParamDescriptor, PixelComponent, PixelProcessor, PluginFactory, PreMultiplication, RenderArgs,
    RenderSafety,
};
use prism_apphelpers::{ColorSpaceMenu, MenuParams};
use prism_color::{Config, Processor, Transform};

const PARAM_SRC: &str = "src_space";
const PARAM_DST: &str = "dst_space";

/// Reports an engine failure to the user and folds it into the action
/// status.
fn engine_error(effect: &EffectInstance, err: &prism_color::Error) -> Error {
    log::error!("color engine: {}", err);
    effect
        .message(MessageType::Error, "prism", &err.to_string())
        .ok();
    Error::Suite(ofx::ofx_sys::status::FAILED)
}

fn menu(config: &Config) -> OfxResult<ColorSpaceMenu> {
    ColorSpaceMenu::new(
        config,
        &MenuParams {
            include_roles: true,
            ..Default::default()
        },
    )
    .map_err(|e| {
        log::error!("color engine: {}", e);
        Error::Suite(ofx::ofx_sys::status::FAILED)
    })
}

// ============================================================================
// Factory
// ============================================================================

#[derive(Default)]
struct ColorSpaceFactory;

impl PluginFactory for ColorSpaceFactory {
    fn identifier(&self) -> &'static CStr {
        c"org.prism.ColorSpace"
    }

    fn version(&self) -> (u32, u32) {
        (1, 0)
    }

    fn describe(&self, _host: &HostDescription, desc: &mut EffectDescriptor) -> OfxResult<()> {
        desc.set_labels("Color Space", "ColorSpace", "Prism Color Space")?;
        desc.set_grouping("Color/Prism")?;
        desc.set_description("Converts between color spaces of the current config.")?;
        desc.add_supported_context(Context::Filter)?;
        desc.add_supported_context(Context::General)?;
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
        src.set_supports_tiles(true)?;
        let mut out = desc.define_clip("Output")?;
        out.add_supported_component(PixelComponent::Rgba)?;
        out.set_supports_tiles(true)?;

        let config = Config::current().map_err(|e| {
            log::error!("color engine: {}", e);
            Error::Suite(ofx::ofx_sys::status::FAILED)
        })?;
        let menu = menu(&config)?;

        let mut src_space = desc.params().define_choice_param(PARAM_SRC)?;
        src_space.set_label("Input Space")?;
        src_space.set_hint("The color space the footage is in")?;
        for entry in menu.entries() {
            src_space.append_option(&entry.ui_name, &entry.description)?;
        }
        src_space.set_default(0)?;

        let mut dst_space = desc.params().define_choice_param(PARAM_DST)?;
        dst_space.set_label("Output Space")?;
        dst_space.set_hint("The color space to convert to")?;
        for entry in menu.entries() {
            dst_space.append_option(&entry.ui_name, &entry.description)?;
        }
        dst_space.set_default(0)?;
        Ok(())
    }

    fn create_instance(
        &self,
        _host: &HostDescription,
        effect: &mut EffectInstance,
    ) -> OfxResult<Box<dyn ImageEffect>> {
        let config = Config::current().map_err(|e| engine_error(effect, &e))?;
        let menu = menu(&config)?;
        Ok(Box::new(ColorSpaceEffect { config, menu }))
    }
}

// ============================================================================
// Effect
// ============================================================================

struct ColorSpaceEffect {
    config: Arc<Config>,
    menu: ColorSpaceMenu,
}

impl ColorSpaceEffect {
    fn chosen_space(&self, effect: &EffectInstance, param: &str) -> OfxResult<String> {
        let index = effect.params().fetch_choice_param(param)?.get_value()?;
        self.menu
            .entry(index.max(0) as usize)
            .map(|e| e.name.clone())
            .ok_or_else(|| Error::TypeRequest(format!("choice index {} out of menu", index)))
    }
}

impl ImageEffect for ColorSpaceEffect {
    fn render(&mut self, effect: &mut EffectInstance, args: &RenderArgs) -> OfxResult<()> {
        let src_space = self.chosen_space(effect, PARAM_SRC)?;
        let dst_space = self.chosen_space(effect, PARAM_DST)?;

        let context = prism_color::Context::new(&self.config);
        let transform = Transform::color_space(&src_space, &dst_space);
        let processor = self
            .config
            .processor(&context, &transform)
            .map_err(|e| engine_error(effect, &e))?;

        let src_clip = effect.fetch_clip("Source")?;
        let dst_clip = effect.fetch_clip("Output")?;
        let src = src_clip.fetch_image(args.time, None)?.ok_or(Error::BadHandle)?;
        let dst = dst_clip.fetch_image(args.time, None)?.ok_or(Error::BadHandle)?;

        let worker = PipelineProcessor {
            src: &src,
            dst: &dst,
            window: args.render_window,
            processor: &processor,
        };
        ofx::thread::process(effect.suites(), &worker, 0)
    }

    fn is_identity(
        &mut self,
        effect: &mut EffectInstance,
        args: &IsIdentityArgs,
    ) -> OfxResult<Option<IdentityResult>> {
        let src = effect.params().fetch_choice_param(PARAM_SRC)?.get_value()?;
        let dst = effect.params().fetch_choice_param(PARAM_DST)?.get_value()?;
        Ok((src == dst).then(|| IdentityResult {
            clip: "Source".into(),
            time: args.time,
        }))
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

struct PipelineProcessor<'a> {
    src: &'a Image,
    dst: &'a Image,
    window: OfxRectI,
    processor: &'a Processor,
}

impl PixelProcessor for PipelineProcessor<'_> {
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
                let mut rgb = unsafe { [*s, *s.add(1), *s.add(2)] };
                self.processor.apply_rgb(&mut rgb);
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

ofx::export_ofx!(ColorSpaceFactory);
