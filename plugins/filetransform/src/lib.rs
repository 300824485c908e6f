//! Applies a LUT file straight from disk, forward or inverse.
//!
//! The file path may use `$VAR` references; they resolve through the
//! current config's environment and search path, so a path that works
//! in a pipeline script works here too.

use std::ffi::CStr;

use ofx::ofx_sys::OfxRectI;
use ofx::{
    BitDepth, ClipPreferencesSetter, Context, EffectDescriptor, EffectInstance, Error,
    HostDescription, IdentityResult, Image, ImageEffect, IsIdentityArgs, MessageType, OfxResult,
    ParamDescriptor, PixelComponent, PixelProcessor, PluginFactory, PreMultiplication, RenderArgs,
    RenderSafety, StringType,
};
use prism_color::{Config, Direction, Processor, Transform};

const PARAM_FILE: &str = "file";
const PARAM_DIRECTION: &str = "direction";

fn engine_error(effect: &EffectInstance, err: &prism_color::Error) -> Error {
    log::error!("color engine: {}", err);
    effect
        .message(MessageType::Error, "prism", &err.to_string())
        .ok();
    Error::Suite(ofx::ofx_sys::status::FAILED)
}

// ============================================================================
// Factory
// ============================================================================

#[derive(Default)]
struct FileTransformFactory;

impl PluginFactory for FileTransformFactory {
    fn identifier(&self) -> &'static CStr {
        c"org.prism.FileTransform"
    }

    fn version(&self) -> (u32, u32) {
        (1, 0)
    }

    fn describe(&self, _host: &HostDescription, desc: &mut EffectDescriptor) -> OfxResult<()> {
        desc.set_labels("File Transform", "FileTransform", "Prism File Transform")?;
        desc.set_grouping("Color/Prism")?;
        desc.set_description("Applies a LUT file, forward or inverse.")?;
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

        let mut file = desc.params().define_string_param(PARAM_FILE)?;
        file.set_label("File")?;
        file.set_hint("The LUT file to apply; $VAR references resolve through the config")?;
        file.set_string_type(StringType::FilePath)?;
        file.set_file_path_exists(false)?;

        let mut direction = desc.params().define_choice_param(PARAM_DIRECTION)?;
        direction.set_label("Direction")?;
        direction.set_hint("Apply the LUT or undo it")?;
        direction.append_option("Forward", "")?;
        direction.append_option("Inverse", "")?;
        direction.set_default(0)?;
        Ok(())
    }

    fn create_instance(
        &self,
        _host: &HostDescription,
        effect: &mut EffectInstance,
    ) -> OfxResult<Box<dyn ImageEffect>> {
        let config = Config::current().map_err(|e| engine_error(effect, &e))?;
        Ok(Box::new(FileTransformEffect { config }))
    }
}

// ============================================================================
// Effect
// ============================================================================

struct FileTransformEffect {
    config: std::sync::Arc<Config>,
}

impl FileTransformEffect {
    fn file_path(&self, effect: &EffectInstance) -> OfxResult<String> {
        effect.params().fetch_string_param(PARAM_FILE)?.get_value()
    }
}

impl ImageEffect for FileTransformEffect {
    fn render(&mut self, effect: &mut EffectInstance, args: &RenderArgs) -> OfxResult<()> {
        let path = self.file_path(effect)?;
        let direction = match effect
            .params()
            .fetch_choice_param(PARAM_DIRECTION)?
            .get_value()?
        {
            1 => Direction::Inverse,
            _ => Direction::Forward,
        };

        let context = prism_color::Context::new(&self.config);
        let transform = Transform::file(&path).with_direction(direction);
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

    /// An empty path means no LUT yet; pass the footage through instead
    /// of failing the render.
    fn is_identity(
        &mut self,
        effect: &mut EffectInstance,
        args: &IsIdentityArgs,
    ) -> OfxResult<Option<IdentityResult>> {
        let path = self.file_path(effect)?;
        Ok(path.trim().is_empty().then(|| IdentityResult {
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

ofx::export_ofx!(FileTransformFactory);
