//! Walks a real plugin through the action protocol against the
//! in-process host: describe, instantiate, render across threads,
//! identity short-circuits, animated parameters and clip preferences.

use std::ffi::CStr;
use std::sync::{Mutex, OnceLock};

use ofx::ofx_sys::{action, prop, status, val, OfxPlugin, OfxRectI};
use ofx::{
    BitDepth, ClipPreferencesSetter, Context, EffectDescriptor, EffectInstance, Error,
    HostDescription, IdentityResult, Image, ImageEffect, InstanceChangedArgs, IsIdentityArgs,
    OfxResult, PixelComponent, PixelProcessor, PluginFactory, PreMultiplication, RenderArgs,
    SequenceRenderArgs, Suites,
};
use ofx_testhost::param::Stored;
use ofx_testhost::{set_cpu_count, EffectObj, MockHost, PropSet};

/// Guards the process-wide CPU-count knob.
static CPU_KNOB: Mutex<()> = Mutex::new(());

/// Written by the effect when the "gain" parameter changes.
static GAIN_PROBE: Mutex<Option<(f64, f64, f64)>> = Mutex::new(None);

// ============================================================================
// The plugin under test
// ============================================================================

struct GainFactory;

impl PluginFactory for GainFactory {
    fn identifier(&self) -> &'static CStr {
        c"org.prism.test.Gain"
    }

    fn version(&self) -> (u32, u32) {
        (1, 0)
    }

    fn describe(&self, _host: &HostDescription, desc: &mut EffectDescriptor) -> OfxResult<()> {
        desc.set_label("Gain")?;
        desc.add_supported_context(Context::Filter)?;
        desc.add_supported_bit_depth(BitDepth::Float)?;
        desc.set_supports_tiles(true)?;
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

        let mut gain = desc.params().define_double_param("gain")?;
        gain.set_default(1.0)?;
        gain.set_range(0.0, 10.0)?;
        let mut bypass = desc.params().define_boolean_param("bypass")?;
        bypass.set_default(false)?;
        Ok(())
    }

    fn create_instance(
        &self,
        _host: &HostDescription,
        _effect: &mut EffectInstance,
    ) -> OfxResult<Box<dyn ImageEffect>> {
        Ok(Box::new(GainEffect))
    }
}

struct GainProcessor<'a> {
    src: &'a Image,
    dst: &'a Image,
    window: OfxRectI,
    gain: f32,
}

impl PixelProcessor for GainProcessor<'_> {
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
                for c in 0..4 {
                    unsafe { *d.add(c) = *s.add(c) * self.gain };
                }
            }
        }
    }
}

struct GainEffect;

impl ImageEffect for GainEffect {
    fn render(&mut self, effect: &mut EffectInstance, args: &RenderArgs) -> OfxResult<()> {
        let gain = effect
            .params()
            .fetch_double_param("gain")?
            .get_value_at_time(args.time)?[0];
        let src_clip = effect.fetch_clip("Source")?;
        let dst_clip = effect.fetch_clip("Output")?;
        let src = src_clip.fetch_image(args.time, None)?.ok_or(Error::BadHandle)?;
        let dst = dst_clip.fetch_image(args.time, None)?.ok_or(Error::BadHandle)?;
        let processor = GainProcessor {
            src: &src,
            dst: &dst,
            window: args.render_window,
            gain: gain as f32,
        };
        ofx::thread::process(effect.suites(), &processor, 0)
    }

    fn is_identity(
        &mut self,
        effect: &mut EffectInstance,
        args: &IsIdentityArgs,
    ) -> OfxResult<Option<IdentityResult>> {
        let bypass = effect
            .params()
            .fetch_boolean_param("bypass")?
            .get_value_at_time(args.time)?;
        Ok(bypass.then(|| IdentityResult {
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
        prefs.set_output_premultiplication(PreMultiplication::PreMultiplied)?;
        Ok(())
    }

    fn begin_sequence_render(
        &mut self,
        effect: &mut EffectInstance,
        _args: &SequenceRenderArgs,
    ) -> OfxResult<()> {
        // A second start folds into the open bracket.
        effect.progress_start("Gain pass")?;
        effect.progress_start("Gain pass again")?;
        effect.progress_update(0.5);
        Ok(())
    }

    fn end_sequence_render(
        &mut self,
        effect: &mut EffectInstance,
        _args: &SequenceRenderArgs,
    ) -> OfxResult<()> {
        effect.progress_end();
        // A second end with nothing open stays quiet.
        effect.progress_end();
        Ok(())
    }

    fn instance_changed(
        &mut self,
        effect: &mut EffectInstance,
        args: &InstanceChangedArgs,
    ) -> OfxResult<()> {
        if args.name == "gain" {
            let gain = effect.params().fetch_double_param("gain")?;
            let value = gain.get_value_at_time(5.0)?[0];
            let slope = gain.differentiate(5.0)?[0];
            let area = gain.integrate(0.0, 10.0)?[0];
            *GAIN_PROBE.lock().unwrap() = Some((value, slope, area));
        }
        Ok(())
    }
}

// ============================================================================
// Shared fixture
// ============================================================================

struct Env {
    host: MockHost,
    plugin: &'static OfxPlugin,
    filter_desc: *const EffectObj,
}

// Test threads only read the raw descriptor pointer.
unsafe impl Send for Env {}
unsafe impl Sync for Env {}

static ENV: OnceLock<Env> = OnceLock::new();

fn env() -> &'static Env {
    ENV.get_or_init(|| {
        ofx::dispatch::init_registry(|| vec![Box::new(GainFactory) as Box<dyn PluginFactory>]);
        let plugin = unsafe { &*ofx::dispatch::plugin_struct(0) };
        let host = MockHost::new();
        assert_eq!(host.load(plugin), status::OK);
        let (stat, desc) = host.describe(plugin);
        assert_eq!(stat, status::OK);
        let (stat, filter_desc) = host.describe_in_context(plugin, desc, val::CONTEXT_FILTER);
        assert_eq!(stat, status::OK);
        Env {
            host,
            plugin,
            filter_desc,
        }
    })
}

fn make_instance() -> Box<EffectObj> {
    let env = env();
    let (stat, inst) = env
        .host
        .create_instance(env.plugin, env.filter_desc, val::CONTEXT_FILTER);
    assert_eq!(stat, status::OK);
    inst
}

fn set_double(inst: &EffectObj, name: &CStr, value: f64) {
    let param = unsafe { &*inst.params.find(name).unwrap() };
    *param.value.lock().unwrap() = Stored::Doubles(vec![value]);
}

fn set_bool(inst: &EffectObj, name: &CStr, value: bool) {
    let param = unsafe { &*inst.params.find(name).unwrap() };
    *param.value.lock().unwrap() = Stored::Ints(vec![value as i32]);
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn describe_publishes_label_and_context() {
    let env = env();
    let desc = unsafe { &*env.filter_desc };
    // The label was set on the plain descriptor, context clips on this one.
    assert!(desc.find_clip(c"Source").is_some());
    assert!(desc.find_clip(c"Output").is_some());
    assert!(desc.params.find(c"gain").is_some());
}

#[test]
fn render_applies_gain_inline_on_one_cpu() {
    let _knob = CPU_KNOB.lock().unwrap();
    set_cpu_count(1);
    let env = env();
    let inst = make_instance();
    set_double(&inst, c"gain", 2.0);

    let source = unsafe { &*inst.find_clip(c"Source").unwrap() };
    source.set_frame(16, 8, 4);
    source.fill(0.25);
    let output = unsafe { &*inst.find_clip(c"Output").unwrap() };
    output.set_frame(16, 8, 4);

    let window = OfxRectI { x1: 0, y1: 0, x2: 16, y2: 8 };
    assert_eq!(env.host.render(env.plugin, &inst, 0.0, window), status::OK);

    let pixels = output.pixels.lock().unwrap();
    assert_eq!(pixels.len(), 16 * 8 * 4);
    assert!(pixels.iter().all(|p| (*p - 0.5).abs() < 1e-6));
    drop(pixels);
    assert_eq!(env.host.destroy_instance(env.plugin, &inst), status::OK);
}

#[test]
fn four_cpus_tile_the_window_into_four_bands() {
    let _knob = CPU_KNOB.lock().unwrap();
    set_cpu_count(4);
    let env = env();

    struct Recorder {
        window: OfxRectI,
        bands: Mutex<Vec<OfxRectI>>,
    }
    impl PixelProcessor for Recorder {
        fn render_window(&self) -> OfxRectI {
            self.window
        }
        fn process_window(&self, window: OfxRectI) {
            self.bands.lock().unwrap().push(window);
        }
    }

    let suites = unsafe { Suites::fetch(env.host.ofx_host()) }.unwrap();
    let recorder = Recorder {
        window: OfxRectI { x1: 0, y1: 0, x2: 1000, y2: 1000 },
        bands: Mutex::new(Vec::new()),
    };
    ofx::thread::process(&suites, &recorder, 0).unwrap();
    set_cpu_count(1);

    let mut bands = recorder.bands.into_inner().unwrap();
    bands.sort_by_key(|b| b.y1);
    assert_eq!(bands.len(), 4);
    let mut next_y = 0;
    for band in &bands {
        assert_eq!((band.x1, band.x2), (0, 1000));
        assert_eq!(band.y1, next_y);
        assert_eq!(band.y2 - band.y1, 250);
        next_y = band.y2;
    }
    assert_eq!(next_y, 1000);
}

#[test]
fn bypass_short_circuits_through_is_identity() {
    let env = env();
    let inst = make_instance();
    let window = OfxRectI { x1: 0, y1: 0, x2: 16, y2: 8 };

    set_bool(&inst, c"bypass", true);
    let (stat, identity) = env.host.is_identity(env.plugin, &inst, 3.0, window);
    assert_eq!(stat, status::OK);
    let (clip, time) = identity.unwrap();
    assert_eq!(clip, "Source");
    assert_eq!(time, 3.0);

    set_bool(&inst, c"bypass", false);
    let (stat, identity) = env.host.is_identity(env.plugin, &inst, 3.0, window);
    assert_eq!(stat, status::REPLY_DEFAULT);
    assert!(identity.is_none());
    assert_eq!(env.host.destroy_instance(env.plugin, &inst), status::OK);
}

#[test]
fn animated_gain_interpolates_differentiates_and_integrates() {
    let env = env();
    let inst = make_instance();
    let gain = unsafe { &*inst.params.find(c"gain").unwrap() };
    gain.add_key(0.0, vec![0.5]);
    gain.add_key(10.0, vec![1.5]);

    *GAIN_PROBE.lock().unwrap() = None;
    let in_args = PropSet::new();
    in_args.put_strings(prop::TYPE, &[val::TYPE_PARAMETER]);
    in_args.put_strings(prop::NAME, &[c"gain"]);
    in_args.put_strings(prop::CHANGE_REASON, &[val::CHANGE_USER_EDITED]);
    in_args.put_doubles(prop::TIME, &[5.0]);
    in_args.put_doubles(prop::RENDER_SCALE, &[1.0, 1.0]);
    let stat = env.host.action(
        env.plugin,
        action::INSTANCE_CHANGED,
        inst.handle() as *const std::os::raw::c_void,
        in_args.handle(),
        std::ptr::null_mut(),
    );
    assert_eq!(stat, status::OK);

    let (value, slope, area) = GAIN_PROBE.lock().unwrap().expect("probe never ran");
    assert!((value - 1.0).abs() < 1e-9);
    assert!((slope - 0.1).abs() < 1e-9);
    assert!((area - 10.0).abs() < 1e-6);
    assert_eq!(env.host.destroy_instance(env.plugin, &inst), status::OK);
}

#[test]
fn clip_preferences_name_the_clip_in_the_out_args() {
    let env = env();
    let inst = make_instance();
    let (stat, out_args) = env.host.get_clip_preferences(env.plugin, &inst);
    assert_eq!(stat, status::OK);
    let depth = out_args
        .string(c"OfxImageClipPropDepth_Source", 0)
        .expect("depth preference missing");
    assert_eq!(depth.as_c_str(), val::BIT_DEPTH_FLOAT);
    let premult = out_args
        .string(prop::PRE_MULTIPLICATION, 0)
        .expect("premultiplication preference missing");
    assert_eq!(premult.as_c_str(), val::IMAGE_PRE_MULTIPLIED);
    assert_eq!(env.host.destroy_instance(env.plugin, &inst), status::OK);
}

#[test]
fn unknown_actions_get_the_default_reply() {
    let env = env();
    let inst = make_instance();
    let stat = env.host.action(
        env.plugin,
        c"OfxImageEffectActionFromTheFuture",
        inst.handle() as *const std::os::raw::c_void,
        std::ptr::null_mut(),
        std::ptr::null_mut(),
    );
    assert_eq!(stat, status::REPLY_DEFAULT);
    assert_eq!(env.host.destroy_instance(env.plugin, &inst), status::OK);
}

#[test]
fn progress_brackets_open_once_and_close_once() {
    use ofx_testhost::{take_progress, ProgressEvent};

    let env = env();
    let inst = make_instance();
    let in_args = PropSet::new();
    in_args.put_doubles(prop::FRAME_RANGE, &[0.0, 10.0]);
    in_args.put_doubles(prop::FRAME_STEP, &[1.0]);
    in_args.put_ints(prop::IS_INTERACTIVE, &[0]);
    in_args.put_doubles(prop::RENDER_SCALE, &[1.0, 1.0]);

    take_progress();
    let stat = env.host.action(
        env.plugin,
        action::BEGIN_SEQUENCE_RENDER,
        inst.handle() as *const std::os::raw::c_void,
        in_args.handle(),
        std::ptr::null_mut(),
    );
    assert_eq!(stat, status::OK);
    let stat = env.host.action(
        env.plugin,
        action::END_SEQUENCE_RENDER,
        inst.handle() as *const std::os::raw::c_void,
        in_args.handle(),
        std::ptr::null_mut(),
    );
    assert_eq!(stat, status::OK);

    // One bracket on the host despite the doubled starts and ends.
    assert_eq!(
        take_progress(),
        vec![
            ProgressEvent::Start("Gain pass".into()),
            ProgressEvent::Update(0.5),
            ProgressEvent::End,
        ]
    );
    assert_eq!(env.host.destroy_instance(env.plugin, &inst), status::OK);
}

#[test]
fn appending_to_an_unset_array_property_starts_at_zero() {
    let env = env();
    let suites = unsafe { Suites::fetch(env.host.ofx_host()) }.unwrap();
    let bag = PropSet::new();
    let props = ofx::PropertySet::new(bag.handle(), std::sync::Arc::new(suites));
    // The bag has never seen the property; appending must not error.
    assert_eq!(props.append_index(prop::SUPPORTED_CONTEXTS).unwrap(), 0);
    props
        .set_cstr_at(prop::SUPPORTED_CONTEXTS, 0, val::CONTEXT_FILTER)
        .unwrap();
    assert_eq!(props.append_index(prop::SUPPORTED_CONTEXTS).unwrap(), 1);
}

#[test]
fn unknown_actions_with_no_instance_still_get_the_default_reply() {
    let env = env();
    // A host from a later API may send a new action with any handle,
    // including none at all.
    let stat = env.host.action(
        env.plugin,
        c"OfxSomeFutureAction",
        std::ptr::null(),
        std::ptr::null_mut(),
        std::ptr::null_mut(),
    );
    assert_eq!(stat, status::REPLY_DEFAULT);
}
