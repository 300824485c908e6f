//! The image-effect model: descriptors, instances, action argument
//! bundles, and the two traits a plugin implements.
//!
//! `PluginFactory` is the describe-time face of a plugin; it builds
//! descriptors and mints instance state. `ImageEffect` is that state, one
//! value per live instance, driven by the action dispatcher. Every action
//! except render has a default that yields the host's fallback behavior.

use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::os::raw::c_void;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use ofx_sys::{
    prop, status, OfxImageClipHandle, OfxImageEffectHandle, OfxInteractHandle, OfxParamSetHandle,
    OfxPointD, OfxRangeD, OfxRectD, OfxRectI, OfxStatus, OfxTime,
};

use crate::clip::{Clip, ClipDescriptor, ClipPrefNames};
use crate::enums::{
    BitDepth, ChangeReason, Context, Field, MessageReply, MessageType, PixelComponent,
    PreMultiplication, RenderSafety,
};
use crate::error::{check_status, Error, OfxResult};
use crate::host::HostDescription;
use crate::param::{ParamSet, ParamSetDescriptor};
use crate::property::PropertySet;
use crate::suites::{suite_fn, Suites};

// ============================================================================
// Descriptor
// ============================================================================

/// An effect descriptor, handed to `describe` and `describe_in_context`.
pub struct EffectDescriptor {
    handle: OfxImageEffectHandle,
    props: PropertySet,
    params: ParamSetDescriptor,
    suites: Arc<Suites>,
    clip_pref_names: HashMap<String, ClipPrefNames>,
}

impl EffectDescriptor {
    pub(crate) fn new(handle: OfxImageEffectHandle, suites: Arc<Suites>) -> OfxResult<Self> {
        let f = suite_fn!(suites.image_effect(), get_property_set)?;
        let mut props_handle = std::ptr::null_mut();
        check_status(unsafe { f(handle, &mut props_handle) })?;
        let props = PropertySet::new(props_handle, Arc::clone(&suites));

        let g = suite_fn!(suites.image_effect(), get_param_set)?;
        let mut param_set: OfxParamSetHandle = std::ptr::null_mut();
        check_status(unsafe { g(handle, &mut param_set) })?;
        let params = ParamSetDescriptor::new(param_set, Arc::clone(&suites))?;

        Ok(Self { handle, props, params, suites, clip_pref_names: HashMap::new() })
    }

    pub fn handle(&self) -> OfxImageEffectHandle {
        self.handle
    }

    pub fn props(&self) -> &PropertySet {
        &self.props
    }

    pub fn params(&mut self) -> &mut ParamSetDescriptor {
        &mut self.params
    }

    pub(crate) fn clip_pref_names(&self) -> &HashMap<String, ClipPrefNames> {
        &self.clip_pref_names
    }

    pub fn set_label(&mut self, label: &str) -> OfxResult<()> {
        self.props.set_string(prop::LABEL, label)
    }

    pub fn set_labels(&mut self, label: &str, short: &str, long: &str) -> OfxResult<()> {
        self.set_label(label)?;
        self.props.set_string(prop::SHORT_LABEL, short).ok();
        self.props.set_string(prop::LONG_LABEL, long).ok();
        Ok(())
    }

    pub fn set_grouping(&mut self, group: &str) -> OfxResult<()> {
        self.props.set_string(prop::GROUPING, group)
    }

    pub fn set_description(&mut self, text: &str) -> OfxResult<()> {
        // OFX 1.2 property; older hosts reject it.
        self.props.set_string(prop::PLUGIN_DESCRIPTION, text).ok();
        Ok(())
    }

    pub fn add_supported_context(&mut self, context: Context) -> OfxResult<()> {
        let n = self.props.append_index(prop::SUPPORTED_CONTEXTS)?;
        self.props.set_cstr_at(prop::SUPPORTED_CONTEXTS, n, context.to_cstr())
    }

    pub fn add_supported_bit_depth(&mut self, depth: BitDepth) -> OfxResult<()> {
        let n = self.props.append_index(prop::SUPPORTED_PIXEL_DEPTHS)?;
        self.props.set_cstr_at(prop::SUPPORTED_PIXEL_DEPTHS, n, depth.to_cstr())
    }

    pub fn set_single_instance(&mut self, v: bool) -> OfxResult<()> {
        self.props.set_int(prop::SINGLE_INSTANCE, v as i32)
    }

    pub fn set_host_frame_threading(&mut self, v: bool) -> OfxResult<()> {
        self.props.set_int(prop::HOST_FRAME_THREADING, v as i32)
    }

    pub fn set_supports_multi_resolution(&mut self, v: bool) -> OfxResult<()> {
        self.props.set_int(prop::SUPPORTS_MULTI_RESOLUTION, v as i32)
    }

    pub fn set_supports_tiles(&mut self, v: bool) -> OfxResult<()> {
        self.props.set_int(prop::SUPPORTS_TILES, v as i32)
    }

    pub fn set_temporal_clip_access(&mut self, v: bool) -> OfxResult<()> {
        self.props.set_int(prop::TEMPORAL_CLIP_ACCESS, v as i32)
    }

    pub fn set_render_thread_safety(&mut self, v: RenderSafety) -> OfxResult<()> {
        self.props.set_cstr(prop::RENDER_THREAD_SAFETY, v.to_cstr())
    }

    pub fn set_supports_multiple_clip_depths(&mut self, v: bool) -> OfxResult<()> {
        self.props.set_int(prop::SUPPORTS_MULTIPLE_CLIP_DEPTHS, v as i32)
    }

    pub fn set_supports_multiple_clip_pars(&mut self, v: bool) -> OfxResult<()> {
        self.props.set_int(prop::SUPPORTS_MULTIPLE_CLIP_PARS, v as i32)
    }

    pub fn set_field_render_twice_always(&mut self, v: bool) -> OfxResult<()> {
        self.props.set_int(prop::FIELD_RENDER_TWICE_ALWAYS, v as i32)
    }

    /// Re-run get-clip-preferences whenever the named parameter changes.
    pub fn add_clip_preferences_slave_param(&mut self, param_name: &str) -> OfxResult<()> {
        let n = self.props.append_index(prop::CLIP_PREFERENCES_SLAVE_PARAM)?;
        self.props.set_string_at(prop::CLIP_PREFERENCES_SLAVE_PARAM, n, param_name)
    }

    pub fn set_overlay_interact(
        &mut self,
        main_entry: crate::param::InteractEntryFn,
    ) -> OfxResult<()> {
        self.props.set_pointer(prop::OVERLAY_INTERACT_V1, main_entry as *mut c_void)
    }

    pub fn set_supports_opengl_render(&mut self, v: bool) -> OfxResult<()> {
        let v = if v { "true" } else { "false" };
        self.props.set_string(prop::OPENGL_RENDER_SUPPORTED, v).ok();
        Ok(())
    }

    /// Defines a clip and caches its clip-preference property names for
    /// the instance to use later.
    pub fn define_clip(&mut self, name: &str) -> OfxResult<ClipDescriptor> {
        let f = suite_fn!(self.suites.image_effect(), clip_define)?;
        let c_name = CString::new(name)
            .map_err(|_| Error::TypeRequest(format!("invalid clip name {:?}", name)))?;
        let mut props_handle = std::ptr::null_mut();
        check_status(unsafe { f(self.handle, c_name.as_ptr(), &mut props_handle) })?;
        self.clip_pref_names.insert(name.to_string(), ClipPrefNames::new(name)?);
        Ok(ClipDescriptor::new(name, PropertySet::new(props_handle, Arc::clone(&self.suites))))
    }
}

// ============================================================================
// Instance
// ============================================================================

/// A live effect instance. One per node the host creates; owns the
/// parameter set wrapper and the cached clip-preference names.
pub struct EffectInstance {
    handle: OfxImageEffectHandle,
    props: PropertySet,
    params: ParamSet,
    suites: Arc<Suites>,
    host: HostDescription,
    context: Context,
    clip_pref_names: Arc<HashMap<String, ClipPrefNames>>,
    // Overlay interacts currently alive on this instance.
    interacts: Mutex<Vec<OfxInteractHandle>>,
    // Whether a progress bracket is open on the host.
    progress_open: AtomicBool,
}

impl EffectInstance {
    pub(crate) fn new(
        handle: OfxImageEffectHandle,
        suites: Arc<Suites>,
        host: HostDescription,
        context: Context,
        clip_pref_names: HashMap<String, ClipPrefNames>,
    ) -> OfxResult<Self> {
        let f = suite_fn!(suites.image_effect(), get_property_set)?;
        let mut props_handle = std::ptr::null_mut();
        check_status(unsafe { f(handle, &mut props_handle) })?;
        let props = PropertySet::new(props_handle, Arc::clone(&suites));

        let g = suite_fn!(suites.image_effect(), get_param_set)?;
        let mut param_set: OfxParamSetHandle = std::ptr::null_mut();
        check_status(unsafe { g(handle, &mut param_set) })?;
        let params = ParamSet::new(param_set, Arc::clone(&suites));

        Ok(Self {
            handle,
            props,
            params,
            suites,
            host,
            context,
            clip_pref_names: Arc::new(clip_pref_names),
            interacts: Mutex::new(Vec::new()),
            progress_open: AtomicBool::new(false),
        })
    }

    pub fn handle(&self) -> OfxImageEffectHandle {
        self.handle
    }

    pub fn props(&self) -> &PropertySet {
        &self.props
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn suites(&self) -> &Arc<Suites> {
        &self.suites
    }

    pub fn host(&self) -> &HostDescription {
        &self.host
    }

    pub fn context(&self) -> Context {
        self.context
    }

    pub fn fetch_clip(&self, name: &str) -> OfxResult<Clip> {
        let f = suite_fn!(self.suites.image_effect(), clip_get_handle)?;
        let c_name = CString::new(name)
            .map_err(|_| Error::TypeRequest(format!("invalid clip name {:?}", name)))?;
        let mut handle: OfxImageClipHandle = std::ptr::null_mut();
        let mut props_handle = std::ptr::null_mut();
        check_status(unsafe { f(self.handle, c_name.as_ptr(), &mut handle, &mut props_handle) })?;
        let props = PropertySet::new(props_handle, Arc::clone(&self.suites));
        crate::validation::validate_clip_instance(&props);
        Ok(Clip::new(name, handle, props, Arc::clone(&self.suites)))
    }

    /// True when the host wants the current action abandoned.
    pub fn abort(&self) -> bool {
        match self.suites.image_effect().abort {
            Some(f) => unsafe { f(self.handle) != 0 },
            None => false,
        }
    }

    pub fn project_size(&self) -> OfxResult<(f64, f64)> {
        Ok((
            self.props.get_double_at(prop::PROJECT_SIZE, 0)?,
            self.props.get_double_at(prop::PROJECT_SIZE, 1)?,
        ))
    }

    pub fn project_offset(&self) -> OfxResult<(f64, f64)> {
        Ok((
            self.props.get_double_at(prop::PROJECT_OFFSET, 0)?,
            self.props.get_double_at(prop::PROJECT_OFFSET, 1)?,
        ))
    }

    pub fn project_extent(&self) -> OfxResult<(f64, f64)> {
        Ok((
            self.props.get_double_at(prop::PROJECT_EXTENT, 0)?,
            self.props.get_double_at(prop::PROJECT_EXTENT, 1)?,
        ))
    }

    pub fn project_pixel_aspect_ratio(&self) -> OfxResult<f64> {
        self.props.get_double(prop::PROJECT_PIXEL_ASPECT_RATIO)
    }

    pub fn effect_duration(&self) -> OfxResult<f64> {
        self.props.get_double(prop::EFFECT_DURATION)
    }

    pub fn frame_rate(&self) -> OfxResult<f64> {
        self.props.get_double(prop::FRAME_RATE)
    }

    pub fn is_interactive(&self) -> OfxResult<bool> {
        self.props.get_bool(prop::IS_INTERACTIVE)
    }

    pub fn set_instance_label(&self, label: &str) -> OfxResult<()> {
        self.props.set_string(prop::LABEL, label)
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    /// Posts a message through the host. A `Question` message returns the
    /// user's answer.
    pub fn message(&self, kind: MessageType, id: &str, text: &str) -> OfxResult<MessageReply> {
        let f = suite_fn!(self.suites.message(), message)?;
        let id = CString::new(id).unwrap_or_default();
        let text = CString::new(text).unwrap_or_default();
        let stat = unsafe {
            f(
                self.handle as *mut c_void,
                kind.to_cstr().as_ptr(),
                id.as_ptr(),
                c"%s".as_ptr(),
                text.as_ptr(),
            )
        };
        Ok(match stat {
            status::OK => MessageReply::Ok,
            status::REPLY_YES => MessageReply::Yes,
            status::REPLY_NO => MessageReply::No,
            _ => MessageReply::Failed,
        })
    }

    /// Sets a message that stays on the effect until cleared. Needs the
    /// v2 message suite.
    pub fn set_persistent_message(
        &self,
        kind: MessageType,
        id: &str,
        text: &str,
    ) -> OfxResult<()> {
        let suite = self
            .suites
            .message_v2()
            .ok_or_else(|| Error::HostInadequate("host has no persistent messages".into()))?;
        let f = suite_fn!(suite, set_persistent_message)?;
        let id = CString::new(id).unwrap_or_default();
        let text = CString::new(text).unwrap_or_default();
        check_status(unsafe {
            f(
                self.handle as *mut c_void,
                kind.to_cstr().as_ptr(),
                id.as_ptr(),
                c"%s".as_ptr(),
                text.as_ptr(),
            )
        })
    }

    pub fn clear_persistent_message(&self) -> OfxResult<()> {
        let suite = self
            .suites
            .message_v2()
            .ok_or_else(|| Error::HostInadequate("host has no persistent messages".into()))?;
        let f = suite_fn!(suite, clear_persistent_message)?;
        check_status(unsafe { f(self.handle as *mut c_void) })
    }

    // ------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------

    /// Opens a progress display, preferring the v2 suite and falling back
    /// to v1. Silently a no-op when the host has neither, or when a
    /// bracket is already open.
    pub fn progress_start(&self, label: &str) -> OfxResult<()> {
        if self.progress_open.load(Ordering::Acquire) {
            return Ok(());
        }
        let label = CString::new(label).unwrap_or_default();
        if let Some(suite) = self.suites.progress_v2() {
            let f = suite_fn!(suite, progress_start)?;
            check_status(unsafe {
                f(self.handle as *mut c_void, label.as_ptr(), std::ptr::null())
            })?;
            self.progress_open.store(true, Ordering::Release);
            return Ok(());
        }
        if let Some(suite) = self.suites.progress_v1() {
            let f = suite_fn!(suite, progress_start)?;
            check_status(unsafe { f(self.handle as *mut c_void, label.as_ptr()) })?;
            self.progress_open.store(true, Ordering::Release);
        }
        Ok(())
    }

    /// Updates the fraction complete in [0, 1]. Returns false when the
    /// user cancelled. Does nothing until a start has succeeded.
    pub fn progress_update(&self, fraction: f64) -> bool {
        if !self.progress_open.load(Ordering::Acquire) {
            return true;
        }
        let suite_update = self
            .suites
            .progress_v2()
            .and_then(|s| s.progress_update)
            .or_else(|| self.suites.progress_v1().and_then(|s| s.progress_update));
        match suite_update {
            Some(f) => unsafe { f(self.handle as *mut c_void, fraction) == status::OK },
            None => true,
        }
    }

    /// Closes the open progress bracket, if any.
    pub fn progress_end(&self) {
        if !self.progress_open.swap(false, Ordering::AcqRel) {
            return;
        }
        let suite_end = self
            .suites
            .progress_v2()
            .and_then(|s| s.progress_end)
            .or_else(|| self.suites.progress_v1().and_then(|s| s.progress_end));
        if let Some(f) = suite_end {
            unsafe {
                f(self.handle as *mut c_void);
            }
        }
    }

    // ------------------------------------------------------------------
    // Timeline
    // ------------------------------------------------------------------

    pub fn timeline_time(&self) -> OfxResult<f64> {
        let suite = self
            .suites
            .timeline()
            .ok_or_else(|| Error::HostInadequate("host has no timeline suite".into()))?;
        let f = suite_fn!(suite, get_time)?;
        let mut t = 0.0;
        check_status(unsafe { f(self.handle as *mut c_void, &mut t) })?;
        Ok(t)
    }

    pub fn timeline_goto(&self, time: f64) -> OfxResult<()> {
        let suite = self
            .suites
            .timeline()
            .ok_or_else(|| Error::HostInadequate("host has no timeline suite".into()))?;
        let f = suite_fn!(suite, goto_time)?;
        check_status(unsafe { f(self.handle as *mut c_void, time) })
    }

    pub fn timeline_bounds(&self) -> OfxResult<(f64, f64)> {
        let suite = self
            .suites
            .timeline()
            .ok_or_else(|| Error::HostInadequate("host has no timeline suite".into()))?;
        let f = suite_fn!(suite, get_time_bounds)?;
        let (mut first, mut last) = (0.0, 0.0);
        check_status(unsafe { f(self.handle as *mut c_void, &mut first, &mut last) })?;
        Ok((first, last))
    }

    // ------------------------------------------------------------------
    // Interact registry
    // ------------------------------------------------------------------

    pub(crate) fn register_interact(&self, handle: OfxInteractHandle) {
        if let Ok(mut v) = self.interacts.lock() {
            v.push(handle);
        }
    }

    pub(crate) fn unregister_interact(&self, handle: OfxInteractHandle) {
        if let Ok(mut v) = self.interacts.lock() {
            v.retain(|h| *h != handle);
        }
    }

    /// Asks the host to redraw every overlay attached to this instance.
    pub fn redraw_interacts(&self) -> OfxResult<()> {
        let suite = self.suites.interact()?;
        let f = suite_fn!(suite, interact_redraw)?;
        if let Ok(v) = self.interacts.lock() {
            for h in v.iter() {
                unsafe {
                    f(*h);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn clip_pref_names(&self) -> Arc<HashMap<String, ClipPrefNames>> {
        Arc::clone(&self.clip_pref_names)
    }

    // ------------------------------------------------------------------
    // OpenGL textures
    // ------------------------------------------------------------------

    /// Loads a clip's frame into a GL texture, when the host supports
    /// GPU render.
    pub fn load_texture(
        &self,
        clip: &Clip,
        time: OfxTime,
        region: Option<OfxRectD>,
    ) -> OfxResult<Texture> {
        let suite = self
            .suites
            .opengl_render()
            .ok_or_else(|| Error::HostInadequate("host has no OpenGL render suite".into()))?;
        let f = suite_fn!(suite, clip_load_texture)?;
        let region_ptr = region.as_ref().map_or(std::ptr::null(), |r| r as *const OfxRectD);
        let mut handle = std::ptr::null_mut();
        check_status(unsafe {
            f(clip.handle(), time, std::ptr::null(), region_ptr, &mut handle)
        })?;
        let props = PropertySet::new(handle, Arc::clone(&self.suites));
        Ok(Texture {
            index: props.get_int(prop::OPENGL_TEXTURE_INDEX)?,
            target: props.get_int(prop::OPENGL_TEXTURE_TARGET)?,
            handle,
            suites: Arc::clone(&self.suites),
        })
    }
}

/// A GL texture leased from the host; freed on drop.
pub struct Texture {
    handle: ofx_sys::OfxPropertySetHandle,
    suites: Arc<Suites>,
    index: i32,
    target: i32,
}

impl Texture {
    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn target(&self) -> i32 {
        self.target
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let Some(suite) = self.suites.opengl_render() {
            if let Some(f) = suite.clip_free_texture {
                unsafe {
                    f(self.handle);
                }
            }
        }
    }
}

// ============================================================================
// Action arguments
// ============================================================================

fn read_rect_i(props: &PropertySet, name: &CStr) -> OfxResult<OfxRectI> {
    Ok(OfxRectI {
        x1: props.get_int_at(name, 0)?,
        y1: props.get_int_at(name, 1)?,
        x2: props.get_int_at(name, 2)?,
        y2: props.get_int_at(name, 3)?,
    })
}

fn read_rect_d(props: &PropertySet, name: &CStr) -> OfxResult<OfxRectD> {
    Ok(OfxRectD {
        x1: props.get_double_at(name, 0)?,
        y1: props.get_double_at(name, 1)?,
        x2: props.get_double_at(name, 2)?,
        y2: props.get_double_at(name, 3)?,
    })
}

fn read_render_scale(props: &PropertySet) -> OfxPointD {
    OfxPointD {
        x: props.get_double_at(prop::RENDER_SCALE, 0).unwrap_or(1.0),
        y: props.get_double_at(prop::RENDER_SCALE, 1).unwrap_or(1.0),
    }
}

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub time: OfxTime,
    pub render_scale: OfxPointD,
    pub render_window: OfxRectI,
    pub field_to_render: Field,
    pub sequential_render_status: bool,
    pub interactive_render_status: bool,
}

impl RenderArgs {
    pub(crate) fn read(in_args: &PropertySet) -> OfxResult<Self> {
        Ok(Self {
            time: in_args.get_double(prop::TIME)?,
            render_scale: read_render_scale(in_args),
            render_window: read_rect_i(in_args, prop::RENDER_WINDOW)?,
            field_to_render: Field::from_cstr(&in_args.get_cstring(prop::FIELD_TO_RENDER)?)?,
            sequential_render_status: in_args
                .get_bool(prop::SEQUENTIAL_RENDER_STATUS)
                .unwrap_or(false),
            interactive_render_status: in_args
                .get_bool(prop::INTERACTIVE_RENDER_STATUS)
                .unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SequenceRenderArgs {
    pub frame_range: OfxRangeD,
    pub frame_step: f64,
    pub is_interactive: bool,
    pub render_scale: OfxPointD,
}

impl SequenceRenderArgs {
    pub(crate) fn read(in_args: &PropertySet) -> OfxResult<Self> {
        Ok(Self {
            frame_range: OfxRangeD {
                min: in_args.get_double_at(prop::FRAME_RANGE, 0)?,
                max: in_args.get_double_at(prop::FRAME_RANGE, 1)?,
            },
            frame_step: in_args.get_double(prop::FRAME_STEP)?,
            is_interactive: in_args.get_bool(prop::IS_INTERACTIVE)?,
            render_scale: read_render_scale(in_args),
        })
    }
}

#[derive(Debug, Clone)]
pub struct IsIdentityArgs {
    pub time: OfxTime,
    pub field_to_render: Field,
    pub render_window: OfxRectI,
    pub render_scale: OfxPointD,
}

impl IsIdentityArgs {
    pub(crate) fn read(in_args: &PropertySet) -> OfxResult<Self> {
        Ok(Self {
            time: in_args.get_double(prop::TIME)?,
            field_to_render: Field::from_cstr(&in_args.get_cstring(prop::FIELD_TO_RENDER)?)?,
            render_window: read_rect_i(in_args, prop::RENDER_WINDOW)?,
            render_scale: read_render_scale(in_args),
        })
    }
}

/// A clip name and time the host should use instead of rendering.
#[derive(Debug, Clone)]
pub struct IdentityResult {
    pub clip: String,
    pub time: OfxTime,
}

#[derive(Debug, Clone)]
pub struct RegionOfDefinitionArgs {
    pub time: OfxTime,
    pub render_scale: OfxPointD,
}

impl RegionOfDefinitionArgs {
    pub(crate) fn read(in_args: &PropertySet) -> OfxResult<Self> {
        Ok(Self {
            time: in_args.get_double(prop::TIME)?,
            render_scale: read_render_scale(in_args),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RegionsOfInterestArgs {
    pub time: OfxTime,
    pub render_scale: OfxPointD,
    /// The region the host wants from the output, canonical coordinates.
    pub region_of_interest: OfxRectD,
}

impl RegionsOfInterestArgs {
    pub(crate) fn read(in_args: &PropertySet) -> OfxResult<Self> {
        Ok(Self {
            time: in_args.get_double(prop::TIME)?,
            render_scale: read_render_scale(in_args),
            region_of_interest: read_rect_d(in_args, prop::REGION_OF_INTEREST)?,
        })
    }
}

fn pref_names<'m>(
    names: &'m HashMap<String, ClipPrefNames>,
    clip: &str,
) -> OfxResult<&'m ClipPrefNames> {
    names.get(clip).ok_or_else(|| {
        Error::TypeRequest(format!("clip {:?} was never defined on this effect", clip))
    })
}

/// Writes per-clip regions of interest into the out-args.
pub struct RegionsOfInterestSetter<'a> {
    names: Arc<HashMap<String, ClipPrefNames>>,
    out_args: &'a PropertySet,
    did_something: bool,
}

impl<'a> RegionsOfInterestSetter<'a> {
    pub(crate) fn new(instance: &EffectInstance, out_args: &'a PropertySet) -> Self {
        Self { names: instance.clip_pref_names(), out_args, did_something: false }
    }

    pub fn set_region_of_interest(&mut self, clip: &str, roi: OfxRectD) -> OfxResult<()> {
        let name = &pref_names(&self.names, clip)?.region_of_interest;
        self.out_args.set_double_at(name, 0, roi.x1)?;
        self.out_args.set_double_at(name, 1, roi.y1)?;
        self.out_args.set_double_at(name, 2, roi.x2)?;
        self.out_args.set_double_at(name, 3, roi.y2)?;
        self.did_something = true;
        Ok(())
    }

    pub(crate) fn did_something(&self) -> bool {
        self.did_something
    }
}

#[derive(Debug, Clone)]
pub struct FramesNeededArgs {
    pub time: OfxTime,
}

impl FramesNeededArgs {
    pub(crate) fn read(in_args: &PropertySet) -> OfxResult<Self> {
        Ok(Self { time: in_args.get_double(prop::TIME)? })
    }
}

/// Accumulates per-clip frame ranges into the out-args; ranges append as
/// (min, max) pairs.
pub struct FramesNeededSetter<'a> {
    names: Arc<HashMap<String, ClipPrefNames>>,
    out_args: &'a PropertySet,
    did_something: bool,
}

impl<'a> FramesNeededSetter<'a> {
    pub(crate) fn new(instance: &EffectInstance, out_args: &'a PropertySet) -> Self {
        Self { names: instance.clip_pref_names(), out_args, did_something: false }
    }

    pub fn add_frame_range(&mut self, clip: &str, range: OfxRangeD) -> OfxResult<()> {
        let name = &pref_names(&self.names, clip)?.frame_range;
        let n = self.out_args.dimension(name)?;
        self.out_args.set_double_at(name, n, range.min)?;
        self.out_args.set_double_at(name, n + 1, range.max)?;
        self.did_something = true;
        Ok(())
    }

    pub(crate) fn did_something(&self) -> bool {
        self.did_something
    }
}

/// Writes clip preferences into the out-args. The dispatcher reports
/// reply-default to the host unless at least one preference was set.
pub struct ClipPreferencesSetter<'a> {
    names: Arc<HashMap<String, ClipPrefNames>>,
    out_args: &'a PropertySet,
    did_something: bool,
}

impl<'a> ClipPreferencesSetter<'a> {
    pub(crate) fn new(instance: &EffectInstance, out_args: &'a PropertySet) -> Self {
        Self { names: instance.clip_pref_names(), out_args, did_something: false }
    }

    pub fn set_clip_components(&mut self, clip: &str, c: PixelComponent) -> OfxResult<()> {
        let name = &pref_names(&self.names, clip)?.components;
        self.out_args.set_cstr(name, c.to_cstr())?;
        self.did_something = true;
        Ok(())
    }

    pub fn set_clip_bit_depth(&mut self, clip: &str, depth: BitDepth) -> OfxResult<()> {
        let name = &pref_names(&self.names, clip)?.depth;
        self.out_args.set_cstr(name, depth.to_cstr())?;
        self.did_something = true;
        Ok(())
    }

    pub fn set_clip_pixel_aspect_ratio(&mut self, clip: &str, par: f64) -> OfxResult<()> {
        let name = &pref_names(&self.names, clip)?.pixel_aspect_ratio;
        self.out_args.set_double(name, par)?;
        self.did_something = true;
        Ok(())
    }

    pub fn set_output_frame_rate(&mut self, fps: f64) -> OfxResult<()> {
        self.out_args.set_double(prop::FRAME_RATE, fps)?;
        self.did_something = true;
        Ok(())
    }

    pub fn set_output_premultiplication(&mut self, v: PreMultiplication) -> OfxResult<()> {
        self.out_args.set_cstr(prop::PRE_MULTIPLICATION, v.to_cstr())?;
        self.did_something = true;
        Ok(())
    }

    pub fn set_output_fielding(&mut self, v: Field) -> OfxResult<()> {
        self.out_args.set_cstr(prop::CLIP_FIELD_ORDER, v.to_cstr())?;
        self.did_something = true;
        Ok(())
    }

    pub fn set_output_frame_varying(&mut self, v: bool) -> OfxResult<()> {
        self.out_args.set_int(prop::FRAME_VARYING, v as i32)?;
        self.did_something = true;
        Ok(())
    }

    pub fn set_output_has_continuous_samples(&mut self, v: bool) -> OfxResult<()> {
        self.out_args.set_int(prop::CONTINUOUS_SAMPLES, v as i32)?;
        self.did_something = true;
        Ok(())
    }

    pub(crate) fn did_something(&self) -> bool {
        self.did_something
    }
}

/// What changed, for the instance-changed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangedKind {
    Param,
    Clip,
}

#[derive(Debug, Clone)]
pub struct InstanceChangedArgs {
    pub kind: ChangedKind,
    pub name: String,
    pub reason: ChangeReason,
    pub time: OfxTime,
    pub render_scale: OfxPointD,
}

impl InstanceChangedArgs {
    pub(crate) fn read(in_args: &PropertySet) -> OfxResult<Self> {
        let type_str = in_args.get_cstring(prop::TYPE)?;
        let kind = if type_str.as_c_str() == ofx_sys::val::TYPE_PARAMETER {
            ChangedKind::Param
        } else {
            ChangedKind::Clip
        };
        Ok(Self {
            kind,
            name: in_args.get_string(prop::NAME)?,
            reason: ChangeReason::from_cstr(&in_args.get_cstring(prop::CHANGE_REASON)?)?,
            time: in_args.get_double(prop::TIME)?,
            render_scale: read_render_scale(in_args),
        })
    }
}

/// Values the custom-interpolation callback works over.
#[derive(Debug, Clone)]
pub struct CustomParamInterpArgs {
    pub param_name: String,
    pub time: OfxTime,
    /// The two keyframe values bracketing `time`.
    pub values: (String, String),
    /// The times of those keyframes.
    pub key_times: (OfxTime, OfxTime),
    /// Interpolation fraction in [0, 1].
    pub amount: f64,
}

impl CustomParamInterpArgs {
    pub(crate) fn read(in_args: &PropertySet) -> OfxResult<Self> {
        Ok(Self {
            param_name: in_args.get_string(prop::NAME)?,
            time: in_args.get_double(prop::TIME)?,
            values: (
                in_args.get_string_at(prop::PARAM_CUSTOM_VALUE, 0)?,
                in_args.get_string_at(prop::PARAM_CUSTOM_VALUE, 1)?,
            ),
            key_times: (
                in_args.get_double_at(prop::PARAM_INTERPOLATION_TIME, 0)?,
                in_args.get_double_at(prop::PARAM_INTERPOLATION_TIME, 1)?,
            ),
            amount: in_args.get_double(prop::PARAM_INTERPOLATION_AMOUNT)?,
        })
    }
}

// ============================================================================
// The plugin-facing traits
// ============================================================================

/// Per-instance state and behavior of an effect. Implemented by the
/// plugin; every method except `render` has a default giving the host's
/// fallback behavior.
#[allow(unused_variables)]
pub trait ImageEffect: Send {
    fn render(&mut self, effect: &mut EffectInstance, args: &RenderArgs) -> OfxResult<()>;

    fn begin_sequence_render(
        &mut self,
        effect: &mut EffectInstance,
        args: &SequenceRenderArgs,
    ) -> OfxResult<()> {
        Ok(())
    }

    fn end_sequence_render(
        &mut self,
        effect: &mut EffectInstance,
        args: &SequenceRenderArgs,
    ) -> OfxResult<()> {
        Ok(())
    }

    /// `Some` short-circuits the render with another clip's frame.
    fn is_identity(
        &mut self,
        effect: &mut EffectInstance,
        args: &IsIdentityArgs,
    ) -> OfxResult<Option<IdentityResult>> {
        Ok(None)
    }

    /// `Some` overrides the default region of definition.
    fn region_of_definition(
        &mut self,
        effect: &mut EffectInstance,
        args: &RegionOfDefinitionArgs,
    ) -> OfxResult<Option<OfxRectD>> {
        Ok(None)
    }

    fn regions_of_interest(
        &mut self,
        effect: &mut EffectInstance,
        args: &RegionsOfInterestArgs,
        setter: &mut RegionsOfInterestSetter<'_>,
    ) -> OfxResult<()> {
        Ok(())
    }

    fn frames_needed(
        &mut self,
        effect: &mut EffectInstance,
        args: &FramesNeededArgs,
        setter: &mut FramesNeededSetter<'_>,
    ) -> OfxResult<()> {
        Ok(())
    }

    fn get_clip_preferences(
        &mut self,
        effect: &mut EffectInstance,
        setter: &mut ClipPreferencesSetter<'_>,
    ) -> OfxResult<()> {
        Ok(())
    }

    /// `Some` overrides the host's idea of the effect's frame range.
    fn get_time_domain(&mut self, effect: &mut EffectInstance) -> OfxResult<Option<OfxRangeD>> {
        Ok(None)
    }

    fn instance_changed(
        &mut self,
        effect: &mut EffectInstance,
        args: &InstanceChangedArgs,
    ) -> OfxResult<()> {
        Ok(())
    }

    fn begin_instance_changed(
        &mut self,
        effect: &mut EffectInstance,
        reason: ChangeReason,
    ) -> OfxResult<()> {
        Ok(())
    }

    fn end_instance_changed(
        &mut self,
        effect: &mut EffectInstance,
        reason: ChangeReason,
    ) -> OfxResult<()> {
        Ok(())
    }

    fn begin_instance_edit(&mut self, effect: &mut EffectInstance) -> OfxResult<()> {
        Ok(())
    }

    fn end_instance_edit(&mut self, effect: &mut EffectInstance) -> OfxResult<()> {
        Ok(())
    }

    fn purge_caches(&mut self, effect: &mut EffectInstance) -> OfxResult<()> {
        Ok(())
    }

    fn sync_private_data(&mut self, effect: &mut EffectInstance) -> OfxResult<()> {
        Ok(())
    }

    fn opengl_context_attached(&mut self, effect: &mut EffectInstance) -> OfxResult<()> {
        Ok(())
    }

    fn opengl_context_detached(&mut self, effect: &mut EffectInstance) -> OfxResult<()> {
        Ok(())
    }

    /// `Some` supplies the interpolated value for a custom parameter.
    fn interpolate_custom(
        &mut self,
        effect: &mut EffectInstance,
        args: &CustomParamInterpArgs,
    ) -> OfxResult<Option<String>> {
        Ok(None)
    }
}

/// The describe-time face of one plugin in the binary.
#[allow(unused_variables)]
pub trait PluginFactory: Send + Sync {
    fn identifier(&self) -> &'static CStr;

    /// (major, minor).
    fn version(&self) -> (u32, u32);

    fn load(&self) -> OfxResult<()> {
        Ok(())
    }

    fn unload(&self) -> OfxResult<()> {
        Ok(())
    }

    fn describe(&self, host: &HostDescription, desc: &mut EffectDescriptor) -> OfxResult<()>;

    fn describe_in_context(
        &self,
        host: &HostDescription,
        context: Context,
        desc: &mut EffectDescriptor,
    ) -> OfxResult<()>;

    fn create_instance(
        &self,
        host: &HostDescription,
        effect: &mut EffectInstance,
    ) -> OfxResult<Box<dyn ImageEffect>>;
}

/// Maps an action-body error to the status handed back to the host.
pub(crate) fn error_to_status(err: &Error) -> OfxStatus {
    match err {
        Error::Memory => status::ERR_MEMORY,
        Error::HostInadequate(_) | Error::PropertyUnknownToHost(_) => {
            status::ERR_MISSING_HOST_FEATURE
        }
        Error::Suite(s) => *s,
        _ => status::FAILED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_errors_report_as_memory_status() {
        assert_eq!(error_to_status(&Error::Memory), status::ERR_MEMORY);
    }

    #[test]
    fn missing_host_features_report_as_such() {
        assert_eq!(
            error_to_status(&Error::HostInadequate("x".into())),
            status::ERR_MISSING_HOST_FEATURE
        );
        assert_eq!(
            error_to_status(&Error::PropertyUnknownToHost("x".into())),
            status::ERR_MISSING_HOST_FEATURE
        );
    }

    #[test]
    fn suite_statuses_pass_through() {
        assert_eq!(error_to_status(&Error::Suite(status::ERR_VALUE)), status::ERR_VALUE);
    }
}
