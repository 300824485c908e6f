//! The action dispatcher.
//!
//! One process-wide registry holds every plugin the binary exports. The
//! host talks to each plugin through a pair of C thunks chosen by slot
//! index; the thunks funnel into [`dispatch_action`], which unmarshals the
//! raw handles into the typed model and calls the plugin's trait methods.
//! Errors and panics in plugin code are caught here and reported to the
//! host as statuses, never unwound across the C boundary.

use std::collections::HashMap;
use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock, RwLock};

use ofx_sys::{
    action, prop, status, OfxHost, OfxImageEffectHandle, OfxInteractHandle, OfxPlugin,
    OfxPluginEntryFn, OfxPropertySetHandle, OfxSetHostFn, OfxStatus,
};

use crate::clip::ClipPrefNames;
use crate::enums::{ChangeReason, Context};
use crate::error::{Error, OfxResult};
use crate::host::HostDescription;
use crate::image_effect::{
    error_to_status, ClipPreferencesSetter, CustomParamInterpArgs, EffectDescriptor,
    EffectInstance, FramesNeededArgs, FramesNeededSetter, ImageEffect, InstanceChangedArgs,
    IsIdentityArgs, PluginFactory, RegionOfDefinitionArgs, RegionsOfInterestArgs,
    RegionsOfInterestSetter, RenderArgs, SequenceRenderArgs,
};
use crate::property::PropertySet;
use crate::suites::Suites;

/// Upper bound on plugins per binary; the thunk tables are this long.
pub const MAX_PLUGINS: usize = 16;

struct HostPtr(*mut OfxHost);

// Only written from setHost, which the host serializes before load.
unsafe impl Send for HostPtr {}
unsafe impl Sync for HostPtr {}

/// Mutable per-plugin state, populated as the host walks the lifecycle.
struct PluginState {
    host_ptr: HostPtr,
    suites: Option<Arc<Suites>>,
    host: Option<HostDescription>,
    /// Clip names defined per context during describe-in-context, needed
    /// again when instances are created.
    clip_names: HashMap<Option<Context>, HashMap<String, ClipPrefNames>>,
}

struct PluginSlot {
    factory: Box<dyn PluginFactory>,
    plugin: OfxPlugin,
    state: RwLock<PluginState>,
}

struct Registry {
    slots: Vec<PluginSlot>,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Builds the registry on first host contact. `factories` runs exactly
/// once; later calls return the existing count.
pub fn init_registry(factories: impl FnOnce() -> Vec<Box<dyn PluginFactory>>) -> usize {
    let registry = REGISTRY.get_or_init(|| {
        crate::logging::init();
        let mut slots = Vec::new();
        for (i, factory) in factories().into_iter().enumerate() {
            if i >= MAX_PLUGINS {
                log::error!("plugin registry full, dropping {:?}", factory.identifier());
                break;
            }
            let (major, minor) = factory.version();
            let plugin = OfxPlugin {
                plugin_api: ofx_sys::IMAGE_EFFECT_PLUGIN_API.as_ptr(),
                api_version: ofx_sys::IMAGE_EFFECT_API_VERSION,
                plugin_identifier: factory.identifier().as_ptr(),
                plugin_version_major: major,
                plugin_version_minor: minor,
                set_host: Some(SET_HOST_THUNKS[i]),
                main_entry: Some(MAIN_ENTRY_THUNKS[i]),
            };
            slots.push(PluginSlot {
                factory,
                plugin,
                state: RwLock::new(PluginState {
                    host_ptr: HostPtr(std::ptr::null_mut()),
                    suites: None,
                    host: None,
                    clip_names: HashMap::new(),
                }),
            });
        }
        Registry { slots }
    });
    registry.slots.len()
}

/// The `OfxPlugin` for slot `index`, or null past the end.
pub fn plugin_struct(index: usize) -> *const OfxPlugin {
    match REGISTRY.get().and_then(|r| r.slots.get(index)) {
        Some(slot) => &slot.plugin,
        None => std::ptr::null(),
    }
}

/// The suites of the first loaded plugin in this binary. Interact entry
/// points have no slot of their own, so they share whichever host
/// connection exists; a binary only ever sees one host.
pub(crate) fn current_suites() -> Option<Arc<Suites>> {
    let registry = REGISTRY.get()?;
    for slot in &registry.slots {
        if let Ok(state) = slot.state.read() {
            if let Some(suites) = &state.suites {
                return Some(Arc::clone(suites));
            }
        }
    }
    None
}

// ============================================================================
// Instance data
// ============================================================================

/// What hangs off an instance's `kOfxPropInstanceData`.
struct InstanceHolder {
    effect: EffectInstance,
    state: Box<dyn ImageEffect>,
}

fn effect_props(
    suites: &Arc<Suites>,
    handle: OfxImageEffectHandle,
) -> OfxResult<PropertySet> {
    let f = crate::suites::suite_fn!(suites.image_effect(), get_property_set)?;
    let mut props_handle = std::ptr::null_mut();
    crate::error::check_status(unsafe { f(handle, &mut props_handle) })?;
    Ok(PropertySet::new(props_handle, Arc::clone(suites)))
}

/// Recovers the holder stored on an instance. The returned borrow is
/// exclusive by the host's threading contract for the current action.
unsafe fn instance_holder<'a>(
    suites: &Arc<Suites>,
    handle: OfxImageEffectHandle,
) -> OfxResult<&'a mut InstanceHolder> {
    let props = effect_props(suites, handle)?;
    let data = props.get_pointer(prop::INSTANCE_DATA)?;
    if data.is_null() {
        return Err(Error::BadHandle);
    }
    Ok(&mut *(data as *mut InstanceHolder))
}

pub(crate) fn register_effect_interact(effect: OfxImageEffectHandle, interact: OfxInteractHandle) {
    if let Some(suites) = current_suites() {
        if let Ok(holder) = unsafe { instance_holder(&suites, effect) } {
            holder.effect.register_interact(interact);
        }
    }
}

pub(crate) fn unregister_effect_interact(
    effect: OfxImageEffectHandle,
    interact: OfxInteractHandle,
) {
    if let Some(suites) = current_suites() {
        if let Ok(holder) = unsafe { instance_holder(&suites, effect) } {
            holder.effect.unregister_interact(interact);
        }
    }
}

// ============================================================================
// Action bodies
// ============================================================================

fn action_load(slot: &PluginSlot) -> OfxResult<OfxStatus> {
    let mut state = slot
        .state
        .write()
        .map_err(|_| Error::TypeRequest("plugin state poisoned".into()))?;
    if state.suites.is_none() {
        if state.host_ptr.0.is_null() {
            return Err(Error::HostInadequate("setHost never called".into()));
        }
        let suites = Arc::new(unsafe { Suites::fetch(state.host_ptr.0) }?);
        crate::validation::validate_host(&PropertySet::new(
            suites.host_props(),
            Arc::clone(&suites),
        ));
        state.host = Some(HostDescription::fetch(&suites)?);
        state.suites = Some(suites);
    }
    slot.factory.load()?;
    Ok(status::OK)
}

fn action_unload(slot: &PluginSlot) -> OfxResult<OfxStatus> {
    slot.factory.unload()?;
    let mut state = slot
        .state
        .write()
        .map_err(|_| Error::TypeRequest("plugin state poisoned".into()))?;
    state.suites = None;
    state.host = None;
    state.clip_names.clear();
    Ok(status::OK)
}

fn loaded_state(slot: &PluginSlot) -> OfxResult<(Arc<Suites>, HostDescription)> {
    let state = slot
        .state
        .read()
        .map_err(|_| Error::TypeRequest("plugin state poisoned".into()))?;
    let suites = state
        .suites
        .as_ref()
        .ok_or_else(|| Error::HostInadequate("action before load".into()))?;
    let host = state
        .host
        .clone()
        .ok_or_else(|| Error::HostInadequate("action before load".into()))?;
    Ok((Arc::clone(suites), host))
}

fn action_describe(slot: &PluginSlot, handle: OfxImageEffectHandle) -> OfxResult<OfxStatus> {
    let (suites, host) = loaded_state(slot)?;
    let mut desc = EffectDescriptor::new(handle, suites)?;
    crate::validation::validate_effect_descriptor(desc.props());
    slot.factory.describe(&host, &mut desc)?;
    Ok(status::OK)
}

fn action_describe_in_context(
    slot: &PluginSlot,
    handle: OfxImageEffectHandle,
    in_args: &PropertySet,
) -> OfxResult<OfxStatus> {
    let (suites, host) = loaded_state(slot)?;
    let context = Context::from_cstr(&in_args.get_cstring(prop::CONTEXT)?)?;
    let mut desc = EffectDescriptor::new(handle, suites)?;
    slot.factory.describe_in_context(&host, context, &mut desc)?;
    let mut state = slot
        .state
        .write()
        .map_err(|_| Error::TypeRequest("plugin state poisoned".into()))?;
    state.clip_names.insert(Some(context), desc.clip_pref_names().clone());
    Ok(status::OK)
}

fn action_create_instance(
    slot: &PluginSlot,
    handle: OfxImageEffectHandle,
) -> OfxResult<OfxStatus> {
    let (suites, host) = loaded_state(slot)?;
    let props = effect_props(&suites, handle)?;
    crate::validation::validate_effect_instance(&props);
    let context = Context::from_cstr(&props.get_cstring(prop::CONTEXT)?)?;
    let clip_names = {
        let state = slot
            .state
            .read()
            .map_err(|_| Error::TypeRequest("plugin state poisoned".into()))?;
        state
            .clip_names
            .get(&Some(context))
            .cloned()
            .unwrap_or_default()
    };
    let mut effect = EffectInstance::new(handle, suites, host.clone(), context, clip_names)?;
    let state = slot.factory.create_instance(&host, &mut effect)?;
    let raw = Box::into_raw(Box::new(InstanceHolder { effect, state }));
    let stored = props.set_pointer(prop::INSTANCE_DATA, raw as *mut c_void);
    if let Err(err) = stored {
        drop(unsafe { Box::from_raw(raw) });
        return Err(err);
    }
    Ok(status::OK)
}

fn action_destroy_instance(
    slot: &PluginSlot,
    handle: OfxImageEffectHandle,
) -> OfxResult<OfxStatus> {
    let (suites, _) = loaded_state(slot)?;
    let props = effect_props(&suites, handle)?;
    let data = props.get_pointer(prop::INSTANCE_DATA)?;
    props.set_pointer(prop::INSTANCE_DATA, std::ptr::null_mut()).ok();
    if !data.is_null() {
        drop(unsafe { Box::from_raw(data as *mut InstanceHolder) });
    }
    Ok(status::OK)
}

fn write_rect_d(
    props: &PropertySet,
    name: &CStr,
    rect: ofx_sys::OfxRectD,
) -> OfxResult<()> {
    props.set_double_at(name, 0, rect.x1)?;
    props.set_double_at(name, 1, rect.y1)?;
    props.set_double_at(name, 2, rect.x2)?;
    props.set_double_at(name, 3, rect.y2)
}

/// The instance-directed actions the dispatcher understands.
fn is_instance_action(action: &CStr) -> bool {
    const KNOWN: &[&CStr] = &[
        action::RENDER,
        action::BEGIN_SEQUENCE_RENDER,
        action::END_SEQUENCE_RENDER,
        action::IS_IDENTITY,
        action::GET_REGION_OF_DEFINITION,
        action::GET_REGIONS_OF_INTEREST,
        action::GET_FRAMES_NEEDED,
        action::GET_CLIP_PREFERENCES,
        action::GET_TIME_DOMAIN,
        action::INSTANCE_CHANGED,
        action::BEGIN_INSTANCE_CHANGED,
        action::END_INSTANCE_CHANGED,
        action::BEGIN_INSTANCE_EDIT,
        action::END_INSTANCE_EDIT,
        action::PURGE_CACHES,
        action::SYNC_PRIVATE_DATA,
        action::OPENGL_CONTEXT_ATTACHED,
        action::OPENGL_CONTEXT_DETACHED,
    ];
    KNOWN.contains(&action)
}

fn dispatch_instance_action(
    slot: &PluginSlot,
    action: &CStr,
    handle: OfxImageEffectHandle,
    in_args: OfxPropertySetHandle,
    out_args: OfxPropertySetHandle,
) -> OfxResult<OfxStatus> {
    // An action from a later API may arrive with any handle, or none.
    // Answer it with the default reply before touching the handle.
    if !is_instance_action(action) {
        return Ok(status::REPLY_DEFAULT);
    }
    let (suites, _) = loaded_state(slot)?;
    let holder = unsafe { instance_holder(&suites, handle) }?;
    let effect = &mut holder.effect;
    let state = holder.state.as_mut();
    let in_args = PropertySet::new(in_args, Arc::clone(&suites));
    let out_args = PropertySet::new(out_args, Arc::clone(&suites));

    let stat = if action == action::RENDER {
        state.render(effect, &RenderArgs::read(&in_args)?)?;
        status::OK
    } else if action == action::BEGIN_SEQUENCE_RENDER {
        state.begin_sequence_render(effect, &SequenceRenderArgs::read(&in_args)?)?;
        status::OK
    } else if action == action::END_SEQUENCE_RENDER {
        state.end_sequence_render(effect, &SequenceRenderArgs::read(&in_args)?)?;
        status::OK
    } else if action == action::IS_IDENTITY {
        match state.is_identity(effect, &IsIdentityArgs::read(&in_args)?)? {
            Some(identity) => {
                out_args.set_string(prop::NAME, &identity.clip)?;
                out_args.set_double(prop::TIME, identity.time)?;
                status::OK
            }
            None => status::REPLY_DEFAULT,
        }
    } else if action == action::GET_REGION_OF_DEFINITION {
        match state.region_of_definition(effect, &RegionOfDefinitionArgs::read(&in_args)?)? {
            Some(rod) => {
                write_rect_d(&out_args, prop::REGION_OF_DEFINITION, rod)?;
                status::OK
            }
            None => status::REPLY_DEFAULT,
        }
    } else if action == action::GET_REGIONS_OF_INTEREST {
        let args = RegionsOfInterestArgs::read(&in_args)?;
        let mut setter = RegionsOfInterestSetter::new(effect, &out_args);
        state.regions_of_interest(effect, &args, &mut setter)?;
        if setter.did_something() {
            status::OK
        } else {
            status::REPLY_DEFAULT
        }
    } else if action == action::GET_FRAMES_NEEDED {
        let args = FramesNeededArgs::read(&in_args)?;
        let mut setter = FramesNeededSetter::new(effect, &out_args);
        state.frames_needed(effect, &args, &mut setter)?;
        if setter.did_something() {
            status::OK
        } else {
            status::REPLY_DEFAULT
        }
    } else if action == action::GET_CLIP_PREFERENCES {
        let mut setter = ClipPreferencesSetter::new(effect, &out_args);
        state.get_clip_preferences(effect, &mut setter)?;
        if setter.did_something() {
            status::OK
        } else {
            status::REPLY_DEFAULT
        }
    } else if action == action::GET_TIME_DOMAIN {
        match state.get_time_domain(effect)? {
            Some(range) => {
                out_args.set_double_at(prop::FRAME_RANGE, 0, range.min)?;
                out_args.set_double_at(prop::FRAME_RANGE, 1, range.max)?;
                status::OK
            }
            None => status::REPLY_DEFAULT,
        }
    } else if action == action::INSTANCE_CHANGED {
        state.instance_changed(effect, &InstanceChangedArgs::read(&in_args)?)?;
        status::OK
    } else if action == action::BEGIN_INSTANCE_CHANGED {
        let reason = ChangeReason::from_cstr(&in_args.get_cstring(prop::CHANGE_REASON)?)?;
        state.begin_instance_changed(effect, reason)?;
        status::OK
    } else if action == action::END_INSTANCE_CHANGED {
        let reason = ChangeReason::from_cstr(&in_args.get_cstring(prop::CHANGE_REASON)?)?;
        state.end_instance_changed(effect, reason)?;
        status::OK
    } else if action == action::BEGIN_INSTANCE_EDIT {
        state.begin_instance_edit(effect)?;
        status::OK
    } else if action == action::END_INSTANCE_EDIT {
        state.end_instance_edit(effect)?;
        status::OK
    } else if action == action::PURGE_CACHES {
        state.purge_caches(effect)?;
        status::OK
    } else if action == action::SYNC_PRIVATE_DATA {
        state.sync_private_data(effect)?;
        status::OK
    } else if action == action::OPENGL_CONTEXT_ATTACHED {
        state.opengl_context_attached(effect)?;
        status::OK
    } else if action == action::OPENGL_CONTEXT_DETACHED {
        state.opengl_context_detached(effect)?;
        status::OK
    } else {
        // Unknown actions get the host's default behavior.
        status::REPLY_DEFAULT
    };
    Ok(stat)
}

fn dispatch_action(
    index: usize,
    action: &CStr,
    handle: *const c_void,
    in_args: OfxPropertySetHandle,
    out_args: OfxPropertySetHandle,
) -> OfxResult<OfxStatus> {
    let slot = REGISTRY
        .get()
        .and_then(|r| r.slots.get(index))
        .ok_or(Error::BadHandle)?;
    log::debug!("plugin {}: action {:?}", index, action);

    let effect = handle as OfxImageEffectHandle;
    if action == action::LOAD {
        action_load(slot)
    } else if action == action::UNLOAD {
        action_unload(slot)
    } else if action == action::DESCRIBE {
        action_describe(slot, effect)
    } else if action == action::DESCRIBE_IN_CONTEXT {
        let (suites, _) = loaded_state(slot)?;
        let in_args = PropertySet::new(in_args, suites);
        action_describe_in_context(slot, effect, &in_args)
    } else if action == action::CREATE_INSTANCE {
        action_create_instance(slot, effect)
    } else if action == action::DESTROY_INSTANCE {
        action_destroy_instance(slot, effect)
    } else {
        dispatch_instance_action(slot, action, effect, in_args, out_args)
    }
}

// ============================================================================
// Thunks
// ============================================================================

unsafe extern "C" fn main_entry_thunk<const N: usize>(
    action: *const c_char,
    handle: *const c_void,
    in_args: OfxPropertySetHandle,
    out_args: OfxPropertySetHandle,
) -> OfxStatus {
    if action.is_null() {
        return status::ERR_BAD_HANDLE;
    }
    let action = CStr::from_ptr(action);
    match catch_unwind(AssertUnwindSafe(|| {
        dispatch_action(N, action, handle, in_args, out_args)
    })) {
        Ok(Ok(stat)) => stat,
        Ok(Err(err)) => {
            log::error!("plugin {}: action {:?} failed: {}", N, action, err);
            error_to_status(&err)
        }
        Err(_) => {
            log::error!("plugin {}: action {:?} panicked", N, action);
            status::FAILED
        }
    }
}

unsafe extern "C" fn set_host_thunk<const N: usize>(host: *mut OfxHost) {
    if let Some(slot) = REGISTRY.get().and_then(|r| r.slots.get(N)) {
        if let Ok(mut state) = slot.state.write() {
            state.host_ptr = HostPtr(host);
        }
    }
}

macro_rules! thunk_tables {
    ($($n:literal),*) => {
        static MAIN_ENTRY_THUNKS: [OfxPluginEntryFn; MAX_PLUGINS] =
            [$(main_entry_thunk::<$n>),*];
        static SET_HOST_THUNKS: [OfxSetHostFn; MAX_PLUGINS] = [$(set_host_thunk::<$n>),*];
    };
}

thunk_tables!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15);

// ============================================================================
// Custom-parameter interpolation
// ============================================================================

unsafe extern "C" fn custom_interp_thunk(
    instance: OfxImageEffectHandle,
    in_args: OfxPropertySetHandle,
    out_args: OfxPropertySetHandle,
) -> OfxStatus {
    let body = || -> OfxResult<OfxStatus> {
        let suites = current_suites().ok_or(Error::BadHandle)?;
        let holder = instance_holder(&suites, instance)?;
        let in_args = PropertySet::new(in_args, Arc::clone(&suites));
        let out_args = PropertySet::new(out_args, Arc::clone(&suites));
        let args = CustomParamInterpArgs::read(&in_args)?;
        match holder.state.interpolate_custom(&mut holder.effect, &args)? {
            Some(value) => {
                out_args.set_string(prop::PARAM_CUSTOM_VALUE, &value)?;
                Ok(status::OK)
            }
            None => Ok(status::REPLY_DEFAULT),
        }
    };
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(stat)) => stat,
        Ok(Err(err)) => {
            log::error!("custom interpolation failed: {}", err);
            error_to_status(&err)
        }
        Err(_) => status::FAILED,
    }
}

/// The C callback installed by `CustomParamDescriptor::set_custom_interpolation`.
pub(crate) fn custom_param_interp_entry() -> ofx_sys::OfxCustomParamInterpFn {
    custom_interp_thunk
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_struct_is_null_before_registration() {
        // Slot indexes past the registry are null rather than a panic.
        assert!(plugin_struct(MAX_PLUGINS + 1).is_null());
    }
}
