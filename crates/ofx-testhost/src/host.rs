//! The assembled host: a property bag advertising capabilities, a
//! `fetchSuite` over the suites in this crate, and driver methods that
//! walk a plugin through the action protocol the way a real host does.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_void};
use std::sync::Mutex;

use ofx_sys::{
    action, prop, status, suites, val, OfxHost, OfxPlugin, OfxPropertySetHandle, OfxRectI,
    OfxStatus, OfxTime,
};

use crate::effect::{EffectObj, IMAGE_EFFECT_SUITE_V1};
use crate::misc::{
    INTERACT_SUITE_V1, MEMORY_SUITE_V1, MESSAGE_SUITE_V1, MESSAGE_SUITE_V2, PROGRESS_SUITE_V1,
    PROGRESS_SUITE_V2, TIME_LINE_SUITE_V1,
};
use crate::param::PARAMETER_SUITE_V1;
use crate::props::{PropSet, PROPERTY_SUITE_V1};
use crate::threading::MULTI_THREAD_SUITE_V1;

unsafe extern "C" fn fetch_suite(
    _host: OfxPropertySetHandle,
    suite_name: *const c_char,
    suite_version: c_int,
) -> *const c_void {
    if suite_name.is_null() {
        return std::ptr::null();
    }
    let name = CStr::from_ptr(suite_name);
    macro_rules! give {
        ($suite:expr) => {
            &$suite as *const _ as *const c_void
        };
    }
    match (name, suite_version) {
        (n, 1) if n == suites::PROPERTY_SUITE => give!(PROPERTY_SUITE_V1),
        (n, 1) if n == suites::IMAGE_EFFECT_SUITE => give!(IMAGE_EFFECT_SUITE_V1),
        (n, 1) if n == suites::PARAMETER_SUITE => give!(PARAMETER_SUITE_V1),
        (n, 1) if n == suites::MEMORY_SUITE => give!(MEMORY_SUITE_V1),
        (n, 1) if n == suites::MULTI_THREAD_SUITE => give!(MULTI_THREAD_SUITE_V1),
        (n, 1) if n == suites::MESSAGE_SUITE => give!(MESSAGE_SUITE_V1),
        (n, 2) if n == suites::MESSAGE_SUITE => give!(MESSAGE_SUITE_V2),
        (n, 1) if n == suites::PROGRESS_SUITE => give!(PROGRESS_SUITE_V1),
        (n, 2) if n == suites::PROGRESS_SUITE => give!(PROGRESS_SUITE_V2),
        (n, 1) if n == suites::TIME_LINE_SUITE => give!(TIME_LINE_SUITE_V1),
        (n, 1) if n == suites::INTERACT_SUITE => give!(INTERACT_SUITE_V1),
        _ => std::ptr::null(),
    }
}

/// An in-process host. Keeps descriptors alive for as long as the host
/// lives, since the plugin holds raw handles into them.
pub struct MockHost {
    pub props: Box<PropSet>,
    host: Box<OfxHost>,
    descriptors: Mutex<Vec<Box<EffectObj>>>,
}

impl Default for MockHost {
    fn default() -> Self {
        MockHost::new()
    }
}

impl MockHost {
    pub fn new() -> MockHost {
        let props = Box::new(PropSet::new());
        props.put_strings(prop::TYPE, &[val::TYPE_IMAGE_EFFECT_HOST]);
        props.put_ints(prop::API_VERSION, &[1, 4]);
        props.put_strings(prop::NAME, &[c"org.prism.TestHost"]);
        props.put_strings(prop::LABEL, &[c"Prism Test Host"]);
        props.put_ints(prop::VERSION, &[1, 0, 0]);
        props.put_strings(prop::VERSION_LABEL, &[c"1.0"]);
        props.put_ints(prop::HOST_IS_BACKGROUND, &[0]);
        props.put_ints(prop::SUPPORTS_OVERLAYS, &[1]);
        props.put_ints(prop::SUPPORTS_MULTI_RESOLUTION, &[1]);
        props.put_ints(prop::SUPPORTS_TILES, &[1]);
        props.put_ints(prop::TEMPORAL_CLIP_ACCESS, &[1]);
        props.put_strings(
            prop::SUPPORTED_COMPONENTS,
            &[val::COMPONENT_RGBA, val::COMPONENT_RGB, val::COMPONENT_ALPHA],
        );
        props.put_strings(
            prop::SUPPORTED_CONTEXTS,
            &[
                val::CONTEXT_GENERATOR,
                val::CONTEXT_FILTER,
                val::CONTEXT_GENERAL,
            ],
        );
        props.put_strings(
            prop::SUPPORTED_PIXEL_DEPTHS,
            &[val::BIT_DEPTH_FLOAT, val::BIT_DEPTH_SHORT, val::BIT_DEPTH_BYTE],
        );
        props.put_ints(prop::SUPPORTS_MULTIPLE_CLIP_DEPTHS, &[0]);
        props.put_ints(prop::SUPPORTS_MULTIPLE_CLIP_PARS, &[0]);
        props.put_ints(prop::SETABLE_FRAME_RATE, &[0]);
        props.put_ints(prop::SETABLE_FIELDING, &[0]);
        props.put_ints(prop::SEQUENTIAL_RENDER, &[0]);
        props.put_ints(prop::HOST_SUPPORTS_CUSTOM_INTERACT, &[1]);
        props.put_ints(prop::HOST_SUPPORTS_STRING_ANIMATION, &[0]);
        props.put_ints(prop::HOST_SUPPORTS_CHOICE_ANIMATION, &[0]);
        props.put_ints(prop::HOST_SUPPORTS_BOOLEAN_ANIMATION, &[0]);
        props.put_ints(prop::HOST_SUPPORTS_CUSTOM_ANIMATION, &[1]);
        props.put_ints(prop::HOST_SUPPORTS_PARAMETRIC_ANIMATION, &[0]);
        props.put_ints(prop::HOST_MAX_PARAMETERS, &[-1]);
        props.put_ints(prop::HOST_MAX_PAGES, &[0]);
        props.put_ints(prop::HOST_PAGE_ROW_COLUMN_COUNT, &[0, 0]);
        props.put_strings(prop::HOST_NATIVE_ORIGIN, &[val::NATIVE_ORIGIN_BOTTOM_LEFT]);
        let host = Box::new(OfxHost {
            host: props.handle(),
            fetch_suite: Some(fetch_suite),
        });
        MockHost {
            props,
            host,
            descriptors: Mutex::new(Vec::new()),
        }
    }

    pub fn ofx_host(&self) -> *mut OfxHost {
        self.host.as_ref() as *const OfxHost as *mut OfxHost
    }

    fn entry(plugin: &OfxPlugin) -> ofx_sys::OfxPluginEntryFn {
        plugin.main_entry.unwrap()
    }

    /// Generic action dispatch, for actions without a dedicated driver.
    pub fn action(
        &self,
        plugin: &OfxPlugin,
        action: &CStr,
        handle: *const c_void,
        in_args: OfxPropertySetHandle,
        out_args: OfxPropertySetHandle,
    ) -> OfxStatus {
        unsafe { Self::entry(plugin)(action.as_ptr(), handle, in_args, out_args) }
    }

    /// setHost followed by the load action.
    pub fn load(&self, plugin: &OfxPlugin) -> OfxStatus {
        if let Some(set_host) = plugin.set_host {
            unsafe { set_host(self.ofx_host()) };
        }
        self.action(
            plugin,
            action::LOAD,
            std::ptr::null(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        )
    }

    pub fn unload(&self, plugin: &OfxPlugin) -> OfxStatus {
        self.action(
            plugin,
            action::UNLOAD,
            std::ptr::null(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        )
    }

    /// Runs describe on a fresh descriptor and hands back its handle.
    /// The descriptor itself stays owned by the host.
    pub fn describe(&self, plugin: &OfxPlugin) -> (OfxStatus, *const EffectObj) {
        let desc = EffectObj::new(val::TYPE_IMAGE_EFFECT);
        let handle = desc.handle();
        let stat = self.action(
            plugin,
            action::DESCRIBE,
            handle as *const c_void,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        );
        let raw = desc.as_ref() as *const EffectObj;
        self.descriptors.lock().unwrap().push(desc);
        (stat, raw)
    }

    /// Describe-in-context on a context copy of the plain descriptor.
    pub fn describe_in_context(
        &self,
        plugin: &OfxPlugin,
        descriptor: *const EffectObj,
        context: &CStr,
    ) -> (OfxStatus, *const EffectObj) {
        let ctx_desc = unsafe { &*descriptor }.instantiate();
        ctx_desc.props.put_strings(prop::TYPE, &[val::TYPE_IMAGE_EFFECT]);
        ctx_desc.props.put_strings(prop::CONTEXT, &[context]);
        let in_args = PropSet::new();
        in_args.put_strings(prop::CONTEXT, &[context]);
        let stat = self.action(
            plugin,
            action::DESCRIBE_IN_CONTEXT,
            ctx_desc.handle() as *const c_void,
            in_args.handle(),
            std::ptr::null_mut(),
        );
        let raw = ctx_desc.as_ref() as *const EffectObj;
        self.descriptors.lock().unwrap().push(ctx_desc);
        (stat, raw)
    }

    /// Builds an instance from a context descriptor and runs
    /// createInstance on it. The caller owns the instance.
    pub fn create_instance(
        &self,
        plugin: &OfxPlugin,
        descriptor: *const EffectObj,
        context: &CStr,
    ) -> (OfxStatus, Box<EffectObj>) {
        let inst = unsafe { &*descriptor }.instantiate();
        inst.props.put_strings(prop::CONTEXT, &[context]);
        inst.props.put_ints(prop::IS_INTERACTIVE, &[0]);
        inst.props.put_doubles(prop::PROJECT_SIZE, &[1920.0, 1080.0]);
        inst.props.put_doubles(prop::PROJECT_OFFSET, &[0.0, 0.0]);
        inst.props.put_doubles(prop::PROJECT_EXTENT, &[1920.0, 1080.0]);
        inst.props.put_doubles(prop::PROJECT_PIXEL_ASPECT_RATIO, &[1.0]);
        inst.props.put_doubles(prop::EFFECT_DURATION, &[100.0]);
        inst.props.put_doubles(prop::FRAME_RATE, &[24.0]);
        let stat = self.action(
            plugin,
            action::CREATE_INSTANCE,
            inst.handle() as *const c_void,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        );
        (stat, inst)
    }

    pub fn destroy_instance(&self, plugin: &OfxPlugin, instance: &EffectObj) -> OfxStatus {
        self.action(
            plugin,
            action::DESTROY_INSTANCE,
            instance.handle() as *const c_void,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        )
    }

    /// In-args for a render family action at the given frame and window.
    pub fn render_args(&self, time: OfxTime, window: OfxRectI) -> PropSet {
        let in_args = PropSet::new();
        in_args.put_doubles(prop::TIME, &[time]);
        in_args.put_strings(prop::FIELD_TO_RENDER, &[val::FIELD_NONE]);
        in_args.put_ints(
            prop::RENDER_WINDOW,
            &[window.x1, window.y1, window.x2, window.y2],
        );
        in_args.put_doubles(prop::RENDER_SCALE, &[1.0, 1.0]);
        in_args.put_ints(prop::SEQUENTIAL_RENDER_STATUS, &[0]);
        in_args.put_ints(prop::INTERACTIVE_RENDER_STATUS, &[0]);
        in_args
    }

    pub fn render(
        &self,
        plugin: &OfxPlugin,
        instance: &EffectObj,
        time: OfxTime,
        window: OfxRectI,
    ) -> OfxStatus {
        let in_args = self.render_args(time, window);
        self.action(
            plugin,
            action::RENDER,
            instance.handle() as *const c_void,
            in_args.handle(),
            std::ptr::null_mut(),
        )
    }

    pub fn is_identity(
        &self,
        plugin: &OfxPlugin,
        instance: &EffectObj,
        time: OfxTime,
        window: OfxRectI,
    ) -> (OfxStatus, Option<(String, OfxTime)>) {
        let in_args = self.render_args(time, window);
        let out_args = PropSet::new();
        out_args.put_strings(prop::NAME, &[c""]);
        out_args.put_doubles(prop::TIME, &[time]);
        let stat = self.action(
            plugin,
            action::IS_IDENTITY,
            instance.handle() as *const c_void,
            in_args.handle(),
            out_args.handle(),
        );
        if stat == status::OK {
            let clip = out_args
                .string(prop::NAME, 0)
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let at = out_args.double(prop::TIME, 0).unwrap_or(time);
            (stat, Some((clip, at)))
        } else {
            (stat, None)
        }
    }

    pub fn get_clip_preferences(
        &self,
        plugin: &OfxPlugin,
        instance: &EffectObj,
    ) -> (OfxStatus, PropSet) {
        let out_args = PropSet::new();
        let stat = self.action(
            plugin,
            action::GET_CLIP_PREFERENCES,
            instance.handle() as *const c_void,
            std::ptr::null_mut(),
            out_args.handle(),
        );
        (stat, out_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_suite_honors_names_and_versions() {
        let host = MockHost::new();
        unsafe {
            let fetch = (*host.ofx_host()).fetch_suite.unwrap();
            let props = host.props.handle();
            assert!(!fetch(props, suites::PROPERTY_SUITE.as_ptr(), 1).is_null());
            assert!(!fetch(props, suites::MESSAGE_SUITE.as_ptr(), 2).is_null());
            assert!(fetch(props, suites::PROPERTY_SUITE.as_ptr(), 3).is_null());
            assert!(fetch(props, suites::PARAMETRIC_PARAMETER_SUITE.as_ptr(), 1).is_null());
        }
    }
}
