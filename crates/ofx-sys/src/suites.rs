//! Versioned host suites.
//!
//! Each suite is a `repr(C)` table of function pointers published by the
//! host under a well-known name and version through `OfxHost::fetch_suite`.
//! Entries are `Option` so a null slot from a partial host decodes as
//! `None` instead of undefined behavior.
//!
//! The parameter value accessors are C-variadic. Declaring and calling
//! variadic function *pointers* is stable Rust; only defining variadic
//! functions is not, which is why the test host implements those slots in
//! a C shim.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_uint, c_void};

use crate::{
    OfxImageClipHandle, OfxImageEffectHandle, OfxImageMemoryHandle, OfxInteractHandle,
    OfxMutexHandle, OfxParamHandle, OfxParamSetHandle, OfxPropertySetHandle, OfxRangeD, OfxRectD,
    OfxStatus, OfxTime,
};

// Suite names, as passed to fetchSuite.
pub const PROPERTY_SUITE: &CStr = c"OfxPropertySuite";
pub const IMAGE_EFFECT_SUITE: &CStr = c"OfxImageEffectSuite";
pub const PARAMETER_SUITE: &CStr = c"OfxParameterSuite";
pub const MEMORY_SUITE: &CStr = c"OfxMemorySuite";
pub const MULTI_THREAD_SUITE: &CStr = c"OfxMultiThreadSuite";
pub const MESSAGE_SUITE: &CStr = c"OfxMessageSuite";
pub const PROGRESS_SUITE: &CStr = c"OfxProgressSuite";
pub const TIME_LINE_SUITE: &CStr = c"OfxTimeLineSuite";
pub const PARAMETRIC_PARAMETER_SUITE: &CStr = c"OfxParametricParameterSuite";
pub const INTERACT_SUITE: &CStr = c"OfxInteractSuite";
pub const OPENGL_RENDER_SUITE: &CStr = c"OfxImageEffectOpenGLRenderSuite";

// ============================================================================
// Property suite, v1
// ============================================================================

#[repr(C)]
pub struct OfxPropertySuiteV1 {
    pub prop_set_pointer: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            index: c_int,
            value: *mut c_void,
        ) -> OfxStatus,
    >,
    pub prop_set_string: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            index: c_int,
            value: *const c_char,
        ) -> OfxStatus,
    >,
    pub prop_set_double: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            index: c_int,
            value: f64,
        ) -> OfxStatus,
    >,
    pub prop_set_int: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            index: c_int,
            value: c_int,
        ) -> OfxStatus,
    >,
    pub prop_set_pointer_n: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            count: c_int,
            values: *const *mut c_void,
        ) -> OfxStatus,
    >,
    pub prop_set_string_n: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            count: c_int,
            values: *const *const c_char,
        ) -> OfxStatus,
    >,
    pub prop_set_double_n: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            count: c_int,
            values: *const f64,
        ) -> OfxStatus,
    >,
    pub prop_set_int_n: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            count: c_int,
            values: *const c_int,
        ) -> OfxStatus,
    >,
    pub prop_get_pointer: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            index: c_int,
            value: *mut *mut c_void,
        ) -> OfxStatus,
    >,
    pub prop_get_string: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            index: c_int,
            value: *mut *mut c_char,
        ) -> OfxStatus,
    >,
    pub prop_get_double: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            index: c_int,
            value: *mut f64,
        ) -> OfxStatus,
    >,
    pub prop_get_int: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            index: c_int,
            value: *mut c_int,
        ) -> OfxStatus,
    >,
    pub prop_get_pointer_n: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            count: c_int,
            values: *mut *mut c_void,
        ) -> OfxStatus,
    >,
    pub prop_get_string_n: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            count: c_int,
            values: *mut *mut c_char,
        ) -> OfxStatus,
    >,
    pub prop_get_double_n: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            count: c_int,
            values: *mut f64,
        ) -> OfxStatus,
    >,
    pub prop_get_int_n: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            count: c_int,
            values: *mut c_int,
        ) -> OfxStatus,
    >,
    pub prop_reset: Option<
        unsafe extern "C" fn(properties: OfxPropertySetHandle, property: *const c_char) -> OfxStatus,
    >,
    pub prop_get_dimension: Option<
        unsafe extern "C" fn(
            properties: OfxPropertySetHandle,
            property: *const c_char,
            count: *mut c_int,
        ) -> OfxStatus,
    >,
}

// ============================================================================
// Image-effect suite, v1
// ============================================================================

#[repr(C)]
pub struct OfxImageEffectSuiteV1 {
    pub get_property_set: Option<
        unsafe extern "C" fn(
            effect: OfxImageEffectHandle,
            prop_handle: *mut OfxPropertySetHandle,
        ) -> OfxStatus,
    >,
    pub get_param_set: Option<
        unsafe extern "C" fn(
            effect: OfxImageEffectHandle,
            param_set: *mut OfxParamSetHandle,
        ) -> OfxStatus,
    >,
    pub clip_define: Option<
        unsafe extern "C" fn(
            effect: OfxImageEffectHandle,
            name: *const c_char,
            props: *mut OfxPropertySetHandle,
        ) -> OfxStatus,
    >,
    pub clip_get_handle: Option<
        unsafe extern "C" fn(
            effect: OfxImageEffectHandle,
            name: *const c_char,
            clip: *mut OfxImageClipHandle,
            props: *mut OfxPropertySetHandle,
        ) -> OfxStatus,
    >,
    pub clip_get_property_set: Option<
        unsafe extern "C" fn(
            clip: OfxImageClipHandle,
            props: *mut OfxPropertySetHandle,
        ) -> OfxStatus,
    >,
    pub clip_get_image: Option<
        unsafe extern "C" fn(
            clip: OfxImageClipHandle,
            time: OfxTime,
            region: *const OfxRectD,
            image_handle: *mut OfxPropertySetHandle,
        ) -> OfxStatus,
    >,
    pub clip_release_image:
        Option<unsafe extern "C" fn(image_handle: OfxPropertySetHandle) -> OfxStatus>,
    pub clip_get_region_of_definition: Option<
        unsafe extern "C" fn(
            clip: OfxImageClipHandle,
            time: OfxTime,
            bounds: *mut OfxRectD,
        ) -> OfxStatus,
    >,
    pub abort: Option<unsafe extern "C" fn(effect: OfxImageEffectHandle) -> c_int>,
    pub image_memory_alloc: Option<
        unsafe extern "C" fn(
            instance: OfxImageEffectHandle,
            n_bytes: usize,
            memory_handle: *mut OfxImageMemoryHandle,
        ) -> OfxStatus,
    >,
    pub image_memory_free:
        Option<unsafe extern "C" fn(memory_handle: OfxImageMemoryHandle) -> OfxStatus>,
    pub image_memory_lock: Option<
        unsafe extern "C" fn(
            memory_handle: OfxImageMemoryHandle,
            returned_ptr: *mut *mut c_void,
        ) -> OfxStatus,
    >,
    pub image_memory_unlock:
        Option<unsafe extern "C" fn(memory_handle: OfxImageMemoryHandle) -> OfxStatus>,
}

// ============================================================================
// Parameter suite, v1
// ============================================================================

#[repr(C)]
pub struct OfxParameterSuiteV1 {
    pub param_define: Option<
        unsafe extern "C" fn(
            param_set: OfxParamSetHandle,
            param_type: *const c_char,
            name: *const c_char,
            props: *mut OfxPropertySetHandle,
        ) -> OfxStatus,
    >,
    pub param_get_handle: Option<
        unsafe extern "C" fn(
            param_set: OfxParamSetHandle,
            name: *const c_char,
            param: *mut OfxParamHandle,
            props: *mut OfxPropertySetHandle,
        ) -> OfxStatus,
    >,
    pub param_set_get_property_set: Option<
        unsafe extern "C" fn(
            param_set: OfxParamSetHandle,
            props: *mut OfxPropertySetHandle,
        ) -> OfxStatus,
    >,
    pub param_get_property_set: Option<
        unsafe extern "C" fn(param: OfxParamHandle, props: *mut OfxPropertySetHandle) -> OfxStatus,
    >,
    /// `paramGetValue(param, out...)`: one out-pointer per dimension.
    pub param_get_value:
        Option<unsafe extern "C" fn(param: OfxParamHandle, ...) -> OfxStatus>,
    /// `paramGetValueAtTime(param, time, out...)`.
    pub param_get_value_at_time:
        Option<unsafe extern "C" fn(param: OfxParamHandle, time: OfxTime, ...) -> OfxStatus>,
    /// `paramGetDerivative(param, time, out...)`; doubles only.
    pub param_get_derivative:
        Option<unsafe extern "C" fn(param: OfxParamHandle, time: OfxTime, ...) -> OfxStatus>,
    /// `paramGetIntegral(param, time1, time2, out...)`; doubles only.
    pub param_get_integral: Option<
        unsafe extern "C" fn(param: OfxParamHandle, time1: OfxTime, time2: OfxTime, ...) -> OfxStatus,
    >,
    /// `paramSetValue(param, value...)`: one value per dimension.
    pub param_set_value:
        Option<unsafe extern "C" fn(param: OfxParamHandle, ...) -> OfxStatus>,
    /// `paramSetValueAtTime(param, time, value...)`.
    pub param_set_value_at_time:
        Option<unsafe extern "C" fn(param: OfxParamHandle, time: OfxTime, ...) -> OfxStatus>,
    pub param_get_num_keys:
        Option<unsafe extern "C" fn(param: OfxParamHandle, number_of_keys: *mut c_uint) -> OfxStatus>,
    pub param_get_key_time: Option<
        unsafe extern "C" fn(
            param: OfxParamHandle,
            nth_key: c_uint,
            time: *mut OfxTime,
        ) -> OfxStatus,
    >,
    pub param_get_key_index: Option<
        unsafe extern "C" fn(
            param: OfxParamHandle,
            time: OfxTime,
            direction: c_int,
            index: *mut c_int,
        ) -> OfxStatus,
    >,
    pub param_delete_key:
        Option<unsafe extern "C" fn(param: OfxParamHandle, time: OfxTime) -> OfxStatus>,
    pub param_delete_all_keys: Option<unsafe extern "C" fn(param: OfxParamHandle) -> OfxStatus>,
    pub param_copy: Option<
        unsafe extern "C" fn(
            param_to: OfxParamHandle,
            param_from: OfxParamHandle,
            dst_offset: OfxTime,
            frame_range: *const OfxRangeD,
        ) -> OfxStatus,
    >,
    pub param_edit_begin: Option<
        unsafe extern "C" fn(param_set: OfxParamSetHandle, name: *const c_char) -> OfxStatus,
    >,
    pub param_edit_end: Option<unsafe extern "C" fn(param_set: OfxParamSetHandle) -> OfxStatus>,
}

/// Search directions for `param_get_key_index`.
pub mod key_search {
    use std::os::raw::c_int;

    pub const BACKWARDS: c_int = -1;
    pub const NEAR: c_int = 0;
    pub const FORWARDS: c_int = 1;
}

// ============================================================================
// Memory suite, v1
// ============================================================================

#[repr(C)]
pub struct OfxMemorySuiteV1 {
    pub memory_alloc: Option<
        unsafe extern "C" fn(
            handle: *mut c_void,
            n_bytes: usize,
            allocated_data: *mut *mut c_void,
        ) -> OfxStatus,
    >,
    pub memory_free: Option<unsafe extern "C" fn(allocated_data: *mut c_void) -> OfxStatus>,
}

// ============================================================================
// Multi-thread suite, v1
// ============================================================================

/// Worker function run once per spawned thread.
pub type OfxThreadFunctionV1 =
    unsafe extern "C" fn(thread_index: c_uint, thread_max: c_uint, custom_arg: *mut c_void);

#[repr(C)]
pub struct OfxMultiThreadSuiteV1 {
    pub multi_thread: Option<
        unsafe extern "C" fn(
            func: OfxThreadFunctionV1,
            n_threads: c_uint,
            custom_arg: *mut c_void,
        ) -> OfxStatus,
    >,
    pub multi_thread_num_cpus: Option<unsafe extern "C" fn(n_cpus: *mut c_uint) -> OfxStatus>,
    pub multi_thread_index: Option<unsafe extern "C" fn(thread_index: *mut c_uint) -> OfxStatus>,
    pub multi_thread_is_spawned_thread: Option<unsafe extern "C" fn() -> c_int>,
    pub mutex_create:
        Option<unsafe extern "C" fn(mutex: *mut OfxMutexHandle, lock_count: c_int) -> OfxStatus>,
    pub mutex_destroy: Option<unsafe extern "C" fn(mutex: OfxMutexHandle) -> OfxStatus>,
    pub mutex_lock: Option<unsafe extern "C" fn(mutex: OfxMutexHandle) -> OfxStatus>,
    pub mutex_unlock: Option<unsafe extern "C" fn(mutex: OfxMutexHandle) -> OfxStatus>,
    pub mutex_try_lock: Option<unsafe extern "C" fn(mutex: OfxMutexHandle) -> OfxStatus>,
}

// ============================================================================
// Message suites
// ============================================================================

#[repr(C)]
pub struct OfxMessageSuiteV1 {
    /// `message(handle, messageType, messageId, format, ...)`, printf-style.
    pub message: Option<
        unsafe extern "C" fn(
            handle: *mut c_void,
            message_type: *const c_char,
            message_id: *const c_char,
            format: *const c_char,
            ...
        ) -> OfxStatus,
    >,
}

#[repr(C)]
pub struct OfxMessageSuiteV2 {
    pub message: Option<
        unsafe extern "C" fn(
            handle: *mut c_void,
            message_type: *const c_char,
            message_id: *const c_char,
            format: *const c_char,
            ...
        ) -> OfxStatus,
    >,
    pub set_persistent_message: Option<
        unsafe extern "C" fn(
            handle: *mut c_void,
            message_type: *const c_char,
            message_id: *const c_char,
            format: *const c_char,
            ...
        ) -> OfxStatus,
    >,
    pub clear_persistent_message: Option<unsafe extern "C" fn(handle: *mut c_void) -> OfxStatus>,
}

// ============================================================================
// Progress suites
// ============================================================================

#[repr(C)]
pub struct OfxProgressSuiteV1 {
    pub progress_start: Option<
        unsafe extern "C" fn(effect_instance: *mut c_void, label: *const c_char) -> OfxStatus,
    >,
    pub progress_update:
        Option<unsafe extern "C" fn(effect_instance: *mut c_void, progress: f64) -> OfxStatus>,
    pub progress_end: Option<unsafe extern "C" fn(effect_instance: *mut c_void) -> OfxStatus>,
}

#[repr(C)]
pub struct OfxProgressSuiteV2 {
    pub progress_start: Option<
        unsafe extern "C" fn(
            effect_instance: *mut c_void,
            message: *const c_char,
            messageid: *const c_char,
        ) -> OfxStatus,
    >,
    pub progress_update:
        Option<unsafe extern "C" fn(effect_instance: *mut c_void, progress: f64) -> OfxStatus>,
    pub progress_end: Option<unsafe extern "C" fn(effect_instance: *mut c_void) -> OfxStatus>,
}

// ============================================================================
// Timeline suite, v1
// ============================================================================

#[repr(C)]
pub struct OfxTimeLineSuiteV1 {
    pub get_time: Option<unsafe extern "C" fn(instance: *mut c_void, time: *mut f64) -> OfxStatus>,
    pub goto_time: Option<unsafe extern "C" fn(instance: *mut c_void, time: f64) -> OfxStatus>,
    pub get_time_bounds: Option<
        unsafe extern "C" fn(instance: *mut c_void, first: *mut f64, last: *mut f64) -> OfxStatus,
    >,
}

// ============================================================================
// Parametric parameter suite, v1
// ============================================================================

#[repr(C)]
pub struct OfxParametricParameterSuiteV1 {
    pub parametric_param_get_value: Option<
        unsafe extern "C" fn(
            param: OfxParamHandle,
            curve_index: c_int,
            time: OfxTime,
            parametric_position: f64,
            returned_value: *mut f64,
        ) -> OfxStatus,
    >,
    pub parametric_param_get_n_control_points: Option<
        unsafe extern "C" fn(
            param: OfxParamHandle,
            curve_index: c_int,
            time: f64,
            returned_value: *mut c_int,
        ) -> OfxStatus,
    >,
    pub parametric_param_get_nth_control_point: Option<
        unsafe extern "C" fn(
            param: OfxParamHandle,
            curve_index: c_int,
            time: f64,
            nth_ctl: c_int,
            key: *mut f64,
            value: *mut f64,
        ) -> OfxStatus,
    >,
    pub parametric_param_set_nth_control_point: Option<
        unsafe extern "C" fn(
            param: OfxParamHandle,
            curve_index: c_int,
            time: f64,
            nth_ctl: c_int,
            key: f64,
            value: f64,
            add_animation_key: bool,
        ) -> OfxStatus,
    >,
    pub parametric_param_add_control_point: Option<
        unsafe extern "C" fn(
            param: OfxParamHandle,
            curve_index: c_int,
            time: f64,
            key: f64,
            value: f64,
            add_animation_key: bool,
        ) -> OfxStatus,
    >,
    pub parametric_param_delete_control_point: Option<
        unsafe extern "C" fn(param: OfxParamHandle, curve_index: c_int, nth_ctl: c_int) -> OfxStatus,
    >,
    pub parametric_param_delete_all_control_points:
        Option<unsafe extern "C" fn(param: OfxParamHandle, curve_index: c_int) -> OfxStatus>,
}

// ============================================================================
// Interact suite, v1
// ============================================================================

#[repr(C)]
pub struct OfxInteractSuiteV1 {
    pub interact_swap_buffers: Option<unsafe extern "C" fn(interact: OfxInteractHandle) -> OfxStatus>,
    pub interact_redraw: Option<unsafe extern "C" fn(interact: OfxInteractHandle) -> OfxStatus>,
    pub interact_get_property_set: Option<
        unsafe extern "C" fn(
            interact: OfxInteractHandle,
            props: *mut OfxPropertySetHandle,
        ) -> OfxStatus,
    >,
}

// ============================================================================
// OpenGL render suite, v1
// ============================================================================

#[repr(C)]
pub struct OfxImageEffectOpenGLRenderSuiteV1 {
    pub clip_load_texture: Option<
        unsafe extern "C" fn(
            clip: OfxImageClipHandle,
            time: OfxTime,
            format: *const c_char,
            region: *const OfxRectD,
            texture_handle: *mut OfxPropertySetHandle,
        ) -> OfxStatus,
    >,
    pub clip_free_texture:
        Option<unsafe extern "C" fn(texture_handle: OfxPropertySetHandle) -> OfxStatus>,
    pub flush_resources: Option<unsafe extern "C" fn() -> OfxStatus>,
}
