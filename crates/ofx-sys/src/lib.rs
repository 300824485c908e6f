//! Raw OpenFX image-effect ABI.
//!
//! Everything a host and a plugin exchange crosses this surface: opaque
//! handles, `repr(C)` geometry PODs, status codes, string property names,
//! and versioned suites of C function pointers. No behavior lives here;
//! the safe skin is in the `ofx` crate.

pub mod action;
pub mod prop;
pub mod suites;
pub mod val;

use std::os::raw::{c_char, c_int, c_uint, c_void};

/// Status code returned by every suite call and by the plugin entry point.
pub type OfxStatus = c_int;

/// Status codes, as defined by the API.
pub mod status {
    use super::OfxStatus;

    pub const OK: OfxStatus = 0;
    pub const FAILED: OfxStatus = 1;
    pub const ERR_FATAL: OfxStatus = 2;
    pub const ERR_UNKNOWN: OfxStatus = 3;
    pub const ERR_MISSING_HOST_FEATURE: OfxStatus = 4;
    pub const ERR_UNSUPPORTED: OfxStatus = 5;
    pub const ERR_EXISTS: OfxStatus = 6;
    pub const ERR_FORMAT: OfxStatus = 7;
    pub const ERR_MEMORY: OfxStatus = 8;
    pub const ERR_BAD_HANDLE: OfxStatus = 9;
    pub const ERR_BAD_INDEX: OfxStatus = 10;
    pub const ERR_VALUE: OfxStatus = 11;
    pub const REPLY_YES: OfxStatus = 12;
    pub const REPLY_NO: OfxStatus = 13;
    pub const REPLY_DEFAULT: OfxStatus = 14;
    /// Image-effect extension: the image format is wrong for the operation.
    pub const ERR_IMAGE_FORMAT: OfxStatus = 1000;
}

/// Time is a double throughout the API, measured in frames.
pub type OfxTime = f64;

// ============================================================================
// Opaque handles
// ============================================================================

macro_rules! opaque_handle {
    ($(#[$doc:meta] $strukt:ident => $handle:ident;)*) => {
        $(
            #[$doc]
            #[repr(C)]
            pub struct $strukt {
                _private: [u8; 0],
            }
            pub type $handle = *mut $strukt;
        )*
    };
}

opaque_handle! {
    /// A host-owned property set.
    OfxPropertySetStruct => OfxPropertySetHandle;
    /// An image-effect descriptor or instance.
    OfxImageEffectStruct => OfxImageEffectHandle;
    /// A clip on an effect instance.
    OfxImageClipStruct => OfxImageClipHandle;
    /// A single parameter.
    OfxParamStruct => OfxParamHandle;
    /// The set of parameters on an effect.
    OfxParamSetStruct => OfxParamSetHandle;
    /// An interact (overlay or custom parameter UI).
    OfxInteractStruct => OfxInteractHandle;
    /// A block of host-managed image memory.
    OfxImageMemoryStruct => OfxImageMemoryHandle;
    /// A host mutex.
    OfxMutexStruct => OfxMutexHandle;
}

// ============================================================================
// Geometry and value PODs
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OfxRectI {
    pub x1: c_int,
    pub y1: c_int,
    pub x2: c_int,
    pub y2: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OfxRectD {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OfxPointI {
    pub x: c_int,
    pub y: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OfxPointD {
    pub x: f64,
    pub y: f64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OfxRangeI {
    pub min: c_int,
    pub max: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OfxRangeD {
    pub min: f64,
    pub max: f64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OfxRGBColourD {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

// ============================================================================
// Host and plugin structs
// ============================================================================

/// Fetches a named, versioned suite from the host. Returns null if the host
/// does not implement the suite at that version.
pub type OfxFetchSuiteFn = unsafe extern "C" fn(
    host: OfxPropertySetHandle,
    suite_name: *const c_char,
    suite_version: c_int,
) -> *const c_void;

/// The struct the host hands to `setHost` before any action is dispatched.
#[repr(C)]
pub struct OfxHost {
    /// The host's root property set.
    pub host: OfxPropertySetHandle,
    pub fetch_suite: Option<OfxFetchSuiteFn>,
}

/// The plugin's single action entry point.
pub type OfxPluginEntryFn = unsafe extern "C" fn(
    action: *const c_char,
    handle: *const c_void,
    in_args: OfxPropertySetHandle,
    out_args: OfxPropertySetHandle,
) -> OfxStatus;

pub type OfxSetHostFn = unsafe extern "C" fn(host: *mut OfxHost);

/// Interpolation callback for custom parameters, installed through
/// `kOfxParamPropCustomInterpCallbackV1`.
pub type OfxCustomParamInterpFn = unsafe extern "C" fn(
    instance: OfxImageEffectHandle,
    in_args: OfxPropertySetHandle,
    out_args: OfxPropertySetHandle,
) -> OfxStatus;

/// One plugin as returned from `OfxGetPlugin`. The plugin owns the struct
/// and the strings it points at; both must outlive the host's use of them.
#[repr(C)]
pub struct OfxPlugin {
    pub plugin_api: *const c_char,
    pub api_version: c_int,
    pub plugin_identifier: *const c_char,
    pub plugin_version_major: c_uint,
    pub plugin_version_minor: c_uint,
    pub set_host: Option<OfxSetHostFn>,
    pub main_entry: Option<OfxPluginEntryFn>,
}

// The host only ever reads the struct, and every pointer in it refers to
// 'static data built once at registration.
unsafe impl Sync for OfxPlugin {}
unsafe impl Send for OfxPlugin {}

/// The API identifier carried in `plugin_api` for image effects.
pub const IMAGE_EFFECT_PLUGIN_API: &std::ffi::CStr = c"OfxImageEffectPluginAPI";
/// Version of the image-effect API this crate models.
pub const IMAGE_EFFECT_API_VERSION: c_int = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pod_layouts_match_c() {
        assert_eq!(std::mem::size_of::<OfxRectI>(), 16);
        assert_eq!(std::mem::size_of::<OfxRectD>(), 32);
        assert_eq!(std::mem::size_of::<OfxRangeD>(), 16);
        assert_eq!(std::mem::size_of::<OfxRGBColourD>(), 24);
    }

    #[test]
    fn option_fn_pointers_are_nullable() {
        // A null entry in a suite must decode as None.
        assert_eq!(
            std::mem::size_of::<Option<OfxPluginEntryFn>>(),
            std::mem::size_of::<usize>()
        );
    }
}
