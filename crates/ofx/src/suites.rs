//! Suite discovery.
//!
//! At load the host hands over an [`ofx_sys::OfxHost`]; everything else the
//! framework does goes through the function tables fetched here. The fetched
//! pointers are owned by the host and stay valid until the matching unload,
//! which is why the whole record travels behind an `Arc` instead of living
//! in process globals.

use std::ffi::CStr;
use std::os::raw::c_void;

use ofx_sys::suites::*;
use ofx_sys::{OfxHost, OfxPropertySetHandle};

use crate::error::{Error, OfxResult};

/// Every suite fetched from the host, mandatory and optional.
pub struct Suites {
    host_props: OfxPropertySetHandle,
    property: *const OfxPropertySuiteV1,
    image_effect: *const OfxImageEffectSuiteV1,
    parameter: *const OfxParameterSuiteV1,
    memory: *const OfxMemorySuiteV1,
    multi_thread: *const OfxMultiThreadSuiteV1,
    message: *const OfxMessageSuiteV1,
    message_v2: *const OfxMessageSuiteV2,
    progress_v1: *const OfxProgressSuiteV1,
    progress_v2: *const OfxProgressSuiteV2,
    timeline: *const OfxTimeLineSuiteV1,
    parametric: *const OfxParametricParameterSuiteV1,
    interact: *const OfxInteractSuiteV1,
    opengl_render: *const OfxImageEffectOpenGLRenderSuiteV1,
}

// The suite tables are immutable host memory, valid for the lifetime of the
// load/unload bracket, and the host API requires its entry points to be
// callable from any thread it spawns.
unsafe impl Send for Suites {}
unsafe impl Sync for Suites {}

impl Suites {
    /// Fetches all suites from the host. A missing mandatory suite fails
    /// the load; missing optional suites are logged and degrade later calls.
    ///
    /// # Safety
    /// `host` must point to a live `OfxHost` whose suites outlive the
    /// returned value.
    pub unsafe fn fetch(host: *mut OfxHost) -> OfxResult<Suites> {
        if host.is_null() {
            return Err(Error::BadHandle);
        }
        let host = &*host;
        let fetch = host
            .fetch_suite
            .ok_or_else(|| Error::HostInadequate("host has no fetchSuite".into()))?;

        let mandatory = |name: &CStr, version| -> OfxResult<*const c_void> {
            let suite = fetch(host.host, name.as_ptr(), version);
            if suite.is_null() {
                Err(Error::HostInadequate(format!(
                    "host is missing the mandatory suite {:?} v{}",
                    name, version
                )))
            } else {
                Ok(suite)
            }
        };
        let optional = |name: &CStr, version| -> *const c_void {
            let suite = fetch(host.host, name.as_ptr(), version);
            if suite.is_null() {
                log::debug!("host does not provide {:?} v{}", name, version);
            }
            suite
        };

        Ok(Suites {
            host_props: host.host,
            property: mandatory(PROPERTY_SUITE, 1)? as _,
            image_effect: mandatory(IMAGE_EFFECT_SUITE, 1)? as _,
            parameter: mandatory(PARAMETER_SUITE, 1)? as _,
            memory: mandatory(MEMORY_SUITE, 1)? as _,
            multi_thread: mandatory(MULTI_THREAD_SUITE, 1)? as _,
            message: mandatory(MESSAGE_SUITE, 1)? as _,
            message_v2: optional(MESSAGE_SUITE, 2) as _,
            progress_v1: optional(PROGRESS_SUITE, 1) as _,
            progress_v2: optional(PROGRESS_SUITE, 2) as _,
            timeline: optional(TIME_LINE_SUITE, 1) as _,
            parametric: optional(PARAMETRIC_PARAMETER_SUITE, 1) as _,
            interact: optional(INTERACT_SUITE, 1) as _,
            opengl_render: optional(OPENGL_RENDER_SUITE, 1) as _,
        })
    }

    /// The host's root property set, read when building the host description.
    pub fn host_props(&self) -> OfxPropertySetHandle {
        self.host_props
    }

    pub fn property(&self) -> &OfxPropertySuiteV1 {
        unsafe { &*self.property }
    }

    pub fn image_effect(&self) -> &OfxImageEffectSuiteV1 {
        unsafe { &*self.image_effect }
    }

    pub fn parameter(&self) -> &OfxParameterSuiteV1 {
        unsafe { &*self.parameter }
    }

    pub fn memory(&self) -> &OfxMemorySuiteV1 {
        unsafe { &*self.memory }
    }

    pub fn multi_thread(&self) -> &OfxMultiThreadSuiteV1 {
        unsafe { &*self.multi_thread }
    }

    pub fn message(&self) -> &OfxMessageSuiteV1 {
        unsafe { &*self.message }
    }

    pub fn message_v2(&self) -> Option<&OfxMessageSuiteV2> {
        unsafe { self.message_v2.as_ref() }
    }

    pub fn progress_v1(&self) -> Option<&OfxProgressSuiteV1> {
        unsafe { self.progress_v1.as_ref() }
    }

    pub fn progress_v2(&self) -> Option<&OfxProgressSuiteV2> {
        unsafe { self.progress_v2.as_ref() }
    }

    pub fn timeline(&self) -> Option<&OfxTimeLineSuiteV1> {
        unsafe { self.timeline.as_ref() }
    }

    pub fn parametric(&self) -> Option<&OfxParametricParameterSuiteV1> {
        unsafe { self.parametric.as_ref() }
    }

    pub fn interact(&self) -> OfxResult<&OfxInteractSuiteV1> {
        unsafe { self.interact.as_ref() }
            .ok_or_else(|| Error::HostInadequate("host has no interact suite".into()))
    }

    pub fn opengl_render(&self) -> Option<&OfxImageEffectOpenGLRenderSuiteV1> {
        unsafe { self.opengl_render.as_ref() }
    }
}

/// Unwraps a single function slot of a suite, turning a null entry from a
/// partial host into a `HostInadequate` error.
macro_rules! suite_fn {
    ($suite:expr, $field:ident) => {
        $suite
            .$field
            .ok_or_else(|| $crate::error::Error::HostInadequate(stringify!($field).to_string()))
    };
}
pub(crate) use suite_fn;
