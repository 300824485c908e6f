//! The property bag.
//!
//! All data the host and plugin exchange crosses the boundary as named,
//! typed, multi-valued properties on opaque handles. [`PropertySet`] wraps
//! one handle together with the property suite; it never owns the handle,
//! whose lifetime belongs to the object the host attached it to.
//!
//! Calls return `OfxResult`; callers that can live without a property a
//! given host may not know (anything introduced after API 1.0) discard the
//! error with `.ok()`.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};
use std::sync::Arc;

use ofx_sys::OfxPropertySetHandle;

use crate::error::{status_to_result, Error, OfxResult};
use crate::suites::{suite_fn, Suites};

#[derive(Clone)]
pub struct PropertySet {
    handle: OfxPropertySetHandle,
    suites: Arc<Suites>,
}

impl PropertySet {
    pub fn new(handle: OfxPropertySetHandle, suites: Arc<Suites>) -> Self {
        Self { handle, suites }
    }

    pub fn handle(&self) -> OfxPropertySetHandle {
        self.handle
    }

    pub fn is_null(&self) -> bool {
        self.handle.is_null()
    }

    pub(crate) fn suites(&self) -> &Arc<Suites> {
        &self.suites
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    pub fn set_pointer(&self, name: &CStr, value: *mut c_void) -> OfxResult<()> {
        self.set_pointer_at(name, 0, value)
    }

    pub fn set_pointer_at(&self, name: &CStr, index: usize, value: *mut c_void) -> OfxResult<()> {
        let f = suite_fn!(self.suites.property(), prop_set_pointer)?;
        let stat = unsafe { f(self.handle, name.as_ptr(), index as c_int, value) };
        status_to_result(stat, name)
    }

    pub fn set_int(&self, name: &CStr, value: i32) -> OfxResult<()> {
        self.set_int_at(name, 0, value)
    }

    pub fn set_int_at(&self, name: &CStr, index: usize, value: i32) -> OfxResult<()> {
        let f = suite_fn!(self.suites.property(), prop_set_int)?;
        let stat = unsafe { f(self.handle, name.as_ptr(), index as c_int, value) };
        status_to_result(stat, name)
    }

    pub fn set_double(&self, name: &CStr, value: f64) -> OfxResult<()> {
        self.set_double_at(name, 0, value)
    }

    pub fn set_double_at(&self, name: &CStr, index: usize, value: f64) -> OfxResult<()> {
        let f = suite_fn!(self.suites.property(), prop_set_double)?;
        let stat = unsafe { f(self.handle, name.as_ptr(), index as c_int, value) };
        status_to_result(stat, name)
    }

    /// Contiguous write of all indices at once.
    pub fn set_double_n(&self, name: &CStr, values: &[f64]) -> OfxResult<()> {
        let f = suite_fn!(self.suites.property(), prop_set_double_n)?;
        let stat =
            unsafe { f(self.handle, name.as_ptr(), values.len() as c_int, values.as_ptr()) };
        status_to_result(stat, name)
    }

    pub fn set_cstr(&self, name: &CStr, value: &CStr) -> OfxResult<()> {
        self.set_cstr_at(name, 0, value)
    }

    pub fn set_cstr_at(&self, name: &CStr, index: usize, value: &CStr) -> OfxResult<()> {
        let f = suite_fn!(self.suites.property(), prop_set_string)?;
        let stat = unsafe { f(self.handle, name.as_ptr(), index as c_int, value.as_ptr()) };
        status_to_result(stat, name)
    }

    pub fn set_string(&self, name: &CStr, value: &str) -> OfxResult<()> {
        self.set_string_at(name, 0, value)
    }

    pub fn set_string_at(&self, name: &CStr, index: usize, value: &str) -> OfxResult<()> {
        let value = CString::new(value)
            .map_err(|_| Error::PropertyValueIllegalToHost(name.to_string_lossy().into_owned()))?;
        self.set_cstr_at(name, index, &value)
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    pub fn get_pointer(&self, name: &CStr) -> OfxResult<*mut c_void> {
        self.get_pointer_at(name, 0)
    }

    pub fn get_pointer_at(&self, name: &CStr, index: usize) -> OfxResult<*mut c_void> {
        let f = suite_fn!(self.suites.property(), prop_get_pointer)?;
        let mut value: *mut c_void = std::ptr::null_mut();
        let stat = unsafe { f(self.handle, name.as_ptr(), index as c_int, &mut value) };
        status_to_result(stat, name)?;
        Ok(value)
    }

    pub fn get_int(&self, name: &CStr) -> OfxResult<i32> {
        self.get_int_at(name, 0)
    }

    pub fn get_int_at(&self, name: &CStr, index: usize) -> OfxResult<i32> {
        let f = suite_fn!(self.suites.property(), prop_get_int)?;
        let mut value: c_int = 0;
        let stat = unsafe { f(self.handle, name.as_ptr(), index as c_int, &mut value) };
        status_to_result(stat, name)?;
        Ok(value)
    }

    pub fn get_bool(&self, name: &CStr) -> OfxResult<bool> {
        Ok(self.get_int(name)? != 0)
    }

    pub fn get_double(&self, name: &CStr) -> OfxResult<f64> {
        self.get_double_at(name, 0)
    }

    pub fn get_double_at(&self, name: &CStr, index: usize) -> OfxResult<f64> {
        let f = suite_fn!(self.suites.property(), prop_get_double)?;
        let mut value = 0.0f64;
        let stat = unsafe { f(self.handle, name.as_ptr(), index as c_int, &mut value) };
        status_to_result(stat, name)?;
        Ok(value)
    }

    /// Owned copy of a string property. The host's pointer is only valid
    /// until the next suite call, so the copy is taken immediately.
    pub fn get_cstring(&self, name: &CStr) -> OfxResult<CString> {
        self.get_cstring_at(name, 0)
    }

    pub fn get_cstring_at(&self, name: &CStr, index: usize) -> OfxResult<CString> {
        let f = suite_fn!(self.suites.property(), prop_get_string)?;
        let mut value: *mut c_char = std::ptr::null_mut();
        let stat = unsafe { f(self.handle, name.as_ptr(), index as c_int, &mut value) };
        status_to_result(stat, name)?;
        if value.is_null() {
            return Ok(CString::default());
        }
        Ok(unsafe { CStr::from_ptr(value) }.to_owned())
    }

    pub fn get_string(&self, name: &CStr) -> OfxResult<String> {
        self.get_string_at(name, 0)
    }

    pub fn get_string_at(&self, name: &CStr, index: usize) -> OfxResult<String> {
        Ok(self.get_cstring_at(name, index)?.to_string_lossy().into_owned())
    }

    // ------------------------------------------------------------------
    // Dimension and reset
    // ------------------------------------------------------------------

    /// The number of values the property currently holds. Always >= 0.
    pub fn dimension(&self, name: &CStr) -> OfxResult<usize> {
        let f = suite_fn!(self.suites.property(), prop_get_dimension)?;
        let mut count: c_int = 0;
        let stat = unsafe { f(self.handle, name.as_ptr(), &mut count) };
        status_to_result(stat, name)?;
        Ok(count.max(0) as usize)
    }

    /// Where the next appended value of a plugin-created array property
    /// goes. A name the bag has never seen counts as empty, since some
    /// hosts only materialize array properties on first write.
    pub fn append_index(&self, name: &CStr) -> OfxResult<usize> {
        match self.dimension(name) {
            Err(Error::PropertyUnknownToHost(_)) => Ok(0),
            other => other,
        }
    }

    pub fn reset(&self, name: &CStr) -> OfxResult<()> {
        let f = suite_fn!(self.suites.property(), prop_reset)?;
        let stat = unsafe { f(self.handle, name.as_ptr()) };
        status_to_result(stat, name)
    }
}
