//! Property bags and the property suite the test host publishes.
//!
//! A bag is a name-to-values map behind a mutex; handles passed to the
//! plugin are plain pointers to these bags. Sets create missing entries
//! and grow on out-of-range indexes, gets on a missing name report
//! `kOfxStatErrUnknown`, mismatched types report `kOfxStatErrValue`.
//! Strings handed out through `propGetString` are kept alive in a cache
//! owned by the bag.

use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};
use std::sync::Mutex;

use ofx_sys::{status, OfxPropertySetHandle, OfxStatus};

#[derive(Debug, Clone)]
pub enum Value {
    Pointers(Vec<usize>),
    Ints(Vec<c_int>),
    Doubles(Vec<f64>),
    Strings(Vec<CString>),
}

#[derive(Default)]
pub struct PropSet {
    map: Mutex<HashMap<CString, Value>>,
    // Backing storage for pointers returned from prop_get_string.
    str_cache: Mutex<Vec<CString>>,
}

impl PropSet {
    pub fn new() -> PropSet {
        PropSet::default()
    }

    pub fn handle(&self) -> OfxPropertySetHandle {
        self as *const PropSet as OfxPropertySetHandle
    }

    /// # Safety
    /// `handle` must point at a live `PropSet`.
    pub unsafe fn from_handle<'a>(handle: OfxPropertySetHandle) -> Option<&'a PropSet> {
        (handle as *const PropSet).as_ref()
    }

    // ------------------------------------------------------------------
    // Host-side typed accessors, used to seed and inspect bags in tests.
    // ------------------------------------------------------------------

    pub fn put_ints(&self, name: &CStr, vals: &[c_int]) {
        self.map
            .lock()
            .unwrap()
            .insert(name.to_owned(), Value::Ints(vals.to_vec()));
    }

    pub fn put_doubles(&self, name: &CStr, vals: &[f64]) {
        self.map
            .lock()
            .unwrap()
            .insert(name.to_owned(), Value::Doubles(vals.to_vec()));
    }

    pub fn put_strings(&self, name: &CStr, vals: &[&CStr]) {
        self.map.lock().unwrap().insert(
            name.to_owned(),
            Value::Strings(vals.iter().map(|s| (*s).to_owned()).collect()),
        );
    }

    pub fn put_pointers(&self, name: &CStr, vals: &[*mut c_void]) {
        self.map.lock().unwrap().insert(
            name.to_owned(),
            Value::Pointers(vals.iter().map(|p| *p as usize).collect()),
        );
    }

    pub fn int(&self, name: &CStr, index: usize) -> Option<c_int> {
        match self.map.lock().unwrap().get(name) {
            Some(Value::Ints(v)) => v.get(index).copied(),
            _ => None,
        }
    }

    pub fn double(&self, name: &CStr, index: usize) -> Option<f64> {
        match self.map.lock().unwrap().get(name) {
            Some(Value::Doubles(v)) => v.get(index).copied(),
            _ => None,
        }
    }

    pub fn string(&self, name: &CStr, index: usize) -> Option<CString> {
        match self.map.lock().unwrap().get(name) {
            Some(Value::Strings(v)) => v.get(index).cloned(),
            _ => None,
        }
    }

    pub fn pointer(&self, name: &CStr, index: usize) -> Option<*mut c_void> {
        match self.map.lock().unwrap().get(name) {
            Some(Value::Pointers(v)) => v.get(index).map(|p| *p as *mut c_void),
            _ => None,
        }
    }

    pub fn len_of(&self, name: &CStr) -> Option<usize> {
        self.map.lock().unwrap().get(name).map(|v| match v {
            Value::Pointers(v) => v.len(),
            Value::Ints(v) => v.len(),
            Value::Doubles(v) => v.len(),
            Value::Strings(v) => v.len(),
        })
    }

    pub fn contains(&self, name: &CStr) -> bool {
        self.map.lock().unwrap().contains_key(name)
    }

    /// Copies every entry of `other` into this bag.
    pub fn absorb(&self, other: &PropSet) {
        let src = other.map.lock().unwrap();
        let mut dst = self.map.lock().unwrap();
        for (k, v) in src.iter() {
            dst.insert(k.clone(), v.clone());
        }
    }

    // Strings handed across the ABI must stay alive as long as this bag,
    // so the cache only ever grows. Bounded by the bag's lifetime, not
    // the process.
    fn cache_str(&self, s: &CString) -> *mut c_char {
        let mut cache = self.str_cache.lock().unwrap();
        cache.push(s.clone());
        // The CString's buffer is heap-allocated; growing the Vec does
        // not move it.
        cache.last().unwrap().as_ptr() as *mut c_char
    }
}

// ============================================================================
// Suite entry points
// ============================================================================

unsafe fn bag<'a>(handle: OfxPropertySetHandle) -> Result<&'a PropSet, OfxStatus> {
    PropSet::from_handle(handle).ok_or(status::ERR_BAD_HANDLE)
}

unsafe fn prop_name<'a>(name: *const c_char) -> Result<&'a CStr, OfxStatus> {
    if name.is_null() {
        return Err(status::ERR_UNKNOWN);
    }
    Ok(CStr::from_ptr(name))
}

macro_rules! try_stat {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(stat) => return stat,
        }
    };
}

fn set_at<T: Clone + Default>(vec: &mut Vec<T>, index: usize, value: T) {
    if index >= vec.len() {
        vec.resize(index + 1, T::default());
    }
    vec[index] = value;
}

macro_rules! prop_setter {
    ($fn_name:ident, $raw:ty, $variant:ident, $conv:expr) => {
        unsafe extern "C" fn $fn_name(
            handle: OfxPropertySetHandle,
            name: *const c_char,
            index: c_int,
            value: $raw,
        ) -> OfxStatus {
            let bag = try_stat!(bag(handle));
            let name = try_stat!(prop_name(name));
            if index < 0 {
                return status::ERR_BAD_INDEX;
            }
            #[allow(clippy::redundant_closure_call)]
            let value = match ($conv)(value) {
                Some(v) => v,
                None => return status::ERR_VALUE,
            };
            let mut map = bag.map.lock().unwrap();
            let entry = map
                .entry(name.to_owned())
                .or_insert_with(|| Value::$variant(Vec::new()));
            match entry {
                Value::$variant(v) => {
                    set_at(v, index as usize, value);
                    status::OK
                }
                _ => status::ERR_VALUE,
            }
        }
    };
}

prop_setter!(prop_set_pointer, *mut c_void, Pointers, |v: *mut c_void| Some(v as usize));
prop_setter!(prop_set_int, c_int, Ints, |v: c_int| Some(v));
prop_setter!(prop_set_double, f64, Doubles, |v: f64| Some(v));
prop_setter!(prop_set_string, *const c_char, Strings, |v: *const c_char| {
    if v.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(v) }.to_owned())
    }
});

macro_rules! prop_getter {
    ($fn_name:ident, $raw:ty, $variant:ident, $out:expr) => {
        unsafe extern "C" fn $fn_name(
            handle: OfxPropertySetHandle,
            name: *const c_char,
            index: c_int,
            value: *mut $raw,
        ) -> OfxStatus {
            let bag = try_stat!(bag(handle));
            let name = try_stat!(prop_name(name));
            if index < 0 || value.is_null() {
                return status::ERR_BAD_INDEX;
            }
            let map = bag.map.lock().unwrap();
            match map.get(name) {
                Some(Value::$variant(v)) => match v.get(index as usize) {
                    Some(x) => {
                        #[allow(clippy::redundant_closure_call)]
                        {
                            *value = ($out)(bag, x);
                        }
                        status::OK
                    }
                    None => status::ERR_BAD_INDEX,
                },
                Some(_) => status::ERR_VALUE,
                None => status::ERR_UNKNOWN,
            }
        }
    };
}

prop_getter!(prop_get_pointer, *mut c_void, Pointers, |_b: &PropSet, x: &usize| *x
    as *mut c_void);
prop_getter!(prop_get_int, c_int, Ints, |_b: &PropSet, x: &c_int| *x);
prop_getter!(prop_get_double, f64, Doubles, |_b: &PropSet, x: &f64| *x);
prop_getter!(prop_get_string, *mut c_char, Strings, |b: &PropSet, x: &CString| b
    .cache_str(x));

macro_rules! prop_n_setter {
    ($fn_name:ident, $raw:ty, $one:ident) => {
        unsafe extern "C" fn $fn_name(
            handle: OfxPropertySetHandle,
            name: *const c_char,
            count: c_int,
            values: *const $raw,
        ) -> OfxStatus {
            if count < 0 || (count > 0 && values.is_null()) {
                return status::ERR_BAD_INDEX;
            }
            for i in 0..count {
                let stat = $one(handle, name, i, *values.offset(i as isize));
                if stat != status::OK {
                    return stat;
                }
            }
            status::OK
        }
    };
}

prop_n_setter!(prop_set_pointer_n, *mut c_void, prop_set_pointer);
prop_n_setter!(prop_set_int_n, c_int, prop_set_int);
prop_n_setter!(prop_set_double_n, f64, prop_set_double);
prop_n_setter!(prop_set_string_n, *const c_char, prop_set_string);

macro_rules! prop_n_getter {
    ($fn_name:ident, $raw:ty, $one:ident) => {
        unsafe extern "C" fn $fn_name(
            handle: OfxPropertySetHandle,
            name: *const c_char,
            count: c_int,
            values: *mut $raw,
        ) -> OfxStatus {
            if count < 0 || (count > 0 && values.is_null()) {
                return status::ERR_BAD_INDEX;
            }
            for i in 0..count {
                let stat = $one(handle, name, i, values.offset(i as isize));
                if stat != status::OK {
                    return stat;
                }
            }
            status::OK
        }
    };
}

prop_n_getter!(prop_get_pointer_n, *mut c_void, prop_get_pointer);
prop_n_getter!(prop_get_int_n, c_int, prop_get_int);
prop_n_getter!(prop_get_double_n, f64, prop_get_double);
prop_n_getter!(prop_get_string_n, *mut c_char, prop_get_string);

unsafe extern "C" fn prop_reset(
    handle: OfxPropertySetHandle,
    name: *const c_char,
) -> OfxStatus {
    let bag = try_stat!(bag(handle));
    let name = try_stat!(prop_name(name));
    let mut map = bag.map.lock().unwrap();
    match map.get_mut(name) {
        Some(v) => {
            match v {
                Value::Pointers(v) => v.clear(),
                Value::Ints(v) => v.clear(),
                Value::Doubles(v) => v.clear(),
                Value::Strings(v) => v.clear(),
            }
            status::OK
        }
        None => status::ERR_UNKNOWN,
    }
}

unsafe extern "C" fn prop_get_dimension(
    handle: OfxPropertySetHandle,
    name: *const c_char,
    count: *mut c_int,
) -> OfxStatus {
    let bag = try_stat!(bag(handle));
    let name = try_stat!(prop_name(name));
    if count.is_null() {
        return status::ERR_BAD_INDEX;
    }
    match bag.len_of(name) {
        Some(n) => {
            *count = n as c_int;
            status::OK
        }
        None => status::ERR_UNKNOWN,
    }
}

pub static PROPERTY_SUITE_V1: ofx_sys::suites::OfxPropertySuiteV1 =
    ofx_sys::suites::OfxPropertySuiteV1 {
        prop_set_pointer: Some(prop_set_pointer),
        prop_set_string: Some(prop_set_string),
        prop_set_double: Some(prop_set_double),
        prop_set_int: Some(prop_set_int),
        prop_set_pointer_n: Some(prop_set_pointer_n),
        prop_set_string_n: Some(prop_set_string_n),
        prop_set_double_n: Some(prop_set_double_n),
        prop_set_int_n: Some(prop_set_int_n),
        prop_get_pointer: Some(prop_get_pointer),
        prop_get_string: Some(prop_get_string),
        prop_get_double: Some(prop_get_double),
        prop_get_int: Some(prop_get_int),
        prop_get_pointer_n: Some(prop_get_pointer_n),
        prop_get_string_n: Some(prop_get_string_n),
        prop_get_double_n: Some(prop_get_double_n),
        prop_get_int_n: Some(prop_get_int_n),
        prop_reset: Some(prop_reset),
        prop_get_dimension: Some(prop_get_dimension),
    };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips_through_the_suite() {
        let bag = PropSet::new();
        let name = c"TestProp";
        unsafe {
            assert_eq!(prop_set_int(bag.handle(), name.as_ptr(), 2, 7), status::OK);
            let mut out = 0;
            assert_eq!(prop_get_int(bag.handle(), name.as_ptr(), 2, &mut out), status::OK);
            assert_eq!(out, 7);
            // Indexes 0 and 1 were grown with defaults.
            assert_eq!(prop_get_int(bag.handle(), name.as_ptr(), 0, &mut out), status::OK);
            assert_eq!(out, 0);
        }
    }

    #[test]
    fn missing_names_and_wrong_types_report_distinct_errors() {
        let bag = PropSet::new();
        bag.put_doubles(c"D", &[1.0]);
        unsafe {
            let mut out = 0;
            assert_eq!(
                prop_get_int(bag.handle(), c"Nope".as_ptr(), 0, &mut out),
                status::ERR_UNKNOWN
            );
            assert_eq!(prop_get_int(bag.handle(), c"D".as_ptr(), 0, &mut out), status::ERR_VALUE);
        }
    }
}
