//! Host-side parameters: storage, linear-keyframe animation, and the
//! parameter suite. The variadic value accessors live in `shim.c`; the
//! `testhost_*` exports below are its callbacks into Rust.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_uint, c_void};
use std::sync::Mutex;

use ofx_sys::{
    prop, status, val, OfxParamHandle, OfxParamSetHandle, OfxPropertySetHandle, OfxRangeD,
    OfxStatus, OfxTime,
};

use crate::props::PropSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    Int,
    Double,
    String,
    None,
}

/// Arity and value class of each parameter type string.
fn classify(kind: &CStr) -> (ValueClass, usize) {
    if kind == val::PARAM_TYPE_INTEGER {
        (ValueClass::Int, 1)
    } else if kind == val::PARAM_TYPE_INTEGER_2D {
        (ValueClass::Int, 2)
    } else if kind == val::PARAM_TYPE_INTEGER_3D {
        (ValueClass::Int, 3)
    } else if kind == val::PARAM_TYPE_DOUBLE {
        (ValueClass::Double, 1)
    } else if kind == val::PARAM_TYPE_DOUBLE_2D {
        (ValueClass::Double, 2)
    } else if kind == val::PARAM_TYPE_DOUBLE_3D {
        (ValueClass::Double, 3)
    } else if kind == val::PARAM_TYPE_RGB {
        (ValueClass::Double, 3)
    } else if kind == val::PARAM_TYPE_RGBA {
        (ValueClass::Double, 4)
    } else if kind == val::PARAM_TYPE_BOOLEAN || kind == val::PARAM_TYPE_CHOICE {
        (ValueClass::Int, 1)
    } else if kind == val::PARAM_TYPE_STRING || kind == val::PARAM_TYPE_CUSTOM {
        (ValueClass::String, 1)
    } else {
        (ValueClass::None, 0)
    }
}

#[derive(Debug, Clone)]
pub enum Stored {
    Ints(Vec<c_int>),
    Doubles(Vec<f64>),
    Strings(Vec<CString>),
    None,
}

pub struct Param {
    pub name: CString,
    pub kind: CString,
    pub class: ValueClass,
    pub arity: usize,
    pub props: PropSet,
    pub value: Mutex<Stored>,
    /// Keyframes for numeric parameters, kept sorted by time.
    pub keys: Mutex<Vec<(OfxTime, Vec<f64>)>>,
    str_cache: Mutex<Vec<CString>>,
}

impl Param {
    pub fn new(name: &CStr, kind: &CStr) -> Box<Param> {
        let (class, arity) = classify(kind);
        let value = match class {
            ValueClass::Int => Stored::Ints(vec![0; arity]),
            ValueClass::Double => Stored::Doubles(vec![0.0; arity]),
            ValueClass::String => Stored::Strings(vec![CString::default()]),
            ValueClass::None => Stored::None,
        };
        let props = PropSet::new();
        props.put_strings(prop::TYPE, &[val::TYPE_PARAMETER]);
        props.put_strings(prop::NAME, &[name]);
        props.put_strings(prop::PARAM_TYPE, &[kind]);
        props.put_strings(prop::LABEL, &[name]);
        props.put_ints(prop::PARAM_ENABLED, &[1]);
        props.put_ints(prop::PARAM_SECRET, &[0]);
        props.put_ints(
            prop::PARAM_ANIMATES,
            &[(class == ValueClass::Int || class == ValueClass::Double) as c_int],
        );
        Box::new(Param {
            name: name.to_owned(),
            kind: kind.to_owned(),
            class,
            arity,
            props,
            value: Mutex::new(value),
            keys: Mutex::new(Vec::new()),
            str_cache: Mutex::new(Vec::new()),
        })
    }

    pub fn handle(&self) -> OfxParamHandle {
        self as *const Param as OfxParamHandle
    }

    unsafe fn from_handle<'a>(handle: *mut c_void) -> Option<&'a Param> {
        (handle as *const Param).as_ref()
    }

    /// A fresh parameter seeded from this one's declared default.
    pub fn instantiate(&self) -> Box<Param> {
        let p = Param::new(&self.name, &self.kind);
        p.props.absorb(&self.props);
        let mut value = p.value.lock().unwrap();
        match (&mut *value, self.class) {
            (Stored::Ints(v), ValueClass::Int) => {
                for (i, slot) in v.iter_mut().enumerate() {
                    if let Some(d) = self.props.int(prop::PARAM_DEFAULT, i) {
                        *slot = d;
                    }
                }
            }
            (Stored::Doubles(v), ValueClass::Double) => {
                for (i, slot) in v.iter_mut().enumerate() {
                    if let Some(d) = self.props.double(prop::PARAM_DEFAULT, i) {
                        *slot = d;
                    }
                }
            }
            (Stored::Strings(v), ValueClass::String) => {
                if let Some(d) = self.props.string(prop::PARAM_DEFAULT, 0) {
                    v[0] = d;
                }
            }
            _ => {}
        }
        drop(value);
        p
    }

    /// Host-side helper: install a numeric keyframe.
    pub fn add_key(&self, time: OfxTime, values: Vec<f64>) {
        let mut keys = self.keys.lock().unwrap();
        match keys.binary_search_by(|(t, _)| t.partial_cmp(&time).unwrap()) {
            Ok(i) => keys[i] = (time, values),
            Err(i) => keys.insert(i, (time, values)),
        }
    }

    /// Linear interpolation over the keyframes, clamped at the ends;
    /// falls back to the static value with no keys.
    pub fn eval(&self, dim: usize, time: OfxTime) -> f64 {
        let keys = self.keys.lock().unwrap();
        if keys.is_empty() {
            return match &*self.value.lock().unwrap() {
                Stored::Doubles(v) => v.get(dim).copied().unwrap_or(0.0),
                Stored::Ints(v) => v.get(dim).copied().unwrap_or(0) as f64,
                _ => 0.0,
            };
        }
        let at = |k: &(OfxTime, Vec<f64>)| k.1.get(dim).copied().unwrap_or(0.0);
        if time <= keys[0].0 {
            return at(&keys[0]);
        }
        if time >= keys[keys.len() - 1].0 {
            return at(&keys[keys.len() - 1]);
        }
        let i = keys.partition_point(|(t, _)| *t <= time);
        let (t0, t1) = (&keys[i - 1], &keys[i]);
        let f = (time - t0.0) / (t1.0 - t0.0);
        at(t0) + f * (at(t1) - at(t0))
    }

    /// Slope of the keyframe segment containing `time`, zero outside.
    pub fn slope(&self, dim: usize, time: OfxTime) -> f64 {
        let keys = self.keys.lock().unwrap();
        if keys.len() < 2 || time < keys[0].0 || time > keys[keys.len() - 1].0 {
            return 0.0;
        }
        let i = keys.partition_point(|(t, _)| *t <= time).clamp(1, keys.len() - 1);
        let (t0, t1) = (&keys[i - 1], &keys[i]);
        let at = |k: &(OfxTime, Vec<f64>)| k.1.get(dim).copied().unwrap_or(0.0);
        (at(t1) - at(t0)) / (t1.0 - t0.0)
    }

    /// Integral of the piecewise-linear curve over [t1, t2], by the
    /// trapezoid rule over a fine sampling.
    pub fn integral(&self, dim: usize, t1: OfxTime, t2: OfxTime) -> f64 {
        if t2 <= t1 {
            return 0.0;
        }
        const STEPS: usize = 1024;
        let dt = (t2 - t1) / STEPS as f64;
        let mut acc = 0.0;
        for i in 0..STEPS {
            let a = self.eval(dim, t1 + i as f64 * dt);
            let b = self.eval(dim, t1 + (i + 1) as f64 * dt);
            acc += 0.5 * (a + b) * dt;
        }
        acc
    }

    // Strings handed across the ABI must stay alive as long as this
    // parameter, so the cache only ever grows. Bounded by the parameter's
    // lifetime, not the process.
    fn cache_str(&self, s: &CString) -> *mut c_char {
        let mut cache = self.str_cache.lock().unwrap();
        cache.push(s.clone());
        cache.last().unwrap().as_ptr() as *mut c_char
    }
}

/// The parameter set of a descriptor or an instance.
#[derive(Default)]
pub struct ParamSetObj {
    pub props: PropSet,
    pub params: Mutex<Vec<Box<Param>>>,
}

impl ParamSetObj {
    pub fn handle(&self) -> OfxParamSetHandle {
        self as *const ParamSetObj as OfxParamSetHandle
    }

    unsafe fn from_handle<'a>(handle: OfxParamSetHandle) -> Option<&'a ParamSetObj> {
        (handle as *const ParamSetObj).as_ref()
    }

    pub fn find(&self, name: &CStr) -> Option<*const Param> {
        self.params
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name.as_c_str() == name)
            .map(|p| p.as_ref() as *const Param)
    }

    /// Instance set cloned from a descriptor's declarations.
    pub fn instantiate(&self) -> ParamSetObj {
        let out = ParamSetObj::default();
        out.props.absorb(&self.props);
        let mut params = out.params.lock().unwrap();
        for p in self.params.lock().unwrap().iter() {
            params.push(p.instantiate());
        }
        drop(params);
        out
    }
}

// ============================================================================
// Shim callbacks
// ============================================================================

#[no_mangle]
pub extern "C" fn testhost_param_arity(param: *mut c_void) -> c_int {
    unsafe { Param::from_handle(param) }.map_or(0, |p| p.arity as c_int)
}

#[no_mangle]
pub extern "C" fn testhost_param_class(param: *mut c_void) -> c_int {
    match unsafe { Param::from_handle(param) }.map(|p| p.class) {
        Some(ValueClass::Int) => 0,
        Some(ValueClass::Double) => 1,
        Some(ValueClass::String) => 2,
        _ => -1,
    }
}

/// # Safety
/// Called from the C shim with `outs` holding `n` out-pointers of the
/// parameter's value class.
#[no_mangle]
pub unsafe extern "C" fn testhost_param_get(
    param: *mut c_void,
    at_time: c_int,
    time: f64,
    outs: *mut *mut c_void,
    n: c_int,
) -> OfxStatus {
    let p = match Param::from_handle(param) {
        Some(p) => p,
        None => return status::ERR_BAD_HANDLE,
    };
    let outs = std::slice::from_raw_parts(outs, n as usize);
    match p.class {
        ValueClass::Int => {
            let value = p.value.lock().unwrap();
            if let Stored::Ints(v) = &*value {
                for (i, out) in outs.iter().enumerate() {
                    *(*out as *mut c_int) = v.get(i).copied().unwrap_or(0);
                }
            }
        }
        ValueClass::Double => {
            let animated = at_time != 0 && !p.keys.lock().unwrap().is_empty();
            if animated {
                for (i, out) in outs.iter().enumerate() {
                    *(*out as *mut f64) = p.eval(i, time);
                }
            } else {
                let value = p.value.lock().unwrap();
                if let Stored::Doubles(v) = &*value {
                    for (i, out) in outs.iter().enumerate() {
                        *(*out as *mut f64) = v.get(i).copied().unwrap_or(0.0);
                    }
                }
            }
        }
        ValueClass::String => {
            let value = p.value.lock().unwrap();
            if let Stored::Strings(v) = &*value {
                let s = v.first().cloned().unwrap_or_default();
                *(outs[0] as *mut *mut c_char) = p.cache_str(&s);
            }
        }
        ValueClass::None => return status::ERR_BAD_HANDLE,
    }
    status::OK
}

#[no_mangle]
pub unsafe extern "C" fn testhost_param_set_ints(
    param: *mut c_void,
    _at_time: c_int,
    _time: f64,
    vals: *const c_int,
    n: c_int,
) -> OfxStatus {
    let p = match Param::from_handle(param) {
        Some(p) => p,
        None => return status::ERR_BAD_HANDLE,
    };
    let vals = std::slice::from_raw_parts(vals, n as usize);
    *p.value.lock().unwrap() = Stored::Ints(vals.to_vec());
    status::OK
}

#[no_mangle]
pub unsafe extern "C" fn testhost_param_set_doubles(
    param: *mut c_void,
    at_time: c_int,
    time: f64,
    vals: *const f64,
    n: c_int,
) -> OfxStatus {
    let p = match Param::from_handle(param) {
        Some(p) => p,
        None => return status::ERR_BAD_HANDLE,
    };
    let vals = std::slice::from_raw_parts(vals, n as usize);
    if at_time != 0 {
        p.add_key(time, vals.to_vec());
    } else {
        *p.value.lock().unwrap() = Stored::Doubles(vals.to_vec());
    }
    status::OK
}

#[no_mangle]
pub unsafe extern "C" fn testhost_param_set_string(
    param: *mut c_void,
    _at_time: c_int,
    _time: f64,
    v: *const c_char,
) -> OfxStatus {
    let p = match Param::from_handle(param) {
        Some(p) => p,
        None => return status::ERR_BAD_HANDLE,
    };
    if v.is_null() {
        return status::ERR_VALUE;
    }
    *p.value.lock().unwrap() = Stored::Strings(vec![CStr::from_ptr(v).to_owned()]);
    status::OK
}

#[no_mangle]
pub unsafe extern "C" fn testhost_param_derivative(
    param: *mut c_void,
    time: f64,
    outs: *mut *mut f64,
    n: c_int,
) -> OfxStatus {
    let p = match Param::from_handle(param) {
        Some(p) => p,
        None => return status::ERR_BAD_HANDLE,
    };
    if p.class != ValueClass::Double {
        return status::ERR_UNSUPPORTED;
    }
    let outs = std::slice::from_raw_parts(outs, n as usize);
    for (i, out) in outs.iter().enumerate() {
        **out = p.slope(i, time);
    }
    status::OK
}

#[no_mangle]
pub unsafe extern "C" fn testhost_param_integral(
    param: *mut c_void,
    t1: f64,
    t2: f64,
    outs: *mut *mut f64,
    n: c_int,
) -> OfxStatus {
    let p = match Param::from_handle(param) {
        Some(p) => p,
        None => return status::ERR_BAD_HANDLE,
    };
    if p.class != ValueClass::Double {
        return status::ERR_UNSUPPORTED;
    }
    let outs = std::slice::from_raw_parts(outs, n as usize);
    for (i, out) in outs.iter().enumerate() {
        **out = p.integral(i, t1, t2);
    }
    status::OK
}

// ============================================================================
// Non-variadic suite entry points
// ============================================================================

unsafe extern "C" fn param_define(
    param_set: OfxParamSetHandle,
    param_type: *const c_char,
    name: *const c_char,
    props: *mut OfxPropertySetHandle,
) -> OfxStatus {
    let set = match ParamSetObj::from_handle(param_set) {
        Some(s) => s,
        None => return status::ERR_BAD_HANDLE,
    };
    if param_type.is_null() || name.is_null() {
        return status::ERR_VALUE;
    }
    let name = CStr::from_ptr(name);
    if set.find(name).is_some() {
        return status::ERR_EXISTS;
    }
    let param = Param::new(name, CStr::from_ptr(param_type));
    if !props.is_null() {
        *props = param.props.handle();
    }
    set.params.lock().unwrap().push(param);
    status::OK
}

unsafe extern "C" fn param_get_handle(
    param_set: OfxParamSetHandle,
    name: *const c_char,
    param: *mut OfxParamHandle,
    props: *mut OfxPropertySetHandle,
) -> OfxStatus {
    let set = match ParamSetObj::from_handle(param_set) {
        Some(s) => s,
        None => return status::ERR_BAD_HANDLE,
    };
    if name.is_null() || param.is_null() {
        return status::ERR_VALUE;
    }
    match set.find(CStr::from_ptr(name)) {
        Some(p) => {
            *param = p as OfxParamHandle;
            if !props.is_null() {
                *props = (*p).props.handle();
            }
            status::OK
        }
        None => status::ERR_UNKNOWN,
    }
}

unsafe extern "C" fn param_set_get_property_set(
    param_set: OfxParamSetHandle,
    props: *mut OfxPropertySetHandle,
) -> OfxStatus {
    let set = match ParamSetObj::from_handle(param_set) {
        Some(s) => s,
        None => return status::ERR_BAD_HANDLE,
    };
    if props.is_null() {
        return status::ERR_VALUE;
    }
    *props = set.props.handle();
    status::OK
}

unsafe extern "C" fn param_get_property_set(
    param: OfxParamHandle,
    props: *mut OfxPropertySetHandle,
) -> OfxStatus {
    let p = match Param::from_handle(param as *mut c_void) {
        Some(p) => p,
        None => return status::ERR_BAD_HANDLE,
    };
    if props.is_null() {
        return status::ERR_VALUE;
    }
    *props = p.props.handle();
    status::OK
}

unsafe extern "C" fn param_get_num_keys(
    param: OfxParamHandle,
    number_of_keys: *mut c_uint,
) -> OfxStatus {
    let p = match Param::from_handle(param as *mut c_void) {
        Some(p) => p,
        None => return status::ERR_BAD_HANDLE,
    };
    *number_of_keys = p.keys.lock().unwrap().len() as c_uint;
    status::OK
}

unsafe extern "C" fn param_get_key_time(
    param: OfxParamHandle,
    nth_key: c_uint,
    time: *mut OfxTime,
) -> OfxStatus {
    let p = match Param::from_handle(param as *mut c_void) {
        Some(p) => p,
        None => return status::ERR_BAD_HANDLE,
    };
    match p.keys.lock().unwrap().get(nth_key as usize) {
        Some((t, _)) => {
            *time = *t;
            status::OK
        }
        None => status::ERR_BAD_INDEX,
    }
}

unsafe extern "C" fn param_get_key_index(
    param: OfxParamHandle,
    time: OfxTime,
    direction: c_int,
    index: *mut c_int,
) -> OfxStatus {
    let p = match Param::from_handle(param as *mut c_void) {
        Some(p) => p,
        None => return status::ERR_BAD_HANDLE,
    };
    let keys = p.keys.lock().unwrap();
    // Backward means at or before the probe time.
    let found = if direction < 0 {
        keys.iter().rposition(|(t, _)| *t <= time)
    } else if direction > 0 {
        keys.iter().position(|(t, _)| *t > time)
    } else {
        keys.iter().position(|(t, _)| (*t - time).abs() < 1e-9)
    };
    match found {
        Some(i) => {
            *index = i as c_int;
            status::OK
        }
        None => status::FAILED,
    }
}

unsafe extern "C" fn param_delete_key(param: OfxParamHandle, time: OfxTime) -> OfxStatus {
    let p = match Param::from_handle(param as *mut c_void) {
        Some(p) => p,
        None => return status::ERR_BAD_HANDLE,
    };
    let mut keys = p.keys.lock().unwrap();
    let before = keys.len();
    keys.retain(|(t, _)| (*t - time).abs() >= 1e-9);
    if keys.len() == before {
        status::FAILED
    } else {
        status::OK
    }
}

unsafe extern "C" fn param_delete_all_keys(param: OfxParamHandle) -> OfxStatus {
    let p = match Param::from_handle(param as *mut c_void) {
        Some(p) => p,
        None => return status::ERR_BAD_HANDLE,
    };
    p.keys.lock().unwrap().clear();
    status::OK
}

unsafe extern "C" fn param_copy(
    param_to: OfxParamHandle,
    param_from: OfxParamHandle,
    dst_offset: OfxTime,
    frame_range: *const OfxRangeD,
) -> OfxStatus {
    let (to, from) = match (
        Param::from_handle(param_to as *mut c_void),
        Param::from_handle(param_from as *mut c_void),
    ) {
        (Some(a), Some(b)) => (a, b),
        _ => return status::ERR_BAD_HANDLE,
    };
    if to.kind != from.kind {
        return status::ERR_VALUE;
    }
    *to.value.lock().unwrap() = from.value.lock().unwrap().clone();
    let src_keys = from.keys.lock().unwrap().clone();
    let mut dst_keys = to.keys.lock().unwrap();
    dst_keys.clear();
    for (t, v) in src_keys {
        if !frame_range.is_null() {
            let range = &*frame_range;
            if t < range.min || t > range.max {
                continue;
            }
        }
        dst_keys.push((t + dst_offset, v));
    }
    status::OK
}

unsafe extern "C" fn param_edit_begin(
    param_set: OfxParamSetHandle,
    _name: *const c_char,
) -> OfxStatus {
    if ParamSetObj::from_handle(param_set).is_none() {
        return status::ERR_BAD_HANDLE;
    }
    status::OK
}

unsafe extern "C" fn param_edit_end(param_set: OfxParamSetHandle) -> OfxStatus {
    if ParamSetObj::from_handle(param_set).is_none() {
        return status::ERR_BAD_HANDLE;
    }
    status::OK
}

extern "C" {
    fn testhost_shim_param_get_value(param: OfxParamHandle, ...) -> OfxStatus;
    fn testhost_shim_param_get_value_at_time(param: OfxParamHandle, time: OfxTime, ...)
        -> OfxStatus;
    fn testhost_shim_param_set_value(param: OfxParamHandle, ...) -> OfxStatus;
    fn testhost_shim_param_set_value_at_time(param: OfxParamHandle, time: OfxTime, ...)
        -> OfxStatus;
    fn testhost_shim_param_get_derivative(param: OfxParamHandle, time: OfxTime, ...) -> OfxStatus;
    fn testhost_shim_param_get_integral(
        param: OfxParamHandle,
        time1: OfxTime,
        time2: OfxTime,
        ...
    ) -> OfxStatus;
}

pub static PARAMETER_SUITE_V1: ofx_sys::suites::OfxParameterSuiteV1 =
    ofx_sys::suites::OfxParameterSuiteV1 {
        param_define: Some(param_define),
        param_get_handle: Some(param_get_handle),
        param_set_get_property_set: Some(param_set_get_property_set),
        param_get_property_set: Some(param_get_property_set),
        param_get_value: Some(testhost_shim_param_get_value),
        param_get_value_at_time: Some(testhost_shim_param_get_value_at_time),
        param_get_derivative: Some(testhost_shim_param_get_derivative),
        param_get_integral: Some(testhost_shim_param_get_integral),
        param_set_value: Some(testhost_shim_param_set_value),
        param_set_value_at_time: Some(testhost_shim_param_set_value_at_time),
        param_get_num_keys: Some(param_get_num_keys),
        param_get_key_time: Some(param_get_key_time),
        param_get_key_index: Some(param_get_key_index),
        param_delete_key: Some(param_delete_key),
        param_delete_all_keys: Some(param_delete_all_keys),
        param_copy: Some(param_copy),
        param_edit_begin: Some(param_edit_begin),
        param_edit_end: Some(param_edit_end),
    };

#[cfg(test)]
mod tests {
    use super::*;

    fn animated_double() -> Box<Param> {
        let p = Param::new(c"gain", val::PARAM_TYPE_DOUBLE);
        p.add_key(0.0, vec![0.5]);
        p.add_key(10.0, vec![1.5]);
        p
    }

    #[test]
    fn linear_interpolation_between_keys() {
        let p = animated_double();
        assert!((p.eval(0, 5.0) - 1.0).abs() < 1e-9);
        assert!((p.eval(0, 0.0) - 0.5).abs() < 1e-9);
        // Clamped outside the key range.
        assert!((p.eval(0, 20.0) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn slope_and_integral_match_the_line() {
        let p = animated_double();
        assert!((p.slope(0, 5.0) - 0.1).abs() < 1e-9);
        assert!((p.integral(0, 0.0, 10.0) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn key_enumeration_counts_orders_and_searches() {
        let p = animated_double();
        p.add_key(5.0, vec![1.0]);
        let h = p.handle();
        unsafe {
            let mut n: c_uint = 0;
            assert_eq!(param_get_num_keys(h, &mut n), status::OK);
            assert_eq!(n, 3);

            let mut prev = f64::NEG_INFINITY;
            for i in 0..n {
                let mut t: OfxTime = 0.0;
                assert_eq!(param_get_key_time(h, i, &mut t), status::OK);
                assert!(t > prev);
                prev = t;
            }
            let mut t: OfxTime = 0.0;
            assert_eq!(param_get_key_time(h, 3, &mut t), status::ERR_BAD_INDEX);

            // Backward finds a key exactly at the probe time, forward
            // is strictly after, exact needs a key at the time.
            let mut index: c_int = -1;
            assert_eq!(param_get_key_index(h, 5.0, -1, &mut index), status::OK);
            assert_eq!(index, 1);
            assert_eq!(param_get_key_index(h, 5.0, 1, &mut index), status::OK);
            assert_eq!(index, 2);
            assert_eq!(param_get_key_index(h, 5.0, 0, &mut index), status::OK);
            assert_eq!(index, 1);
            assert_eq!(param_get_key_index(h, -1.0, -1, &mut index), status::FAILED);
            assert_eq!(param_get_key_index(h, 10.0, 1, &mut index), status::FAILED);
        }
    }

    #[test]
    fn instantiate_seeds_from_declared_default() {
        let desc = Param::new(c"radius", val::PARAM_TYPE_DOUBLE);
        desc.props.put_doubles(prop::PARAM_DEFAULT, &[2.5]);
        let inst = desc.instantiate();
        match &*inst.value.lock().unwrap() {
            Stored::Doubles(v) => assert!((v[0] - 2.5).abs() < 1e-9),
            other => panic!("wrong storage: {:?}", other),
        };
    }
}
