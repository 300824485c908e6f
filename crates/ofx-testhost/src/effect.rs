//! Effect, clip and image objects published by the test host, plus the
//! image-effect suite over them.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use ofx_sys::{
    prop, status, val, OfxImageClipHandle, OfxImageEffectHandle, OfxImageMemoryHandle,
    OfxParamSetHandle, OfxPropertySetHandle, OfxRectD, OfxStatus, OfxTime,
};

use crate::param::ParamSetObj;
use crate::props::PropSet;

/// A clip with a float pixel buffer the host owns.
pub struct ClipObj {
    pub name: CString,
    pub props: PropSet,
    /// (width, height, components per pixel).
    pub dims: Mutex<(c_int, c_int, usize)>,
    pub pixels: Mutex<Vec<f32>>,
}

impl ClipObj {
    pub fn new(name: &CStr) -> Box<ClipObj> {
        let props = PropSet::new();
        props.put_strings(prop::TYPE, &[val::TYPE_CLIP]);
        props.put_strings(prop::NAME, &[name]);
        props.put_ints(prop::CLIP_CONNECTED, &[1]);
        props.put_ints(prop::CLIP_OPTIONAL, &[0]);
        props.put_ints(prop::CLIP_IS_MASK, &[0]);
        props.put_strings(prop::PIXEL_DEPTH, &[val::BIT_DEPTH_FLOAT]);
        props.put_strings(prop::CLIP_UNMAPPED_PIXEL_DEPTH, &[val::BIT_DEPTH_FLOAT]);
        props.put_strings(prop::COMPONENTS, &[val::COMPONENT_RGBA]);
        props.put_strings(prop::CLIP_UNMAPPED_COMPONENTS, &[val::COMPONENT_RGBA]);
        props.put_strings(prop::PRE_MULTIPLICATION, &[val::IMAGE_PRE_MULTIPLIED]);
        props.put_doubles(prop::CLIP_PIXEL_ASPECT_RATIO, &[1.0]);
        props.put_doubles(prop::FRAME_RATE, &[24.0]);
        props.put_doubles(prop::UNMAPPED_FRAME_RATE, &[24.0]);
        props.put_doubles(prop::FRAME_RANGE, &[0.0, 100.0]);
        props.put_doubles(prop::UNMAPPED_FRAME_RANGE, &[0.0, 100.0]);
        props.put_strings(prop::CLIP_FIELD_ORDER, &[val::FIELD_NONE]);
        props.put_ints(prop::CONTINUOUS_SAMPLES, &[0]);
        props.put_ints(prop::FRAME_VARYING, &[0]);
        Box::new(ClipObj {
            name: name.to_owned(),
            props,
            dims: Mutex::new((0, 0, 4)),
            pixels: Mutex::new(Vec::new()),
        })
    }

    pub fn handle(&self) -> OfxImageClipHandle {
        self as *const ClipObj as OfxImageClipHandle
    }

    unsafe fn from_handle<'a>(handle: OfxImageClipHandle) -> Option<&'a ClipObj> {
        (handle as *const ClipObj).as_ref()
    }

    /// Allocates the clip's frame buffer, zero filled. The buffer stays
    /// put until the next `set_frame`, so images handed out remain valid.
    pub fn set_frame(&self, width: c_int, height: c_int, components: usize) {
        *self.dims.lock().unwrap() = (width, height, components);
        let mut pixels = self.pixels.lock().unwrap();
        pixels.clear();
        pixels.resize(width as usize * height as usize * components, 0.0);
    }

    pub fn fill(&self, value: f32) {
        for px in self.pixels.lock().unwrap().iter_mut() {
            *px = value;
        }
    }

    pub fn region_of_definition(&self) -> OfxRectD {
        let (w, h, _) = *self.dims.lock().unwrap();
        OfxRectD {
            x1: 0.0,
            y1: 0.0,
            x2: w as f64,
            y2: h as f64,
        }
    }

    fn make_image(&self, time: OfxTime) -> Option<Box<PropSet>> {
        let (w, h, ncomp) = *self.dims.lock().unwrap();
        if w <= 0 || h <= 0 {
            return None;
        }
        let data = self.pixels.lock().unwrap().as_mut_ptr();
        let bounds = [0, 0, w, h];
        let components = match ncomp {
            1 => val::COMPONENT_ALPHA,
            3 => val::COMPONENT_RGB,
            _ => val::COMPONENT_RGBA,
        };
        let image = Box::new(PropSet::new());
        image.put_strings(prop::TYPE, &[val::TYPE_IMAGE]);
        image.put_pointers(prop::IMAGE_DATA, &[data as *mut c_void]);
        image.put_ints(prop::IMAGE_BOUNDS, &bounds);
        image.put_ints(prop::IMAGE_REGION_OF_DEFINITION, &bounds);
        image.put_ints(
            prop::IMAGE_ROW_BYTES,
            &[w * ncomp as c_int * std::mem::size_of::<f32>() as c_int],
        );
        image.put_strings(prop::PIXEL_DEPTH, &[val::BIT_DEPTH_FLOAT]);
        image.put_strings(prop::COMPONENTS, &[components]);
        image.put_strings(prop::PRE_MULTIPLICATION, &[val::IMAGE_PRE_MULTIPLIED]);
        image.put_doubles(prop::CLIP_PIXEL_ASPECT_RATIO, &[1.0]);
        image.put_doubles(prop::RENDER_SCALE, &[1.0, 1.0]);
        image.put_strings(prop::IMAGE_FIELD, &[val::FIELD_NONE]);
        let ident = CString::new(format!("{}@{}", self.name.to_string_lossy(), time));
        if let Ok(ident) = ident {
            image.put_strings(prop::IMAGE_UNIQUE_IDENTIFIER, &[ident.as_c_str()]);
        }
        Some(image)
    }
}

/// An effect descriptor or instance.
pub struct EffectObj {
    pub props: PropSet,
    pub params: ParamSetObj,
    pub clips: Mutex<Vec<Box<ClipObj>>>,
    pub abort_requested: AtomicBool,
}

impl EffectObj {
    pub fn new(kind: &CStr) -> Box<EffectObj> {
        let props = PropSet::new();
        props.put_strings(prop::TYPE, &[kind]);
        Box::new(EffectObj {
            props,
            params: ParamSetObj::default(),
            clips: Mutex::new(Vec::new()),
            abort_requested: AtomicBool::new(false),
        })
    }

    pub fn handle(&self) -> OfxImageEffectHandle {
        self as *const EffectObj as OfxImageEffectHandle
    }

    pub unsafe fn from_handle<'a>(handle: OfxImageEffectHandle) -> Option<&'a EffectObj> {
        (handle as *const EffectObj).as_ref()
    }

    pub fn find_clip(&self, name: &CStr) -> Option<*const ClipObj> {
        self.clips
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name.as_c_str() == name)
            .map(|c| c.as_ref() as *const ClipObj)
    }

    /// An instance seeded from a descriptor: same clips, parameters set
    /// to their declared defaults.
    pub fn instantiate(&self) -> Box<EffectObj> {
        let inst = EffectObj::new(val::TYPE_IMAGE_EFFECT_INSTANCE);
        inst.props.absorb(&self.props);
        inst.props
            .put_strings(prop::TYPE, &[val::TYPE_IMAGE_EFFECT_INSTANCE]);
        let mut clips = inst.clips.lock().unwrap();
        for clip in self.clips.lock().unwrap().iter() {
            let c = ClipObj::new(&clip.name);
            c.props.absorb(&clip.props);
            clips.push(c);
        }
        drop(clips);
        let mut inst = inst;
        inst.params = self.params.instantiate();
        inst
    }
}

// ============================================================================
// Suite entry points
// ============================================================================

unsafe fn effect<'a>(handle: OfxImageEffectHandle) -> Result<&'a EffectObj, OfxStatus> {
    EffectObj::from_handle(handle).ok_or(status::ERR_BAD_HANDLE)
}

unsafe extern "C" fn get_property_set(
    effect_h: OfxImageEffectHandle,
    prop_handle: *mut OfxPropertySetHandle,
) -> OfxStatus {
    let e = match effect(effect_h) {
        Ok(e) => e,
        Err(stat) => return stat,
    };
    if prop_handle.is_null() {
        return status::ERR_VALUE;
    }
    *prop_handle = e.props.handle();
    status::OK
}

unsafe extern "C" fn get_param_set(
    effect_h: OfxImageEffectHandle,
    param_set: *mut OfxParamSetHandle,
) -> OfxStatus {
    let e = match effect(effect_h) {
        Ok(e) => e,
        Err(stat) => return stat,
    };
    if param_set.is_null() {
        return status::ERR_VALUE;
    }
    *param_set = e.params.handle();
    status::OK
}

unsafe extern "C" fn clip_define(
    effect_h: OfxImageEffectHandle,
    name: *const c_char,
    props: *mut OfxPropertySetHandle,
) -> OfxStatus {
    let e = match effect(effect_h) {
        Ok(e) => e,
        Err(stat) => return stat,
    };
    if name.is_null() {
        return status::ERR_VALUE;
    }
    let name = CStr::from_ptr(name);
    if e.find_clip(name).is_some() {
        return status::ERR_EXISTS;
    }
    let clip = ClipObj::new(name);
    if !props.is_null() {
        *props = clip.props.handle();
    }
    e.clips.lock().unwrap().push(clip);
    status::OK
}

unsafe extern "C" fn clip_get_handle(
    effect_h: OfxImageEffectHandle,
    name: *const c_char,
    clip: *mut OfxImageClipHandle,
    props: *mut OfxPropertySetHandle,
) -> OfxStatus {
    let e = match effect(effect_h) {
        Ok(e) => e,
        Err(stat) => return stat,
    };
    if name.is_null() || clip.is_null() {
        return status::ERR_VALUE;
    }
    match e.find_clip(CStr::from_ptr(name)) {
        Some(c) => {
            *clip = c as OfxImageClipHandle;
            if !props.is_null() {
                *props = (*c).props.handle();
            }
            status::OK
        }
        None => status::ERR_UNKNOWN,
    }
}

unsafe extern "C" fn clip_get_property_set(
    clip: OfxImageClipHandle,
    props: *mut OfxPropertySetHandle,
) -> OfxStatus {
    let c = match ClipObj::from_handle(clip) {
        Some(c) => c,
        None => return status::ERR_BAD_HANDLE,
    };
    if props.is_null() {
        return status::ERR_VALUE;
    }
    *props = c.props.handle();
    status::OK
}

unsafe extern "C" fn clip_get_image(
    clip: OfxImageClipHandle,
    time: OfxTime,
    _region: *const OfxRectD,
    image_handle: *mut OfxPropertySetHandle,
) -> OfxStatus {
    let c = match ClipObj::from_handle(clip) {
        Some(c) => c,
        None => return status::ERR_BAD_HANDLE,
    };
    if image_handle.is_null() {
        return status::ERR_VALUE;
    }
    match c.make_image(time) {
        Some(image) => {
            // Released in clip_release_image.
            *image_handle = Box::into_raw(image) as OfxPropertySetHandle;
            status::OK
        }
        None => status::FAILED,
    }
}

unsafe extern "C" fn clip_release_image(image_handle: OfxPropertySetHandle) -> OfxStatus {
    if image_handle.is_null() {
        return status::ERR_BAD_HANDLE;
    }
    drop(Box::from_raw(image_handle as *mut PropSet));
    status::OK
}

unsafe extern "C" fn clip_get_region_of_definition(
    clip: OfxImageClipHandle,
    _time: OfxTime,
    bounds: *mut OfxRectD,
) -> OfxStatus {
    let c = match ClipObj::from_handle(clip) {
        Some(c) => c,
        None => return status::ERR_BAD_HANDLE,
    };
    if bounds.is_null() {
        return status::ERR_VALUE;
    }
    *bounds = c.region_of_definition();
    status::OK
}

unsafe extern "C" fn abort(effect_h: OfxImageEffectHandle) -> c_int {
    match effect(effect_h) {
        Ok(e) => e.abort_requested.load(Ordering::Relaxed) as c_int,
        Err(_) => 0,
    }
}

unsafe extern "C" fn image_memory_alloc(
    _instance: OfxImageEffectHandle,
    n_bytes: usize,
    memory_handle: *mut OfxImageMemoryHandle,
) -> OfxStatus {
    if memory_handle.is_null() {
        return status::ERR_VALUE;
    }
    let buf: Box<Vec<u8>> = Box::new(vec![0u8; n_bytes]);
    *memory_handle = Box::into_raw(buf) as OfxImageMemoryHandle;
    status::OK
}

unsafe extern "C" fn image_memory_free(memory_handle: OfxImageMemoryHandle) -> OfxStatus {
    if memory_handle.is_null() {
        return status::ERR_BAD_HANDLE;
    }
    drop(Box::from_raw(memory_handle as *mut Vec<u8>));
    status::OK
}

unsafe extern "C" fn image_memory_lock(
    memory_handle: OfxImageMemoryHandle,
    returned_ptr: *mut *mut c_void,
) -> OfxStatus {
    if memory_handle.is_null() || returned_ptr.is_null() {
        return status::ERR_BAD_HANDLE;
    }
    let buf = &mut *(memory_handle as *mut Vec<u8>);
    *returned_ptr = buf.as_mut_ptr() as *mut c_void;
    status::OK
}

unsafe extern "C" fn image_memory_unlock(memory_handle: OfxImageMemoryHandle) -> OfxStatus {
    if memory_handle.is_null() {
        return status::ERR_BAD_HANDLE;
    }
    status::OK
}

pub static IMAGE_EFFECT_SUITE_V1: ofx_sys::suites::OfxImageEffectSuiteV1 =
    ofx_sys::suites::OfxImageEffectSuiteV1 {
        get_property_set: Some(get_property_set),
        get_param_set: Some(get_param_set),
        clip_define: Some(clip_define),
        clip_get_handle: Some(clip_get_handle),
        clip_get_property_set: Some(clip_get_property_set),
        clip_get_image: Some(clip_get_image),
        clip_release_image: Some(clip_release_image),
        clip_get_region_of_definition: Some(clip_get_region_of_definition),
        abort: Some(abort),
        image_memory_alloc: Some(image_memory_alloc),
        image_memory_free: Some(image_memory_free),
        image_memory_lock: Some(image_memory_lock),
        image_memory_unlock: Some(image_memory_unlock),
    };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_point_into_the_clip_buffer() {
        let clip = ClipObj::new(c"Source");
        clip.set_frame(4, 2, 4);
        clip.fill(0.25);
        let image = clip.make_image(0.0).unwrap();
        let data = image.pointer(prop::IMAGE_DATA, 0).unwrap() as *const f32;
        unsafe {
            assert_eq!(*data, 0.25);
        }
        assert_eq!(image.int(prop::IMAGE_ROW_BYTES, 0), Some(64));
        assert_eq!(image.int(prop::IMAGE_BOUNDS, 2), Some(4));
    }

    #[test]
    fn unsized_clips_produce_no_image() {
        let clip = ClipObj::new(c"Source");
        assert!(clip.make_image(0.0).is_none());
    }
}
