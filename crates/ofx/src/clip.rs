//! Clips and the images fetched from them.
//!
//! A `ClipDescriptor` is only valid during the describe-in-context action;
//! a `Clip` is the live object on an instance. `Image` owns a host image
//! lease and releases it on drop, with the pixel attributes captured up
//! front so accessors never re-enter the property suite.

use std::ffi::CString;
use std::os::raw::c_void;
use std::sync::Arc;

use ofx_sys::{prop, OfxImageClipHandle, OfxPropertySetHandle, OfxRectD, OfxRectI, OfxTime, status};

use crate::enums::{BitDepth, Field, FieldExtraction, PixelComponent, PreMultiplication};
use crate::error::{check_status, Error, OfxResult};
use crate::property::PropertySet;
use crate::suites::{suite_fn, Suites};

// ============================================================================
// Descriptor
// ============================================================================

/// A clip being defined during describe-in-context.
pub struct ClipDescriptor {
    name: String,
    props: PropertySet,
}

impl ClipDescriptor {
    pub(crate) fn new(name: &str, props: PropertySet) -> Self {
        Self { name: name.to_string(), props }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn props(&self) -> &PropertySet {
        &self.props
    }

    pub fn set_label(&mut self, label: &str) -> OfxResult<()> {
        self.props.set_string(prop::LABEL, label)
    }

    /// Declares a pixel component layout this clip accepts. Call once per
    /// supported layout, most preferred first.
    pub fn add_supported_component(&mut self, c: PixelComponent) -> OfxResult<()> {
        let n = self.props.append_index(prop::SUPPORTED_COMPONENTS)?;
        self.props.set_cstr_at(prop::SUPPORTED_COMPONENTS, n, c.to_cstr())
    }

    pub fn set_temporal_clip_access(&mut self, v: bool) -> OfxResult<()> {
        self.props.set_int(prop::TEMPORAL_CLIP_ACCESS, v as i32)
    }

    pub fn set_optional(&mut self, v: bool) -> OfxResult<()> {
        self.props.set_int(prop::CLIP_OPTIONAL, v as i32)
    }

    pub fn set_is_mask(&mut self, v: bool) -> OfxResult<()> {
        self.props.set_int(prop::CLIP_IS_MASK, v as i32)
    }

    pub fn set_supports_tiles(&mut self, v: bool) -> OfxResult<()> {
        self.props.set_int(prop::SUPPORTS_TILES, v as i32)
    }

    pub fn set_field_extraction(&mut self, v: FieldExtraction) -> OfxResult<()> {
        self.props.set_cstr(prop::CLIP_FIELD_EXTRACTION, v.to_cstr())
    }
}

// ============================================================================
// Instance
// ============================================================================

/// A live clip on an effect instance.
#[derive(Clone)]
pub struct Clip {
    name: String,
    handle: OfxImageClipHandle,
    props: PropertySet,
    suites: Arc<Suites>,
}

impl Clip {
    pub(crate) fn new(
        name: &str,
        handle: OfxImageClipHandle,
        props: PropertySet,
        suites: Arc<Suites>,
    ) -> Self {
        Self { name: name.to_string(), handle, props, suites }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> OfxImageClipHandle {
        self.handle
    }

    pub fn props(&self) -> &PropertySet {
        &self.props
    }

    pub fn pixel_depth(&self) -> OfxResult<BitDepth> {
        BitDepth::from_cstr(&self.props.get_cstring(prop::PIXEL_DEPTH)?)
    }

    pub fn unmapped_pixel_depth(&self) -> OfxResult<BitDepth> {
        BitDepth::from_cstr(&self.props.get_cstring(prop::CLIP_UNMAPPED_PIXEL_DEPTH)?)
    }

    pub fn components(&self) -> OfxResult<PixelComponent> {
        PixelComponent::from_cstr(&self.props.get_cstring(prop::COMPONENTS)?)
    }

    pub fn unmapped_components(&self) -> OfxResult<PixelComponent> {
        PixelComponent::from_cstr(&self.props.get_cstring(prop::CLIP_UNMAPPED_COMPONENTS)?)
    }

    pub fn pre_multiplication(&self) -> OfxResult<PreMultiplication> {
        PreMultiplication::from_cstr(&self.props.get_cstring(prop::PRE_MULTIPLICATION)?)
    }

    pub fn pixel_aspect_ratio(&self) -> OfxResult<f64> {
        self.props.get_double(prop::CLIP_PIXEL_ASPECT_RATIO)
    }

    pub fn frame_rate(&self) -> OfxResult<f64> {
        self.props.get_double(prop::FRAME_RATE)
    }

    pub fn unmapped_frame_rate(&self) -> OfxResult<f64> {
        self.props.get_double(prop::UNMAPPED_FRAME_RATE)
    }

    pub fn frame_range(&self) -> OfxResult<(f64, f64)> {
        Ok((
            self.props.get_double_at(prop::FRAME_RANGE, 0)?,
            self.props.get_double_at(prop::FRAME_RANGE, 1)?,
        ))
    }

    pub fn unmapped_frame_range(&self) -> OfxResult<(f64, f64)> {
        Ok((
            self.props.get_double_at(prop::UNMAPPED_FRAME_RANGE, 0)?,
            self.props.get_double_at(prop::UNMAPPED_FRAME_RANGE, 1)?,
        ))
    }

    pub fn field_order(&self) -> OfxResult<Field> {
        Field::from_cstr(&self.props.get_cstring(prop::CLIP_FIELD_ORDER)?)
    }

    pub fn is_connected(&self) -> OfxResult<bool> {
        self.props.get_bool(prop::CLIP_CONNECTED)
    }

    pub fn has_continuous_samples(&self) -> OfxResult<bool> {
        self.props.get_bool(prop::CONTINUOUS_SAMPLES)
    }

    pub fn is_frame_varying(&self) -> OfxResult<bool> {
        self.props.get_bool(prop::FRAME_VARYING)
    }

    /// The clip's region of definition in canonical coordinates.
    pub fn region_of_definition(&self, time: OfxTime) -> OfxResult<OfxRectD> {
        let f = suite_fn!(self.suites.image_effect(), clip_get_region_of_definition)?;
        let mut rod = OfxRectD { x1: 0.0, y1: 0.0, x2: 0.0, y2: 0.0 };
        check_status(unsafe { f(self.handle, time, &mut rod) })?;
        Ok(rod)
    }

    /// Fetches a frame, optionally restricted to a canonical region.
    /// `Ok(None)` means the host could not produce the frame; an
    /// unconnected optional clip typically lands here.
    pub fn fetch_image(
        &self,
        time: OfxTime,
        region: Option<OfxRectD>,
    ) -> OfxResult<Option<Image>> {
        let f = suite_fn!(self.suites.image_effect(), clip_get_image)?;
        let region_ptr = region.as_ref().map_or(std::ptr::null(), |r| r as *const OfxRectD);
        let mut handle: OfxPropertySetHandle = std::ptr::null_mut();
        let stat = unsafe { f(self.handle, time, region_ptr, &mut handle) };
        if stat == status::FAILED {
            return Ok(None);
        }
        check_status(stat)?;
        if handle.is_null() {
            return Ok(None);
        }
        Image::from_handle(handle, Arc::clone(&self.suites)).map(Some)
    }
}

// ============================================================================
// Image
// ============================================================================

/// A leased frame of pixels. Released back to the host on drop.
pub struct Image {
    handle: OfxPropertySetHandle,
    suites: Arc<Suites>,
    data: *mut c_void,
    bounds: OfxRectI,
    region_of_definition: OfxRectI,
    row_bytes: i32,
    pixel_depth: BitDepth,
    components: PixelComponent,
    pre_multiplication: PreMultiplication,
    pixel_aspect_ratio: f64,
    render_scale: (f64, f64),
    field: Field,
    unique_identifier: String,
}

// Pixel data is plain memory; the handle is only touched again on drop.
unsafe impl Send for Image {}
// All &self methods read plain fields, so workers may share an image.
// Writes through pixel_address are the caller's problem to partition.
unsafe impl Sync for Image {}

impl Image {
    fn from_handle(handle: OfxPropertySetHandle, suites: Arc<Suites>) -> OfxResult<Image> {
        let props = PropertySet::new(handle, Arc::clone(&suites));
        crate::validation::validate_image(&props);
        let rect_i = |name| -> OfxResult<OfxRectI> {
            Ok(OfxRectI {
                x1: props.get_int_at(name, 0)?,
                y1: props.get_int_at(name, 1)?,
                x2: props.get_int_at(name, 2)?,
                y2: props.get_int_at(name, 3)?,
            })
        };
        Ok(Image {
            data: props.get_pointer(prop::IMAGE_DATA)?,
            bounds: rect_i(prop::IMAGE_BOUNDS)?,
            region_of_definition: rect_i(prop::IMAGE_REGION_OF_DEFINITION)?,
            row_bytes: props.get_int(prop::IMAGE_ROW_BYTES)?,
            pixel_depth: BitDepth::from_cstr(&props.get_cstring(prop::PIXEL_DEPTH)?)?,
            components: PixelComponent::from_cstr(&props.get_cstring(prop::COMPONENTS)?)?,
            pre_multiplication: PreMultiplication::from_cstr(
                &props.get_cstring(prop::PRE_MULTIPLICATION)?,
            )?,
            pixel_aspect_ratio: props.get_double(prop::CLIP_PIXEL_ASPECT_RATIO)?,
            render_scale: (
                props.get_double_at(prop::RENDER_SCALE, 0).unwrap_or(1.0),
                props.get_double_at(prop::RENDER_SCALE, 1).unwrap_or(1.0),
            ),
            field: Field::from_cstr(&props.get_cstring(prop::IMAGE_FIELD)?)?,
            unique_identifier: props
                .get_string(prop::IMAGE_UNIQUE_IDENTIFIER)
                .unwrap_or_default(),
            handle,
            suites,
        })
    }

    pub fn handle(&self) -> OfxPropertySetHandle {
        self.handle
    }

    pub fn bounds(&self) -> OfxRectI {
        self.bounds
    }

    pub fn region_of_definition(&self) -> OfxRectI {
        self.region_of_definition
    }

    pub fn row_bytes(&self) -> i32 {
        self.row_bytes
    }

    pub fn pixel_depth(&self) -> BitDepth {
        self.pixel_depth
    }

    pub fn components(&self) -> PixelComponent {
        self.components
    }

    pub fn pre_multiplication(&self) -> PreMultiplication {
        self.pre_multiplication
    }

    pub fn pixel_aspect_ratio(&self) -> f64 {
        self.pixel_aspect_ratio
    }

    pub fn render_scale(&self) -> (f64, f64) {
        self.render_scale
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn unique_identifier(&self) -> &str {
        &self.unique_identifier
    }

    /// Bytes per pixel, 0 for custom component layouts.
    pub fn pixel_bytes(&self) -> usize {
        self.pixel_depth.bytes() * self.components.count()
    }

    /// Address of the pixel at `(x, y)` in pixel coordinates, or null when
    /// outside the image bounds or the layout is custom.
    pub fn pixel_address(&self, x: i32, y: i32) -> *mut c_void {
        let bytes = self.pixel_bytes();
        if bytes == 0
            || x < self.bounds.x1
            || x >= self.bounds.x2
            || y < self.bounds.y1
            || y >= self.bounds.y2
        {
            return std::ptr::null_mut();
        }
        let row = (y - self.bounds.y1) as isize * self.row_bytes as isize;
        let col = (x - self.bounds.x1) as isize * bytes as isize;
        unsafe { (self.data as *mut u8).offset(row + col) as *mut c_void }
    }
}

impl Drop for Image {
    fn drop(&mut self) {
        if let Some(f) = self.suites.image_effect().clip_release_image {
            unsafe {
                f(self.handle);
            }
        }
    }
}

// ============================================================================
// Per-clip preference property names
// ============================================================================

/// The clip-preference property names for one clip, built once at
/// describe time. The names embed the clip name, e.g.
/// `OfxImageClipPropComponents_Source`.
#[derive(Clone)]
pub struct ClipPrefNames {
    pub components: CString,
    pub depth: CString,
    pub pixel_aspect_ratio: CString,
    pub region_of_interest: CString,
    pub frame_range: CString,
}

impl ClipPrefNames {
    pub fn new(clip_name: &str) -> OfxResult<ClipPrefNames> {
        let make = |prefix: &str| {
            CString::new(format!("{}{}", prefix, clip_name))
                .map_err(|_| Error::TypeRequest(format!("invalid clip name {:?}", clip_name)))
        };
        Ok(ClipPrefNames {
            components: make(prop::CLIP_COMPONENTS_PREFIX)?,
            depth: make(prop::CLIP_DEPTH_PREFIX)?,
            pixel_aspect_ratio: make(prop::CLIP_PAR_PREFIX)?,
            region_of_interest: make(prop::CLIP_ROI_PREFIX)?,
            frame_range: make(prop::CLIP_FRAME_RANGE_PREFIX)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pref_names_embed_the_clip_name() {
        let names = ClipPrefNames::new("Source").unwrap();
        assert_eq!(names.components.to_str().unwrap(), "OfxImageClipPropComponents_Source");
        assert_eq!(names.depth.to_str().unwrap(), "OfxImageClipPropDepth_Source");
        assert_eq!(names.region_of_interest.to_str().unwrap(), "OfxImageClipPropRoI_Source");
    }
}
