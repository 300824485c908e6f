//! Property-set validation against the API's published schemas.
//!
//! Hosts get properties wrong often enough that silent acceptance hides
//! real bugs. Each table below lists the properties a given object must
//! carry, with type and dimension; `validate` walks a table against a live
//! property set and logs every discrepancy. Validation never fails an
//! action, it only reports. Compiled out of release builds unless the
//! `validation` feature is on.

#![cfg_attr(not(any(debug_assertions, feature = "validation")), allow(dead_code))]

use std::ffi::CStr;

use ofx_sys::prop;

use crate::property::PropertySet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropKind {
    Int,
    Double,
    String,
    Pointer,
}

/// One row of a schema: name, type, and expected dimension, where
/// `VARIABLE` means any dimension is fine.
pub(crate) struct PropSchema {
    pub name: &'static CStr,
    pub kind: PropKind,
    pub dimension: i32,
}

pub(crate) const VARIABLE: i32 = -1;

macro_rules! schema {
    ($($name:expr, $kind:ident, $dim:expr;)*) => {
        &[$(PropSchema { name: $name, kind: PropKind::$kind, dimension: $dim },)*]
    };
}

/// What a host's root property set must carry.
pub(crate) const HOST_SCHEMA: &[PropSchema] = schema![
    prop::TYPE, String, 1;
    prop::NAME, String, 1;
    prop::LABEL, String, 1;
    prop::HOST_IS_BACKGROUND, Int, 1;
    prop::SUPPORTS_OVERLAYS, Int, 1;
    prop::SUPPORTS_MULTI_RESOLUTION, Int, 1;
    prop::SUPPORTS_TILES, Int, 1;
    prop::TEMPORAL_CLIP_ACCESS, Int, 1;
    prop::SUPPORTED_COMPONENTS, String, VARIABLE;
    prop::SUPPORTED_CONTEXTS, String, VARIABLE;
    prop::SUPPORTS_MULTIPLE_CLIP_DEPTHS, Int, 1;
    prop::SUPPORTS_MULTIPLE_CLIP_PARS, Int, 1;
    prop::SETABLE_FRAME_RATE, Int, 1;
    prop::SETABLE_FIELDING, Int, 1;
    prop::HOST_SUPPORTS_CUSTOM_INTERACT, Int, 1;
    prop::HOST_SUPPORTS_STRING_ANIMATION, Int, 1;
    prop::HOST_SUPPORTS_CHOICE_ANIMATION, Int, 1;
    prop::HOST_SUPPORTS_BOOLEAN_ANIMATION, Int, 1;
    prop::HOST_SUPPORTS_CUSTOM_ANIMATION, Int, 1;
    prop::HOST_MAX_PARAMETERS, Int, 1;
    prop::HOST_MAX_PAGES, Int, 1;
    prop::HOST_PAGE_ROW_COLUMN_COUNT, Int, 2;
];

/// What a freshly minted effect descriptor must carry.
pub(crate) const EFFECT_DESCRIPTOR_SCHEMA: &[PropSchema] = schema![
    prop::TYPE, String, 1;
    prop::LABEL, String, 1;
    prop::SUPPORTED_CONTEXTS, String, VARIABLE;
    prop::SUPPORTED_PIXEL_DEPTHS, String, VARIABLE;
    prop::GROUPING, String, 1;
    prop::SINGLE_INSTANCE, Int, 1;
    prop::RENDER_THREAD_SAFETY, String, 1;
    prop::HOST_FRAME_THREADING, Int, 1;
    prop::SUPPORTS_MULTI_RESOLUTION, Int, 1;
    prop::SUPPORTS_TILES, Int, 1;
    prop::TEMPORAL_CLIP_ACCESS, Int, 1;
    prop::FIELD_RENDER_TWICE_ALWAYS, Int, 1;
    prop::SUPPORTS_MULTIPLE_CLIP_DEPTHS, Int, 1;
    prop::SUPPORTS_MULTIPLE_CLIP_PARS, Int, 1;
    prop::PLUGIN_FILE_PATH, String, 1;
];

/// What an effect instance must carry.
pub(crate) const EFFECT_INSTANCE_SCHEMA: &[PropSchema] = schema![
    prop::TYPE, String, 1;
    prop::CONTEXT, String, 1;
    prop::PROJECT_SIZE, Double, 2;
    prop::PROJECT_OFFSET, Double, 2;
    prop::PROJECT_EXTENT, Double, 2;
    prop::PROJECT_PIXEL_ASPECT_RATIO, Double, 1;
    prop::EFFECT_DURATION, Double, 1;
    prop::FRAME_RATE, Double, 1;
    prop::IS_INTERACTIVE, Int, 1;
];

/// What a clip instance must carry.
pub(crate) const CLIP_INSTANCE_SCHEMA: &[PropSchema] = schema![
    prop::TYPE, String, 1;
    prop::NAME, String, 1;
    prop::PIXEL_DEPTH, String, 1;
    prop::COMPONENTS, String, 1;
    prop::PRE_MULTIPLICATION, String, 1;
    prop::CLIP_PIXEL_ASPECT_RATIO, Double, 1;
    prop::FRAME_RATE, Double, 1;
    prop::FRAME_RANGE, Double, 2;
    prop::CLIP_FIELD_ORDER, String, 1;
    prop::CLIP_CONNECTED, Int, 1;
    prop::CONTINUOUS_SAMPLES, Int, 1;
];

/// What a fetched image must carry.
pub(crate) const IMAGE_SCHEMA: &[PropSchema] = schema![
    prop::TYPE, String, 1;
    prop::IMAGE_DATA, Pointer, 1;
    prop::IMAGE_BOUNDS, Int, 4;
    prop::IMAGE_REGION_OF_DEFINITION, Int, 4;
    prop::IMAGE_ROW_BYTES, Int, 1;
    prop::IMAGE_FIELD, String, 1;
    prop::PIXEL_DEPTH, String, 1;
    prop::COMPONENTS, String, 1;
    prop::PRE_MULTIPLICATION, String, 1;
];

#[cfg(any(debug_assertions, feature = "validation"))]
fn validate(what: &str, schema: &[PropSchema], props: &PropertySet) {
    for row in schema {
        let dim = match props.dimension(row.name) {
            Ok(d) => d,
            Err(err) => {
                log::warn!("{}: missing property {:?}: {}", what, row.name, err);
                continue;
            }
        };
        if row.dimension != VARIABLE && dim != row.dimension as usize {
            log::warn!(
                "{}: property {:?} has dimension {}, expected {}",
                what,
                row.name,
                dim,
                row.dimension
            );
        }
        if dim == 0 {
            continue;
        }
        // Probe index 0 with the schema's type; a host that stores the
        // wrong type errors here.
        let ok = match row.kind {
            PropKind::Int => props.get_int_at(row.name, 0).is_ok(),
            PropKind::Double => props.get_double_at(row.name, 0).is_ok(),
            PropKind::String => props.get_cstring_at(row.name, 0).is_ok(),
            PropKind::Pointer => props.get_pointer_at(row.name, 0).is_ok(),
        };
        if !ok {
            log::warn!("{}: property {:?} rejects {:?} access", what, row.name, row.kind);
        }
    }
}

#[cfg(not(any(debug_assertions, feature = "validation")))]
fn validate(_what: &str, _schema: &[PropSchema], _props: &PropertySet) {}

pub(crate) fn validate_host(props: &PropertySet) {
    validate("host", HOST_SCHEMA, props);
}

pub(crate) fn validate_effect_descriptor(props: &PropertySet) {
    validate("effect descriptor", EFFECT_DESCRIPTOR_SCHEMA, props);
}

pub(crate) fn validate_effect_instance(props: &PropertySet) {
    validate("effect instance", EFFECT_INSTANCE_SCHEMA, props);
}

pub(crate) fn validate_clip_instance(props: &PropertySet) {
    validate("clip instance", CLIP_INSTANCE_SCHEMA, props);
}

pub(crate) fn validate_image(props: &PropertySet) {
    validate("image", IMAGE_SCHEMA, props);
}
