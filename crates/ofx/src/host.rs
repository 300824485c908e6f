//! The host capability record, read once per load from the host's root
//! property set. Every conditional behavior in the framework checks this.

use std::sync::Arc;

use ofx_sys::prop;

use crate::enums::{BitDepth, Context, NativeOrigin, PixelComponent};
use crate::error::OfxResult;
use crate::property::PropertySet;
use crate::suites::Suites;

#[derive(Debug, Clone)]
pub struct HostDescription {
    pub api_version: Vec<i32>,
    pub host_name: String,
    pub host_label: String,
    pub version: [i32; 3],
    pub version_label: String,
    pub is_background: bool,
    pub supports_overlays: bool,
    pub supports_multi_resolution: bool,
    pub supports_tiles: bool,
    pub temporal_clip_access: bool,
    pub supported_components: Vec<PixelComponent>,
    pub supported_contexts: Vec<Context>,
    pub supported_pixel_depths: Vec<BitDepth>,
    pub supports_multiple_clip_depths: bool,
    pub supports_multiple_clip_pars: bool,
    pub supports_setable_frame_rate: bool,
    pub supports_setable_fielding: bool,
    pub sequential_render: i32,
    pub supports_string_animation: bool,
    pub supports_custom_interact: bool,
    pub supports_choice_animation: bool,
    pub supports_boolean_animation: bool,
    pub supports_custom_animation: bool,
    pub supports_parametric_parameter: bool,
    pub supports_parametric_animation: bool,
    pub supports_opengl_render: bool,
    pub max_parameters: i32,
    pub max_pages: i32,
    pub page_row_count: i32,
    pub page_column_count: i32,
    pub native_origin: NativeOrigin,
}

impl HostDescription {
    /// Reads the capability record from the host's root property set.
    pub fn fetch(suites: &Arc<Suites>) -> OfxResult<HostDescription> {
        let props = PropertySet::new(suites.host_props(), Arc::clone(suites));

        let api_version = {
            // Absent on API 1.0 hosts; treat as 1.0.
            let n = props.dimension(prop::API_VERSION).unwrap_or(0);
            if n == 0 {
                vec![1, 0]
            } else {
                (0..n)
                    .map(|i| props.get_int_at(prop::API_VERSION, i))
                    .collect::<OfxResult<Vec<_>>>()?
            }
        };

        let host_name = props.get_string(prop::NAME)?;

        let mut supported_components = Vec::new();
        for i in 0..props.dimension(prop::SUPPORTED_COMPONENTS)? {
            let s = props.get_cstring_at(prop::SUPPORTED_COMPONENTS, i)?;
            supported_components.push(PixelComponent::from_cstr(&s)?);
        }
        let mut supported_contexts = Vec::new();
        for i in 0..props.dimension(prop::SUPPORTED_CONTEXTS)? {
            let s = props.get_cstring_at(prop::SUPPORTED_CONTEXTS, i)?;
            supported_contexts.push(Context::from_cstr(&s)?);
        }
        // Absent on pre-1.2 hosts.
        let mut supported_pixel_depths = Vec::new();
        if let Ok(n) = props.dimension(prop::SUPPORTED_PIXEL_DEPTHS) {
            for i in 0..n {
                let s = props.get_cstring_at(prop::SUPPORTED_PIXEL_DEPTHS, i)?;
                supported_pixel_depths.push(BitDepth::from_cstr(&s)?);
            }
        }

        let native_origin = match props.get_cstring(prop::HOST_NATIVE_ORIGIN) {
            Ok(s) => NativeOrigin::from_cstr(&s)?,
            // Compensation for known hosts that predate the property.
            // Recorded verbatim; do not generalize without data.
            Err(_) => {
                if host_name.ends_with("Fusion") {
                    NativeOrigin::TopLeft
                } else if host_name.ends_with("Toxik") {
                    NativeOrigin::Center
                } else {
                    NativeOrigin::BottomLeft
                }
            }
        };

        Ok(HostDescription {
            api_version,
            host_label: props.get_string(prop::LABEL)?,
            version: [
                props.get_int_at(prop::VERSION, 0).unwrap_or(0),
                props.get_int_at(prop::VERSION, 1).unwrap_or(0),
                props.get_int_at(prop::VERSION, 2).unwrap_or(0),
            ],
            version_label: props.get_string(prop::VERSION_LABEL).unwrap_or_default(),
            is_background: props.get_bool(prop::HOST_IS_BACKGROUND)?,
            supports_overlays: props.get_bool(prop::SUPPORTS_OVERLAYS)?,
            supports_multi_resolution: props.get_bool(prop::SUPPORTS_MULTI_RESOLUTION)?,
            supports_tiles: props.get_bool(prop::SUPPORTS_TILES)?,
            temporal_clip_access: props.get_bool(prop::TEMPORAL_CLIP_ACCESS)?,
            supported_components,
            supported_contexts,
            supported_pixel_depths,
            supports_multiple_clip_depths: props.get_bool(prop::SUPPORTS_MULTIPLE_CLIP_DEPTHS)?,
            supports_multiple_clip_pars: props.get_bool(prop::SUPPORTS_MULTIPLE_CLIP_PARS)?,
            supports_setable_frame_rate: props.get_bool(prop::SETABLE_FRAME_RATE)?,
            supports_setable_fielding: props.get_bool(prop::SETABLE_FIELDING)?,
            sequential_render: props.get_int(prop::SEQUENTIAL_RENDER).unwrap_or(0),
            supports_string_animation: props.get_bool(prop::HOST_SUPPORTS_STRING_ANIMATION)?,
            supports_custom_interact: props.get_bool(prop::HOST_SUPPORTS_CUSTOM_INTERACT)?,
            supports_choice_animation: props.get_bool(prop::HOST_SUPPORTS_CHOICE_ANIMATION)?,
            supports_boolean_animation: props.get_bool(prop::HOST_SUPPORTS_BOOLEAN_ANIMATION)?,
            supports_custom_animation: props.get_bool(prop::HOST_SUPPORTS_CUSTOM_ANIMATION)?,
            supports_parametric_parameter: suites.parametric().is_some(),
            supports_parametric_animation: props
                .get_bool(prop::HOST_SUPPORTS_PARAMETRIC_ANIMATION)
                .unwrap_or(false),
            supports_opengl_render: props.get_bool(prop::OPENGL_RENDER_SUPPORTED).unwrap_or(false),
            max_parameters: props.get_int(prop::HOST_MAX_PARAMETERS)?,
            max_pages: props.get_int(prop::HOST_MAX_PAGES)?,
            page_row_count: props.get_int_at(prop::HOST_PAGE_ROW_COLUMN_COUNT, 1).unwrap_or(0),
            page_column_count: props.get_int_at(prop::HOST_PAGE_ROW_COLUMN_COUNT, 0).unwrap_or(0),
            native_origin,
            host_name,
        })
    }

    pub fn supports_context(&self, context: Context) -> bool {
        self.supported_contexts.contains(&context)
    }

    pub fn supports_pixel_depth(&self, depth: BitDepth) -> bool {
        self.supported_pixel_depths.is_empty() || self.supported_pixel_depths.contains(&depth)
    }
}
