//! The parameter model.
//!
//! Two parallel families: descriptors, used while the host runs the
//! describe actions, and instances, used from create-instance onwards.
//! Both share a base carrying name, kind, and property bag; the concrete
//! kinds add their typed setters and value access. Typed values go through
//! the parameter suite's C-variadic accessors with one argument per
//! dimension.

use std::collections::HashMap;
use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_uint, c_void};
use std::sync::Arc;

use ofx_sys::{prop, status, OfxParamHandle, OfxParamSetHandle, OfxRangeD, OfxTime};

use crate::enums::{CacheInvalidation, DoubleType, KeySearch, ParamKind, StringType};
use crate::error::{check_status, Error, OfxResult};
use crate::property::PropertySet;
use crate::suites::{suite_fn, Suites};

/// Entry-point type for a per-parameter custom interact, as stored in the
/// interact pointer property.
pub type InteractEntryFn = ofx_sys::OfxPluginEntryFn;

// ============================================================================
// Descriptors
// ============================================================================

/// Shared state of every parameter descriptor.
pub struct DescriptorBase {
    name: String,
    kind: ParamKind,
    props: PropertySet,
}

impl DescriptorBase {
    fn new(name: &str, kind: ParamKind, props: PropertySet) -> Self {
        Self { name: name.to_string(), kind, props }
    }
}

/// Setters common to every descriptor kind.
pub trait ParamDescriptor {
    fn base(&self) -> &DescriptorBase;

    fn name(&self) -> &str {
        &self.base().name
    }

    fn kind(&self) -> ParamKind {
        self.base().kind
    }

    fn props(&self) -> &PropertySet {
        &self.base().props
    }

    fn set_label(&mut self, label: &str) -> OfxResult<()> {
        self.base().props.set_string(prop::LABEL, label)
    }

    /// Label triple. The short and long forms are post-1.0 additions, so
    /// failures to set them are tolerated.
    fn set_labels(&mut self, label: &str, short: &str, long: &str) -> OfxResult<()> {
        self.set_label(label)?;
        self.base().props.set_string(prop::SHORT_LABEL, short).ok();
        self.base().props.set_string(prop::LONG_LABEL, long).ok();
        Ok(())
    }

    fn set_hint(&mut self, hint: &str) -> OfxResult<()> {
        self.base().props.set_string(prop::PARAM_HINT, hint)
    }

    fn set_script_name(&mut self, name: &str) -> OfxResult<()> {
        self.base().props.set_string(prop::PARAM_SCRIPT_NAME, name)
    }

    fn set_secret(&mut self, secret: bool) -> OfxResult<()> {
        self.base().props.set_int(prop::PARAM_SECRET, secret as i32)
    }

    fn set_enabled(&mut self, enabled: bool) -> OfxResult<()> {
        self.base().props.set_int(prop::PARAM_ENABLED, enabled as i32)
    }

    fn set_parent(&mut self, group: &GroupParamDescriptor) -> OfxResult<()> {
        self.base().props.set_string(prop::PARAM_PARENT, group.name())
    }

    /// PNG and SVG icon paths, OFX 1.2. Ignored by older hosts.
    fn set_icon(&mut self, svg_path: &str, png_path: &str) -> OfxResult<()> {
        self.base().props.set_string_at(prop::ICON, 0, svg_path).ok();
        self.base().props.set_string_at(prop::ICON, 1, png_path).ok();
        Ok(())
    }
}

/// Setters shared by the value-bearing descriptor kinds.
///
/// Note there is no implicit `animates` write: the per-kind default is the
/// host's, and differs between numeric and string-like kinds.
pub trait ValueParamDescriptor: ParamDescriptor {
    fn set_animates(&mut self, v: bool) -> OfxResult<()> {
        self.base().props.set_int(prop::PARAM_ANIMATES, v as i32)
    }

    fn set_is_persistent(&mut self, v: bool) -> OfxResult<()> {
        self.base().props.set_int(prop::PARAM_PERSISTANT, v as i32)
    }

    fn set_evaluate_on_change(&mut self, v: bool) -> OfxResult<()> {
        self.base().props.set_int(prop::PARAM_EVALUATE_ON_CHANGE, v as i32)
    }

    fn set_can_undo(&mut self, v: bool) -> OfxResult<()> {
        self.base().props.set_int(prop::PARAM_CAN_UNDO, v as i32).ok();
        Ok(())
    }

    fn set_cache_invalidation(&mut self, v: CacheInvalidation) -> OfxResult<()> {
        self.base().props.set_cstr(prop::PARAM_CACHE_INVALIDATION, v.to_cstr())
    }

    /// Installs a custom interact drawn in place of the host's widget.
    fn set_interact(&mut self, main_entry: InteractEntryFn) -> OfxResult<()> {
        self.base().props.set_pointer(prop::PARAM_INTERACT_V1, main_entry as *mut c_void)
    }

    fn set_interact_size_aspect(&mut self, aspect: f64) -> OfxResult<()> {
        self.base().props.set_double(prop::PARAM_INTERACT_SIZE_ASPECT, aspect)
    }

    /// OFX 1.2: let the host draw a position overlay for this parameter.
    fn set_use_host_native_overlay_handle(&mut self, use_it: bool) -> OfxResult<()> {
        self.base()
            .props
            .set_int(prop::PARAM_USE_HOST_OVERLAY_HANDLE, use_it as i32)
            .ok();
        Ok(())
    }
}

macro_rules! descriptor_kind {
    ($(#[$doc:meta])* $name:ident, value) => {
        descriptor_kind!($(#[$doc])* $name, plain);
        impl ValueParamDescriptor for $name {}
    };
    ($(#[$doc:meta])* $name:ident, plain) => {
        $(#[$doc])*
        pub struct $name {
            base: DescriptorBase,
        }

        impl ParamDescriptor for $name {
            fn base(&self) -> &DescriptorBase {
                &self.base
            }
        }
    };
}

descriptor_kind!(
    /// A 1D integer parameter descriptor.
    IntParamDescriptor, value
);
descriptor_kind!(IntParam2DDescriptor, value);
descriptor_kind!(IntParam3DDescriptor, value);
descriptor_kind!(
    /// A 1D double parameter descriptor.
    DoubleParamDescriptor, value
);
descriptor_kind!(DoubleParam2DDescriptor, value);
descriptor_kind!(DoubleParam3DDescriptor, value);
descriptor_kind!(RgbParamDescriptor, value);
descriptor_kind!(RgbaParamDescriptor, value);
descriptor_kind!(BooleanParamDescriptor, value);
descriptor_kind!(ChoiceParamDescriptor, value);
descriptor_kind!(StringParamDescriptor, value);
descriptor_kind!(CustomParamDescriptor, value);
descriptor_kind!(
    /// A grouping node in the parameter hierarchy. Carries no value.
    GroupParamDescriptor, plain
);
descriptor_kind!(PageParamDescriptor, plain);
descriptor_kind!(PushButtonParamDescriptor, plain);

impl IntParamDescriptor {
    pub fn set_default(&mut self, v: i32) -> OfxResult<()> {
        self.base.props.set_int(prop::PARAM_DEFAULT, v)
    }

    pub fn set_range(&mut self, min: i32, max: i32) -> OfxResult<()> {
        self.base.props.set_int(prop::PARAM_MIN, min)?;
        self.base.props.set_int(prop::PARAM_MAX, max)
    }

    pub fn set_display_range(&mut self, min: i32, max: i32) -> OfxResult<()> {
        self.base.props.set_int(prop::PARAM_DISPLAY_MIN, min)?;
        self.base.props.set_int(prop::PARAM_DISPLAY_MAX, max)
    }
}

macro_rules! int_nd_setters {
    ($name:ident, $n:literal) => {
        impl $name {
            pub fn set_default(&mut self, v: [i32; $n]) -> OfxResult<()> {
                for (i, x) in v.iter().enumerate() {
                    self.base.props.set_int_at(prop::PARAM_DEFAULT, i, *x)?;
                }
                Ok(())
            }

            pub fn set_range(&mut self, min: [i32; $n], max: [i32; $n]) -> OfxResult<()> {
                for i in 0..$n {
                    self.base.props.set_int_at(prop::PARAM_MIN, i, min[i])?;
                    self.base.props.set_int_at(prop::PARAM_MAX, i, max[i])?;
                }
                Ok(())
            }

            pub fn set_display_range(&mut self, min: [i32; $n], max: [i32; $n]) -> OfxResult<()> {
                for i in 0..$n {
                    self.base.props.set_int_at(prop::PARAM_DISPLAY_MIN, i, min[i])?;
                    self.base.props.set_int_at(prop::PARAM_DISPLAY_MAX, i, max[i])?;
                }
                Ok(())
            }

            pub fn set_dimension_labels(&mut self, labels: [&str; $n]) -> OfxResult<()> {
                for (i, l) in labels.iter().enumerate() {
                    self.base.props.set_string_at(prop::PARAM_DIMENSION_LABEL, i, l).ok();
                }
                Ok(())
            }
        }
    };
}

int_nd_setters!(IntParam2DDescriptor, 2);
int_nd_setters!(IntParam3DDescriptor, 3);

impl DoubleParamDescriptor {
    pub fn set_default(&mut self, v: f64) -> OfxResult<()> {
        self.base.props.set_double(prop::PARAM_DEFAULT, v)
    }

    pub fn set_range(&mut self, min: f64, max: f64) -> OfxResult<()> {
        self.base.props.set_double(prop::PARAM_MIN, min)?;
        self.base.props.set_double(prop::PARAM_MAX, max)
    }

    pub fn set_display_range(&mut self, min: f64, max: f64) -> OfxResult<()> {
        self.base.props.set_double(prop::PARAM_DISPLAY_MIN, min)?;
        self.base.props.set_double(prop::PARAM_DISPLAY_MAX, max)
    }

    pub fn set_double_type(&mut self, v: DoubleType) -> OfxResult<()> {
        self.base.props.set_cstr(prop::PARAM_DOUBLE_TYPE, v.to_cstr())
    }

    pub fn set_increment(&mut self, v: f64) -> OfxResult<()> {
        self.base.props.set_double(prop::PARAM_INCREMENT, v)
    }

    pub fn set_digits(&mut self, v: i32) -> OfxResult<()> {
        self.base.props.set_int(prop::PARAM_DIGITS, v)
    }

    pub fn set_show_time_marker(&mut self, v: bool) -> OfxResult<()> {
        self.base.props.set_int(prop::PARAM_SHOW_TIME_MARKER, v as i32)
    }

    pub fn set_default_coordinate_system(&mut self, normalised: bool) -> OfxResult<()> {
        let v = if normalised {
            ofx_sys::val::COORDINATES_NORMALISED
        } else {
            ofx_sys::val::COORDINATES_CANONICAL
        };
        self.base.props.set_cstr(prop::PARAM_DEFAULT_COORDINATE_SYSTEM, v)
    }
}

macro_rules! double_nd_setters {
    ($name:ident, $n:literal) => {
        impl $name {
            pub fn set_default(&mut self, v: [f64; $n]) -> OfxResult<()> {
                for (i, x) in v.iter().enumerate() {
                    self.base.props.set_double_at(prop::PARAM_DEFAULT, i, *x)?;
                }
                Ok(())
            }

            pub fn set_range(&mut self, min: [f64; $n], max: [f64; $n]) -> OfxResult<()> {
                for i in 0..$n {
                    self.base.props.set_double_at(prop::PARAM_MIN, i, min[i])?;
                    self.base.props.set_double_at(prop::PARAM_MAX, i, max[i])?;
                }
                Ok(())
            }

            pub fn set_display_range(&mut self, min: [f64; $n], max: [f64; $n]) -> OfxResult<()> {
                for i in 0..$n {
                    self.base.props.set_double_at(prop::PARAM_DISPLAY_MIN, i, min[i])?;
                    self.base.props.set_double_at(prop::PARAM_DISPLAY_MAX, i, max[i])?;
                }
                Ok(())
            }

            pub fn set_dimension_labels(&mut self, labels: [&str; $n]) -> OfxResult<()> {
                for (i, l) in labels.iter().enumerate() {
                    self.base.props.set_string_at(prop::PARAM_DIMENSION_LABEL, i, l).ok();
                }
                Ok(())
            }

            pub fn set_double_type(&mut self, v: DoubleType) -> OfxResult<()> {
                self.base.props.set_cstr(prop::PARAM_DOUBLE_TYPE, v.to_cstr())
            }

            pub fn set_default_coordinate_system(&mut self, normalised: bool) -> OfxResult<()> {
                let v = if normalised {
                    ofx_sys::val::COORDINATES_NORMALISED
                } else {
                    ofx_sys::val::COORDINATES_CANONICAL
                };
                self.base.props.set_cstr(prop::PARAM_DEFAULT_COORDINATE_SYSTEM, v)
            }
        }
    };
}

double_nd_setters!(DoubleParam2DDescriptor, 2);
double_nd_setters!(DoubleParam3DDescriptor, 3);
double_nd_setters!(RgbParamDescriptor, 3);
double_nd_setters!(RgbaParamDescriptor, 4);

impl BooleanParamDescriptor {
    pub fn set_default(&mut self, v: bool) -> OfxResult<()> {
        self.base.props.set_int(prop::PARAM_DEFAULT, v as i32)
    }
}

impl ChoiceParamDescriptor {
    pub fn set_default(&mut self, v: i32) -> OfxResult<()> {
        self.base.props.set_int(prop::PARAM_DEFAULT, v)
    }

    pub fn option_count(&self) -> OfxResult<usize> {
        self.base.props.append_index(prop::PARAM_CHOICE_OPTION)
    }

    /// Appends an option. When a separate UI label is given it is folded
    /// into the hint, since API 1 has no per-option label property.
    pub fn append_option(&mut self, option: &str, label: &str) -> OfxResult<()> {
        let n = self.option_count()?;
        self.base.props.set_string_at(prop::PARAM_CHOICE_OPTION, n, option)?;
        if !label.is_empty() {
            let mut hint = self.base.props.get_string(prop::PARAM_HINT).unwrap_or_default();
            if !hint.is_empty() {
                hint.push('\n');
                if n == 0 {
                    hint.push('\n');
                }
            }
            hint.push_str(option);
            hint.push_str(": ");
            hint.push_str(label);
            self.base.props.set_string(prop::PARAM_HINT, &hint)?;
        }
        Ok(())
    }

    pub fn reset_options(&mut self) -> OfxResult<()> {
        self.base.props.reset(prop::PARAM_CHOICE_OPTION)
    }
}

impl StringParamDescriptor {
    pub fn set_default(&mut self, v: &str) -> OfxResult<()> {
        self.base.props.set_string(prop::PARAM_DEFAULT, v)
    }

    pub fn set_string_type(&mut self, v: StringType) -> OfxResult<()> {
        self.base.props.set_cstr(prop::PARAM_STRING_MODE, v.to_cstr())
    }

    /// For file-path strings: whether the UI picks an existing file.
    pub fn set_file_path_exists(&mut self, v: bool) -> OfxResult<()> {
        self.base.props.set_int(prop::PARAM_STRING_FILE_PATH_EXISTS, v as i32)
    }
}

impl CustomParamDescriptor {
    pub fn set_default(&mut self, v: &str) -> OfxResult<()> {
        self.base.props.set_string(prop::PARAM_DEFAULT, v)
    }

    /// Routes the host's keyframe interpolation of this parameter through
    /// the effect's `interpolate_custom` callback.
    pub fn set_custom_interpolation(&mut self, interp: bool) -> OfxResult<()> {
        let entry = if interp {
            crate::dispatch::custom_param_interp_entry() as *mut c_void
        } else {
            std::ptr::null_mut()
        };
        self.base.props.set_pointer(prop::PARAM_CUSTOM_INTERP_CALLBACK_V1, entry)
    }
}

impl GroupParamDescriptor {
    /// Initial open/closed state in a hierarchical layout, OFX 1.2.
    pub fn set_open(&mut self, open: bool) -> OfxResult<()> {
        self.base.props.set_int(prop::PARAM_GROUP_OPEN, open as i32).ok();
        Ok(())
    }
}

impl PageParamDescriptor {
    pub fn add_child(&mut self, child: &dyn ParamDescriptor) -> OfxResult<()> {
        self.add_child_name(child.name())
    }

    fn add_child_name(&mut self, name: &str) -> OfxResult<()> {
        let n = self.base.props.append_index(prop::PARAM_PAGE_CHILD)?;
        self.base.props.set_string_at(prop::PARAM_PAGE_CHILD, n, name)
    }

    pub fn add_skip_row(&mut self) -> OfxResult<()> {
        let n = self.base.props.append_index(prop::PARAM_PAGE_CHILD)?;
        self.base.props.set_cstr_at(prop::PARAM_PAGE_CHILD, n, ofx_sys::val::PAGE_SKIP_ROW)
    }

    pub fn add_skip_column(&mut self) -> OfxResult<()> {
        let n = self.base.props.append_index(prop::PARAM_PAGE_CHILD)?;
        self.base.props.set_cstr_at(prop::PARAM_PAGE_CHILD, n, ofx_sys::val::PAGE_SKIP_COLUMN)
    }
}

/// A curve-valued parameter descriptor. Needs its live handle to install
/// the default control points, so it also carries the suites.
pub struct ParametricParamDescriptor {
    base: DescriptorBase,
    handle: OfxParamHandle,
    suites: Arc<Suites>,
}

impl ParamDescriptor for ParametricParamDescriptor {
    fn base(&self) -> &DescriptorBase {
        &self.base
    }
}

impl ValueParamDescriptor for ParametricParamDescriptor {}

impl ParametricParamDescriptor {
    pub fn set_range(&mut self, min: f64, max: f64) -> OfxResult<()> {
        self.base.props.set_double_at(prop::PARAM_PARAMETRIC_RANGE, 0, min)?;
        self.base.props.set_double_at(prop::PARAM_PARAMETRIC_RANGE, 1, max)
    }

    pub fn set_curve_count(&mut self, n: i32) -> OfxResult<()> {
        self.base.props.set_int(prop::PARAM_PARAMETRIC_DIMENSION, n)
    }

    pub fn set_curve_label(&mut self, curve: usize, label: &str) -> OfxResult<()> {
        self.base.props.set_string_at(prop::PARAM_DIMENSION_LABEL, curve, label)
    }

    pub fn set_curve_colour(&mut self, curve: usize, r: f64, g: f64, b: f64) -> OfxResult<()> {
        let p = prop::PARAM_PARAMETRIC_UI_COLOUR;
        self.base.props.set_double_at(p, curve * 3, r)?;
        self.base.props.set_double_at(p, curve * 3 + 1, g)?;
        self.base.props.set_double_at(p, curve * 3 + 2, b)
    }

    pub fn add_control_point(
        &mut self,
        curve: i32,
        time: OfxTime,
        key: f64,
        value: f64,
        add_animation_key: bool,
    ) -> OfxResult<()> {
        let suite = self
            .suites
            .parametric()
            .ok_or_else(|| Error::HostInadequate("host has no parametric suite".into()))?;
        let f = suite_fn!(suite, parametric_param_add_control_point)?;
        check_status(unsafe { f(self.handle, curve, time, key, value, add_animation_key) })
    }

    /// Installs y = x on one curve.
    pub fn set_identity_curve(&mut self, curve: i32) -> OfxResult<()> {
        self.add_control_point(curve, 0.0, 0.0, 0.0, false)?;
        self.add_control_point(curve, 0.0, 1.0, 1.0, false)
    }

    /// Installs y = x on every declared curve.
    pub fn set_identity(&mut self) -> OfxResult<()> {
        let n = self.base.props.get_int(prop::PARAM_PARAMETRIC_DIMENSION)?;
        for i in 0..n {
            self.set_identity_curve(i)?;
        }
        Ok(())
    }

    /// Installs a background interact drawn under the curve editor.
    pub fn set_background_interact(&mut self, main_entry: InteractEntryFn) -> OfxResult<()> {
        self.base
            .props
            .set_pointer(prop::PARAM_PARAMETRIC_INTERACT_BACKGROUND, main_entry as *mut c_void)
    }
}

// ============================================================================
// Descriptor set
// ============================================================================

/// The set of parameters on an effect descriptor.
pub struct ParamSetDescriptor {
    handle: OfxParamSetHandle,
    props: PropertySet,
    suites: Arc<Suites>,
    defined: HashMap<String, ParamKind>,
}

impl ParamSetDescriptor {
    pub(crate) fn new(handle: OfxParamSetHandle, suites: Arc<Suites>) -> OfxResult<Self> {
        let f = suite_fn!(suites.parameter(), param_set_get_property_set)?;
        let mut props_handle = std::ptr::null_mut();
        check_status(unsafe { f(handle, &mut props_handle) })?;
        Ok(Self {
            handle,
            props: PropertySet::new(props_handle, Arc::clone(&suites)),
            suites,
            defined: HashMap::new(),
        })
    }

    fn define_raw(&mut self, kind: ParamKind, name: &str) -> OfxResult<DescriptorBase> {
        if let Some(existing) = self.defined.get(name) {
            return Err(if *existing == kind {
                Error::Suite(status::ERR_EXISTS)
            } else {
                Error::TypeRequest(format!(
                    "parameter {} already defined as {:?}",
                    name, existing
                ))
            });
        }
        let f = suite_fn!(self.suites.parameter(), param_define)?;
        let c_name = CString::new(name)
            .map_err(|_| Error::TypeRequest(format!("invalid parameter name {:?}", name)))?;
        let mut props_handle = std::ptr::null_mut();
        let stat =
            unsafe { f(self.handle, kind.to_cstr().as_ptr(), c_name.as_ptr(), &mut props_handle) };
        check_status(stat)?;
        self.defined.insert(name.to_string(), kind);
        let props = PropertySet::new(props_handle, Arc::clone(&self.suites));
        Ok(DescriptorBase::new(name, kind, props))
    }

    pub fn defined_kind(&self, name: &str) -> Option<ParamKind> {
        self.defined.get(name).copied()
    }

    /// Establishes the order of pages; call once per page, in order.
    pub fn add_page_to_order(&mut self, page: &PageParamDescriptor) -> OfxResult<()> {
        let n = self.props.append_index(prop::PLUGIN_PARAM_PAGE_ORDER)?;
        self.props.set_string_at(prop::PLUGIN_PARAM_PAGE_ORDER, n, page.name())
    }

    pub fn define_int_param(&mut self, name: &str) -> OfxResult<IntParamDescriptor> {
        Ok(IntParamDescriptor { base: self.define_raw(ParamKind::Int, name)? })
    }

    pub fn define_int2d_param(&mut self, name: &str) -> OfxResult<IntParam2DDescriptor> {
        Ok(IntParam2DDescriptor { base: self.define_raw(ParamKind::Int2D, name)? })
    }

    pub fn define_int3d_param(&mut self, name: &str) -> OfxResult<IntParam3DDescriptor> {
        Ok(IntParam3DDescriptor { base: self.define_raw(ParamKind::Int3D, name)? })
    }

    pub fn define_double_param(&mut self, name: &str) -> OfxResult<DoubleParamDescriptor> {
        Ok(DoubleParamDescriptor { base: self.define_raw(ParamKind::Double, name)? })
    }

    pub fn define_double2d_param(&mut self, name: &str) -> OfxResult<DoubleParam2DDescriptor> {
        Ok(DoubleParam2DDescriptor { base: self.define_raw(ParamKind::Double2D, name)? })
    }

    pub fn define_double3d_param(&mut self, name: &str) -> OfxResult<DoubleParam3DDescriptor> {
        Ok(DoubleParam3DDescriptor { base: self.define_raw(ParamKind::Double3D, name)? })
    }

    pub fn define_rgb_param(&mut self, name: &str) -> OfxResult<RgbParamDescriptor> {
        Ok(RgbParamDescriptor { base: self.define_raw(ParamKind::Rgb, name)? })
    }

    pub fn define_rgba_param(&mut self, name: &str) -> OfxResult<RgbaParamDescriptor> {
        Ok(RgbaParamDescriptor { base: self.define_raw(ParamKind::Rgba, name)? })
    }

    pub fn define_boolean_param(&mut self, name: &str) -> OfxResult<BooleanParamDescriptor> {
        Ok(BooleanParamDescriptor { base: self.define_raw(ParamKind::Boolean, name)? })
    }

    pub fn define_choice_param(&mut self, name: &str) -> OfxResult<ChoiceParamDescriptor> {
        Ok(ChoiceParamDescriptor { base: self.define_raw(ParamKind::Choice, name)? })
    }

    pub fn define_string_param(&mut self, name: &str) -> OfxResult<StringParamDescriptor> {
        Ok(StringParamDescriptor { base: self.define_raw(ParamKind::String, name)? })
    }

    pub fn define_custom_param(&mut self, name: &str) -> OfxResult<CustomParamDescriptor> {
        Ok(CustomParamDescriptor { base: self.define_raw(ParamKind::Custom, name)? })
    }

    pub fn define_group_param(&mut self, name: &str) -> OfxResult<GroupParamDescriptor> {
        Ok(GroupParamDescriptor { base: self.define_raw(ParamKind::Group, name)? })
    }

    pub fn define_page_param(&mut self, name: &str) -> OfxResult<PageParamDescriptor> {
        Ok(PageParamDescriptor { base: self.define_raw(ParamKind::Page, name)? })
    }

    pub fn define_push_button_param(
        &mut self,
        name: &str,
    ) -> OfxResult<PushButtonParamDescriptor> {
        Ok(PushButtonParamDescriptor { base: self.define_raw(ParamKind::PushButton, name)? })
    }

    pub fn define_parametric_param(
        &mut self,
        name: &str,
    ) -> OfxResult<ParametricParamDescriptor> {
        let base = self.define_raw(ParamKind::Parametric, name)?;
        // The live handle is needed to seed control points.
        let f = suite_fn!(self.suites.parameter(), param_get_handle)?;
        let c_name = CString::new(name)
            .map_err(|_| Error::TypeRequest(format!("invalid parameter name {:?}", name)))?;
        let mut handle: OfxParamHandle = std::ptr::null_mut();
        check_status(unsafe {
            f(self.handle, c_name.as_ptr(), &mut handle, std::ptr::null_mut())
        })?;
        Ok(ParametricParamDescriptor { base, handle, suites: Arc::clone(&self.suites) })
    }
}

// ============================================================================
// Instances
// ============================================================================

/// Shared state of every live parameter.
pub struct ParamBase {
    name: String,
    kind: ParamKind,
    handle: OfxParamHandle,
    props: PropertySet,
    suites: Arc<Suites>,
}

/// Accessors common to every live parameter.
pub trait Param {
    fn param(&self) -> &ParamBase;

    fn name(&self) -> &str {
        &self.param().name
    }

    fn kind(&self) -> ParamKind {
        self.param().kind
    }

    fn handle(&self) -> OfxParamHandle {
        self.param().handle
    }

    fn props(&self) -> &PropertySet {
        &self.param().props
    }

    fn set_label(&self, label: &str) -> OfxResult<()> {
        self.props().set_string(prop::LABEL, label)
    }

    fn set_enabled(&self, enabled: bool) -> OfxResult<()> {
        self.props().set_int(prop::PARAM_ENABLED, enabled as i32)
    }

    fn is_enabled(&self) -> OfxResult<bool> {
        self.props().get_bool(prop::PARAM_ENABLED)
    }

    fn set_secret(&self, secret: bool) -> OfxResult<()> {
        self.props().set_int(prop::PARAM_SECRET, secret as i32)
    }

    fn is_secret(&self) -> OfxResult<bool> {
        self.props().get_bool(prop::PARAM_SECRET)
    }

    fn set_hint(&self, hint: &str) -> OfxResult<()> {
        self.props().set_string(prop::PARAM_HINT, hint)
    }
}

/// Animation operations shared by the value-bearing kinds.
pub trait ValueParam: Param {
    fn num_keys(&self) -> OfxResult<u32> {
        let f = suite_fn!(self.param().suites.parameter(), param_get_num_keys)?;
        let mut n: c_uint = 0;
        check_status(unsafe { f(self.handle(), &mut n) })?;
        Ok(n)
    }

    fn key_time(&self, nth: u32) -> OfxResult<OfxTime> {
        let f = suite_fn!(self.param().suites.parameter(), param_get_key_time)?;
        let mut t: OfxTime = 0.0;
        check_status(unsafe { f(self.handle(), nth, &mut t) })?;
        Ok(t)
    }

    /// Index of the key found searching from `time` in `direction`, or -1
    /// when there is none.
    fn key_index(&self, time: OfxTime, direction: KeySearch) -> OfxResult<i32> {
        let f = suite_fn!(self.param().suites.parameter(), param_get_key_index)?;
        let mut index: c_int = -1;
        let stat = unsafe { f(self.handle(), time, direction.to_raw(), &mut index) };
        if stat == status::FAILED {
            return Ok(-1);
        }
        check_status(stat)?;
        Ok(index)
    }

    /// Deletes the key at `time`; silently does nothing if there is none.
    fn delete_key_at_time(&self, time: OfxTime) -> OfxResult<()> {
        let f = suite_fn!(self.param().suites.parameter(), param_delete_key)?;
        let stat = unsafe { f(self.handle(), time) };
        if stat == status::FAILED {
            return Ok(());
        }
        check_status(stat)
    }

    fn delete_all_keys(&self) -> OfxResult<()> {
        let f = suite_fn!(self.param().suites.parameter(), param_delete_all_keys)?;
        check_status(unsafe { f(self.handle()) })
    }

    /// Copies value and animation from another parameter of the same kind,
    /// offset by `dst_offset`, optionally restricted to a source range.
    fn copy_from(
        &self,
        from: &dyn Param,
        dst_offset: OfxTime,
        range: Option<OfxRangeD>,
    ) -> OfxResult<()> {
        let f = suite_fn!(self.param().suites.parameter(), param_copy)?;
        let range_ptr = range.as_ref().map_or(std::ptr::null(), |r| r as *const OfxRangeD);
        check_status(unsafe { f(self.handle(), from.param().handle, dst_offset, range_ptr) })
    }

    fn is_animating(&self) -> OfxResult<bool> {
        self.props().get_bool(prop::PARAM_IS_ANIMATING)
    }

    fn is_auto_keying(&self) -> OfxResult<bool> {
        self.props().get_bool(prop::PARAM_IS_AUTO_KEYING)
    }
}

macro_rules! param_kind {
    ($(#[$doc:meta])* $name:ident, value) => {
        param_kind!($(#[$doc])* $name, plain);
        impl ValueParam for $name {}
    };
    ($(#[$doc:meta])* $name:ident, plain) => {
        $(#[$doc])*
        pub struct $name {
            base: ParamBase,
        }

        impl Param for $name {
            fn param(&self) -> &ParamBase {
                &self.base
            }
        }
    };
}

param_kind!(IntParam, value);
param_kind!(Int2DParam, value);
param_kind!(Int3DParam, value);
param_kind!(
    /// A live 1D double parameter.
    DoubleParam, value
);
param_kind!(Double2DParam, value);
param_kind!(Double3DParam, value);
param_kind!(RgbParam, value);
param_kind!(RgbaParam, value);
param_kind!(BooleanParam, value);
param_kind!(ChoiceParam, value);
param_kind!(StringParam, value);
param_kind!(CustomParam, value);
param_kind!(GroupParam, plain);
param_kind!(PageParam, plain);
param_kind!(PushButtonParam, plain);

/// Typed value access through the variadic suite entries. `$ty` is the C
/// type passed through varargs, `$n` the dimension.
macro_rules! numeric_value_access {
    ($name:ident, $ty:ty, $n:literal) => {
        impl $name {
            pub fn get_value(&self) -> OfxResult<[$ty; $n]> {
                let f = suite_fn!(self.base.suites.parameter(), param_get_value)?;
                let mut out: [$ty; $n] = [Default::default(); $n];
                let stat = unsafe {
                    match &mut out[..] {
                        [a] => f(self.base.handle, a as *mut $ty),
                        [a, b] => f(self.base.handle, a as *mut $ty, b as *mut $ty),
                        [a, b, c] => {
                            f(self.base.handle, a as *mut $ty, b as *mut $ty, c as *mut $ty)
                        }
                        [a, b, c, d] => f(
                            self.base.handle,
                            a as *mut $ty,
                            b as *mut $ty,
                            c as *mut $ty,
                            d as *mut $ty,
                        ),
                        _ => unreachable!(),
                    }
                };
                check_status(stat)?;
                Ok(out)
            }

            pub fn get_value_at_time(&self, time: OfxTime) -> OfxResult<[$ty; $n]> {
                let f = suite_fn!(self.base.suites.parameter(), param_get_value_at_time)?;
                let mut out: [$ty; $n] = [Default::default(); $n];
                let stat = unsafe {
                    match &mut out[..] {
                        [a] => f(self.base.handle, time, a as *mut $ty),
                        [a, b] => f(self.base.handle, time, a as *mut $ty, b as *mut $ty),
                        [a, b, c] => f(
                            self.base.handle,
                            time,
                            a as *mut $ty,
                            b as *mut $ty,
                            c as *mut $ty,
                        ),
                        [a, b, c, d] => f(
                            self.base.handle,
                            time,
                            a as *mut $ty,
                            b as *mut $ty,
                            c as *mut $ty,
                            d as *mut $ty,
                        ),
                        _ => unreachable!(),
                    }
                };
                check_status(stat)?;
                Ok(out)
            }

            pub fn set_value(&self, v: [$ty; $n]) -> OfxResult<()> {
                let f = suite_fn!(self.base.suites.parameter(), param_set_value)?;
                let stat = unsafe {
                    match &v[..] {
                        [a] => f(self.base.handle, *a),
                        [a, b] => f(self.base.handle, *a, *b),
                        [a, b, c] => f(self.base.handle, *a, *b, *c),
                        [a, b, c, d] => f(self.base.handle, *a, *b, *c, *d),
                        _ => unreachable!(),
                    }
                };
                check_status(stat)
            }

            pub fn set_value_at_time(&self, time: OfxTime, v: [$ty; $n]) -> OfxResult<()> {
                let f = suite_fn!(self.base.suites.parameter(), param_set_value_at_time)?;
                let stat = unsafe {
                    match &v[..] {
                        [a] => f(self.base.handle, time, *a),
                        [a, b] => f(self.base.handle, time, *a, *b),
                        [a, b, c] => f(self.base.handle, time, *a, *b, *c),
                        [a, b, c, d] => f(self.base.handle, time, *a, *b, *c, *d),
                        _ => unreachable!(),
                    }
                };
                check_status(stat)
            }
        }
    };
}

numeric_value_access!(IntParam, c_int, 1);
numeric_value_access!(Int2DParam, c_int, 2);
numeric_value_access!(Int3DParam, c_int, 3);
numeric_value_access!(DoubleParam, f64, 1);
numeric_value_access!(Double2DParam, f64, 2);
numeric_value_access!(Double3DParam, f64, 3);
numeric_value_access!(RgbParam, f64, 3);
numeric_value_access!(RgbaParam, f64, 4);

/// Derivative and integral access for the double kinds.
macro_rules! double_calculus_access {
    ($name:ident, $n:literal) => {
        impl $name {
            /// First derivative of the animated value at `time`.
            pub fn differentiate(&self, time: OfxTime) -> OfxResult<[f64; $n]> {
                let f = suite_fn!(self.base.suites.parameter(), param_get_derivative)?;
                let mut out = [0.0f64; $n];
                let stat = unsafe {
                    match &mut out[..] {
                        [a] => f(self.base.handle, time, a as *mut f64),
                        [a, b] => f(self.base.handle, time, a as *mut f64, b as *mut f64),
                        [a, b, c] => f(
                            self.base.handle,
                            time,
                            a as *mut f64,
                            b as *mut f64,
                            c as *mut f64,
                        ),
                        _ => unreachable!(),
                    }
                };
                check_status(stat)?;
                Ok(out)
            }

            /// Integral of the animated value over [t1, t2].
            pub fn integrate(&self, t1: OfxTime, t2: OfxTime) -> OfxResult<[f64; $n]> {
                let f = suite_fn!(self.base.suites.parameter(), param_get_integral)?;
                let mut out = [0.0f64; $n];
                let stat = unsafe {
                    match &mut out[..] {
                        [a] => f(self.base.handle, t1, t2, a as *mut f64),
                        [a, b] => f(self.base.handle, t1, t2, a as *mut f64, b as *mut f64),
                        [a, b, c] => f(
                            self.base.handle,
                            t1,
                            t2,
                            a as *mut f64,
                            b as *mut f64,
                            c as *mut f64,
                        ),
                        _ => unreachable!(),
                    }
                };
                check_status(stat)?;
                Ok(out)
            }
        }
    };
}

double_calculus_access!(DoubleParam, 1);
double_calculus_access!(Double2DParam, 2);
double_calculus_access!(Double3DParam, 3);

impl BooleanParam {
    pub fn get_value(&self) -> OfxResult<bool> {
        let f = suite_fn!(self.base.suites.parameter(), param_get_value)?;
        let mut v: c_int = 0;
        check_status(unsafe { f(self.base.handle, &mut v as *mut c_int) })?;
        Ok(v != 0)
    }

    pub fn get_value_at_time(&self, time: OfxTime) -> OfxResult<bool> {
        let f = suite_fn!(self.base.suites.parameter(), param_get_value_at_time)?;
        let mut v: c_int = 0;
        check_status(unsafe { f(self.base.handle, time, &mut v as *mut c_int) })?;
        Ok(v != 0)
    }

    pub fn set_value(&self, v: bool) -> OfxResult<()> {
        let f = suite_fn!(self.base.suites.parameter(), param_set_value)?;
        check_status(unsafe { f(self.base.handle, v as c_int) })
    }

    pub fn set_value_at_time(&self, time: OfxTime, v: bool) -> OfxResult<()> {
        let f = suite_fn!(self.base.suites.parameter(), param_set_value_at_time)?;
        check_status(unsafe { f(self.base.handle, time, v as c_int) })
    }
}

impl ChoiceParam {
    pub fn get_value(&self) -> OfxResult<i32> {
        let f = suite_fn!(self.base.suites.parameter(), param_get_value)?;
        let mut v: c_int = 0;
        check_status(unsafe { f(self.base.handle, &mut v as *mut c_int) })?;
        Ok(v)
    }

    pub fn get_value_at_time(&self, time: OfxTime) -> OfxResult<i32> {
        let f = suite_fn!(self.base.suites.parameter(), param_get_value_at_time)?;
        let mut v: c_int = 0;
        check_status(unsafe { f(self.base.handle, time, &mut v as *mut c_int) })?;
        Ok(v)
    }

    pub fn set_value(&self, v: i32) -> OfxResult<()> {
        let f = suite_fn!(self.base.suites.parameter(), param_set_value)?;
        check_status(unsafe { f(self.base.handle, v as c_int) })
    }

    pub fn option_count(&self) -> OfxResult<usize> {
        self.base.props.dimension(prop::PARAM_CHOICE_OPTION)
    }

    pub fn option(&self, index: usize) -> OfxResult<String> {
        self.base.props.get_string_at(prop::PARAM_CHOICE_OPTION, index)
    }

    /// Replaces the option list; the current value index is kept by the host.
    pub fn reset_options(&self, options: &[&str]) -> OfxResult<()> {
        self.base.props.reset(prop::PARAM_CHOICE_OPTION)?;
        for (i, o) in options.iter().enumerate() {
            self.base.props.set_string_at(prop::PARAM_CHOICE_OPTION, i, o)?;
        }
        Ok(())
    }
}

macro_rules! string_value_access {
    ($name:ident) => {
        impl $name {
            pub fn get_value(&self) -> OfxResult<String> {
                let f = suite_fn!(self.base.suites.parameter(), param_get_value)?;
                let mut ptr: *mut c_char = std::ptr::null_mut();
                check_status(unsafe { f(self.base.handle, &mut ptr as *mut *mut c_char) })?;
                if ptr.is_null() {
                    return Ok(String::new());
                }
                Ok(unsafe { std::ffi::CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
            }

            pub fn get_value_at_time(&self, time: OfxTime) -> OfxResult<String> {
                let f = suite_fn!(self.base.suites.parameter(), param_get_value_at_time)?;
                let mut ptr: *mut c_char = std::ptr::null_mut();
                check_status(unsafe { f(self.base.handle, time, &mut ptr as *mut *mut c_char) })?;
                if ptr.is_null() {
                    return Ok(String::new());
                }
                Ok(unsafe { std::ffi::CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
            }

            pub fn set_value(&self, v: &str) -> OfxResult<()> {
                let f = suite_fn!(self.base.suites.parameter(), param_set_value)?;
                let v = CString::new(v)
                    .map_err(|_| Error::TypeRequest("string value contains NUL".into()))?;
                check_status(unsafe { f(self.base.handle, v.as_ptr()) })
            }

            pub fn set_value_at_time(&self, time: OfxTime, v: &str) -> OfxResult<()> {
                let f = suite_fn!(self.base.suites.parameter(), param_set_value_at_time)?;
                let v = CString::new(v)
                    .map_err(|_| Error::TypeRequest("string value contains NUL".into()))?;
                check_status(unsafe { f(self.base.handle, time, v.as_ptr()) })
            }
        }
    };
}

string_value_access!(StringParam);
string_value_access!(CustomParam);

/// A live curve-valued parameter.
pub struct ParametricParam {
    base: ParamBase,
}

impl Param for ParametricParam {
    fn param(&self) -> &ParamBase {
        &self.base
    }
}

impl ValueParam for ParametricParam {}

impl ParametricParam {
    fn suite(&self) -> OfxResult<&ofx_sys::suites::OfxParametricParameterSuiteV1> {
        self.base
            .suites
            .parametric()
            .ok_or_else(|| Error::HostInadequate("host has no parametric suite".into()))
    }

    /// Evaluates curve `curve` at parametric position `pos` and time `time`.
    pub fn value(&self, curve: i32, time: OfxTime, pos: f64) -> OfxResult<f64> {
        let f = suite_fn!(self.suite()?, parametric_param_get_value)?;
        let mut v = 0.0;
        check_status(unsafe { f(self.base.handle, curve, time, pos, &mut v) })?;
        Ok(v)
    }

    pub fn control_point_count(&self, curve: i32, time: OfxTime) -> OfxResult<i32> {
        let f = suite_fn!(self.suite()?, parametric_param_get_n_control_points)?;
        let mut n: c_int = 0;
        check_status(unsafe { f(self.base.handle, curve, time, &mut n) })?;
        Ok(n)
    }

    pub fn control_point(&self, curve: i32, time: OfxTime, nth: i32) -> OfxResult<(f64, f64)> {
        let f = suite_fn!(self.suite()?, parametric_param_get_nth_control_point)?;
        let (mut key, mut value) = (0.0, 0.0);
        check_status(unsafe { f(self.base.handle, curve, time, nth, &mut key, &mut value) })?;
        Ok((key, value))
    }

    pub fn set_control_point(
        &self,
        curve: i32,
        time: OfxTime,
        nth: i32,
        key: f64,
        value: f64,
        add_animation_key: bool,
    ) -> OfxResult<()> {
        let f = suite_fn!(self.suite()?, parametric_param_set_nth_control_point)?;
        check_status(unsafe { f(self.base.handle, curve, time, nth, key, value, add_animation_key) })
    }

    pub fn add_control_point(
        &self,
        curve: i32,
        time: OfxTime,
        key: f64,
        value: f64,
        add_animation_key: bool,
    ) -> OfxResult<()> {
        let f = suite_fn!(self.suite()?, parametric_param_add_control_point)?;
        check_status(unsafe { f(self.base.handle, curve, time, key, value, add_animation_key) })
    }

    pub fn delete_control_point(&self, curve: i32, nth: i32) -> OfxResult<()> {
        let f = suite_fn!(self.suite()?, parametric_param_delete_control_point)?;
        check_status(unsafe { f(self.base.handle, curve, nth) })
    }

    pub fn delete_all_control_points(&self, curve: i32) -> OfxResult<()> {
        let f = suite_fn!(self.suite()?, parametric_param_delete_all_control_points)?;
        check_status(unsafe { f(self.base.handle, curve) })
    }
}

// ============================================================================
// Instance-side parameter set
// ============================================================================

/// The live parameters of an effect instance. Fetching the same name twice
/// hands back a wrapper over the same host handle.
pub struct ParamSet {
    handle: OfxParamSetHandle,
    suites: Arc<Suites>,
}

impl ParamSet {
    pub(crate) fn new(handle: OfxParamSetHandle, suites: Arc<Suites>) -> Self {
        Self { handle, suites }
    }

    pub fn handle(&self) -> OfxParamSetHandle {
        self.handle
    }

    fn fetch_raw(&self, name: &str, kind: ParamKind) -> OfxResult<ParamBase> {
        let f = suite_fn!(self.suites.parameter(), param_get_handle)?;
        let c_name = CString::new(name)
            .map_err(|_| Error::TypeRequest(format!("invalid parameter name {:?}", name)))?;
        let mut handle: OfxParamHandle = std::ptr::null_mut();
        let mut props_handle = std::ptr::null_mut();
        check_status(unsafe { f(self.handle, c_name.as_ptr(), &mut handle, &mut props_handle) })?;
        let props = PropertySet::new(props_handle, Arc::clone(&self.suites));
        let actual = ParamKind::from_cstr(&props.get_cstring(prop::PARAM_TYPE)?)?;
        if actual != kind {
            return Err(Error::TypeRequest(format!(
                "parameter {} is {:?}, fetched as {:?}",
                name, actual, kind
            )));
        }
        Ok(ParamBase { name: name.to_string(), kind, handle, props, suites: Arc::clone(&self.suites) })
    }

    pub fn fetch_int_param(&self, name: &str) -> OfxResult<IntParam> {
        Ok(IntParam { base: self.fetch_raw(name, ParamKind::Int)? })
    }

    pub fn fetch_int2d_param(&self, name: &str) -> OfxResult<Int2DParam> {
        Ok(Int2DParam { base: self.fetch_raw(name, ParamKind::Int2D)? })
    }

    pub fn fetch_int3d_param(&self, name: &str) -> OfxResult<Int3DParam> {
        Ok(Int3DParam { base: self.fetch_raw(name, ParamKind::Int3D)? })
    }

    pub fn fetch_double_param(&self, name: &str) -> OfxResult<DoubleParam> {
        Ok(DoubleParam { base: self.fetch_raw(name, ParamKind::Double)? })
    }

    pub fn fetch_double2d_param(&self, name: &str) -> OfxResult<Double2DParam> {
        Ok(Double2DParam { base: self.fetch_raw(name, ParamKind::Double2D)? })
    }

    pub fn fetch_double3d_param(&self, name: &str) -> OfxResult<Double3DParam> {
        Ok(Double3DParam { base: self.fetch_raw(name, ParamKind::Double3D)? })
    }

    pub fn fetch_rgb_param(&self, name: &str) -> OfxResult<RgbParam> {
        Ok(RgbParam { base: self.fetch_raw(name, ParamKind::Rgb)? })
    }

    pub fn fetch_rgba_param(&self, name: &str) -> OfxResult<RgbaParam> {
        Ok(RgbaParam { base: self.fetch_raw(name, ParamKind::Rgba)? })
    }

    pub fn fetch_boolean_param(&self, name: &str) -> OfxResult<BooleanParam> {
        Ok(BooleanParam { base: self.fetch_raw(name, ParamKind::Boolean)? })
    }

    pub fn fetch_choice_param(&self, name: &str) -> OfxResult<ChoiceParam> {
        Ok(ChoiceParam { base: self.fetch_raw(name, ParamKind::Choice)? })
    }

    pub fn fetch_string_param(&self, name: &str) -> OfxResult<StringParam> {
        Ok(StringParam { base: self.fetch_raw(name, ParamKind::String)? })
    }

    pub fn fetch_custom_param(&self, name: &str) -> OfxResult<CustomParam> {
        Ok(CustomParam { base: self.fetch_raw(name, ParamKind::Custom)? })
    }

    pub fn fetch_group_param(&self, name: &str) -> OfxResult<GroupParam> {
        Ok(GroupParam { base: self.fetch_raw(name, ParamKind::Group)? })
    }

    pub fn fetch_page_param(&self, name: &str) -> OfxResult<PageParam> {
        Ok(PageParam { base: self.fetch_raw(name, ParamKind::Page)? })
    }

    pub fn fetch_push_button_param(&self, name: &str) -> OfxResult<PushButtonParam> {
        Ok(PushButtonParam { base: self.fetch_raw(name, ParamKind::PushButton)? })
    }

    pub fn fetch_parametric_param(&self, name: &str) -> OfxResult<ParametricParam> {
        Ok(ParametricParam { base: self.fetch_raw(name, ParamKind::Parametric)? })
    }

    /// Brackets a group of parameter writes into a single host undo step.
    pub fn begin_edit_block(&self, name: &str) -> OfxResult<()> {
        let f = suite_fn!(self.suites.parameter(), param_edit_begin)?;
        let c_name = CString::new(name)
            .map_err(|_| Error::TypeRequest("edit block name contains NUL".into()))?;
        check_status(unsafe { f(self.handle, c_name.as_ptr()) })
    }

    pub fn end_edit_block(&self) -> OfxResult<()> {
        let f = suite_fn!(self.suites.parameter(), param_edit_end)?;
        check_status(unsafe { f(self.handle) })
    }
}
