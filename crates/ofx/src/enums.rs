//! Typed enums for the string-valued properties of the API, with the
//! stable string mapping in both directions.

use std::ffi::CStr;

use ofx_sys::val;

use crate::error::{Error, OfxResult};

/// A context a plugin can be used in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Generator,
    Filter,
    Transition,
    Paint,
    General,
    Retimer,
}

impl Context {
    pub fn to_cstr(self) -> &'static CStr {
        match self {
            Self::Generator => val::CONTEXT_GENERATOR,
            Self::Filter => val::CONTEXT_FILTER,
            Self::Transition => val::CONTEXT_TRANSITION,
            Self::Paint => val::CONTEXT_PAINT,
            Self::General => val::CONTEXT_GENERAL,
            Self::Retimer => val::CONTEXT_RETIMER,
        }
    }

    pub fn from_cstr(s: &CStr) -> OfxResult<Self> {
        Ok(match s {
            _ if s == val::CONTEXT_GENERATOR => Self::Generator,
            _ if s == val::CONTEXT_FILTER => Self::Filter,
            _ if s == val::CONTEXT_TRANSITION => Self::Transition,
            _ if s == val::CONTEXT_PAINT => Self::Paint,
            _ if s == val::CONTEXT_GENERAL => Self::General,
            _ if s == val::CONTEXT_RETIMER => Self::Retimer,
            _ => return Err(Error::UnknownEnum(s.to_string_lossy().into_owned())),
        })
    }
}

/// Pixel bit depth of an image or clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    None,
    UByte,
    UShort,
    Float,
}

impl BitDepth {
    pub fn to_cstr(self) -> &'static CStr {
        match self {
            Self::None => val::BIT_DEPTH_NONE,
            Self::UByte => val::BIT_DEPTH_BYTE,
            Self::UShort => val::BIT_DEPTH_SHORT,
            Self::Float => val::BIT_DEPTH_FLOAT,
        }
    }

    pub fn from_cstr(s: &CStr) -> OfxResult<Self> {
        Ok(match s {
            _ if s == val::BIT_DEPTH_NONE => Self::None,
            _ if s == val::BIT_DEPTH_BYTE => Self::UByte,
            _ if s == val::BIT_DEPTH_SHORT => Self::UShort,
            _ if s == val::BIT_DEPTH_FLOAT => Self::Float,
            _ => return Err(Error::UnknownEnum(s.to_string_lossy().into_owned())),
        })
    }

    /// Bytes per component, zero for `None`.
    pub fn bytes(self) -> usize {
        match self {
            Self::None => 0,
            Self::UByte => 1,
            Self::UShort => 2,
            Self::Float => 4,
        }
    }
}

/// Pixel component layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelComponent {
    None,
    Rgba,
    Rgb,
    Alpha,
    Custom,
}

impl PixelComponent {
    pub fn to_cstr(self) -> &'static CStr {
        match self {
            Self::None => val::COMPONENT_NONE,
            Self::Rgba => val::COMPONENT_RGBA,
            Self::Rgb => val::COMPONENT_RGB,
            Self::Alpha => val::COMPONENT_ALPHA,
            Self::Custom => val::COMPONENT_CUSTOM,
        }
    }

    pub fn from_cstr(s: &CStr) -> OfxResult<Self> {
        Ok(match s {
            _ if s == val::COMPONENT_NONE => Self::None,
            _ if s == val::COMPONENT_RGBA => Self::Rgba,
            _ if s == val::COMPONENT_RGB => Self::Rgb,
            _ if s == val::COMPONENT_ALPHA => Self::Alpha,
            _ if s == val::COMPONENT_CUSTOM => Self::Custom,
            _ => return Err(Error::UnknownEnum(s.to_string_lossy().into_owned())),
        })
    }

    /// Components per pixel; custom layouts report zero.
    pub fn count(self) -> usize {
        match self {
            Self::None | Self::Custom => 0,
            Self::Rgba => 4,
            Self::Rgb => 3,
            Self::Alpha => 1,
        }
    }
}

/// Which field(s) an image carries, or a clip orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    None,
    Both,
    Lower,
    Upper,
}

impl Field {
    pub fn to_cstr(self) -> &'static CStr {
        match self {
            Self::None => val::FIELD_NONE,
            Self::Both => val::FIELD_BOTH,
            Self::Lower => val::FIELD_LOWER,
            Self::Upper => val::FIELD_UPPER,
        }
    }

    pub fn from_cstr(s: &CStr) -> OfxResult<Self> {
        Ok(match s {
            _ if s == val::FIELD_NONE => Self::None,
            _ if s == val::FIELD_BOTH => Self::Both,
            _ if s == val::FIELD_LOWER => Self::Lower,
            _ if s == val::FIELD_UPPER => Self::Upper,
            _ => return Err(Error::UnknownEnum(s.to_string_lossy().into_owned())),
        })
    }
}

/// How fields are extracted from an interlaced clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldExtraction {
    Both,
    Single,
    Doubled,
}

impl FieldExtraction {
    pub fn to_cstr(self) -> &'static CStr {
        match self {
            Self::Both => val::FIELD_BOTH,
            Self::Single => val::FIELD_SINGLE,
            Self::Doubled => val::FIELD_DOUBLED,
        }
    }
}

/// Alpha premultiplication state of a clip or image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreMultiplication {
    Opaque,
    PreMultiplied,
    UnPreMultiplied,
}

impl PreMultiplication {
    pub fn to_cstr(self) -> &'static CStr {
        match self {
            Self::Opaque => val::IMAGE_OPAQUE,
            Self::PreMultiplied => val::IMAGE_PRE_MULTIPLIED,
            Self::UnPreMultiplied => val::IMAGE_UN_PRE_MULTIPLIED,
        }
    }

    pub fn from_cstr(s: &CStr) -> OfxResult<Self> {
        Ok(match s {
            _ if s == val::IMAGE_OPAQUE => Self::Opaque,
            _ if s == val::IMAGE_PRE_MULTIPLIED => Self::PreMultiplied,
            _ if s == val::IMAGE_UN_PRE_MULTIPLIED => Self::UnPreMultiplied,
            _ => return Err(Error::UnknownEnum(s.to_string_lossy().into_owned())),
        })
    }
}

/// Declared render thread safety of an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSafety {
    Unsafe,
    InstanceSafe,
    FullySafe,
}

impl RenderSafety {
    pub fn to_cstr(self) -> &'static CStr {
        match self {
            Self::Unsafe => val::RENDER_UNSAFE,
            Self::InstanceSafe => val::RENDER_INSTANCE_SAFE,
            Self::FullySafe => val::RENDER_FULLY_SAFE,
        }
    }
}

/// Corner (or center) the host's natural coordinates grow from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeOrigin {
    BottomLeft,
    TopLeft,
    Center,
}

impl NativeOrigin {
    pub fn from_cstr(s: &CStr) -> OfxResult<Self> {
        Ok(match s {
            _ if s == val::NATIVE_ORIGIN_BOTTOM_LEFT => Self::BottomLeft,
            _ if s == val::NATIVE_ORIGIN_TOP_LEFT => Self::TopLeft,
            _ if s == val::NATIVE_ORIGIN_CENTER => Self::Center,
            _ => return Err(Error::UnknownEnum(s.to_string_lossy().into_owned())),
        })
    }
}

/// Why an instance-changed action fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    UserEdited,
    PluginEdited,
    TimeChanged,
}

impl ChangeReason {
    pub fn from_cstr(s: &CStr) -> OfxResult<Self> {
        Ok(match s {
            _ if s == val::CHANGE_USER_EDITED => Self::UserEdited,
            _ if s == val::CHANGE_PLUGIN_EDITED => Self::PluginEdited,
            _ if s == val::CHANGE_TIME => Self::TimeChanged,
            _ => return Err(Error::UnknownEnum(s.to_string_lossy().into_owned())),
        })
    }
}

/// Message classes for the message suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Fatal,
    Error,
    Warning,
    Message,
    Log,
    Question,
}

impl MessageType {
    pub fn to_cstr(self) -> &'static CStr {
        match self {
            Self::Fatal => val::MESSAGE_FATAL,
            Self::Error => val::MESSAGE_ERROR,
            Self::Warning => val::MESSAGE_WARNING,
            Self::Message => val::MESSAGE_MESSAGE,
            Self::Log => val::MESSAGE_LOG,
            Self::Question => val::MESSAGE_QUESTION,
        }
    }
}

/// The host's answer to a message, notably a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageReply {
    Ok,
    Yes,
    No,
    Failed,
}

/// What a value change to a parameter invalidates in the host's caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheInvalidation {
    ValueChange,
    ValueChangeToEnd,
    All,
}

impl CacheInvalidation {
    pub fn to_cstr(self) -> &'static CStr {
        match self {
            Self::ValueChange => val::INVALIDATE_VALUE_CHANGE,
            Self::ValueChangeToEnd => val::INVALIDATE_VALUE_CHANGE_TO_END,
            Self::All => val::INVALIDATE_ALL,
        }
    }
}

/// Interpretation of a double parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleType {
    Plain,
    Angle,
    Scale,
    Time,
    AbsoluteTime,
    X,
    XAbsolute,
    Y,
    YAbsolute,
    XY,
    XYAbsolute,
    NormalisedX,
    NormalisedY,
    NormalisedXAbsolute,
    NormalisedYAbsolute,
    NormalisedXY,
    NormalisedXYAbsolute,
}

impl DoubleType {
    pub fn to_cstr(self) -> &'static CStr {
        match self {
            Self::Plain => val::DOUBLE_TYPE_PLAIN,
            Self::Angle => val::DOUBLE_TYPE_ANGLE,
            Self::Scale => val::DOUBLE_TYPE_SCALE,
            Self::Time => val::DOUBLE_TYPE_TIME,
            Self::AbsoluteTime => val::DOUBLE_TYPE_ABSOLUTE_TIME,
            Self::X => val::DOUBLE_TYPE_X,
            Self::XAbsolute => val::DOUBLE_TYPE_X_ABSOLUTE,
            Self::Y => val::DOUBLE_TYPE_Y,
            Self::YAbsolute => val::DOUBLE_TYPE_Y_ABSOLUTE,
            Self::XY => val::DOUBLE_TYPE_XY,
            Self::XYAbsolute => val::DOUBLE_TYPE_XY_ABSOLUTE,
            Self::NormalisedX => val::DOUBLE_TYPE_NORMALISED_X,
            Self::NormalisedY => val::DOUBLE_TYPE_NORMALISED_Y,
            Self::NormalisedXAbsolute => val::DOUBLE_TYPE_NORMALISED_X_ABSOLUTE,
            Self::NormalisedYAbsolute => val::DOUBLE_TYPE_NORMALISED_Y_ABSOLUTE,
            Self::NormalisedXY => val::DOUBLE_TYPE_NORMALISED_XY,
            Self::NormalisedXYAbsolute => val::DOUBLE_TYPE_NORMALISED_XY_ABSOLUTE,
        }
    }

    /// Whether defaults for this type are in canonical or normalised space.
    pub fn is_spatial(self) -> bool {
        !matches!(
            self,
            Self::Plain | Self::Angle | Self::Scale | Self::Time | Self::AbsoluteTime
        )
    }
}

/// Kind of a string parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringType {
    SingleLine,
    MultiLine,
    FilePath,
    DirectoryPath,
    Label,
    RichTextFormat,
}

impl StringType {
    pub fn to_cstr(self) -> &'static CStr {
        match self {
            Self::SingleLine => val::STRING_IS_SINGLE_LINE,
            Self::MultiLine => val::STRING_IS_MULTI_LINE,
            Self::FilePath => val::STRING_IS_FILE_PATH,
            Self::DirectoryPath => val::STRING_IS_DIRECTORY_PATH,
            Self::Label => val::STRING_IS_LABEL,
            Self::RichTextFormat => val::STRING_IS_RICH_TEXT_FORMAT,
        }
    }
}

/// Direction for a key search around a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySearch {
    Backwards,
    Near,
    Forwards,
}

impl KeySearch {
    pub fn to_raw(self) -> std::os::raw::c_int {
        use ofx_sys::suites::key_search;
        match self {
            Self::Backwards => key_search::BACKWARDS,
            Self::Near => key_search::NEAR,
            Self::Forwards => key_search::FORWARDS,
        }
    }
}

/// The sixteen parameter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Int,
    Int2D,
    Int3D,
    Double,
    Double2D,
    Double3D,
    Rgb,
    Rgba,
    Boolean,
    Choice,
    String,
    Custom,
    Group,
    Page,
    PushButton,
    Parametric,
}

impl ParamKind {
    pub fn to_cstr(self) -> &'static CStr {
        match self {
            Self::Int => val::PARAM_TYPE_INTEGER,
            Self::Int2D => val::PARAM_TYPE_INTEGER_2D,
            Self::Int3D => val::PARAM_TYPE_INTEGER_3D,
            Self::Double => val::PARAM_TYPE_DOUBLE,
            Self::Double2D => val::PARAM_TYPE_DOUBLE_2D,
            Self::Double3D => val::PARAM_TYPE_DOUBLE_3D,
            Self::Rgb => val::PARAM_TYPE_RGB,
            Self::Rgba => val::PARAM_TYPE_RGBA,
            Self::Boolean => val::PARAM_TYPE_BOOLEAN,
            Self::Choice => val::PARAM_TYPE_CHOICE,
            Self::String => val::PARAM_TYPE_STRING,
            Self::Custom => val::PARAM_TYPE_CUSTOM,
            Self::Group => val::PARAM_TYPE_GROUP,
            Self::Page => val::PARAM_TYPE_PAGE,
            Self::PushButton => val::PARAM_TYPE_PUSH_BUTTON,
            Self::Parametric => val::PARAM_TYPE_PARAMETRIC,
        }
    }

    pub fn from_cstr(s: &CStr) -> OfxResult<Self> {
        Ok(match s {
            _ if s == val::PARAM_TYPE_INTEGER => Self::Int,
            _ if s == val::PARAM_TYPE_INTEGER_2D => Self::Int2D,
            _ if s == val::PARAM_TYPE_INTEGER_3D => Self::Int3D,
            _ if s == val::PARAM_TYPE_DOUBLE => Self::Double,
            _ if s == val::PARAM_TYPE_DOUBLE_2D => Self::Double2D,
            _ if s == val::PARAM_TYPE_DOUBLE_3D => Self::Double3D,
            _ if s == val::PARAM_TYPE_RGB => Self::Rgb,
            _ if s == val::PARAM_TYPE_RGBA => Self::Rgba,
            _ if s == val::PARAM_TYPE_BOOLEAN => Self::Boolean,
            _ if s == val::PARAM_TYPE_CHOICE => Self::Choice,
            _ if s == val::PARAM_TYPE_STRING => Self::String,
            _ if s == val::PARAM_TYPE_CUSTOM => Self::Custom,
            _ if s == val::PARAM_TYPE_GROUP => Self::Group,
            _ if s == val::PARAM_TYPE_PAGE => Self::Page,
            _ if s == val::PARAM_TYPE_PUSH_BUTTON => Self::PushButton,
            _ if s == val::PARAM_TYPE_PARAMETRIC => Self::Parametric,
            _ => return Err(Error::UnknownEnum(s.to_string_lossy().into_owned())),
        })
    }

    /// Number of animated dimensions; zero for kinds that carry no value.
    pub fn dimensions(self) -> usize {
        match self {
            Self::Int | Self::Double | Self::Boolean | Self::Choice | Self::String
            | Self::Custom => 1,
            Self::Int2D | Self::Double2D => 2,
            Self::Int3D | Self::Double3D | Self::Rgb => 3,
            Self::Rgba => 4,
            Self::Group | Self::Page | Self::PushButton | Self::Parametric => 0,
        }
    }

    /// Whether the kind carries an animatable value at all.
    pub fn has_value(self) -> bool {
        self.dimensions() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_round_trips() {
        for ctx in [
            Context::Generator,
            Context::Filter,
            Context::Transition,
            Context::Paint,
            Context::General,
            Context::Retimer,
        ] {
            assert_eq!(Context::from_cstr(ctx.to_cstr()).unwrap(), ctx);
        }
    }

    #[test]
    fn unknown_string_is_an_error() {
        assert!(Context::from_cstr(c"OfxImageEffectContextBogus").is_err());
        assert!(BitDepth::from_cstr(c"OfxBitDepthDouble").is_err());
    }

    #[test]
    fn upper_field_string_maps_to_upper() {
        // The historical support code folded the upper-field string to
        // Lower on the image path; the mapping is now uniform.
        assert_eq!(Field::from_cstr(c"OfxImageFieldUpper").unwrap(), Field::Upper);
    }

    #[test]
    fn param_kind_dimensions() {
        assert_eq!(ParamKind::Rgba.dimensions(), 4);
        assert_eq!(ParamKind::Double3D.dimensions(), 3);
        assert_eq!(ParamKind::PushButton.dimensions(), 0);
        assert!(!ParamKind::Page.has_value());
        assert!(ParamKind::Custom.has_value());
    }

    #[test]
    fn pixel_sizes() {
        assert_eq!(BitDepth::Float.bytes(), 4);
        assert_eq!(PixelComponent::Rgba.count(), 4);
        // Custom layouts have no statically known pixel size.
        assert_eq!(PixelComponent::Custom.count(), 0);
    }
}
