//! Well-known property value strings.
//!
//! Enumerated properties carry one of a fixed set of strings; the `ofx`
//! crate converts between these and its typed enums.

use std::ffi::CStr;

// Object types (OfxPropType values)
pub const TYPE_IMAGE_EFFECT_HOST: &CStr = c"OfxTypeImageEffectHost";
pub const TYPE_IMAGE_EFFECT: &CStr = c"OfxTypeImageEffect";
pub const TYPE_IMAGE_EFFECT_INSTANCE: &CStr = c"OfxTypeImageEffectInstance";
pub const TYPE_PARAMETER: &CStr = c"OfxTypeParameter";
pub const TYPE_PARAMETER_INSTANCE: &CStr = c"OfxTypeParameterInstance";
pub const TYPE_CLIP: &CStr = c"OfxTypeClip";
pub const TYPE_IMAGE: &CStr = c"OfxTypeImage";

// Contexts
pub const CONTEXT_GENERATOR: &CStr = c"OfxImageEffectContextGenerator";
pub const CONTEXT_FILTER: &CStr = c"OfxImageEffectContextFilter";
pub const CONTEXT_TRANSITION: &CStr = c"OfxImageEffectContextTransition";
pub const CONTEXT_PAINT: &CStr = c"OfxImageEffectContextPaint";
pub const CONTEXT_GENERAL: &CStr = c"OfxImageEffectContextGeneral";
pub const CONTEXT_RETIMER: &CStr = c"OfxImageEffectContextRetimer";

// Pixel components
pub const COMPONENT_NONE: &CStr = c"OfxImageComponentNone";
pub const COMPONENT_RGBA: &CStr = c"OfxImageComponentRGBA";
pub const COMPONENT_RGB: &CStr = c"OfxImageComponentRGB";
pub const COMPONENT_ALPHA: &CStr = c"OfxImageComponentAlpha";
pub const COMPONENT_CUSTOM: &CStr = c"OfxImageComponentCustom";

// Pixel depths
pub const BIT_DEPTH_NONE: &CStr = c"OfxBitDepthNone";
pub const BIT_DEPTH_BYTE: &CStr = c"OfxBitDepthByte";
pub const BIT_DEPTH_SHORT: &CStr = c"OfxBitDepthShort";
pub const BIT_DEPTH_FLOAT: &CStr = c"OfxBitDepthFloat";

// Fields and field extraction
pub const FIELD_NONE: &CStr = c"OfxImageFieldNone";
pub const FIELD_BOTH: &CStr = c"OfxImageFieldBoth";
pub const FIELD_LOWER: &CStr = c"OfxImageFieldLower";
pub const FIELD_UPPER: &CStr = c"OfxImageFieldUpper";
pub const FIELD_SINGLE: &CStr = c"OfxImageFieldSingle";
pub const FIELD_DOUBLED: &CStr = c"OfxImageFieldDoubled";

// Premultiplication
pub const IMAGE_OPAQUE: &CStr = c"OfxImageOpaque";
pub const IMAGE_PRE_MULTIPLIED: &CStr = c"OfxImagePreMultiplied";
pub const IMAGE_UN_PRE_MULTIPLIED: &CStr = c"OfxImageUnPreMultiplied";

// Render thread safety
pub const RENDER_UNSAFE: &CStr = c"OfxImageEffectRenderUnsafe";
pub const RENDER_INSTANCE_SAFE: &CStr = c"OfxImageEffectRenderInstanceSafe";
pub const RENDER_FULLY_SAFE: &CStr = c"OfxImageEffectRenderFullySafe";

// Native origin of the host's coordinate system
pub const NATIVE_ORIGIN_BOTTOM_LEFT: &CStr = c"OfxImageEffectHostPropNativeOriginBottomLeft";
pub const NATIVE_ORIGIN_TOP_LEFT: &CStr = c"OfxImageEffectHostPropNativeOriginTopLeft";
pub const NATIVE_ORIGIN_CENTER: &CStr = c"OfxImageEffectHostPropNativeOriginCenter";

// Change reasons
pub const CHANGE_USER_EDITED: &CStr = c"OfxChangeUserEdited";
pub const CHANGE_PLUGIN_EDITED: &CStr = c"OfxChangePluginEdited";
pub const CHANGE_TIME: &CStr = c"OfxChangeTime";

// Parameter types
pub const PARAM_TYPE_INTEGER: &CStr = c"OfxParamTypeInteger";
pub const PARAM_TYPE_INTEGER_2D: &CStr = c"OfxParamTypeInteger2D";
pub const PARAM_TYPE_INTEGER_3D: &CStr = c"OfxParamTypeInteger3D";
pub const PARAM_TYPE_DOUBLE: &CStr = c"OfxParamTypeDouble";
pub const PARAM_TYPE_DOUBLE_2D: &CStr = c"OfxParamTypeDouble2D";
pub const PARAM_TYPE_DOUBLE_3D: &CStr = c"OfxParamTypeDouble3D";
pub const PARAM_TYPE_RGB: &CStr = c"OfxParamTypeRGB";
pub const PARAM_TYPE_RGBA: &CStr = c"OfxParamTypeRGBA";
pub const PARAM_TYPE_BOOLEAN: &CStr = c"OfxParamTypeBoolean";
pub const PARAM_TYPE_CHOICE: &CStr = c"OfxParamTypeChoice";
pub const PARAM_TYPE_STRING: &CStr = c"OfxParamTypeString";
pub const PARAM_TYPE_CUSTOM: &CStr = c"OfxParamTypeCustom";
pub const PARAM_TYPE_GROUP: &CStr = c"OfxParamTypeGroup";
pub const PARAM_TYPE_PAGE: &CStr = c"OfxParamTypePage";
pub const PARAM_TYPE_PUSH_BUTTON: &CStr = c"OfxParamTypePushButton";
pub const PARAM_TYPE_PARAMETRIC: &CStr = c"OfxParamTypeParametric";

// Double parameter sub-types
pub const DOUBLE_TYPE_PLAIN: &CStr = c"OfxParamDoubleTypePlain";
pub const DOUBLE_TYPE_ANGLE: &CStr = c"OfxParamDoubleTypeAngle";
pub const DOUBLE_TYPE_SCALE: &CStr = c"OfxParamDoubleTypeScale";
pub const DOUBLE_TYPE_TIME: &CStr = c"OfxParamDoubleTypeTime";
pub const DOUBLE_TYPE_ABSOLUTE_TIME: &CStr = c"OfxParamDoubleTypeAbsoluteTime";
pub const DOUBLE_TYPE_X: &CStr = c"OfxParamDoubleTypeX";
pub const DOUBLE_TYPE_X_ABSOLUTE: &CStr = c"OfxParamDoubleTypeXAbsolute";
pub const DOUBLE_TYPE_Y: &CStr = c"OfxParamDoubleTypeY";
pub const DOUBLE_TYPE_Y_ABSOLUTE: &CStr = c"OfxParamDoubleTypeYAbsolute";
pub const DOUBLE_TYPE_XY: &CStr = c"OfxParamDoubleTypeXY";
pub const DOUBLE_TYPE_XY_ABSOLUTE: &CStr = c"OfxParamDoubleTypeXYAbsolute";
pub const DOUBLE_TYPE_NORMALISED_X: &CStr = c"OfxParamDoubleTypeNormalisedX";
pub const DOUBLE_TYPE_NORMALISED_Y: &CStr = c"OfxParamDoubleTypeNormalisedY";
pub const DOUBLE_TYPE_NORMALISED_X_ABSOLUTE: &CStr = c"OfxParamDoubleTypeNormalisedXAbsolute";
pub const DOUBLE_TYPE_NORMALISED_Y_ABSOLUTE: &CStr = c"OfxParamDoubleTypeNormalisedYAbsolute";
pub const DOUBLE_TYPE_NORMALISED_XY: &CStr = c"OfxParamDoubleTypeNormalisedXY";
pub const DOUBLE_TYPE_NORMALISED_XY_ABSOLUTE: &CStr = c"OfxParamDoubleTypeNormalisedXYAbsolute";

// Coordinate systems for spatial double defaults
pub const COORDINATES_CANONICAL: &CStr = c"OfxParamCoordinatesCanonical";
pub const COORDINATES_NORMALISED: &CStr = c"OfxParamCoordinatesNormalised";

// String parameter modes
pub const STRING_IS_SINGLE_LINE: &CStr = c"OfxParamStringIsSingleLine";
pub const STRING_IS_MULTI_LINE: &CStr = c"OfxParamStringIsMultiLine";
pub const STRING_IS_FILE_PATH: &CStr = c"OfxParamStringIsFilePath";
pub const STRING_IS_DIRECTORY_PATH: &CStr = c"OfxParamStringIsDirectoryPath";
pub const STRING_IS_LABEL: &CStr = c"OfxParamStringIsLabel";
pub const STRING_IS_RICH_TEXT_FORMAT: &CStr = c"OfxParamStringIsRichTextFormat";

// Cache invalidation
pub const INVALIDATE_VALUE_CHANGE: &CStr = c"OfxParamInvalidateValueChange";
pub const INVALIDATE_VALUE_CHANGE_TO_END: &CStr = c"OfxParamInvalidateValueChangeToEnd";
pub const INVALIDATE_ALL: &CStr = c"OfxParamInvalidateAll";

// Page layout pseudo-children
pub const PAGE_SKIP_ROW: &CStr = c"OfxParamPageSkipRow";
pub const PAGE_SKIP_COLUMN: &CStr = c"OfxParamPageSkipColumn";

// Message types
pub const MESSAGE_FATAL: &CStr = c"OfxMessageFatal";
pub const MESSAGE_ERROR: &CStr = c"OfxMessageError";
pub const MESSAGE_WARNING: &CStr = c"OfxMessageWarning";
pub const MESSAGE_MESSAGE: &CStr = c"OfxMessageMessage";
pub const MESSAGE_LOG: &CStr = c"OfxMessageLog";
pub const MESSAGE_QUESTION: &CStr = c"OfxMessageQuestion";

// Mandated clip names
pub const CLIP_SOURCE: &CStr = c"Source";
pub const CLIP_OUTPUT: &CStr = c"Output";

// OpenGL texture depths (the GL suite adds a half-float depth)
pub const BIT_DEPTH_HALF: &CStr = c"OfxBitDepthHalf";
