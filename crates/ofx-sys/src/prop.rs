//! Property names.
//!
//! Every piece of data the host and plugin exchange is a named, typed,
//! multi-valued property on some property set. The constants below are the
//! wire names; the `ofx` crate maps them to typed accessors. Names are
//! `&CStr` so they can be handed to the property suite without copying.

use std::ffi::CStr;

// ============================================================================
// General properties
// ============================================================================

pub const API_VERSION: &CStr = c"OfxPropAPIVersion";
pub const TYPE: &CStr = c"OfxPropType";
pub const NAME: &CStr = c"OfxPropName";
pub const LABEL: &CStr = c"OfxPropLabel";
pub const SHORT_LABEL: &CStr = c"OfxPropShortLabel";
pub const LONG_LABEL: &CStr = c"OfxPropLongLabel";
pub const VERSION: &CStr = c"OfxPropVersion";
pub const VERSION_LABEL: &CStr = c"OfxPropVersionLabel";
pub const PLUGIN_DESCRIPTION: &CStr = c"OfxPropPluginDescription";
pub const INSTANCE_DATA: &CStr = c"OfxPropInstanceData";
pub const TIME: &CStr = c"OfxPropTime";
pub const IS_INTERACTIVE: &CStr = c"OfxPropIsInteractive";
pub const CHANGE_REASON: &CStr = c"OfxPropChangeReason";
pub const EFFECT_INSTANCE: &CStr = c"OfxPropEffectInstance";
pub const HOST_OS_HANDLE: &CStr = c"OfxPropHostOSHandle";
pub const ICON: &CStr = c"OfxPropIcon";
pub const KEY_SYM: &CStr = c"OfxPropKeySym";
pub const KEY_STRING: &CStr = c"OfxPropKeyString";
pub const PLUGIN_FILE_PATH: &CStr = c"OfxPluginPropFilePath";
pub const PLUGIN_PARAM_PAGE_ORDER: &CStr = c"OfxPluginPropParamPageOrder";

// ============================================================================
// Host capabilities
// ============================================================================

pub const HOST_IS_BACKGROUND: &CStr = c"OfxImageEffectHostPropIsBackground";
pub const HOST_NATIVE_ORIGIN: &CStr = c"OfxImageEffectHostPropNativeOrigin";
pub const HOST_SUPPORTS_CUSTOM_INTERACT: &CStr = c"OfxParamHostPropSupportsCustomInteract";
pub const HOST_SUPPORTS_STRING_ANIMATION: &CStr = c"OfxParamHostPropSupportsStringAnimation";
pub const HOST_SUPPORTS_CHOICE_ANIMATION: &CStr = c"OfxParamHostPropSupportsChoiceAnimation";
pub const HOST_SUPPORTS_BOOLEAN_ANIMATION: &CStr = c"OfxParamHostPropSupportsBooleanAnimation";
pub const HOST_SUPPORTS_CUSTOM_ANIMATION: &CStr = c"OfxParamHostPropSupportsCustomAnimation";
pub const HOST_SUPPORTS_PARAMETRIC_ANIMATION: &CStr =
    c"OfxParamHostPropSupportsParametricAnimation";
pub const HOST_MAX_PARAMETERS: &CStr = c"OfxParamHostPropMaxParameters";
pub const HOST_MAX_PAGES: &CStr = c"OfxParamHostPropMaxPages";
pub const HOST_PAGE_ROW_COLUMN_COUNT: &CStr = c"OfxParamHostPropPageRowColumnCount";

// ============================================================================
// Image-effect properties
// ============================================================================

pub const SUPPORTED_CONTEXTS: &CStr = c"OfxImageEffectPropSupportedContexts";
pub const SUPPORTED_COMPONENTS: &CStr = c"OfxImageEffectPropSupportedComponents";
pub const SUPPORTED_PIXEL_DEPTHS: &CStr = c"OfxImageEffectPropSupportedPixelDepths";
pub const SUPPORTS_OVERLAYS: &CStr = c"OfxImageEffectPropSupportsOverlays";
pub const SUPPORTS_MULTI_RESOLUTION: &CStr = c"OfxImageEffectPropSupportsMultiResolution";
pub const SUPPORTS_TILES: &CStr = c"OfxImageEffectPropSupportsTiles";
pub const TEMPORAL_CLIP_ACCESS: &CStr = c"OfxImageEffectPropTemporalClipAccess";
pub const SUPPORTS_MULTIPLE_CLIP_DEPTHS: &CStr = c"OfxImageEffectPropSupportsMultipleClipDepths";
pub const SUPPORTS_MULTIPLE_CLIP_PARS: &CStr = c"OfxImageEffectPropSupportsMultipleClipPARs";
pub const SETABLE_FRAME_RATE: &CStr = c"OfxImageEffectPropSetableFrameRate";
pub const SETABLE_FIELDING: &CStr = c"OfxImageEffectPropSetableFielding";
pub const SEQUENTIAL_RENDER: &CStr = c"OfxImageEffectInstancePropSequentialRender";
pub const CONTEXT: &CStr = c"OfxImageEffectPropContext";
pub const PLUGIN_HANDLE: &CStr = c"OfxImageEffectPropPluginHandle";
pub const GROUPING: &CStr = c"OfxImageEffectPluginPropGrouping";
pub const SINGLE_INSTANCE: &CStr = c"OfxImageEffectPluginPropSingleInstance";
pub const HOST_FRAME_THREADING: &CStr = c"OfxImageEffectPluginPropHostFrameThreading";
pub const OVERLAY_INTERACT_V1: &CStr = c"OfxImageEffectPluginPropOverlayInteractV1";
pub const FIELD_RENDER_TWICE_ALWAYS: &CStr = c"OfxImageEffectPluginPropFieldRenderTwiceAlways";
pub const RENDER_THREAD_SAFETY: &CStr = c"OfxImageEffectPluginRenderThreadSafety";
pub const CLIP_PREFERENCES_SLAVE_PARAM: &CStr = c"OfxImageEffectPropClipPreferencesSlaveParam";
pub const OPENGL_RENDER_SUPPORTED: &CStr = c"OfxImageEffectPropOpenGLRenderSupported";
pub const OPENGL_ENABLED: &CStr = c"OfxImageEffectPropOpenGLEnabled";
pub const OPENGL_TEXTURE_INDEX: &CStr = c"OfxImageEffectPropOpenGLTextureIndex";
pub const OPENGL_TEXTURE_TARGET: &CStr = c"OfxImageEffectPropOpenGLTextureTarget";

pub const PROJECT_SIZE: &CStr = c"OfxImageEffectPropProjectSize";
pub const PROJECT_OFFSET: &CStr = c"OfxImageEffectPropProjectOffset";
pub const PROJECT_EXTENT: &CStr = c"OfxImageEffectPropProjectExtent";
pub const PROJECT_PIXEL_ASPECT_RATIO: &CStr = c"OfxImageEffectPropProjectPixelAspectRatio";
pub const EFFECT_DURATION: &CStr = c"OfxImageEffectInstancePropEffectDuration";
pub const FRAME_RATE: &CStr = c"OfxImageEffectPropFrameRate";
pub const UNMAPPED_FRAME_RATE: &CStr = c"OfxImageEffectPropUnmappedFrameRate";
pub const FRAME_RANGE: &CStr = c"OfxImageEffectPropFrameRange";
pub const UNMAPPED_FRAME_RANGE: &CStr = c"OfxImageEffectPropUnmappedFrameRange";
pub const FRAME_STEP: &CStr = c"OfxImageEffectPropFrameStep";
pub const FIELD_TO_RENDER: &CStr = c"OfxImageEffectPropFieldToRender";
pub const RENDER_SCALE: &CStr = c"OfxImageEffectPropRenderScale";
pub const RENDER_WINDOW: &CStr = c"OfxImageEffectPropRenderWindow";
pub const SEQUENTIAL_RENDER_STATUS: &CStr = c"OfxImageEffectPropSequentialRenderStatus";
pub const INTERACTIVE_RENDER_STATUS: &CStr = c"OfxImageEffectPropInteractiveRenderStatus";
pub const REGION_OF_DEFINITION: &CStr = c"OfxImageEffectPropRegionOfDefinition";
pub const REGION_OF_INTEREST: &CStr = c"OfxImageEffectPropRegionOfInterest";
pub const PIXEL_DEPTH: &CStr = c"OfxImageEffectPropPixelDepth";
pub const COMPONENTS: &CStr = c"OfxImageEffectPropComponents";
pub const PRE_MULTIPLICATION: &CStr = c"OfxImageEffectPropPreMultiplication";
pub const FRAME_VARYING: &CStr = c"OfxImageEffectFrameVarying";
pub const CONTINUOUS_SAMPLES: &CStr = c"OfxImageClipPropContinuousSamples";

// ============================================================================
// Clip and image properties
// ============================================================================

pub const CLIP_CONNECTED: &CStr = c"OfxImageClipPropConnected";
pub const CLIP_OPTIONAL: &CStr = c"OfxImageClipPropOptional";
pub const CLIP_IS_MASK: &CStr = c"OfxImageClipPropIsMask";
pub const CLIP_FIELD_EXTRACTION: &CStr = c"OfxImageClipPropFieldExtraction";
pub const CLIP_FIELD_ORDER: &CStr = c"OfxImageClipPropFieldOrder";
pub const CLIP_UNMAPPED_PIXEL_DEPTH: &CStr = c"OfxImageClipPropUnmappedPixelDepth";
pub const CLIP_UNMAPPED_COMPONENTS: &CStr = c"OfxImageClipPropUnmappedComponents";
pub const CLIP_PIXEL_ASPECT_RATIO: &CStr = c"OfxImagePropPixelAspectRatio";

pub const IMAGE_DATA: &CStr = c"OfxImagePropData";
pub const IMAGE_BOUNDS: &CStr = c"OfxImagePropBounds";
pub const IMAGE_REGION_OF_DEFINITION: &CStr = c"OfxImagePropRegionOfDefinition";
pub const IMAGE_ROW_BYTES: &CStr = c"OfxImagePropRowBytes";
pub const IMAGE_FIELD: &CStr = c"OfxImagePropField";
pub const IMAGE_UNIQUE_IDENTIFIER: &CStr = c"OfxImagePropUniqueIdentifier";

/// Prefixes for the per-clip property names used during clip-preferences
/// and frames-needed negotiation. The full name embeds the clip name, e.g.
/// `OfxImageClipPropComponents_Output`.
pub const CLIP_COMPONENTS_PREFIX: &str = "OfxImageClipPropComponents_";
pub const CLIP_DEPTH_PREFIX: &str = "OfxImageClipPropDepth_";
pub const CLIP_PAR_PREFIX: &str = "OfxImageClipPropPAR_";
pub const CLIP_ROI_PREFIX: &str = "OfxImageClipPropRoI_";
pub const CLIP_FRAME_RANGE_PREFIX: &str = "OfxImageClipPropFrameRange_";

// ============================================================================
// Parameter properties
// ============================================================================

pub const PARAM_TYPE: &CStr = c"OfxParamPropType";
pub const PARAM_HINT: &CStr = c"OfxParamPropHint";
pub const PARAM_SCRIPT_NAME: &CStr = c"OfxParamPropScriptName";
pub const PARAM_SECRET: &CStr = c"OfxParamPropSecret";
pub const PARAM_ENABLED: &CStr = c"OfxParamPropEnabled";
pub const PARAM_PARENT: &CStr = c"OfxParamPropParent";
pub const PARAM_ANIMATES: &CStr = c"OfxParamPropAnimates";
// Spelled this way in the API.
pub const PARAM_PERSISTANT: &CStr = c"OfxParamPropPersistant";
pub const PARAM_EVALUATE_ON_CHANGE: &CStr = c"OfxParamPropEvaluateOnChange";
pub const PARAM_CAN_UNDO: &CStr = c"OfxParamPropCanUndo";
pub const PARAM_IS_ANIMATING: &CStr = c"OfxParamPropIsAnimating";
pub const PARAM_IS_AUTO_KEYING: &CStr = c"OfxParamPropIsAutoKeying";
pub const PARAM_CACHE_INVALIDATION: &CStr = c"OfxParamPropCacheInvalidation";
pub const PARAM_DEFAULT: &CStr = c"OfxParamPropDefault";
pub const PARAM_MIN: &CStr = c"OfxParamPropMin";
pub const PARAM_MAX: &CStr = c"OfxParamPropMax";
pub const PARAM_DISPLAY_MIN: &CStr = c"OfxParamPropDisplayMin";
pub const PARAM_DISPLAY_MAX: &CStr = c"OfxParamPropDisplayMax";
pub const PARAM_DIMENSION_LABEL: &CStr = c"OfxParamPropDimensionLabel";
pub const PARAM_INCREMENT: &CStr = c"OfxParamPropIncrement";
pub const PARAM_DIGITS: &CStr = c"OfxParamPropDigits";
pub const PARAM_DOUBLE_TYPE: &CStr = c"OfxParamPropDoubleType";
pub const PARAM_DEFAULT_COORDINATE_SYSTEM: &CStr = c"OfxParamPropDefaultCoordinateSystem";
pub const PARAM_SHOW_TIME_MARKER: &CStr = c"OfxParamPropShowTimeMarker";
pub const PARAM_CHOICE_OPTION: &CStr = c"OfxParamPropChoiceOption";
pub const PARAM_STRING_MODE: &CStr = c"OfxParamPropStringMode";
pub const PARAM_STRING_FILE_PATH_EXISTS: &CStr = c"OfxParamPropStringFilePathExists";
pub const PARAM_CUSTOM_INTERP_CALLBACK_V1: &CStr = c"OfxParamPropCustomInterpCallbackV1";
pub const PARAM_CUSTOM_VALUE: &CStr = c"OfxParamPropCustomValue";
pub const PARAM_INTERPOLATION_TIME: &CStr = c"OfxParamPropInterpolationTime";
pub const PARAM_INTERPOLATION_AMOUNT: &CStr = c"OfxParamPropInterpolationAmount";
pub const PARAM_GROUP_OPEN: &CStr = c"OfxParamPropGroupOpen";
pub const PARAM_PAGE_CHILD: &CStr = c"OfxParamPropPageChild";
pub const PARAM_INTERACT_V1: &CStr = c"OfxParamPropInteractV1";
pub const PARAM_INTERACT_SIZE_ASPECT: &CStr = c"OfxParamPropInteractSizeAspect";
pub const PARAM_INTERACT_MINIMUM_SIZE: &CStr = c"OfxParamPropInteractMinimumSize";
pub const PARAM_INTERACT_PREFERED_SIZE: &CStr = c"OfxParamPropInteractPreferedSize";
pub const PARAM_USE_HOST_OVERLAY_HANDLE: &CStr = c"OfxParamPropUseHostOverlayHandle";
pub const PARAM_HAS_HOST_OVERLAY_HANDLE: &CStr = c"OfxParamPropHasHostOverlayHandle";
pub const PARAM_PARAMETRIC_RANGE: &CStr = c"OfxParamPropParametricRange";
pub const PARAM_PARAMETRIC_DIMENSION: &CStr = c"OfxParamPropParametricDimension";
pub const PARAM_PARAMETRIC_UI_COLOUR: &CStr = c"OfxParamPropParametricUIColour";
pub const PARAM_PARAMETRIC_INTERACT_BACKGROUND: &CStr =
    c"OfxParamPropParametricInteractBackground";

// ============================================================================
// Interact properties
// ============================================================================

pub const INTERACT_SLAVE_TO_PARAM: &CStr = c"OfxInteractPropSlaveToParam";
pub const INTERACT_PIXEL_SCALE: &CStr = c"OfxInteractPropPixelScale";
pub const INTERACT_BACKGROUND_COLOUR: &CStr = c"OfxInteractPropBackgroundColour";
pub const INTERACT_SUGGESTED_COLOUR: &CStr = c"OfxInteractPropSuggestedColour";
pub const INTERACT_BIT_DEPTH: &CStr = c"OfxInteractPropBitDepth";
pub const INTERACT_HAS_ALPHA: &CStr = c"OfxInteractPropHasAlpha";
pub const INTERACT_PEN_POSITION: &CStr = c"OfxInteractPropPenPosition";
pub const INTERACT_PEN_VIEWPORT_POSITION: &CStr = c"OfxInteractPropPenViewportPosition";
pub const INTERACT_PEN_PRESSURE: &CStr = c"OfxInteractPropPenPressure";
