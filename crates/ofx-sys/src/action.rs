//! Action names dispatched through the plugin's main entry point, and the
//! interact actions dispatched through an interact's own entry point.

use std::ffi::CStr;

pub const LOAD: &CStr = c"OfxActionLoad";
pub const UNLOAD: &CStr = c"OfxActionUnload";
pub const DESCRIBE: &CStr = c"OfxActionDescribe";
pub const DESCRIBE_IN_CONTEXT: &CStr = c"OfxImageEffectActionDescribeInContext";
pub const CREATE_INSTANCE: &CStr = c"OfxActionCreateInstance";
pub const DESTROY_INSTANCE: &CStr = c"OfxActionDestroyInstance";
pub const PURGE_CACHES: &CStr = c"OfxActionPurgeCaches";
pub const SYNC_PRIVATE_DATA: &CStr = c"OfxActionSyncPrivateData";
pub const INSTANCE_CHANGED: &CStr = c"OfxActionInstanceChanged";
pub const BEGIN_INSTANCE_CHANGED: &CStr = c"OfxActionBeginInstanceChanged";
pub const END_INSTANCE_CHANGED: &CStr = c"OfxActionEndInstanceChanged";
pub const BEGIN_INSTANCE_EDIT: &CStr = c"OfxActionBeginInstanceEdit";
pub const END_INSTANCE_EDIT: &CStr = c"OfxActionEndInstanceEdit";

pub const GET_REGION_OF_DEFINITION: &CStr = c"OfxImageEffectActionGetRegionOfDefinition";
pub const GET_REGIONS_OF_INTEREST: &CStr = c"OfxImageEffectActionGetRegionsOfInterest";
pub const GET_FRAMES_NEEDED: &CStr = c"OfxImageEffectActionGetFramesNeeded";
pub const GET_CLIP_PREFERENCES: &CStr = c"OfxImageEffectActionGetClipPreferences";
pub const GET_TIME_DOMAIN: &CStr = c"OfxImageEffectActionGetTimeDomain";
pub const IS_IDENTITY: &CStr = c"OfxImageEffectActionIsIdentity";
pub const RENDER: &CStr = c"OfxImageEffectActionRender";
pub const BEGIN_SEQUENCE_RENDER: &CStr = c"OfxImageEffectActionBeginSequenceRender";
pub const END_SEQUENCE_RENDER: &CStr = c"OfxImageEffectActionEndSequenceRender";

pub const OPENGL_CONTEXT_ATTACHED: &CStr = c"OfxActionOpenGLContextAttached";
pub const OPENGL_CONTEXT_DETACHED: &CStr = c"OfxActionOpenGLContextDetached";

// Interact actions
pub const INTERACT_DRAW: &CStr = c"OfxInteractActionDraw";
pub const INTERACT_PEN_MOTION: &CStr = c"OfxInteractActionPenMotion";
pub const INTERACT_PEN_DOWN: &CStr = c"OfxInteractActionPenDown";
pub const INTERACT_PEN_UP: &CStr = c"OfxInteractActionPenUp";
pub const INTERACT_KEY_DOWN: &CStr = c"OfxInteractActionKeyDown";
pub const INTERACT_KEY_UP: &CStr = c"OfxInteractActionKeyUp";
pub const INTERACT_KEY_REPEAT: &CStr = c"OfxInteractActionKeyRepeat";
pub const INTERACT_GAIN_FOCUS: &CStr = c"OfxInteractActionGainFocus";
pub const INTERACT_LOSE_FOCUS: &CStr = c"OfxInteractActionLoseFocus";
