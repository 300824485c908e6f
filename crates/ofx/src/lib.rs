//! A typed plugin-side framework over the OFX image-effect C API.
//!
//! A plugin implements [`PluginFactory`] for its describe-time surface and
//! [`ImageEffect`] for per-instance behavior, then exports itself with
//! [`export_ofx!`]. Everything else, property marshalling, parameter and
//! clip wrappers, action unmarshalling, threading, and error-to-status
//! mapping, lives in here.
//!
//! The raw ABI (handles, suites, property name constants) is the
//! `ofx-sys` crate, re-exported as [`ofx_sys`].

pub use ofx_sys;

pub mod clip;
pub mod dispatch;
pub mod enums;
pub mod error;
mod export;
pub mod host;
pub mod image_effect;
pub mod interact;
pub mod logging;
pub mod memory;
pub mod param;
pub mod property;
pub mod suites;
pub mod thread;
mod validation;

pub use clip::{Clip, ClipDescriptor, Image};
pub use enums::{
    BitDepth, CacheInvalidation, ChangeReason, Context, DoubleType, Field, FieldExtraction,
    KeySearch, MessageReply, MessageType, NativeOrigin, ParamKind, PixelComponent,
    PreMultiplication, RenderSafety, StringType,
};
pub use error::{Error, OfxResult};
pub use host::HostDescription;
pub use image_effect::{
    ClipPreferencesSetter, CustomParamInterpArgs, EffectDescriptor, EffectInstance,
    FramesNeededArgs, FramesNeededSetter, IdentityResult, ImageEffect, InstanceChangedArgs,
    IsIdentityArgs, PluginFactory, RegionOfDefinitionArgs, RegionsOfInterestArgs,
    RegionsOfInterestSetter, RenderArgs, SequenceRenderArgs, Texture,
};
pub use interact::{interact_entry, DrawArgs, Interact, InteractInstance, KeyArgs, PenArgs};
pub use memory::ImageMemory;
pub use param::{ParamDescriptor, ParamSet, ParamSetDescriptor};
pub use property::PropertySet;
pub use suites::Suites;
pub use thread::{HostMutex, PixelProcessor, Processor};
