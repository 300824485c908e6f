//! A small color management engine: YAML configs describing color
//! spaces, displays and views; transforms between them; and processors
//! that apply a baked pipeline to packed float pixels.
//!
//! The entry point is [`Config`]: load one with [`Config::from_file`]
//! or take the process-wide [`Config::current`], then bake a
//! [`Transform`] into a [`Processor`] and apply it to image buffers.

pub mod colorspace;
pub mod config;
pub mod context;
pub mod error;
pub mod lut;
pub mod processor;
pub mod transform;

pub use colorspace::{ColorSpace, Encoding, Step};
pub use config::{
    Config, Display, View, ACTIVE_DISPLAYS_ENVVAR, ACTIVE_VIEWS_ENVVAR, CONFIG_ENVVAR,
    RAW_CONFIG,
};
pub use context::Context;
pub use error::{Error, Result};
pub use lut::Lut1d;
pub use processor::Processor;
pub use transform::{
    ColorSpaceTransform, Direction, DisplayViewTransform, FileTransform, GroupTransform,
    Transform,
};
