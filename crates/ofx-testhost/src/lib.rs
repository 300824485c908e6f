//! An in-process OFX host for exercising plugins without a compositing
//! application. It publishes real suites over plain Rust objects, spawns
//! real threads, and records messages and progress so tests can assert
//! on what a plugin did.

pub mod effect;
pub mod host;
pub mod misc;
pub mod param;
pub mod props;
pub mod threading;

pub use effect::{ClipObj, EffectObj};
pub use host::MockHost;
pub use misc::{
    set_message_reply, set_progress_cancelled, set_timeline, take_messages, take_progress,
    take_redraws, timeline_time, MessageRecord, ProgressEvent,
};
pub use param::{Param, ParamSetObj};
pub use props::PropSet;
pub use threading::{cpu_count, set_cpu_count};
