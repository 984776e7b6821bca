//! # Actor System
//!
//! The windowed scheduler runs as a single actor task. `SummaryEngine` is its
//! cloneable handle; outbound publishing goes through the `SummarySink` trait.

pub mod engine;
pub mod messages;
pub mod sinks;
pub mod traits;

pub use engine::SummaryEngine;
pub use messages::{ActorError, CycleTrigger, EngineStatus, SchedulerState};
pub use sinks::{ChannelSink, SinkEvent, TracingSink};
pub use traits::SummarySink;
