//! ChatDigest core: a windowed chat-summarization engine.
//!
//! Buffers live chat messages, classifies each window with keyword rules and
//! publishes a bounded-length summary plus a structured bucket string.

pub mod actors;
pub mod buffer;
pub mod digest;
pub mod error;
pub mod models;
pub mod settings;

pub use actors::{ChannelSink, SchedulerState, SinkEvent, SummaryEngine, SummarySink, TracingSink};
pub use error::AppError;
pub use models::{ChatMessage, SummaryResult};
pub use settings::{Settings, SettingsInput};

#[cfg(test)]
mod tests;
