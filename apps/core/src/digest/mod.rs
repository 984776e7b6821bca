//! # Digest Module
//!
//! Keyword-based summarization of one chat window. No LLM involved.
//!
//! ## Components
//! - `rules`: category rule compilation (built-in lists + overrides)
//! - `classifier`: user-level and message-level classification
//! - `template`: placeholder scanning and substitution
//! - `renderer`: ranking, category lines, truncation and the structured string

pub mod classifier;
pub mod renderer;
pub mod rules;
pub mod template;

pub use classifier::{classify, Classification, CategoryUsers};
pub use renderer::SummaryRenderer;
pub use rules::{CategoryRule, RuleSet};
pub use template::Template;
