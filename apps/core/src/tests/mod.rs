//! Test Module
//!
//! ## Test Categories
//! - `digest_tests`: rule compilation, classification and rendering of one window
//! - `engine_tests`: scheduler ticks, forced cycles, reconfiguration and shutdown
//! - `settings_tests`: configuration snapshots, files and environment variables

pub mod digest_tests;
pub mod settings_tests;
