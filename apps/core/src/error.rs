use std::io;
use thiserror::Error;

use crate::actors::messages::ActorError;

/// Engine-wide error type, consolidating all possible errors into a single enum.
///
/// Malformed chat input never ends up here: invalid messages, override lines and
/// template tokens degrade silently instead.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents errors specific to the actor system, such as a stopped engine.
    #[error("Actor error: {0}")]
    Actor(#[from] ActorError),

    /// Represents data validation errors (e.g., a host snapshot that is not a JSON object).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors, such as a missing settings file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents a failure reported by the host sink while publishing.
    #[error("Sink error: {0}")]
    Sink(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Actor(e) => AppError::Actor(e.clone()),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Sink(s) => AppError::Sink(s.clone()),
            AppError::Timeout(s) => AppError::Timeout(s.clone()),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_preserves_variant_and_message() {
        let err = AppError::Sink("display offline".to_string());
        let cloned = err.clone();
        assert!(matches!(cloned, AppError::Sink(ref s) if s == "display offline"));
        assert_eq!(err.to_string(), "Sink error: display offline");
    }

    #[test]
    fn test_json_error_maps_to_validation() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AppError = json_err.into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_config_error_maps_to_config() {
        let err: AppError = config::ConfigError::Message("bad source".to_string()).into();
        assert!(matches!(err, AppError::Config(ref s) if s == "bad source"));
    }

    #[test]
    fn test_actor_error_converts() {
        let err: AppError = ActorError::Stopped.into();
        assert_eq!(err.to_string(), "Actor error: Engine is stopped");
    }
}
