//! Error types for drill-core.
//!
//! Only loading and configuration can fail. Validation and session
//! transitions always produce a conservative outcome instead of an error.

use thiserror::Error;

/// Result type alias using DrillError.
pub type Result<T> = std::result::Result<T, DrillError>;

/// Errors that can occur while loading drill data or building a session.
#[derive(Debug, Error)]
pub enum DrillError {
    #[error("invalid session config: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid concept dictionary: {0}")]
    Dictionary(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let error = DrillError::InvalidConfig {
            field: "initial_lives",
            reason: "must be at least 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "invalid session config: initial_lives must be at least 1"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let error: DrillError = parse.unwrap_err().into();
        assert!(matches!(error, DrillError::Json(_)));
    }
}
