//! Error types for corpus ingestion and payload export
//!
//! Missing transition evidence is never an error: lookups and context
//! assembly return `Option`s instead. Only malformed input and broken
//! export invariants surface here.

use thiserror::Error;

/// Rejection of a corpus whose shape is not a list of sign sequences
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Input JSON must be a list of sequences or an object with `sequences` (got {found})")]
    InvalidShape { found: &'static str },

    #[error("Sequence at index {index} is not a list (got {found})")]
    NotASequence { index: usize, found: &'static str },
}

/// Errors raised by the statistics pipeline
#[derive(Debug, Error)]
pub enum SignstatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Non-finite transition probability for '{key}'")]
    NonFiniteProbability { key: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for statistics pipeline operations
pub type Result<T> = std::result::Result<T, SignstatError>;

/// Human-readable name of a JSON value's kind, for error messages
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_message_names_position() {
        let err = ValidationError::NotASequence {
            index: 3,
            found: "string",
        };
        assert_eq!(
            err.to_string(),
            "Sequence at index 3 is not a list (got string)"
        );
    }

    #[test]
    fn test_validation_converts_into_pipeline_error() {
        let err: SignstatError = ValidationError::InvalidShape { found: "number" }.into();
        assert!(err.to_string().contains("got number"));
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&json!(null)), "null");
        assert_eq!(json_kind(&json!([1])), "array");
        assert_eq!(json_kind(&json!({"a": 1})), "object");
        assert_eq!(json_kind(&json!(1.5)), "number");
    }
}
