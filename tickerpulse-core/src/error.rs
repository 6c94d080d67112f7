//! Errors raised by core input handling

use thiserror::Error;

/// Errors from normalizing caller-supplied input
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("post batch must be a JSON array, got {0}")]
    NotASequence(&'static str),

    #[error("post at index {index} has no usable text field")]
    MissingText { index: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Name of a JSON value's kind, for error messages
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
