//! Error types for the fallible edges of agent-toon.
//!
//! `loads`, `dumps` and `parse_response` never fail: they degrade gracefully on
//! malformed model output. Errors only arise when a caller asks for something
//! stricter, such as a JSON object or a typed record.

use thiserror::Error;

/// Errors returned by strict parsing and record validation.
#[derive(Error, Debug)]
pub enum ToonError {
    /// The input was not valid JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Structured data was found but its root is not a mapping.
    #[error("expected a mapping at the root, found {found}")]
    NotAMapping { found: &'static str },

    /// The mapping does not match the shape of the requested record.
    #[error("schema validation failed: {0}")]
    Schema(String),

    /// No extraction strategy recovered any fields from the text.
    #[error("no structured data found in response")]
    NoStructuredData,
}

/// Convenience alias used throughout agent-toon.
pub type Result<T> = std::result::Result<T, ToonError>;

/// Human-readable name of a JSON value's kind, for error messages.
pub(crate) fn kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "mapping",
    }
}
