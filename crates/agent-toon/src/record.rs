//! Typed records — validate recovered data against a caller-owned schema.
//!
//! Extraction is deliberately lenient; this is the strict step after it. A
//! record is any `serde::Deserialize` type, so required fields, enums and
//! numeric ranges are whatever the caller's type says they are.
//!
//! ```
//! use agent_toon::parse_record;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Risk {
//!     title: String,
//!     severity: u8,
//! }
//!
//! let risk: Risk = parse_record("Here you go:\n```toon\ntitle: Sync\nseverity: 3\n```").unwrap();
//! assert_eq!(risk.title, "Sync");
//! assert_eq!(risk.severity, 3);
//! ```

use crate::error::{kind_name, Result, ToonError};
use crate::extract::{json_fenced_block, parse_response};
use crate::types::Mapping;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse text as a JSON object, strictly.
///
/// Uses the first ```` ```json ```` fenced block when there is one, otherwise
/// the whole text.
pub fn parse_json_object(text: &str) -> Result<Mapping> {
    let body = json_fenced_block(text).unwrap_or(text).trim();
    match serde_json::from_str::<Value>(body)? {
        Value::Object(map) => Ok(map),
        other => Err(ToonError::NotAMapping {
            found: kind_name(&other),
        }),
    }
}

/// Convert a mapping into a typed record.
pub fn from_mapping<T: DeserializeOwned>(data: Mapping) -> Result<T> {
    serde_json::from_value(Value::Object(data)).map_err(|e| ToonError::Schema(e.to_string()))
}

/// Recover a typed record from a model response.
///
/// The outermost `{ ... }` span is tried as JSON first, since models often
/// answer in JSON regardless of the requested format. Otherwise the text goes
/// through [`parse_response`]; an empty result is
/// [`ToonError::NoStructuredData`].
pub fn parse_record<T: DeserializeOwned>(text: &str) -> Result<T> {
    if let Some(span) = json_span(text) {
        match serde_json::from_str::<T>(span) {
            Ok(record) => return Ok(record),
            Err(e) => debug!("record: embedded JSON rejected ({e}), trying extraction"),
        }
    }

    let data = parse_response(text);
    if data.is_empty() {
        return Err(ToonError::NoStructuredData);
    }
    from_mapping(data)
}

/// From the first `{` to the last `}`.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
