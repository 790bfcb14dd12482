//! TOON encoder — serializes a [`Mapping`] into TOON text.
//!
//! The output is what [`loads`](crate::loads) reads back:
//!
//! - **Nested mappings**: `key:` followed by the children two spaces deeper
//! - **Tables**: a list whose first element is a non-empty mapping becomes
//!   `key:`, a header row of that element's keys, and one delimited row per
//!   element
//! - **Scalar lists**: `key:` followed by `- item` lines (or the single-line
//!   `key: a, b, c` form with [`ListStyle::Inline`])
//! - **Empty lists**: `key: []`
//! - **Scalars**: `key: value`, quoted only when the bare text would decode
//!   to something else
//!
//! # Example
//! ```
//! use agent_toon::{dumps, Mapping};
//! use serde_json::json;
//!
//! let data: Mapping = serde_json::from_value(json!({
//!     "title": "Launch plan",
//!     "risks": [
//!         {"name": "Scope creep", "severity": 3},
//!         {"name": "Vendor delay", "severity": 2}
//!     ]
//! })).unwrap();
//!
//! assert_eq!(
//!     dumps(&data, 0),
//!     "title: Launch plan\nrisks:\n  name | severity\n  Scope creep | 3\n  Vendor delay | 2"
//! );
//! ```

use crate::error::{kind_name, Result, ToonError};
use crate::scalar::quote_if_needed;
use crate::types::{Delimiter, Mapping};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How lists of scalars are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    /// `key:` followed by one `- item` line per element. Decodes back to a list.
    #[default]
    Block,
    /// `key: a, b, c` on one line. Compact, but decodes back to a single string.
    Inline,
}

/// Formatting options for [`dumps_with`].
///
/// Deserializable so callers can keep it in their own configuration files;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Spaces prepended to every top-level line.
    pub indent: usize,
    /// Table delimiter. Defaults to `|`, the delimiter the decoder prefers.
    pub delimiter: Delimiter,
    pub list_style: ListStyle,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            indent: 0,
            delimiter: Delimiter::Pipe,
            list_style: ListStyle::Block,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comma tables and inline scalar lists, for prompts written against the
    /// older output shape.
    pub fn legacy() -> Self {
        Self {
            indent: 0,
            delimiter: Delimiter::Comma,
            list_style: ListStyle::Inline,
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_list_style(mut self, list_style: ListStyle) -> Self {
        self.list_style = list_style;
        self
    }
}

/// Encode a mapping with default options, every line prefixed by `indent`
/// spaces.
pub fn dumps(data: &Mapping, indent: usize) -> String {
    dumps_with(data, &EncodeOptions::default().with_indent(indent))
}

/// Encode a mapping with explicit options.
pub fn dumps_with(data: &Mapping, options: &EncodeOptions) -> String {
    let mut out = String::new();
    encode_mapping(data, options.indent, options, &mut out);
    out
}

/// Serialize any record into TOON. The record must serialize to a mapping.
pub fn to_toon<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    to_toon_with(value, &EncodeOptions::default())
}

/// [`to_toon`] with explicit options.
pub fn to_toon_with<T: Serialize + ?Sized>(value: &T, options: &EncodeOptions) -> Result<String> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(dumps_with(&map, options)),
        other => Err(ToonError::NotAMapping {
            found: kind_name(&other),
        }),
    }
}

fn encode_mapping(map: &Mapping, indent: usize, options: &EncodeOptions, out: &mut String) {
    for (key, value) in map {
        match value {
            Value::Object(child) => {
                push_line(out, indent, &format!("{key}:"));
                encode_mapping(child, indent + 2, options, out);
            }
            Value::Array(items) if items.is_empty() => {
                push_line(out, indent, &format!("{key}: []"));
            }
            Value::Array(items) if is_table(items) => {
                push_line(out, indent, &format!("{key}:"));
                encode_table(key, items, indent + 2, options.delimiter, out);
            }
            Value::Array(items) => match options.list_style {
                ListStyle::Block => {
                    push_line(out, indent, &format!("{key}:"));
                    for item in items {
                        push_line(out, indent + 2, &format!("- {}", scalar_text(item, None)));
                    }
                }
                ListStyle::Inline => {
                    let joined = items
                        .iter()
                        .map(|item| scalar_text(item, Some(Delimiter::Comma)))
                        .collect::<Vec<_>>()
                        .join(", ");
                    push_line(out, indent, &format!("{key}: {joined}"));
                }
            },
            _ => {
                push_line(out, indent, &format!("{key}: {}", scalar_text(value, None)));
            }
        }
    }
}

/// A list is written as a table when its first element is a mapping with at
/// least one key. `[{}]` has no header to write and falls back to a list.
fn is_table(items: &[Value]) -> bool {
    items
        .first()
        .and_then(Value::as_object)
        .is_some_and(|first| !first.is_empty())
}

/// Header from the first row's keys; later rows are written in that column
/// order with missing fields left empty.
fn encode_table(key: &str, items: &[Value], indent: usize, delimiter: Delimiter, out: &mut String) {
    let headers: Vec<&String> = match items.first().and_then(Value::as_object) {
        Some(first) => first.keys().collect(),
        None => return,
    };
    let separator = delimiter.separator();

    let header_line = headers
        .iter()
        .map(|h| h.as_str())
        .collect::<Vec<_>>()
        .join(separator);
    push_line(out, indent, &header_line);
    // The decoder picks the delimiter from the header, so a single-column pipe
    // table reads back as comma-delimited. Quote for what it will see.
    let active = Delimiter::detect(&header_line);

    for item in items {
        let Some(row) = item.as_object() else {
            debug!("table `{key}`: skipping non-mapping element {item}");
            continue;
        };
        let mut cells = headers
            .iter()
            .map(|h| {
                row.get(h.as_str())
                    .map(|v| scalar_text(v, Some(active)))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(separator);
        // A blank line is skipped by the decoder; keep the row.
        if cells.trim().is_empty() {
            cells = "\"\"".to_string();
        }
        push_line(out, indent, &cells);
    }
}

/// Render a value in scalar position. Nested containers fall back to compact
/// JSON text.
fn scalar_text(value: &Value, delimiter: Option<Delimiter>) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => quote_if_needed(s, delimiter).into_owned(),
        Value::Array(_) | Value::Object(_) => {
            quote_if_needed(&value.to_string(), delimiter).into_owned()
        }
    }
}

/// Floats always keep a `.` so the decoder reads them back as floats.
fn format_number(n: &serde_json::Number) -> String {
    let text = n.to_string();
    if !n.is_f64() || text.contains('.') {
        return text;
    }
    match text.find(['e', 'E']) {
        Some(exp) => format!("{}.0{}", &text[..exp], &text[exp..]),
        None => format!("{text}.0"),
    }
}

fn push_line(out: &mut String, indent: usize, text: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.extend(std::iter::repeat_n(' ', indent));
    out.push_str(text);
}
