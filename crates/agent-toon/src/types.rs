//! Shared value types.
//!
//! Decoded documents use `serde_json::Value` as their in-memory form, with the
//! `preserve_order` feature so mapping keys keep insertion order. That lets the
//! extractor hand back JSON and TOON payloads through the same type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An ordered key → value mapping, the root of every decoded document.
pub type Mapping = Map<String, Value>;

/// Field separator used by table blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Pipe,
    Comma,
}

impl Delimiter {
    /// Detect the delimiter of a table from its header line: `|` if present
    /// anywhere in the line, otherwise `,`.
    pub fn detect(header: &str) -> Self {
        if header.contains('|') {
            Delimiter::Pipe
        } else {
            Delimiter::Comma
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Delimiter::Pipe => '|',
            Delimiter::Comma => ',',
        }
    }

    /// Separator placed between fields when encoding (`" | "` or `", "`).
    pub const fn separator(self) -> &'static str {
        match self {
            Delimiter::Pipe => " | ",
            Delimiter::Comma => ", ",
        }
    }
}
