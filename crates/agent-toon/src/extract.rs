//! Response extraction — recover a mapping from free-form model output.
//!
//! Models wrap structured answers in prose, fence them in markdown, or answer
//! in JSON when asked for TOON. [`extract`] tries each shape in order and
//! returns the first that yields a mapping:
//!
//! 1. a ```` ```toon ```` fenced block, decoded as TOON
//! 2. a ```` ```json ```` fenced block, parsed as a JSON object
//! 3. the whole text as a JSON object
//! 4. the whole text as TOON
//!
//! A JSON value that parses but is not an object counts as a miss. Nothing
//! here returns an error: total failure is an empty mapping, and deciding
//! whether that is acceptable is up to the caller.

use crate::decoder::loads;
use crate::error::kind_name;
use crate::types::Mapping;
use log::debug;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static TOON_FENCE: LazyLock<Regex> = LazyLock::new(|| fence("toon"));
static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| fence("json"));

/// Opening fence with the given tag on its own line, a lazily matched body,
/// and the closing fence on the next line that starts with one.
fn fence(tag: &str) -> Regex {
    let pattern = format!(r"(?is)```{tag}[ \t]*\r?\n(.*?)\r?\n[ \t]*```");
    Regex::new(&pattern).expect("fence pattern is valid")
}

/// Which strategy produced an [`Extracted`] mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    ToonBlock,
    JsonBlock,
    RawJson,
    RawToon,
    /// Blank input; no strategy was attempted.
    Empty,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::ToonBlock => "toon block",
            Source::JsonBlock => "json block",
            Source::RawJson => "raw json",
            Source::RawToon => "raw toon",
            Source::Empty => "empty",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recovered mapping and the strategy that found it.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub data: Mapping,
    pub source: Source,
}

/// Recover structured data from a model response. Returns an empty mapping
/// when nothing usable is found.
pub fn parse_response(text: &str) -> Mapping {
    extract(text).data
}

/// Like [`parse_response`], but also reports which strategy succeeded.
pub fn extract(text: &str) -> Extracted {
    if text.trim().is_empty() {
        return Extracted {
            data: Mapping::new(),
            source: Source::Empty,
        };
    }

    if let Some(body) = fenced_block(&TOON_FENCE, text) {
        debug!("extract: decoding fenced toon block ({} bytes)", body.len());
        return Extracted {
            data: loads(body),
            source: Source::ToonBlock,
        };
    }

    if let Some(body) = fenced_block(&JSON_FENCE, text) {
        match json_object(body) {
            Some(data) => {
                return Extracted {
                    data,
                    source: Source::JsonBlock,
                }
            }
            None => debug!("extract: fenced json block is not a JSON object, falling through"),
        }
    }

    if let Some(data) = json_object(text.trim()) {
        return Extracted {
            data,
            source: Source::RawJson,
        };
    }

    debug!("extract: no JSON found, decoding response as raw toon");
    Extracted {
        data: loads(text),
        source: Source::RawToon,
    }
}

/// Body of the first fenced block matched by `re`.
fn fenced_block<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str())
}

pub(crate) fn json_fenced_block(text: &str) -> Option<&str> {
    fenced_block(&JSON_FENCE, text)
}

/// Parse `text` as JSON, keeping it only if the root is an object.
fn json_object(text: &str) -> Option<Mapping> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            debug!("extract: JSON root is a {}, not an object", kind_name(&other));
            None
        }
        Err(_) => None,
    }
}
