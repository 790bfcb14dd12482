//! # agent-toon
//!
//! A lightweight, line-oriented notation for passing structured data to and
//! from LLM agents with fewer tokens than JSON, and a tolerant extractor for
//! getting that data back out of free-form model responses.
//!
//! The notation has four kinds of value: scalars, mappings (indented blocks),
//! scalar lists (`- item` lines) and tables (a header row plus delimited data
//! rows). Indentation alone encodes nesting.
//!
//! ```text
//! product: Habit tracker
//! launch:
//!   quarter: 3
//!   confirmed: false
//! tags:
//!   - mobile
//!   - wellness
//! features:
//!   name | priority
//!   Streaks | 1
//!   Reminders | 2
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use agent_toon::{dumps, loads, parse_response};
//!
//! let doc = loads("name: Alpha\nscore: 10");
//! assert_eq!(doc["score"], 10);
//!
//! // Mapping → TOON → Mapping
//! assert_eq!(loads(&dumps(&doc, 0)), doc);
//!
//! // Model output with a fenced payload
//! let reply = "Sure!\n```toon\nname: Alpha\n```\nAnything else?";
//! assert_eq!(parse_response(reply)["name"], "Alpha");
//! ```
//!
//! ## Modules
//!
//! - [`decoder`] — TOON text → [`Mapping`] (`loads`)
//! - [`encoder`] — [`Mapping`] → TOON text (`dumps`, `EncodeOptions`)
//! - [`extract`] — model response → [`Mapping`] (`parse_response`)
//! - [`scalar`] — scalar type coercion and field splitting
//! - [`record`] — strict conversion into caller-defined record types
//! - [`usage`] — token usage accounting
//! - [`error`] — error types for the strict paths

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod extract;
pub mod record;
pub mod scalar;
pub mod types;
pub mod usage;

pub use decoder::loads;
pub use encoder::{dumps, dumps_with, to_toon, to_toon_with, EncodeOptions, ListStyle};
pub use error::{Result, ToonError};
pub use extract::{extract, parse_response, Extracted, Source};
pub use record::{from_mapping, parse_json_object, parse_record};
pub use scalar::{coerce, split_fields};
pub use types::{Delimiter, Mapping};
pub use usage::{CostRates, TokenUsage, UsageStats, UsageTracker};
