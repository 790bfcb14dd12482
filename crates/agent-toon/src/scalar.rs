//! Scalar tokens: type coercion, field splitting and quoting.
//!
//! Coercion order for an unquoted token:
//!
//! 1. `true` / `false` (any case) → boolean
//! 2. contains `.` → float, or the raw string if it doesn't parse
//! 3. integer (`i64`, then `u64`)
//! 4. anything else → the raw string
//!
//! A token wrapped in one pair of double quotes is always a string. The encoder quotes a
//! value only when the unquoted form would read back differently, so plain
//! model output never needs quotes.

use crate::types::Delimiter;
use serde_json::{Number, Value};
use std::borrow::Cow;

/// Convert a scalar token into a typed value.
///
/// Never fails: a token that looks numeric but doesn't parse (`1.2.3`) falls
/// back to a string.
pub fn coerce(token: &str) -> Value {
    let token = token.trim();

    if token.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    if let Some(inner) = strip_quotes(token) {
        return Value::String(unescape(inner));
    }

    // A literal '.' always means float, even when the token is not a valid one.
    if token.contains('.') {
        return token
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(token.to_string()));
    }

    if let Ok(n) = token.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = token.parse::<u64>() {
        return Value::Number(n.into());
    }

    Value::String(token.to_string())
}

/// Split a table header or row on `delimiter`, trimming each field.
///
/// A field that starts with `"` runs to its closing quote, so quoted values may
/// contain the delimiter. The quotes are kept for [`coerce`] to strip. If a
/// quote is never closed the line is split naively instead.
pub fn split_fields(line: &str, delimiter: Delimiter) -> Vec<String> {
    let delim = delimiter.as_char();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if in_quotes {
            current.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                }
                '"' => in_quotes = false,
                _ => {}
            }
        } else if c == delim {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            if c == '"' && current.trim().is_empty() {
                in_quotes = true;
            }
            current.push(c);
        }
    }

    if in_quotes {
        return line.split(delim).map(|f| f.trim().to_string()).collect();
    }

    fields.push(current.trim().to_string());
    fields
}

/// Quote `s` if its bare form would not decode back to the same string.
///
/// `delimiter` is the active table delimiter when `s` is a table cell, `None`
/// for `key: value` lines and list items.
pub(crate) fn quote_if_needed(s: &str, delimiter: Option<Delimiter>) -> Cow<'_, str> {
    if needs_quoting(s, delimiter) {
        Cow::Owned(quote(s))
    } else {
        Cow::Borrowed(s)
    }
}

fn needs_quoting(s: &str, delimiter: Option<Delimiter>) -> bool {
    if s.is_empty() || s != s.trim() {
        return true;
    }
    if s.starts_with('"') || s == "[]" {
        return true;
    }
    if s.contains('\n') || s.contains('\r') {
        return true;
    }
    if let Some(d) = delimiter {
        if s.contains(d.as_char()) {
            return true;
        }
    }
    // "true", "42", "1.5" and friends would come back typed.
    !matches!(coerce(s), Value::String(ref back) if back == s)
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Inner text of a quoted token. The first unescaped closing quote must be
/// the last character; `"a" and "b"` is plain text, not a quoted literal.
fn strip_quotes(token: &str) -> Option<&str> {
    let body = token.strip_prefix('"')?;
    let mut chars = body.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return (idx + 1 == body.len()).then(|| &body[..idx]),
            _ => {}
        }
    }
    None
}

/// Undo [`quote`]. Unknown escapes are kept verbatim.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
