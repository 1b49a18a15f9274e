//! Structured extraction of single-entry records from raw model logs.
//!
//! The simulation writes one record per line, each a mapping with exactly one
//! entry, e.g. `{'field_update_data-index': 42}`. Keys encode a record type
//! plus sub-attributes; values are numbers or quoted strings. The parser here
//! accepts exactly that shape and nothing more, so a record's single-entry
//! invariant holds by construction.

use crate::errors::HarnessError;

/// Scalar payload of one log record.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordValue {
    /// Integer literal (e.g. a field update index).
    Int(i64),
    /// Float literal (e.g. a checksum).
    Float(f64),
    /// Quoted string literal (e.g. a datetime or file name).
    Text(String),
}

impl RecordValue {
    /// The text payload, if this is a string record.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecordValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer record.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RecordValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric payload as `f64`; integers promote.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RecordValue::Int(value) => Some(*value as f64),
            RecordValue::Float(value) => Some(*value),
            RecordValue::Text(_) => None,
        }
    }
}

/// One key/value record parsed from a log line.
#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    /// Record key, encoding the record type and its sub-attributes.
    pub key: String,
    /// Typed scalar value.
    pub value: RecordValue,
}

/// Parse one log line as a single-entry record.
///
/// Accepts `{'key': value}` with single- or double-quoted strings and
/// integer or float literals. Anything else, including mappings with more
/// than one entry, fails with [`HarnessError::RecordSyntax`].
pub fn parse_record_line(line: &str) -> Result<LogRecord, HarnessError> {
    let trimmed = line.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| syntax_error(line, "expected a braced mapping"))?
        .trim();

    let (key, rest) =
        parse_quoted(inner).map_err(|reason| syntax_error(line, &format!("key: {reason}")))?;
    let rest = rest
        .trim_start()
        .strip_prefix(':')
        .ok_or_else(|| syntax_error(line, "expected ':' after key"))?;
    let value_text = rest.trim();
    if value_text.is_empty() {
        return Err(syntax_error(line, "missing value"));
    }

    let value = if value_text.starts_with('\'') || value_text.starts_with('"') {
        let (text, tail) =
            parse_quoted(value_text).map_err(|reason| syntax_error(line, &format!("value: {reason}")))?;
        if !tail.trim().is_empty() {
            return Err(syntax_error(line, "trailing content after value"));
        }
        RecordValue::Text(text)
    } else if value_text.contains(',') {
        return Err(syntax_error(line, "more than one entry"));
    } else {
        parse_number(value_text).ok_or_else(|| syntax_error(line, "unrecognized value literal"))?
    };

    Ok(LogRecord { key, value })
}

/// Lazily parse every line containing `key_fragment`, in line order.
pub fn records_with_key<'a>(
    log: &'a str,
    key_fragment: &'a str,
) -> impl Iterator<Item = Result<LogRecord, HarnessError>> + 'a {
    log.lines()
        .filter(move |line| line.contains(key_fragment))
        .map(parse_record_line)
}

/// Eagerly collect the values of every record whose line contains `key_fragment`.
pub fn values_with_key(log: &str, key_fragment: &str) -> Result<Vec<RecordValue>, HarnessError> {
    records_with_key(log, key_fragment)
        .map(|record| record.map(|record| record.value))
        .collect()
}

fn syntax_error(line: &str, reason: &str) -> HarnessError {
    HarnessError::RecordSyntax {
        line: line.trim().to_string(),
        reason: reason.to_string(),
    }
}

/// Split a leading quoted string off `input`, returning it and the remainder.
/// The model never emits escape sequences, so none are handled.
fn parse_quoted(input: &str) -> Result<(String, &str), String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, ch @ ('\'' | '"'))) => ch,
        _ => return Err("expected a quoted string".to_string()),
    };
    for (idx, ch) in chars {
        if ch == quote {
            return Ok((input[1..idx].to_string(), &input[idx + ch.len_utf8()..]));
        }
    }
    Err("unterminated quote".to_string())
}

fn parse_number(text: &str) -> Option<RecordValue> {
    if let Ok(value) = text.parse::<i64>() {
        return Some(RecordValue::Int(value));
    }
    text.parse::<f64>().ok().map(RecordValue::Float)
}
