//! Field access for loosely-typed API payloads.
//!
//! The Easybill API is not strict about JSON types: ids may arrive as
//! numbers or numeric strings, amounts as integers or decimal strings, and
//! any field may be `null`. The helpers here read one field at a time and
//! fall back to a default instead of failing. A JSON `null` is treated the
//! same as a missing key.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::{EasybillError, Result};

/// A raw record as returned by the API.
pub type Payload = Map<String, Value>;

fn present<'a>(payload: &'a Payload, key: &str) -> Option<&'a Value> {
    payload.get(key).filter(|v| !v.is_null())
}

/// Coerce a JSON value into an integer.
///
/// Accepts integers, integral floats and numeric strings.
pub(crate) fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Literal text of a scalar value.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse a decimal literal, accepting scientific notation.
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Integer field, `None` when missing or not coercible.
pub fn int(payload: &Payload, key: &str) -> Option<i64> {
    present(payload, key).and_then(coerce_int)
}

/// Integer field with a default.
pub fn int_or(payload: &Payload, key: &str, default: i64) -> i64 {
    int(payload, key).unwrap_or(default)
}

/// String field. Numbers are rendered to their literal text.
pub fn string(payload: &Payload, key: &str) -> Option<String> {
    present(payload, key).and_then(scalar_text)
}

/// String field with a default.
pub fn string_or(payload: &Payload, key: &str, default: &str) -> String {
    string(payload, key).unwrap_or_else(|| default.to_string())
}

/// Boolean field.
///
/// Numbers are true when non-zero; strings are true unless empty or `"0"`.
pub fn boolean(payload: &Payload, key: &str) -> bool {
    match present(payload, key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty() && s != "0",
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        _ => false,
    }
}

/// Exact decimal field kept as its literal text.
///
/// Returns `None` when the field is missing. A value that is not a decimal
/// number is dropped with a warning.
pub fn decimal(payload: &Payload, key: &str) -> Option<String> {
    let raw = string(payload, key)?;
    if parse_decimal(&raw).is_some() {
        Some(raw)
    } else {
        tracing::warn!(field = key, value = %raw, "Ignoring non-numeric amount");
        None
    }
}

/// Exact decimal field with a default literal.
pub fn decimal_or(payload: &Payload, key: &str, default: &str) -> String {
    decimal(payload, key).unwrap_or_else(|| default.to_string())
}

/// Calendar date field.
///
/// Missing and empty values map to `None`. Only the date part of a
/// timestamp such as `2024-03-01T12:00:00+01:00` is kept. Anything that is
/// not a `YYYY-MM-DD` date is a mapping error.
pub fn date(payload: &Payload, key: &'static str) -> Result<Option<NaiveDate>> {
    let raw = match string(payload, key) {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };

    let date_part = raw.trim().split(['T', ' ']).next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| EasybillError::Mapping {
            field: key,
            value: raw.clone(),
            reason: e.to_string(),
        })
}
