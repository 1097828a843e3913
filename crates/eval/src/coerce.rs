//! Type coercion of snapshot and expected values.
//!
//! Raw JSON values are coerced according to the condition's declared
//! [`FieldType`] before any operator is applied. A value that cannot be
//! coerced is treated exactly like a missing one: `"abc"` in a number
//! field is empty, never zero.
//!
//! Numbers use `rust_decimal::Decimal` (no `f64` in the evaluation path),
//! so `50` and `"50.0"` compare equal. Dates are instants from the `time`
//! crate.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::types::FieldType;

/// A value after coercion to its field type.
#[derive(Debug, Clone, PartialEq)]
pub enum Typed {
    Text(String),
    Number(Decimal),
    Bool(bool),
    Date(OffsetDateTime),
    /// Select values; never empty.
    Choices(Vec<String>),
}

/// Coerce a raw value to `field_type`. `None` means empty: missing,
/// `null`, blank text, zero-length list, or unparseable.
pub fn coerce(value: Option<&Value>, field_type: FieldType) -> Option<Typed> {
    let value = value?;
    match field_type {
        FieldType::Text => coerce_text(value),
        FieldType::Number => coerce_number(value).map(Typed::Number),
        FieldType::Boolean => coerce_bool(value).map(Typed::Bool),
        FieldType::Date => coerce_date(value).map(Typed::Date),
        FieldType::Select => coerce_choices(value),
    }
}

fn coerce_text(value: &Value) -> Option<Typed> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(Typed::Text(s.clone())),
        Value::Number(n) => Some(Typed::Text(n.to_string())),
        Value::Bool(b) => Some(Typed::Text(b.to_string())),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

/// Parse plain (`"1200.50"`) or scientific (`"1.2e6"`) notation.
///
/// Finite numbers outside the `Decimal` range saturate: magnitudes above
/// `Decimal::MAX` clamp to `MAX`/`MIN`, and non-zero magnitudes below
/// `1e-28` clamp to `±1e-28`. Digits beyond 28 decimal places round.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
        .or_else(|| saturate(s))
}

fn saturate(s: &str) -> Option<Decimal> {
    let x: f64 = s.parse().ok().filter(|x: &f64| x.is_finite())?;
    let negative = x.is_sign_negative();
    if x == 0.0 {
        Some(Decimal::ZERO)
    } else if x.abs() >= 1.0 {
        Some(if negative { Decimal::MIN } else { Decimal::MAX })
    } else {
        Some(Decimal::new(if negative { -1 } else { 1 }, 28))
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_date(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::String(s) => parse_instant(s.trim()),
        // Epoch milliseconds, as produced by JavaScript clients.
        Value::Number(n) => n.as_i64().and_then(|ms| {
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok()
        }),
        _ => None,
    }
}

/// Parse an RFC 3339 timestamp, a local `YYYY-MM-DDTHH:MM:SS` timestamp
/// (taken as UTC), or a bare `YYYY-MM-DD` date (UTC midnight).
pub fn parse_instant(s: &str) -> Option<OffsetDateTime> {
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(dt);
    }
    let local = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(dt) = PrimitiveDateTime::parse(s, local) {
        return Some(dt.assume_utc());
    }
    let date_only = format_description!("[year]-[month]-[day]");
    Date::parse(s, date_only)
        .ok()
        .map(|d| d.midnight().assume_utc())
}

fn coerce_choices(value: &Value) -> Option<Typed> {
    let choices: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(scalar_choice).collect(),
        other => scalar_choice(other).into_iter().collect(),
    };
    if choices.is_empty() {
        None
    } else {
        Some(Typed::Choices(choices))
    }
}

fn scalar_choice(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Equality after coercion. `None` when the two values are of different
/// kinds and cannot be compared.
///
/// For choices, a single expected choice tests membership; several
/// expected choices test set equality.
pub fn typed_eq(actual: &Typed, expected: &Typed) -> Option<bool> {
    match (actual, expected) {
        (Typed::Text(a), Typed::Text(e)) => Some(a == e),
        (Typed::Number(a), Typed::Number(e)) => Some(a == e),
        (Typed::Bool(a), Typed::Bool(e)) => Some(a == e),
        (Typed::Date(a), Typed::Date(e)) => Some(a == e),
        (Typed::Choices(a), Typed::Choices(e)) => {
            if let [single] = e.as_slice() {
                Some(a.contains(single))
            } else {
                let mut a = a.clone();
                let mut e = e.clone();
                a.sort();
                a.dedup();
                e.sort();
                e.dedup();
                Some(a == e)
            }
        }
        _ => None,
    }
}

/// Ordering for numbers and dates; `None` for every other pairing.
pub fn typed_cmp(actual: &Typed, expected: &Typed) -> Option<Ordering> {
    match (actual, expected) {
        (Typed::Number(a), Typed::Number(e)) => Some(a.cmp(e)),
        (Typed::Date(a), Typed::Date(e)) => Some(a.cmp(e)),
        _ => None,
    }
}
