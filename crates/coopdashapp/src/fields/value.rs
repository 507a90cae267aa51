//! Field value types and their canonical string form.
//!
//! Every record field the engine reads comes back as a [`FieldValue`]. Search,
//! category matching and export all go through [`FieldValue::render`], so the
//! stringification rules below are the single definition of "what a field looks
//! like as text".

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::collections::BTreeMap;

/// Runtime representation of a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text (names, descriptions, identifiers)
    Text(String),

    /// Numeric amount (litres, shillings, rates)
    Number(f64),

    /// Calendar date without a time component
    Date(NaiveDate),

    /// Instant in UTC
    Timestamp(DateTime<Utc>),

    /// Value drawn from an enumerated set (action, role, status)
    Category(String),

    /// Nested key/value map. Not scalar: only searched when listed explicitly.
    Nested(BTreeMap<String, String>),
}

impl FieldValue {
    /// Canonical string form.
    ///
    /// - Text / Category: verbatim
    /// - Number: no decimals when integral, otherwise exactly two
    /// - Date: `YYYY-MM-DD`
    /// - Timestamp: RFC 3339 with seconds and a `Z` suffix
    /// - Nested: `key=value` pairs in key order, joined by `"; "`
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(s) | FieldValue::Category(s) => s.clone(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Timestamp(t) => t.to_rfc3339_opts(SecondsFormat::Secs, true),
            FieldValue::Nested(map) => map
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    /// Whether this value takes part in "all fields" search.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, FieldValue::Nested(_))
    }

    /// Get the string if this is a Text or Category.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Category(s) => Some(s),
            _ => None,
        }
    }

    /// Get the number if this is a Number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Calendar date of a Date or Timestamp (UTC day for timestamps).
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Timestamp(t) => Some(t.date_naive()),
            _ => None,
        }
    }
}

/// Integral values print without a fractional part, everything else with two decimals.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{:.2}", n)
    }
}
