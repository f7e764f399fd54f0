//! Scalar cell values.
//!
//! ## Equality policy
//!
//! - `Missing == Missing`
//! - `Missing` never equals a present value
//! - present values are equal only when both the variant and the value match,
//!   so `Int(10) != Float(10.0)` and `Text("10") != Int(10)`
//!
//! `NaN` never reaches a `Float`: the textual NaN markers are read as
//! `Missing`, and non-finite numbers stay `Text`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell tokens read as a missing value.
pub const MISSING_MARKERS: &[&str] = &["", "NaN", "nan", "NA", "N/A", "null", "NULL", "None"];

/// A single field value in a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Infer a value from a raw cell.
    ///
    /// Order of attempts: missing marker, `i64`, finite `f64`, text. The text
    /// is kept verbatim (no trimming) so that whitespace edits count as
    /// changes.
    pub fn parse(raw: &str) -> Self {
        if MISSING_MARKERS.contains(&raw) {
            return FieldValue::Missing;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return FieldValue::Int(i);
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => FieldValue::Float(f),
            _ => FieldValue::Text(raw.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Numeric view of the value, used by the text renderer.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            FieldValue::Missing => None,
        }
    }

    /// Canonical cell text written to snapshot and artifact files.
    ///
    /// Floats always carry a decimal point or exponent so that they read back
    /// as floats.
    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::Missing => String::new(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => format!("{:?}", f),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Missing, FieldValue::Missing) => true,
            (FieldValue::Int(a), FieldValue::Int(b)) => a == b,
            // Floats are always finite here, so `==` is reflexive.
            (FieldValue::Float(a), FieldValue::Float(b)) => a == b,
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Missing => f.write_str("<missing>"),
            other => f.write_str(&other.to_cell()),
        }
    }
}
