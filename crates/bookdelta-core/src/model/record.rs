//! Record identifiers and rows.

use crate::model::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Unique identifier of a record within a snapshot.
///
/// Ordering is "natural": ids that are plain integers compare numerically and
/// sort before every non-numeric id; anything else compares as text. Ties
/// between numerically equal ids (`"7"` vs `"007"`) fall back to text so the
/// order stays total and consistent with `Eq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build an id from the identifier cell of a row.
    ///
    /// Returns `None` for a missing cell. Whole floats (`"12.0"`, as written
    /// by tools that widen integer columns) normalise to their integer form.
    pub fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Missing => None,
            FieldValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some(Self((*f as i64).to_string()))
            }
            other => Some(Self(other.to_cell())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i128> {
        self.0.parse::<i128>().ok()
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(i: i64) -> Self {
        Self(i.to_string())
    }
}

/// One row of a snapshot.
///
/// `values` is aligned with the owning snapshot's column list; the identifier
/// cell is kept in place so a row can be written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub values: Vec<FieldValue>,
}

impl Record {
    pub fn new(id: RecordId, values: Vec<FieldValue>) -> Self {
        Self { id, values }
    }
}
