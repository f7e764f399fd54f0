//! In-memory snapshot of a dataset.
//!
//! A [`Snapshot`] is built row by row through [`SnapshotBuilder`], which
//! enforces the snapshot invariants:
//!
//! - the identifier column is present and every row has an identifier
//! - column names are unique and every row has one cell per column
//! - identifiers are unique: the first row seen for an id wins, later rows
//!   with the same id are dropped and counted

use crate::errors::DeltaError;
use crate::model::record::{Record, RecordId};
use crate::model::value::FieldValue;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Deduplicated collection of records sharing one column layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    columns: Vec<String>,
    id_column: String,
    id_index: usize,
    records: IndexMap<RecordId, Record>,
    duplicates_dropped: usize,
}

impl Snapshot {
    /// Build a snapshot from already-typed rows.
    ///
    /// # Errors
    ///
    /// Any [`DeltaError`] raised by [`SnapshotBuilder`].
    pub fn from_rows<S: AsRef<str>>(
        columns: &[S],
        id_column: &str,
        rows: impl IntoIterator<Item = Vec<FieldValue>>,
    ) -> Result<Self, DeltaError> {
        let mut builder = SnapshotBuilder::new(
            columns.iter().map(|c| c.as_ref().to_string()).collect(),
            id_column,
        )?;
        for row in rows {
            builder.push_row(row)?;
        }
        Ok(builder.build())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column_set(&self) -> BTreeSet<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows dropped because their identifier was already seen
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.contains_key(id)
    }

    /// Records in first-seen order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.records.keys()
    }

    /// Value of `column` in `record`, `None` if the column does not exist
    pub fn value<'a>(&self, record: &'a Record, column: &str) -> Option<&'a FieldValue> {
        self.column_index(column).and_then(|i| record.values.get(i))
    }

    /// New snapshot with the same layout holding only `ids`, in the order
    /// given. Ids not present are skipped.
    pub fn select<'a>(&self, ids: impl IntoIterator<Item = &'a RecordId>) -> Snapshot {
        let records = ids
            .into_iter()
            .filter_map(|id| self.records.get(id).map(|r| (id.clone(), r.clone())))
            .collect();
        Snapshot {
            columns: self.columns.clone(),
            id_column: self.id_column.clone(),
            id_index: self.id_index,
            records,
            duplicates_dropped: 0,
        }
    }
}

/// Incremental builder enforcing the snapshot invariants.
#[derive(Debug)]
pub struct SnapshotBuilder {
    columns: Vec<String>,
    id_column: String,
    id_index: usize,
    records: IndexMap<RecordId, Record>,
    rows_seen: usize,
    duplicates_dropped: usize,
}

impl SnapshotBuilder {
    /// # Errors
    ///
    /// - `DuplicateColumn` if a column name repeats
    /// - `MissingIdColumn` if `id_column` is not among `columns`
    pub fn new(columns: Vec<String>, id_column: &str) -> Result<Self, DeltaError> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(DeltaError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        let id_index = columns
            .iter()
            .position(|c| c == id_column)
            .ok_or_else(|| DeltaError::MissingIdColumn {
                column: id_column.to_string(),
            })?;

        Ok(Self {
            columns,
            id_column: id_column.to_string(),
            id_index,
            records: IndexMap::new(),
            rows_seen: 0,
            duplicates_dropped: 0,
        })
    }

    /// Add a row. Returns `false` if the row was dropped as a duplicate.
    ///
    /// # Errors
    ///
    /// - `RowWidthMismatch` if the row does not have one cell per column
    /// - `MissingIdentifier` if the identifier cell is missing
    pub fn push_row(&mut self, values: Vec<FieldValue>) -> Result<bool, DeltaError> {
        // 1-based, counting the header as row 0
        self.rows_seen += 1;
        let row = self.rows_seen;

        if values.len() != self.columns.len() {
            return Err(DeltaError::RowWidthMismatch {
                row,
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        let id = RecordId::from_value(&values[self.id_index])
            .ok_or(DeltaError::MissingIdentifier { row })?;

        if self.records.contains_key(&id) {
            self.duplicates_dropped += 1;
            return Ok(false);
        }
        self.records.insert(id.clone(), Record::new(id, values));
        Ok(true)
    }

    pub fn build(self) -> Snapshot {
        Snapshot {
            columns: self.columns,
            id_column: self.id_column,
            id_index: self.id_index,
            records: self.records,
            duplicates_dropped: self.duplicates_dropped,
        }
    }
}
