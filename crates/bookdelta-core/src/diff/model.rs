//! Diff output types.
//!
//! Collections use `BTreeSet` / `BTreeMap` so iteration and serialization
//! order is the natural [`RecordId`] order.

use crate::model::{FieldValue, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Old and new value of one field that differs between snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldChange {
    pub old: FieldValue,
    pub new: FieldValue,
}

/// Result of comparing two snapshots.
///
/// Unchanged identifiers are implicit: present in both snapshots and absent
/// from both `added` and `changed`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChangeSet {
    /// Identifiers present only in the new snapshot
    pub added: BTreeSet<RecordId>,
    /// Identifier → field name → old/new pair, for differing fields only
    pub changed: BTreeMap<RecordId, BTreeMap<String, FieldChange>>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty()
    }

    /// Sorted union of added and changed identifiers
    pub fn affected_ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self
            .added
            .iter()
            .chain(self.changed.keys())
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    pub fn is_added(&self, id: &RecordId) -> bool {
        self.added.contains(id)
    }
}

/// What the diff engine decided.
///
/// `NoOp` is distinct from an empty `ChangeSet`: callers must not create an
/// artifact at all.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOutcome {
    /// Nothing added, nothing changed
    NoOp,
    /// At least one identifier was added or changed
    Changes(ChangeSet),
}

impl DiffOutcome {
    pub fn is_noop(&self) -> bool {
        matches!(self, DiffOutcome::NoOp)
    }

    pub fn change_set(&self) -> Option<&ChangeSet> {
        match self {
            DiffOutcome::NoOp => None,
            DiffOutcome::Changes(set) => Some(set),
        }
    }
}
