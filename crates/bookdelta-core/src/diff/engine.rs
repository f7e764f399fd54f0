//! Change computation.

use crate::diff::model::{ChangeSet, DiffOutcome, FieldChange};
use crate::errors::{DeltaError, ExError};
use crate::model::{RecordId, Snapshot};
use crate::{log_op_end, log_op_start};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// Check that two snapshots can be compared field by field.
///
/// Returns, for every column of `new` (in `new`'s order), the index of the
/// same column in `old`.
fn align_columns(old: &Snapshot, new: &Snapshot) -> Result<Vec<usize>, DeltaError> {
    if old.id_column() != new.id_column() {
        return Err(DeltaError::IdColumnMismatch {
            old: old.id_column().to_string(),
            new: new.id_column().to_string(),
        });
    }

    let old_cols = old.column_set();
    let new_cols = new.column_set();
    if old_cols != new_cols {
        return Err(DeltaError::SchemaMismatch {
            only_old: old_cols
                .difference(&new_cols)
                .map(|s| s.to_string())
                .collect(),
            only_new: new_cols
                .difference(&old_cols)
                .map(|s| s.to_string())
                .collect(),
        });
    }

    // Column sets are equal, so every lookup succeeds.
    Ok(new
        .columns()
        .iter()
        .filter_map(|c| old.column_index(c))
        .collect())
}

/// Compare two snapshots and classify every identifier of `new`.
///
/// The identifier column itself is not compared: ids match by key.
///
/// # Errors
///
/// - `SchemaMismatch` if the column sets differ
/// - `DiffComparison` if the snapshots use different identifier columns
pub fn compute_changes(old: &Snapshot, new: &Snapshot) -> Result<DiffOutcome, ExError> {
    let start = Instant::now();
    log_op_start!("compute_changes", old_len = old.len(), new_len = new.len());

    let old_index_for =
        align_columns(old, new).map_err(|e| ExError::from(e).with_op("compute_changes"))?;
    let id_column = new.id_column();

    let mut added: BTreeSet<RecordId> = BTreeSet::new();
    let mut changed: BTreeMap<RecordId, BTreeMap<String, FieldChange>> = BTreeMap::new();
    let mut unchanged = 0usize;

    for new_record in new.records() {
        let Some(old_record) = old.get(&new_record.id) else {
            added.insert(new_record.id.clone());
            continue;
        };

        let mut fields: BTreeMap<String, FieldChange> = BTreeMap::new();
        for (new_idx, column) in new.columns().iter().enumerate() {
            if column == id_column {
                continue;
            }
            let new_value = &new_record.values[new_idx];
            let old_value = &old_record.values[old_index_for[new_idx]];
            if old_value != new_value {
                fields.insert(
                    column.clone(),
                    FieldChange {
                        old: old_value.clone(),
                        new: new_value.clone(),
                    },
                );
            }
        }

        if fields.is_empty() {
            unchanged += 1;
        } else {
            changed.insert(new_record.id.clone(), fields);
        }
    }

    log_op_end!(
        "compute_changes",
        duration_ms = start.elapsed().as_millis() as u64,
        added_count = added.len(),
        changed_count = changed.len(),
        unchanged_count = unchanged
    );

    if added.is_empty() && changed.is_empty() {
        return Ok(DiffOutcome::NoOp);
    }
    Ok(DiffOutcome::Changes(ChangeSet { added, changed }))
}

/// Full rows of `new` for every added or changed identifier, sorted by id.
///
/// This is the content of the diff artifact.
pub fn select_affected(new: &Snapshot, change_set: &ChangeSet) -> Snapshot {
    let ids = change_set.affected_ids();
    new.select(ids.iter())
}
