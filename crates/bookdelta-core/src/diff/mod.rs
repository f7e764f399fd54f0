//! Snapshot diff engine.
//!
//! Compares two deduplicated snapshots keyed by record identifier and
//! classifies every identifier of the new snapshot as added, changed or
//! unchanged. Removed records are not reported: downstream ingestion only
//! ever needs what to (re)index.
//!
//! ## Entry point
//!
//! ```ignore
//! use bookdelta_core::diff::{compute_changes, select_affected, DiffOutcome};
//!
//! match compute_changes(&old, &new)? {
//!     DiffOutcome::NoOp => { /* nothing to persist */ }
//!     DiffOutcome::Changes(set) => {
//!         let artifact = select_affected(&new, &set);
//!     }
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: output is a pure function of the two snapshots, and all
//!   collections are ordered by [`RecordId`](crate::model::RecordId), so
//!   reordering input rows does not change the result.
//! - **Disjointness**: `added` and `changed` never share an identifier.
//! - **Minimal detail**: a changed record lists only the fields that differ.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compute_changes, select_affected};
pub use human_summary::render_change_summary;
pub use model::{ChangeSet, DiffOutcome, FieldChange};
