//! bookdelta core - in-memory change detection kernel
//!
//! This crate provides the pure (filesystem-free) parts of the incremental
//! update pipeline:
//! - Snapshot data model with first-seen identifier deduplication
//! - Diff engine classifying records as added / changed / unchanged
//! - Markdown change report and record-to-text rendering
//! - The canonical error facility and structured logging facility

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use diff::{compute_changes, select_affected, ChangeSet, DiffOutcome, FieldChange};
pub use errors::{DeltaError, ExError, ExErrorKind, Result};
pub use model::{FieldValue, Record, RecordId, Snapshot};
