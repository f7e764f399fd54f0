//! Snapshot data model
//!
//! - [`FieldValue`]: one scalar cell with an explicit equality policy
//! - [`RecordId`]: the unique identifier of a record, naturally ordered
//! - [`Record`]: one row of a snapshot
//! - [`Snapshot`]: the deduplicated, column-aware collection of records

pub mod record;
pub mod snapshot;
pub mod value;

pub use record::{Record, RecordId};
pub use snapshot::{Snapshot, SnapshotBuilder};
pub use value::FieldValue;
