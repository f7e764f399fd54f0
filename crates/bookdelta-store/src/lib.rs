//! bookdelta store - filesystem side of the update pipeline
//!
//! Provides:
//! - Timestamped snapshot file naming
//! - Snapshot Store: latest-lookup and retention pruning
//! - CSV codec for snapshots and diff artifacts
//! - Temp→rename atomic writes
//! - Change-Suppression Gate over consecutive diff artifacts

pub mod atomic;
pub mod errors;
pub mod gate;
pub mod naming;
pub mod snapshot_store;
pub mod tabular;

// Re-export key types
pub use errors::Result;
pub use gate::GateDecision;
pub use snapshot_store::{find_latest, prune, prune_at, PruneReport, SnapshotDir};
pub use tabular::{read_snapshot, write_snapshot};
