//! Core types shared across the bookdelta crates
//!
//! - **Correlation types**: `CycleId` for one update cycle, `RequestId` for
//!   one downstream ingestion call
//! - **Sensitive data**: `Sensitive<T>` marker for automatic redaction
//! - **Schema constants**: canonical structured-log field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{CycleId, RequestId};
pub use sensitive::Sensitive;
