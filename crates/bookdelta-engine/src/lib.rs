//! bookdelta engine - update cycle orchestration
//!
//! Wires the pure diff kernel and the snapshot store to the two external
//! collaborators: the crawler ([`source::SnapshotSource`]) and the downstream
//! ingestion service ([`ingest::IngestionSink`]).

pub mod config;
pub mod ingest;
pub mod orchestrator;
pub mod source;

pub use config::{IngestMode, UpdateConfig};
pub use ingest::{
    HttpIngestionSink, IngestAck, IngestRequest, IngestionSink, NoopIngestionSink,
};
pub use orchestrator::{
    CycleOutcome, CycleReport, CycleStage, NotificationStatus, UpdateOrchestrator,
};
pub use source::{CommandSource, FileSource, SnapshotSource};
