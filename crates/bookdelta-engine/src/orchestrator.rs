//! Update Orchestrator: one crawl → diff → gate → persist → notify → prune
//! cycle.
//!
//! ## Stages (in order):
//! 1. Crawl the new snapshot into a staging file, renamed into place on
//!    success (failure removes it, ends the cycle, nothing is pruned)
//! 2. Locate the previous snapshot; none found means first run and the new
//!    snapshot itself is handed downstream
//! 3. Diff; a no-op diff ends the chain without writing anything
//! 4. Write the artifact to a temporary file and run the suppression gate
//! 5. Finalize (rename) or discard the temporary artifact
//! 6. Notify downstream once; failure keeps the artifact
//! 7. Prune both directories
//!
//! A failure in stages 3 to 5 removes the temporary artifact and skips
//! pruning for this cycle. No error ever escapes [`UpdateOrchestrator::run_cycle`].

use crate::config::UpdateConfig;
use crate::ingest::{IngestRequest, IngestionSink};
use crate::source::SnapshotSource;
use bookdelta_core::diff::{compute_changes, select_affected, DiffOutcome};
use bookdelta_core::errors::ExError;
use bookdelta_core::{log_op_end, log_op_error, log_op_start};
use bookdelta_core_types::CycleId;
use bookdelta_store::atomic::{discard, finalize, temp_path, write_temp};
use bookdelta_store::errors::Result;
use bookdelta_store::gate::{self, GateDecision};
use bookdelta_store::tabular::encode_snapshot;
use bookdelta_store::{read_snapshot, SnapshotDir};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// States a cycle passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Started,
    Crawled,
    OldSnapshotLocated,
    NoneFound,
    Diffed,
    GateChecked,
    Finalized,
    Discarded,
    DownstreamNotified,
    Pruned,
    Done,
}

/// How the diff/persist chain of a cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The crawler produced no usable snapshot
    CrawlFailed,
    /// First run: the full new snapshot went downstream
    InitialIngest,
    /// Diff was a no-op; no artifact was created
    NoChanges,
    /// Artifact repeated the previous one and was discarded
    DuplicateDiscarded,
    /// A new artifact was persisted
    Finalized,
    /// Reading, diffing, gating or persisting failed
    DiffFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    NotAttempted,
    Delivered,
    Failed(String),
}

/// Everything a caller (or a test) needs to know about one cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_id: CycleId,
    pub stages: Vec<CycleStage>,
    pub outcome: CycleOutcome,
    pub notification: NotificationStatus,
    pub new_snapshot: PathBuf,
    pub previous_snapshot: Option<PathBuf>,
    /// Finalized artifact, if this cycle persisted one
    pub artifact: Option<PathBuf>,
    pub added_count: usize,
    pub changed_count: usize,
    pub pruned_snapshots: usize,
    pub pruned_artifacts: usize,
    /// Error that ended the chain early, or the failed notification an
    /// operator has to replay
    pub error: Option<ExError>,
}

impl CycleReport {
    fn new(cycle_id: CycleId, new_snapshot: PathBuf) -> Self {
        Self {
            cycle_id,
            stages: vec![CycleStage::Started],
            outcome: CycleOutcome::CrawlFailed,
            notification: NotificationStatus::NotAttempted,
            new_snapshot,
            previous_snapshot: None,
            artifact: None,
            added_count: 0,
            changed_count: 0,
            pruned_snapshots: 0,
            pruned_artifacts: 0,
            error: None,
        }
    }

    pub fn reached(&self, stage: CycleStage) -> bool {
        self.stages.contains(&stage)
    }
}

/// Result of the diff → gate → finalize chain
enum ChainEnd {
    NoChanges,
    Duplicate,
    Finalized(PathBuf),
}

/// Runs update cycles against one configuration.
pub struct UpdateOrchestrator {
    config: UpdateConfig,
    source: Box<dyn SnapshotSource>,
    sink: Box<dyn IngestionSink>,
}

impl UpdateOrchestrator {
    pub fn new(
        config: UpdateConfig,
        source: Box<dyn SnapshotSource>,
        sink: Box<dyn IngestionSink>,
    ) -> Self {
        Self {
            config,
            source,
            sink,
        }
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    /// Run one cycle stamped with `now`.
    ///
    /// `now` names the new snapshot and artifact files and is the reference
    /// time for pruning.
    pub fn run_cycle(&self, now: NaiveDateTime) -> CycleReport {
        let start = Instant::now();
        let snapshots = self.config.snapshot_dir();
        let artifacts = self.config.artifact_dir();
        let mut report = CycleReport::new(CycleId::new(), snapshots.path_at(now));
        let cycle_id = report.cycle_id.clone();

        log_op_start!(
            "update_cycle",
            cycle_id = %cycle_id,
            new_snapshot = %report.new_snapshot.display()
        );

        // 1. Crawl
        if let Err(err) = self.crawl(&report.new_snapshot, &cycle_id) {
            report.outcome = CycleOutcome::CrawlFailed;
            report.error = Some(err);
            return self.finish(report, start);
        }
        report.stages.push(CycleStage::Crawled);

        // 2. Locate previous snapshot
        let previous = snapshots.latest(Some(&report.new_snapshot));
        report.previous_snapshot = previous.clone();

        let to_ingest = match previous {
            None => {
                report.stages.push(CycleStage::NoneFound);
                report.outcome = CycleOutcome::InitialIngest;
                tracing::info!(
                    cycle_id = %cycle_id,
                    "no previous snapshot found, ingesting initial crawl"
                );
                Some(report.new_snapshot.clone())
            }
            Some(old) => {
                report.stages.push(CycleStage::OldSnapshotLocated);
                match self.diff_chain(&old, &artifacts, now, &mut report) {
                    Ok(ChainEnd::NoChanges) => {
                        report.outcome = CycleOutcome::NoChanges;
                        tracing::info!(cycle_id = %cycle_id, "no new or changed records");
                        None
                    }
                    Ok(ChainEnd::Duplicate) => {
                        report.outcome = CycleOutcome::DuplicateDiscarded;
                        tracing::info!(
                            cycle_id = %cycle_id,
                            "changes repeat the latest artifact, skipping save and ingest"
                        );
                        None
                    }
                    Ok(ChainEnd::Finalized(path)) => {
                        report.outcome = CycleOutcome::Finalized;
                        report.artifact = Some(path.clone());
                        Some(path)
                    }
                    Err(err) => {
                        report.outcome = CycleOutcome::DiffFailed;
                        report.error = Some(err);
                        return self.finish(report, start);
                    }
                }
            }
        };

        // 6. Notify downstream
        if let Some(path) = to_ingest {
            match self.notify(&path, &cycle_id) {
                Ok(()) => {
                    report.notification = NotificationStatus::Delivered;
                    report.stages.push(CycleStage::DownstreamNotified);
                }
                Err(err) => {
                    report.notification = NotificationStatus::Failed(err.to_string());
                    report.error = Some(err);
                }
            }
        }

        // 7. Prune
        report.pruned_snapshots = self.prune_dir(&snapshots, now, &cycle_id);
        report.pruned_artifacts = self.prune_dir(&artifacts, now, &cycle_id);
        report.stages.push(CycleStage::Pruned);

        self.finish(report, start)
    }

    fn finish(&self, mut report: CycleReport, start: Instant) -> CycleReport {
        report.stages.push(CycleStage::Done);
        log_op_end!(
            "update_cycle",
            duration_ms = start.elapsed().as_millis() as u64,
            cycle_id = %report.cycle_id,
            outcome = ?report.outcome,
            notification = ?report.notification
        );
        report
    }

    /// Crawl into a staging file and promote it to `target` only once the
    /// source reports success, so a failed crawl never becomes a previous
    /// snapshot.
    fn crawl(&self, target: &Path, cycle_id: &CycleId) -> Result<usize> {
        let start = Instant::now();
        log_op_start!("crawl", cycle_id = %cycle_id, path = %target.display());

        let staging = temp_path(target);
        let result = self.source.produce(&staging).and_then(|rows| {
            finalize(&staging, target)?;
            Ok(rows)
        });

        match result {
            Ok(rows) => {
                log_op_end!(
                    "crawl",
                    duration_ms = start.elapsed().as_millis() as u64,
                    cycle_id = %cycle_id,
                    row_count = rows
                );
                Ok(rows)
            }
            Err(err) => {
                if let Err(cleanup) = discard(&staging) {
                    tracing::warn!(
                        cycle_id = %cycle_id,
                        error = %cleanup,
                        "partial crawl output not removed"
                    );
                }
                log_op_error!(
                    "crawl",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    cycle_id = %cycle_id
                );
                Err(err)
            }
        }
    }

    /// Stages 3 to 5. Any error leaves no temporary artifact behind.
    fn diff_chain(
        &self,
        old: &Path,
        artifacts: &SnapshotDir,
        now: NaiveDateTime,
        report: &mut CycleReport,
    ) -> Result<ChainEnd> {
        let start = Instant::now();
        let cycle_id = report.cycle_id.clone();
        log_op_start!("diff_stage", cycle_id = %cycle_id, old = %old.display());

        let target = artifacts.path_at(now);
        let result = self.diff_and_gate(old, &target, artifacts, report);

        match &result {
            Ok(_) => {
                log_op_end!(
                    "diff_stage",
                    duration_ms = start.elapsed().as_millis() as u64,
                    cycle_id = %cycle_id,
                    added_count = report.added_count,
                    changed_count = report.changed_count
                );
            }
            Err(err) => {
                if let Err(cleanup) = discard(&temp_path(&target)) {
                    tracing::warn!(
                        cycle_id = %cycle_id,
                        error = %cleanup,
                        "temporary artifact not removed"
                    );
                }
                log_op_error!(
                    "diff_stage",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    cycle_id = %cycle_id
                );
            }
        }
        result
    }

    fn diff_and_gate(
        &self,
        old: &Path,
        target: &Path,
        artifacts: &SnapshotDir,
        report: &mut CycleReport,
    ) -> Result<ChainEnd> {
        let id_column = &self.config.id_column;
        let old_snapshot = read_snapshot(old, id_column)?;
        let new_snapshot = read_snapshot(&report.new_snapshot, id_column)?;

        // 3. Diff
        let outcome = compute_changes(&old_snapshot, &new_snapshot)?;
        report.stages.push(CycleStage::Diffed);
        let change_set = match outcome {
            DiffOutcome::NoOp => return Ok(ChainEnd::NoChanges),
            DiffOutcome::Changes(set) => set,
        };
        report.added_count = change_set.added.len();
        report.changed_count = change_set.changed.len();

        // 4. Temporary artifact + gate
        let rows = select_affected(&new_snapshot, &change_set);
        let temp = write_temp(target, &encode_snapshot(&rows)?)?;
        let latest_artifact = artifacts.latest(None);
        let decision = gate::check(&temp, latest_artifact.as_deref())?;
        report.stages.push(CycleStage::GateChecked);

        // 5. Finalize or discard
        match decision {
            GateDecision::Duplicate { .. } => {
                discard(&temp)?;
                report.stages.push(CycleStage::Discarded);
                Ok(ChainEnd::Duplicate)
            }
            GateDecision::Novel { .. } => {
                finalize(&temp, target)?;
                report.stages.push(CycleStage::Finalized);
                tracing::info!(
                    cycle_id = %report.cycle_id,
                    path = %target.display(),
                    "new changes saved"
                );
                Ok(ChainEnd::Finalized(target.to_path_buf()))
            }
        }
    }

    fn notify(&self, path: &Path, cycle_id: &CycleId) -> Result<()> {
        let start = Instant::now();
        log_op_start!("notify_downstream", cycle_id = %cycle_id, path = %path.display());

        let result =
            IngestRequest::for_file(path, self.config.ingest_mode, &self.config.id_column)
                .and_then(|request| self.sink.ingest(&request));

        match result {
            Ok(ack) => {
                log_op_end!(
                    "notify_downstream",
                    duration_ms = start.elapsed().as_millis() as u64,
                    cycle_id = %cycle_id,
                    status = ack.status
                );
                Ok(())
            }
            Err(err) => {
                log_op_error!(
                    "notify_downstream",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    cycle_id = %cycle_id,
                    path = %path.display()
                );
                Err(err)
            }
        }
    }

    fn prune_dir(&self, dir: &SnapshotDir, now: NaiveDateTime, cycle_id: &CycleId) -> usize {
        match dir.prune_at(self.config.retention_days, now) {
            Ok(report) => report.deleted.len(),
            Err(err) => {
                tracing::warn!(
                    cycle_id = %cycle_id,
                    path = %dir.dir().display(),
                    err_code = err.code(),
                    error = %err,
                    "prune failed"
                );
                0
            }
        }
    }
}
