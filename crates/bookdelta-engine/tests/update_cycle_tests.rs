// Integration tests for the update cycle: first run, no-op, novel changes,
// duplicate suppression, and per-stage failure isolation.

mod common;

use bookdelta_core::logging_facility::test_capture::init_test_capture;
use bookdelta_core::ExErrorKind;
use bookdelta_core_types::schema::EVENT_END;
use bookdelta_engine::{CycleOutcome, CycleStage, IngestMode, IngestRequest, NotificationStatus};
use common::{june, Harness};
use std::fs;

const OLD: &str = "id,name,price\n1,A,10\n";
const NEW: &str = "id,name,price\n1,A,12\n2,B,5\n";
const DELTA: &str = "id,name,price\n1,A,12\n2,B,5\n";

#[test]
fn test_first_run_ingests_full_snapshot() {
    // Given: an empty crawl directory
    let h = Harness::new();
    h.crawl_returns(Some(NEW));

    // When: a cycle runs
    let report = h.orchestrator.run_cycle(june(13));

    // Then: the new snapshot itself goes downstream, no artifact is written
    assert_eq!(report.outcome, CycleOutcome::InitialIngest);
    assert!(report.reached(CycleStage::NoneFound));
    assert!(!report.reached(CycleStage::Diffed));
    assert_eq!(report.notification, NotificationStatus::Delivered);
    assert_eq!(
        h.sink.calls(),
        vec![IngestRequest::Path {
            path: h
                .crawl_path("books_data_2025-06-13_12-00-00.csv")
                .display()
                .to_string()
        }]
    );
    assert!(h.compare_files().is_empty());
    assert_eq!(report.stages.last(), Some(&CycleStage::Done));
}

#[test]
fn test_identical_snapshots_create_no_artifact() {
    // Given: yesterday's snapshot equals today's crawl
    let h = Harness::new();
    fs::write(h.crawl_path("books_data_2025-06-12_12-00-00.csv"), OLD).unwrap();
    h.crawl_returns(Some(OLD));

    // When
    let report = h.orchestrator.run_cycle(june(13));

    // Then: no-op, no file in compare, nobody notified, pruning still ran
    assert_eq!(report.outcome, CycleOutcome::NoChanges);
    assert!(report.reached(CycleStage::Diffed));
    assert!(!report.reached(CycleStage::GateChecked));
    assert!(h.compare_files().is_empty());
    assert!(h.sink.calls().is_empty());
    assert_eq!(report.notification, NotificationStatus::NotAttempted);
    assert!(report.reached(CycleStage::Pruned));
}

#[test]
fn test_changes_are_finalized_and_sent() {
    // Given: a previous snapshot with one record
    let h = Harness::new();
    fs::write(h.crawl_path("books_data_2025-06-12_12-00-00.csv"), OLD).unwrap();
    h.crawl_returns(Some(NEW));

    // When
    let report = h.orchestrator.run_cycle(june(13));

    // Then: the artifact holds full new rows for ids 1 and 2
    assert_eq!(report.outcome, CycleOutcome::Finalized);
    assert_eq!((report.added_count, report.changed_count), (1, 1));
    let artifact = h.compare_path("changes_2025-06-13_12-00-00.csv");
    assert_eq!(report.artifact.as_ref(), Some(&artifact));
    assert_eq!(fs::read_to_string(&artifact).unwrap(), DELTA);
    assert_eq!(h.compare_files(), vec!["changes_2025-06-13_12-00-00.csv"]);

    // And: exactly one request referencing the artifact
    assert_eq!(
        h.sink.calls(),
        vec![IngestRequest::Path {
            path: artifact.display().to_string()
        }]
    );
    assert_eq!(
        report.stages,
        vec![
            CycleStage::Started,
            CycleStage::Crawled,
            CycleStage::OldSnapshotLocated,
            CycleStage::Diffed,
            CycleStage::GateChecked,
            CycleStage::Finalized,
            CycleStage::DownstreamNotified,
            CycleStage::Pruned,
            CycleStage::Done,
        ]
    );
}

#[test]
fn test_repeated_delta_is_discarded_without_notification() {
    // Given: yesterday's finalized artifact already holds today's delta
    let h = Harness::new();
    fs::write(h.crawl_path("books_data_2025-06-12_12-00-00.csv"), OLD).unwrap();
    fs::write(h.compare_path("changes_2025-06-12_12-00-00.csv"), DELTA).unwrap();
    h.crawl_returns(Some(NEW));

    // When
    let report = h.orchestrator.run_cycle(june(13));

    // Then: temporary artifact removed, nothing finalized or sent
    assert_eq!(report.outcome, CycleOutcome::DuplicateDiscarded);
    assert!(report.reached(CycleStage::Discarded));
    assert!(!report.reached(CycleStage::Finalized));
    assert_eq!(h.compare_files(), vec!["changes_2025-06-12_12-00-00.csv"]);
    assert!(h.sink.calls().is_empty());
    assert!(report.artifact.is_none());
}

#[test]
fn test_different_delta_from_previous_artifact_is_novel() {
    let h = Harness::new();
    fs::write(h.crawl_path("books_data_2025-06-12_12-00-00.csv"), OLD).unwrap();
    fs::write(
        h.compare_path("changes_2025-06-12_12-00-00.csv"),
        "id,name,price\n1,A,11\n",
    )
    .unwrap();
    h.crawl_returns(Some(NEW));

    let report = h.orchestrator.run_cycle(june(13));

    assert_eq!(report.outcome, CycleOutcome::Finalized);
    assert_eq!(h.compare_files().len(), 2);
    assert_eq!(h.sink.calls().len(), 1);
}

#[test]
fn test_notification_failure_keeps_artifact_and_prunes() {
    // Given: the ingestion service rejects requests, and an expired snapshot
    let h = Harness::new();
    fs::write(h.crawl_path("books_data_2025-06-01_12-00-00.csv"), OLD).unwrap();
    fs::write(h.crawl_path("books_data_2025-06-12_12-00-00.csv"), OLD).unwrap();
    h.crawl_returns(Some(NEW));
    h.sink.set_failing(true);

    // When
    let report = h.orchestrator.run_cycle(june(13));

    // Then: artifact stays finalized, failure is reported once
    assert_eq!(report.outcome, CycleOutcome::Finalized);
    assert!(matches!(report.notification, NotificationStatus::Failed(ref m) if m.contains("500")));
    assert!(!report.reached(CycleStage::DownstreamNotified));
    assert!(h.compare_path("changes_2025-06-13_12-00-00.csv").exists());
    assert_eq!(h.sink.calls().len(), 1);
    assert_eq!(
        report.error.as_ref().map(|e| e.kind()),
        Some(ExErrorKind::Notification)
    );

    // And: pruning still ran
    assert!(report.reached(CycleStage::Pruned));
    assert_eq!(report.pruned_snapshots, 1);
    assert!(!h.crawl_path("books_data_2025-06-01_12-00-00.csv").exists());
}

#[test]
fn test_diff_failure_aborts_without_artifact_or_pruning() {
    // Given: the previous snapshot has a different column set, plus an
    // expired file that pruning would otherwise remove
    let h = Harness::new();
    fs::write(h.crawl_path("books_data_2025-06-01_12-00-00.csv"), OLD).unwrap();
    fs::write(
        h.crawl_path("books_data_2025-06-12_12-00-00.csv"),
        "id,name,cost\n1,A,10\n",
    )
    .unwrap();
    h.crawl_returns(Some(NEW));

    // When
    let report = h.orchestrator.run_cycle(june(13));

    // Then: the cycle ends cleanly with a schema mismatch recorded
    assert_eq!(report.outcome, CycleOutcome::DiffFailed);
    assert_eq!(
        report.error.as_ref().map(|e| e.kind()),
        Some(ExErrorKind::SchemaMismatch)
    );
    assert!(h.compare_files().is_empty());
    assert!(h.sink.calls().is_empty());
    assert!(!report.reached(CycleStage::Pruned));
    assert!(h.crawl_path("books_data_2025-06-01_12-00-00.csv").exists());
    assert_eq!(report.stages.last(), Some(&CycleStage::Done));
}

#[test]
fn test_crawl_failure_ends_cycle_before_diffing() {
    let h = Harness::new();
    fs::write(h.crawl_path("books_data_2025-06-01_12-00-00.csv"), OLD).unwrap();
    h.crawl_returns(None);

    let report = h.orchestrator.run_cycle(june(13));

    assert_eq!(report.outcome, CycleOutcome::CrawlFailed);
    assert_eq!(
        report.error.as_ref().map(|e| e.kind()),
        Some(ExErrorKind::Crawl)
    );
    assert_eq!(
        report.stages,
        vec![CycleStage::Started, CycleStage::Done]
    );
    assert_eq!(h.crawl_files(), vec!["books_data_2025-06-01_12-00-00.csv"]);
    assert!(h.sink.calls().is_empty());
}

#[test]
fn test_invalid_crawl_output_is_not_kept_as_previous_snapshot() {
    // Given: a good snapshot, then a crawl whose output lacks the id column
    let h = Harness::new();
    fs::write(h.crawl_path("books_data_2025-06-12_12-00-00.csv"), OLD).unwrap();
    h.crawl_returns(Some("sku,name\n1,A\n"));

    // When: the bad crawl runs
    let report = h.orchestrator.run_cycle(june(13));

    // Then: it fails and leaves nothing behind in the crawl directory
    assert_eq!(report.outcome, CycleOutcome::CrawlFailed);
    assert_eq!(h.crawl_files(), vec!["books_data_2025-06-12_12-00-00.csv"]);

    // When: the next crawl succeeds
    h.crawl_returns(Some(NEW));
    let report = h.orchestrator.run_cycle(june(14));

    // Then: it diffs against the last good snapshot and delivers the changes
    assert_eq!(report.outcome, CycleOutcome::Finalized);
    assert_eq!(
        report.previous_snapshot,
        Some(h.crawl_path("books_data_2025-06-12_12-00-00.csv"))
    );
    assert_eq!((report.added_count, report.changed_count), (1, 1));
    assert_eq!(h.sink.calls().len(), 1);
    assert_eq!(
        h.crawl_files(),
        vec![
            "books_data_2025-06-12_12-00-00.csv",
            "books_data_2025-06-14_12-00-00.csv"
        ]
    );
}

#[test]
fn test_negative_retention_deletes_nothing() {
    // Given: a misconfigured retention window
    let h = Harness::configured(|c| c.retention_days = -1);
    fs::write(h.crawl_path("books_data_2025-06-12_12-00-00.csv"), OLD).unwrap();
    h.crawl_returns(Some(NEW));

    // When
    let report = h.orchestrator.run_cycle(june(13));

    // Then: pruning refuses to run and both snapshots survive
    assert_eq!(report.outcome, CycleOutcome::Finalized);
    assert_eq!((report.pruned_snapshots, report.pruned_artifacts), (0, 0));
    assert_eq!(
        h.crawl_files(),
        vec![
            "books_data_2025-06-12_12-00-00.csv",
            "books_data_2025-06-13_12-00-00.csv"
        ]
    );
    assert!(h.compare_path("changes_2025-06-13_12-00-00.csv").exists());
}

#[test]
fn test_unparsable_snapshot_names_do_not_break_the_cycle() {
    let h = Harness::new();
    fs::write(h.crawl_path("books_data_notadate.csv"), OLD).unwrap();
    h.crawl_returns(Some(NEW));

    let report = h.orchestrator.run_cycle(june(13));

    assert_eq!(report.outcome, CycleOutcome::InitialIngest);
    assert!(h.crawl_path("books_data_notadate.csv").exists());
}

#[test]
fn test_pruning_covers_both_directories() {
    let h = Harness::new();
    fs::write(h.crawl_path("books_data_2025-06-02_12-00-00.csv"), OLD).unwrap();
    fs::write(h.crawl_path("books_data_2025-06-12_12-00-00.csv"), OLD).unwrap();
    fs::write(h.compare_path("changes_2025-06-02_12-00-00.csv"), DELTA).unwrap();
    fs::write(h.compare_path("changes_2025-06-06_12-00-00.csv"), DELTA).unwrap();
    h.crawl_returns(Some(OLD));

    let report = h.orchestrator.run_cycle(june(13));

    assert_eq!(report.outcome, CycleOutcome::NoChanges);
    assert_eq!((report.pruned_snapshots, report.pruned_artifacts), (1, 1));
    assert_eq!(
        h.crawl_files(),
        vec![
            "books_data_2025-06-12_12-00-00.csv",
            "books_data_2025-06-13_12-00-00.csv"
        ]
    );
    assert_eq!(h.compare_files(), vec!["changes_2025-06-06_12-00-00.csv"]);
}

#[test]
fn test_inline_mode_sends_rendered_texts() {
    let h = Harness::configured(|c| c.ingest_mode = IngestMode::Inline);
    fs::write(h.crawl_path("books_data_2025-06-12_12-00-00.csv"), OLD).unwrap();
    h.crawl_returns(Some(NEW));

    let report = h.orchestrator.run_cycle(june(13));

    assert_eq!(report.notification, NotificationStatus::Delivered);
    match &h.sink.calls()[..] {
        [IngestRequest::Inline { texts, ids }] => {
            assert_eq!(ids, &vec!["1".to_string(), "2".to_string()]);
            assert!(texts[0].starts_with("Book Name: A\n"));
            assert!(texts[1].contains("Link: N/A"));
        }
        other => panic!("expected one inline request, got {:?}", other),
    }
}

#[test]
fn test_cycle_logs_carry_cycle_id() {
    let capture = init_test_capture();
    let h = Harness::new();
    h.crawl_returns(Some(NEW));

    let report = h.orchestrator.run_cycle(june(13));

    let cycle_id = report.cycle_id.to_string();
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("update_cycle")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field("cycle_id") == Some(cycle_id.as_str())
    });
    assert_eq!(ends, 1);
    let crawl_ends = capture.count_events(|e| {
        e.op.as_deref() == Some("crawl") && e.field("cycle_id") == Some(cycle_id.as_str())
    });
    assert_eq!(crawl_ends, 2);
}
