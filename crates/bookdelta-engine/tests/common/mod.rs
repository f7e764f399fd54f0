#![allow(dead_code)]

use bookdelta_core::errors::{ExError, ExErrorKind};
use bookdelta_engine::{
    IngestAck, IngestRequest, IngestionSink, SnapshotSource, UpdateConfig, UpdateOrchestrator,
};
use bookdelta_store::errors::Result;
use bookdelta_store::read_snapshot;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Noon on the given June 2025 day
pub fn june(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Crawler stand-in writing fixed CSV content, then checking it parses
pub struct FixedSource {
    content: Arc<Mutex<Option<String>>>,
}

impl FixedSource {
    pub fn new() -> (Self, Arc<Mutex<Option<String>>>) {
        let content = Arc::new(Mutex::new(None));
        (
            Self {
                content: content.clone(),
            },
            content,
        )
    }
}

impl SnapshotSource for FixedSource {
    fn produce(&self, target: &Path) -> Result<usize> {
        let guard = self.content.lock().unwrap();
        match guard.as_deref() {
            Some(text) => {
                fs::write(target, text).unwrap();
                read_snapshot(target, "id")
                    .map(|snapshot| snapshot.len())
                    .map_err(|e| {
                        ExError::new(ExErrorKind::Crawl)
                            .with_op("crawl")
                            .with_message("crawler output is not a valid snapshot")
                            .with_source(e)
                    })
            }
            None => Err(ExError::new(ExErrorKind::Crawl)
                .with_op("crawl")
                .with_message("upstream API unavailable")),
        }
    }
}

/// Sink recording every request; fails when `fail` is set
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub requests: Arc<Mutex<Vec<IngestRequest>>>,
    pub fail: Arc<Mutex<bool>>,
}

impl RecordingSink {
    pub fn calls(&self) -> Vec<IngestRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

impl IngestionSink for RecordingSink {
    fn ingest(&self, request: &IngestRequest) -> Result<IngestAck> {
        self.requests.lock().unwrap().push(request.clone());
        if *self.fail.lock().unwrap() {
            return Err(ExError::new(ExErrorKind::Notification)
                .with_op("ingest")
                .with_message("ingestion service answered 500 Internal Server Error"));
        }
        Ok(IngestAck {
            status: 200,
            message: Some("ok".to_string()),
        })
    }
}

/// Workspace with crawl and compare directories and a controllable pipeline
pub struct Harness {
    pub tmp: TempDir,
    pub config: UpdateConfig,
    pub crawl: Arc<Mutex<Option<String>>>,
    pub sink: RecordingSink,
    pub orchestrator: UpdateOrchestrator,
}

impl Harness {
    pub fn new() -> Self {
        Self::configured(|_| {})
    }

    /// Harness whose config is adjusted by `tweak` before wiring
    pub fn configured(tweak: impl FnOnce(&mut UpdateConfig)) -> Self {
        let tmp = TempDir::new().unwrap();
        let mut config = UpdateConfig {
            crawl_dir: tmp.path().join("crawl_tiki_data"),
            compare_dir: tmp.path().join("compare"),
            ..UpdateConfig::default()
        };
        tweak(&mut config);
        config.prepare_directories().unwrap();

        let (source, crawl) = FixedSource::new();
        let sink = RecordingSink::default();
        let orchestrator =
            UpdateOrchestrator::new(config.clone(), Box::new(source), Box::new(sink.clone()));
        Self {
            tmp,
            config,
            crawl,
            sink,
            orchestrator,
        }
    }

    /// Next crawl returns `csv`; `None` makes it fail
    pub fn crawl_returns(&self, csv: Option<&str>) {
        *self.crawl.lock().unwrap() = csv.map(str::to_string);
    }

    pub fn files_in(&self, dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }

    pub fn compare_files(&self) -> Vec<String> {
        self.files_in(&self.config.compare_dir)
    }

    pub fn crawl_files(&self) -> Vec<String> {
        self.files_in(&self.config.crawl_dir)
    }

    pub fn crawl_path(&self, name: &str) -> PathBuf {
        self.config.crawl_dir.join(name)
    }

    pub fn compare_path(&self, name: &str) -> PathBuf {
        self.config.compare_dir.join(name)
    }
}
