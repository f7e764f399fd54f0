//! Update pipeline configuration.
//!
//! Values come from the process environment, after loading a `.env` file if
//! one is present. Every setting has a default except the optional ones
//! (`INGEST_API_TOKEN`, `CRAWL_COMMAND`, `LOG_FILE`).

use bookdelta_core::errors::{ExError, ExErrorKind};
use bookdelta_core_types::Sensitive;
use bookdelta_store::errors::Result;
use bookdelta_store::SnapshotDir;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Extension of snapshot and artifact files
pub const SNAPSHOT_EXT: &str = "csv";

/// How the downstream ingestion request refers to the records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// Send the path of the file to ingest
    Path,
    /// Send rendered record texts and their ids
    Inline,
}

impl FromStr for IngestMode {
    type Err = ExError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "path" => Ok(IngestMode::Path),
            "inline" => Ok(IngestMode::Inline),
            other => Err(invalid("INGEST_MODE", other, "expected `path` or `inline`")),
        }
    }
}

/// Configuration of one update cycle
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub crawl_dir: PathBuf,
    pub compare_dir: PathBuf,
    pub snapshot_prefix: String,
    pub artifact_prefix: String,
    pub id_column: String,
    pub retention_days: i64,
    pub ingest_url: String,
    pub ingest_mode: IngestMode,
    pub ingest_timeout: Duration,
    pub ingest_token: Option<Sensitive<String>>,
    /// Shell command producing the new snapshot; `{output}` is replaced by
    /// the target path
    pub crawl_command: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_append: bool,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            crawl_dir: PathBuf::from("data/crawl_tiki_data"),
            compare_dir: PathBuf::from("data/compare"),
            snapshot_prefix: "books_data".to_string(),
            artifact_prefix: "changes".to_string(),
            id_column: "id".to_string(),
            retention_days: 7,
            ingest_url: "http://localhost:8000/insert_batch".to_string(),
            ingest_mode: IngestMode::Path,
            ingest_timeout: Duration::from_secs(300),
            ingest_token: None,
            crawl_command: None,
            log_file: None,
            log_append: false,
        }
    }
}

fn invalid(var: &str, value: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidConfig)
        .with_op("load_config")
        .with_message(format!("{}={:?}: {}", var, value, reason))
}

fn parse_number<T: FromStr>(var: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| invalid(var, &value, "not a valid number")),
    }
}

impl UpdateConfig {
    /// Load `.env` (if present) and read the process environment.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for unparsable numbers, a negative retention window or
    /// an unknown `INGEST_MODE`.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);

        let retention_days = parse_number("DAYS_TO_KEEP", lookup("DAYS_TO_KEEP"), 7i64)?;
        if retention_days < 0 {
            return Err(invalid(
                "DAYS_TO_KEEP",
                &retention_days.to_string(),
                "must not be negative",
            ));
        }
        let timeout_secs =
            parse_number("INGEST_TIMEOUT_SECS", lookup("INGEST_TIMEOUT_SECS"), 300u64)?;
        let ingest_mode = match lookup("INGEST_MODE") {
            Some(raw) => raw.parse()?,
            None => defaults.ingest_mode,
        };
        let log_append = match lookup("LOG_FILE_MODE").as_deref().map(str::trim) {
            None | Some("w") => false,
            Some("a") => true,
            Some(other) => return Err(invalid("LOG_FILE_MODE", other, "expected `w` or `a`")),
        };

        Ok(Self {
            crawl_dir: lookup("CRAWL_DIR").map(PathBuf::from).unwrap_or(defaults.crawl_dir),
            compare_dir: lookup("COMPARE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.compare_dir),
            snapshot_prefix: text("SNAPSHOT_PREFIX", defaults.snapshot_prefix),
            artifact_prefix: text("ARTIFACT_PREFIX", defaults.artifact_prefix),
            id_column: text("ID_COLUMN", defaults.id_column),
            retention_days,
            ingest_url: text("INSERT_BATCH_API", defaults.ingest_url),
            ingest_mode,
            ingest_timeout: Duration::from_secs(timeout_secs),
            ingest_token: lookup("INGEST_API_TOKEN")
                .filter(|t| !t.is_empty())
                .map(Sensitive::new),
            crawl_command: lookup("CRAWL_COMMAND").filter(|c| !c.trim().is_empty()),
            log_file: lookup("LOG_FILE").filter(|f| !f.is_empty()).map(PathBuf::from),
            log_append,
        })
    }

    /// Directory of crawler snapshots
    pub fn snapshot_dir(&self) -> SnapshotDir {
        SnapshotDir::new(&self.crawl_dir, &self.snapshot_prefix, SNAPSHOT_EXT)
    }

    /// Directory of finalized diff artifacts
    pub fn artifact_dir(&self) -> SnapshotDir {
        SnapshotDir::new(&self.compare_dir, &self.artifact_prefix, SNAPSHOT_EXT)
    }

    /// Create both working directories.
    ///
    /// Called once at startup; failure here is the one error that stops the
    /// process instead of being logged by the cycle.
    pub fn prepare_directories(&self) -> Result<()> {
        for dir in [&self.crawl_dir, &self.compare_dir] {
            std::fs::create_dir_all(dir).map_err(|e| {
                ExError::new(ExErrorKind::InvalidConfig)
                    .with_op("prepare_directories")
                    .with_path(dir)
                    .with_message(format!("working directory is not usable: {}", e))
            })?;
        }
        Ok(())
    }
}
