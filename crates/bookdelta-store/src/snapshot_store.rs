//! Snapshot Store: a directory of timestamped snapshot (or artifact) files.
//!
//! Files whose names do not carry a valid timestamp are never fatal. They are
//! logged as a warning and excluded from both latest-lookup and pruning.

use crate::errors::{io_error, Result};
use crate::naming;
use bookdelta_core::{log_op_end, log_op_error, log_op_start, ExError, ExErrorKind};
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A file in the directory whose name parsed to a timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampedFile {
    pub path: PathBuf,
    pub timestamp: NaiveDateTime,
}

/// What a prune pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Files removed, in directory order
    pub deleted: Vec<PathBuf>,
    /// Files with an unparsable timestamp, left in place
    pub skipped: usize,
    /// Files that were old enough but could not be removed
    pub failed: usize,
}

/// Scan `dir` for files passing `filter`, parsing each one's timestamp.
///
/// Unparsable names are logged and left out.
fn scan(
    dir: &Path,
    ext: &str,
    filter: impl Fn(&str) -> bool,
) -> Result<(Vec<TimestampedFile>, usize)> {
    let entries = fs::read_dir(dir).map_err(|e| io_error("scan_dir", dir, e))?;

    let mut files = Vec::new();
    let mut skipped = 0usize;
    for entry in entries {
        let entry = entry.map_err(|e| io_error("scan_dir", dir, e))?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !filter(&name) || !entry.path().is_file() {
            continue;
        }
        match naming::parse_timestamp(&name, ext) {
            Ok(timestamp) => files.push(TimestampedFile {
                path: entry.path(),
                timestamp,
            }),
            Err(err) => {
                skipped += 1;
                tracing::warn!(
                    file = %name,
                    err_code = err.code(),
                    error = %err,
                    "skipping file with unparsable timestamp"
                );
            }
        }
    }
    Ok((files, skipped))
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}

/// List files named `<prefix>..._<date>_<time>.<ext>` in `dir`, oldest first.
///
/// # Errors
///
/// `Io` if the directory cannot be read.
pub fn list_timestamped(dir: &Path, prefix: &str, ext: &str) -> Result<Vec<TimestampedFile>> {
    let (mut files, _) = scan(dir, ext, |name| naming::matches(name, prefix, ext))?;
    files.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.path.cmp(&b.path)));
    Ok(files)
}

/// Most recent file for `prefix` in `dir`, excluding `exclude`.
///
/// Never fails: an unreadable directory is logged and treated as empty.
/// Ties on timestamp resolve to the lexicographically greatest path.
pub fn find_latest(
    dir: &Path,
    prefix: &str,
    ext: &str,
    exclude: Option<&Path>,
) -> Option<PathBuf> {
    let start = Instant::now();
    log_op_start!("find_latest", path = %dir.display(), prefix = prefix);

    let files = match list_timestamped(dir, prefix, ext) {
        Ok(files) => files,
        Err(err) => {
            log_op_error!(
                "find_latest",
                err,
                duration_ms = start.elapsed().as_millis() as u64
            );
            return None;
        }
    };

    let latest = files
        .into_iter()
        .filter(|f| !exclude.map(|ex| same_file(&f.path, ex)).unwrap_or(false))
        .max_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.path.cmp(&b.path)))
        .map(|f| f.path);

    log_op_end!(
        "find_latest",
        duration_ms = start.elapsed().as_millis() as u64,
        found = latest.is_some()
    );
    latest
}

/// Delete every `.<ext>` file in `dir` older than `retention_days`.
///
/// # Errors
///
/// - `InvalidInput` if `retention_days` is negative
/// - `Io` if the directory cannot be read. Individual deletion failures are
///   logged and counted in [`PruneReport::failed`].
pub fn prune(dir: &Path, ext: &str, retention_days: i64) -> Result<PruneReport> {
    prune_at(dir, ext, retention_days, Local::now().naive_local())
}

/// [`prune`] against an explicit clock.
///
/// A file is deleted when the whole number of days between its timestamp and
/// `now` is strictly greater than `retention_days`.
pub fn prune_at(
    dir: &Path,
    ext: &str,
    retention_days: i64,
    now: NaiveDateTime,
) -> Result<PruneReport> {
    let start = Instant::now();
    log_op_start!("prune", path = %dir.display(), retention_days = retention_days);

    if retention_days < 0 {
        let err = ExError::new(ExErrorKind::InvalidInput)
            .with_op("prune")
            .with_path(dir)
            .with_message(format!(
                "retention_days must not be negative, got {}",
                retention_days
            ));
        log_op_error!(
            "prune",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        return Err(err);
    }

    let (files, skipped) = match scan(dir, ext, |name| naming::has_extension(name, ext)) {
        Ok(found) => found,
        Err(err) => {
            log_op_error!(
                "prune",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            return Err(err);
        }
    };

    let mut report = PruneReport {
        skipped,
        ..PruneReport::default()
    };
    for file in files {
        if (now - file.timestamp).num_days() <= retention_days {
            continue;
        }
        match fs::remove_file(&file.path) {
            Ok(()) => {
                tracing::info!(path = %file.path.display(), "deleted old file");
                report.deleted.push(file.path);
            }
            Err(e) => {
                report.failed += 1;
                let err = io_error("prune", &file.path, e);
                tracing::warn!(err_code = err.code(), error = %err, "could not delete old file");
            }
        }
    }

    log_op_end!(
        "prune",
        duration_ms = start.elapsed().as_millis() as u64,
        pruned_count = report.deleted.len(),
        skipped_count = report.skipped,
        failed_count = report.failed
    );
    Ok(report)
}

/// A snapshot directory bound to one file prefix and extension.
#[derive(Debug, Clone)]
pub struct SnapshotDir {
    dir: PathBuf,
    prefix: String,
    ext: String,
}

impl SnapshotDir {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, ext: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            ext: ext.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// Path of the file taken at `timestamp`
    pub fn path_at(&self, timestamp: NaiveDateTime) -> PathBuf {
        self.dir.join(naming::file_name(&self.prefix, timestamp, &self.ext))
    }

    pub fn latest(&self, exclude: Option<&Path>) -> Option<PathBuf> {
        find_latest(&self.dir, &self.prefix, &self.ext, exclude)
    }

    pub fn prune_at(&self, retention_days: i64, now: NaiveDateTime) -> Result<PruneReport> {
        prune_at(&self.dir, &self.ext, retention_days, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_path_at_joins_dir_and_name() {
        let dir = SnapshotDir::new("data/crawl_tiki_data", "books_data", "csv");
        assert_eq!(
            dir.path_at(at(13)),
            PathBuf::from("data/crawl_tiki_data/books_data_2025-06-13_12-00-00.csv")
        );
    }

    #[test]
    fn test_list_is_oldest_first() {
        let tmp = TempDir::new().unwrap();
        let dir = SnapshotDir::new(tmp.path(), "books_data", "csv");
        for day in [12, 10, 11] {
            fs::write(dir.path_at(at(day)), "id\n").unwrap();
        }

        let listed = list_timestamped(tmp.path(), "books_data", "csv").unwrap();
        let days: Vec<NaiveDateTime> = listed.iter().map(|f| f.timestamp).collect();
        assert_eq!(days, vec![at(10), at(11), at(12)]);
    }

    #[test]
    fn test_find_latest_on_missing_dir_is_none() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert_eq!(find_latest(&missing, "books_data", "csv", None), None);
    }

    #[test]
    fn test_prune_rejects_negative_retention() {
        let tmp = TempDir::new().unwrap();
        let dir = SnapshotDir::new(tmp.path(), "books_data", "csv");
        let today = dir.path_at(at(20));
        fs::write(&today, "id\n").unwrap();

        let err = prune_at(tmp.path(), "csv", -1, at(20)).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert!(today.exists());
    }

    #[test]
    fn test_prune_on_missing_dir_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = prune_at(&tmp.path().join("nope"), "csv", 7, at(20)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Io);
    }
}
