//! Crawler seam.
//!
//! The crawler itself (HTTP fetching, pagination, retry) lives outside this
//! workspace. A [`SnapshotSource`] only has to leave a readable snapshot at
//! the path it is given.

use bookdelta_core::errors::{ExError, ExErrorKind};
use bookdelta_store::errors::Result;
use bookdelta_store::read_snapshot;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Produces the new snapshot of a cycle.
pub trait SnapshotSource {
    /// Write a snapshot at `target` and return its record count.
    ///
    /// # Errors
    ///
    /// `Crawl` if no usable snapshot was produced.
    fn produce(&self, target: &Path) -> Result<usize>;
}

fn crawl_error(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Crawl)
        .with_op("crawl")
        .with_message(message)
}

/// Check the produced file reads as a snapshot and count its records.
fn verify_output(target: &Path, id_column: &str) -> Result<usize> {
    if !target.is_file() {
        return Err(crawl_error("crawler did not produce a snapshot file").with_path(target));
    }
    read_snapshot(target, id_column)
        .map(|snapshot| snapshot.len())
        .map_err(|e| {
            crawl_error("crawler output is not a valid snapshot")
                .with_path(target)
                .with_source(e)
        })
}

/// Uses an existing file as the new snapshot by copying it into place.
#[derive(Debug, Clone)]
pub struct FileSource {
    input: PathBuf,
    id_column: String,
}

impl FileSource {
    pub fn new(input: impl Into<PathBuf>, id_column: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            id_column: id_column.into(),
        }
    }
}

impl SnapshotSource for FileSource {
    fn produce(&self, target: &Path) -> Result<usize> {
        fs::copy(&self.input, target).map_err(|e| {
            crawl_error(format!("cannot copy {}: {}", self.input.display(), e)).with_path(target)
        })?;
        verify_output(target, &self.id_column)
    }
}

/// Runs an external crawler through `sh -c`.
///
/// Every `{output}` in the command line is replaced by the target path.
#[derive(Debug, Clone)]
pub struct CommandSource {
    command: String,
    id_column: String,
}

impl CommandSource {
    pub fn new(command: impl Into<String>, id_column: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            id_column: id_column.into(),
        }
    }

    /// Command line with the placeholder substituted
    pub fn command_line(&self, target: &Path) -> String {
        self.command.replace("{output}", &target.display().to_string())
    }
}

impl SnapshotSource for CommandSource {
    fn produce(&self, target: &Path) -> Result<usize> {
        let line = self.command_line(target);
        tracing::info!(command = %line, "running crawler");

        let output = Command::new("sh")
            .arg("-c")
            .arg(&line)
            .output()
            .map_err(|e| crawl_error(format!("cannot start crawler: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(crawl_error(format!(
                "crawler exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        verify_output(target, &self.id_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_source_copies_and_counts() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("export.csv");
        fs::write(&input, "id,name\n1,A\n2,B\n2,B\n").unwrap();
        let target = tmp.path().join("books_data_2025-06-13_10-00-00.csv");

        let count = FileSource::new(&input, "id").produce(&target).unwrap();

        assert_eq!(count, 2);
        assert!(target.exists());
    }

    #[test]
    fn test_file_source_missing_input_is_crawl_error() {
        let tmp = TempDir::new().unwrap();
        let err = FileSource::new(tmp.path().join("absent.csv"), "id")
            .produce(&tmp.path().join("out.csv"))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Crawl);
    }

    #[test]
    fn test_command_line_substitutes_output() {
        let source = CommandSource::new("crawl-books --out {output}", "id");
        assert_eq!(
            source.command_line(Path::new("data/books_data_x.csv")),
            "crawl-books --out data/books_data_x.csv"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_command_source_runs_shell() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("out.csv");
        let source = CommandSource::new("printf 'id,name\\n1,A\\n' > {output}", "id");

        assert_eq!(source.produce(&target).unwrap(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_source_nonzero_exit_is_crawl_error() {
        let tmp = TempDir::new().unwrap();
        let source = CommandSource::new("echo boom >&2; exit 3", "id");

        let err = source.produce(&tmp.path().join("out.csv")).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Crawl);
        assert!(err.message().contains("boom"));
    }
}
