//! Error handling for bookdelta-store
//!
//! Wraps bookdelta-core ExError with store-specific helpers

use bookdelta_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for an operation on `path`
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_path(path)
        .with_message(err.to_string())
}

/// Create an error from a CSV reader/writer failure
///
/// Underlying IO failures keep the `Io` kind; everything else means the file
/// is not valid tabular data.
pub fn csv_error(operation: &str, path: &Path, err: csv::Error) -> ExError {
    let kind = if err.is_io_error() {
        ExErrorKind::Io
    } else {
        ExErrorKind::InvalidSnapshot
    };
    ExError::new(kind)
        .with_op(operation.to_string())
        .with_path(path)
        .with_message(err.to_string())
}

/// Create a timestamp parse error for a snapshot file name
pub fn timestamp_parse(file_name: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::TimestampParse)
        .with_op("parse_timestamp")
        .with_path(file_name)
        .with_message(reason.to_string())
}
