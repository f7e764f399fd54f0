//! Tabular (CSV) codec for snapshots and diff artifacts.
//!
//! Cells are typed on read with [`FieldValue::parse`] and written back with
//! [`FieldValue::to_cell`], so a snapshot written by this module reads back
//! equal to itself.

use crate::atomic::atomic_write;
use crate::errors::{csv_error, io_error, Result};
use bookdelta_core::model::SnapshotBuilder;
use bookdelta_core::{log_op_end, log_op_error, log_op_start, ExError, FieldValue, Snapshot};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

const UTF8_BOM: char = '\u{feff}';

/// Read and type a snapshot file keyed by `id_column`.
///
/// Duplicate identifiers keep their first row; the number dropped is logged.
///
/// # Errors
///
/// - `Io` if the file cannot be opened or read
/// - `InvalidSnapshot` for malformed CSV, ragged rows or a missing identifier
/// - `MissingIdColumn` if the header lacks `id_column`
pub fn read_snapshot(path: &Path, id_column: &str) -> Result<Snapshot> {
    let start = Instant::now();
    log_op_start!("read_snapshot", path = %path.display());

    let result = File::open(path)
        .map_err(|e| io_error("read_snapshot", path, e))
        .and_then(|file| parse_snapshot(file, id_column, path));

    match result {
        Ok(snapshot) => {
            if snapshot.duplicates_dropped() > 0 {
                tracing::warn!(
                    path = %path.display(),
                    duplicate_count = snapshot.duplicates_dropped(),
                    "duplicate identifiers dropped, first occurrence kept"
                );
            }
            log_op_end!(
                "read_snapshot",
                duration_ms = start.elapsed().as_millis() as u64,
                row_count = snapshot.len()
            );
            Ok(snapshot)
        }
        Err(err) => {
            log_op_error!(
                "read_snapshot",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

/// Parse CSV from any reader. `origin` is only used for error context.
pub fn parse_snapshot<R: Read>(reader: R, id_column: &str, origin: &Path) -> Result<Snapshot> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()
        .map_err(|e| csv_error("read_snapshot", origin, e))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches(UTF8_BOM).to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let with_context = |e: bookdelta_core::DeltaError| {
        ExError::from(e).with_op("read_snapshot").with_path(origin)
    };

    let mut builder = SnapshotBuilder::new(columns, id_column).map_err(with_context)?;
    for record in csv_reader.records() {
        let record = record.map_err(|e| csv_error("read_snapshot", origin, e))?;
        let values = record.iter().map(FieldValue::parse).collect();
        builder.push_row(values).map_err(with_context)?;
    }
    Ok(builder.build())
}

/// Serialize a snapshot: header in column order, rows in snapshot order.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let to_err = |e: csv::Error| csv_error("encode_snapshot", Path::new("<memory>"), e);

    writer.write_record(snapshot.columns()).map_err(to_err)?;
    for record in snapshot.records() {
        writer
            .write_record(record.values.iter().map(FieldValue::to_cell))
            .map_err(to_err)?;
    }
    writer.into_inner().map_err(|e| {
        ExError::new(bookdelta_core::ExErrorKind::Serialization)
            .with_op("encode_snapshot")
            .with_message(e.to_string())
    })
}

/// Encode and atomically write a snapshot to `path`.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let bytes = encode_snapshot(snapshot)?;
    atomic_write(path, &bytes)
}
