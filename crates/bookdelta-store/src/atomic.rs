//! Atomic write primitives
//!
//! Uses temp→rename so readers never observe a partially written file.
//! The temporary file sits next to the target with `.tmp` appended, which
//! keeps it out of every extension-filtered directory scan.

use crate::errors::{io_error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Temporary path used while `target` is being written
pub fn temp_path(target: &Path) -> PathBuf {
    let mut name: OsString = target.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `content` to the temporary path for `target` and return it.
///
/// The target itself is untouched until [`finalize`].
pub fn write_temp(target: &Path, content: &[u8]) -> Result<PathBuf> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_parent_dir", parent, e))?;
    }
    let temp = temp_path(target);
    fs::write(&temp, content).map_err(|e| io_error("write_temp", &temp, e))?;
    Ok(temp)
}

/// Atomically move a temporary file onto its target.
pub fn finalize(temp: &Path, target: &Path) -> Result<()> {
    fs::rename(temp, target).map_err(|e| io_error("finalize", target, e))
}

/// Remove a temporary file; a file that is already gone is not an error.
pub fn discard(temp: &Path) -> Result<()> {
    match fs::remove_file(temp) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error("discard_temp", temp, e)),
    }
}

/// Atomically write bytes to a file
pub fn atomic_write(target: &Path, content: &[u8]) -> Result<()> {
    let temp = write_temp(target, content)?;
    finalize(&temp, target)
}
