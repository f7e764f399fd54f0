//! Change-Suppression Gate.
//!
//! Compares a freshly written, not yet finalized diff artifact with the most
//! recent finalized one. Content is compared line by line with line endings
//! normalised, so a file rewritten with CRLF endings or without a trailing
//! newline still counts as the same artifact.

use crate::errors::{io_error, Result};
use bookdelta_core::{log_op_end, log_op_error, log_op_start};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What to do with the candidate artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// No prior artifact, or the content differs: finalize and propagate
    Novel {
        digest: String,
        /// 1-based line where the candidate first differs from the previous
        /// artifact; `None` when there was nothing to compare against
        first_difference: Option<usize>,
    },
    /// Same content as `previous`: discard the candidate
    Duplicate { digest: String, previous: PathBuf },
}

impl GateDecision {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, GateDecision::Duplicate { .. })
    }

    /// Digest of the candidate's normalised content
    pub fn digest(&self) -> &str {
        match self {
            GateDecision::Novel { digest, .. } | GateDecision::Duplicate { digest, .. } => digest,
        }
    }
}

fn normalized_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// SHA-256 over the normalised lines, hex encoded
pub fn content_digest(lines: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for line in lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

/// First 1-based line at which two line sequences diverge
fn first_difference(a: &[&str], b: &[&str]) -> Option<usize> {
    if a == b {
        return None;
    }
    let common = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    Some(common + 1)
}

fn read_text(op: &str, path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| io_error(op, path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decide whether `candidate` repeats `previous`.
///
/// # Errors
///
/// `Io` if either file cannot be read.
pub fn check(candidate: &Path, previous: Option<&Path>) -> Result<GateDecision> {
    let start = Instant::now();
    log_op_start!("gate_check", path = %candidate.display());

    let result = decide(candidate, previous);
    match &result {
        Ok(decision) => {
            log_op_end!(
                "gate_check",
                duration_ms = start.elapsed().as_millis() as u64,
                duplicate = decision.is_duplicate(),
                digest = decision.digest()
            );
        }
        Err(err) => {
            log_op_error!(
                "gate_check",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    result
}

fn decide(candidate: &Path, previous: Option<&Path>) -> Result<GateDecision> {
    let candidate_text = read_text("gate_read_candidate", candidate)?;
    let candidate_lines = normalized_lines(&candidate_text);
    let digest = content_digest(&candidate_lines);

    let Some(previous) = previous else {
        return Ok(GateDecision::Novel {
            digest,
            first_difference: None,
        });
    };

    let previous_text = read_text("gate_read_previous", previous)?;
    let previous_lines = normalized_lines(&previous_text);

    match first_difference(&candidate_lines, &previous_lines) {
        None => Ok(GateDecision::Duplicate {
            digest,
            previous: previous.to_path_buf(),
        }),
        Some(line) => {
            tracing::debug!(
                previous = %previous.display(),
                line = line,
                "candidate artifact differs from previous"
            );
            Ok(GateDecision::Novel {
                digest,
                first_difference: Some(line),
            })
        }
    }
}
