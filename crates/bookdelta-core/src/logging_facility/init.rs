//! Logging initialization
//!
//! Provides the single initialization point for the process-wide subscriber.

use crate::errors::{ExError, ExErrorKind};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set, at debug verbosity.
const DEBUG_DIRECTIVES: &str =
    "bookdelta_core=debug,bookdelta_store=debug,bookdelta_engine=debug,bookdelta_cli=debug";

/// Filter used when `RUST_LOG` is not set, at info verbosity.
const INFO_DIRECTIVES: &str =
    "bookdelta_core=info,bookdelta_store=info,bookdelta_engine=info,bookdelta_cli=info";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output at debug level
    Development,
    /// JSON structured output at info level
    Production,
    /// No output; tests install the capture layer instead
    Test,
}

impl Profile {
    fn filter(self) -> EnvFilter {
        let default = match self {
            Profile::Development => DEBUG_DIRECTIVES,
            Profile::Production | Profile::Test => INFO_DIRECTIVES,
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility, writing to stderr.
///
/// Only the first call in a process has any effect.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(profile.filter())
                .with_writer(std::io::stderr)
                .try_init();
        }
        Profile::Production => {
            let _ = tracing_subscriber::fmt()
                .json()
                .with_env_filter(profile.filter())
                .with_writer(std::io::stderr)
                .try_init();
        }
        Profile::Test => {}
    });
}

/// Initialize the logging facility, writing to `path`.
///
/// `append = false` truncates the file first (one log per run), `true`
/// keeps history across runs. Only the first call in a process has any
/// effect.
///
/// # Errors
///
/// `InvalidConfig` if the log file cannot be opened. This is a startup
/// failure and should abort the process.
pub fn init_to_file(profile: Profile, path: &Path, append: bool) -> Result<(), ExError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ExError::new(ExErrorKind::InvalidConfig)
                .with_op("init_to_file")
                .with_path(parent)
                .with_message(format!("cannot create log directory: {}", e))
        })?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(|e| {
            ExError::new(ExErrorKind::InvalidConfig)
                .with_op("init_to_file")
                .with_path(path)
                .with_message(format!("cannot open log file: {}", e))
        })?;

    INIT_ONCE.call_once(move || {
        let writer = Mutex::new(file);
        match profile {
            Profile::Production => {
                let _ = tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(profile.filter())
                    .with_writer(writer)
                    .try_init();
            }
            Profile::Development | Profile::Test => {
                let _ = tracing_subscriber::fmt()
                    .with_ansi(false)
                    .with_env_filter(profile.filter())
                    .with_writer(writer)
                    .try_init();
            }
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init(Profile::Test);
        init(Profile::Test);
    }

    #[test]
    fn test_init_to_file_reports_unopenable_path() {
        let dir = tempfile::TempDir::new().unwrap();
        // A directory cannot be opened as a log file
        let err = init_to_file(Profile::Test, dir.path(), true).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    }
}
