use thiserror::Error;

/// Result type alias using the canonical error
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable `ERR_*` code that tests, logs and the CLI can
/// match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input / validation
    InvalidInput,
    NotFound,
    InvalidConfig,

    // Snapshot files
    /// File name does not carry a `<date>_<time>` suffix (recoverable: file is skipped)
    TimestampParse,
    /// Snapshot contents are malformed (missing id cell, ragged rows, bad header)
    InvalidSnapshot,
    /// The configured identifier column is absent from a snapshot header
    MissingIdColumn,

    // Diffing
    /// Old and new snapshots do not share the same column set
    SchemaMismatch,
    /// Any other structural problem while comparing two snapshots
    DiffComparison,

    // External collaborators
    /// The crawler failed to produce a new snapshot
    Crawl,
    /// The downstream ingestion call failed or was rejected
    Notification,
    Timeout,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::TimestampParse => "ERR_TIMESTAMP_PARSE",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::MissingIdColumn => "ERR_MISSING_ID_COLUMN",
            ExErrorKind::SchemaMismatch => "ERR_SCHEMA_MISMATCH",
            ExErrorKind::DiffComparison => "ERR_DIFF_COMPARISON",
            ExErrorKind::Crawl => "ERR_CRAWL",
            ExErrorKind::Notification => "ERR_NOTIFICATION",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether the failure only excludes one file from consideration rather
    /// than aborting the stage that hit it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ExErrorKind::TimestampParse)
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    record_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            record_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the file the operation was working on
    pub fn with_path(mut self, path: impl AsRef<std::path::Path>) -> Self {
        self.path = Some(path.as_ref().display().to_string());
        self
    }

    /// Add the record identifier involved
    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(record_id) = &self.record_id {
            write!(f, " (record_id: {})", record_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised while building or comparing snapshots
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeltaError {
    /// Header does not contain the identifier column
    #[error("identifier column `{column}` not found in header")]
    MissingIdColumn { column: String },

    /// Header lists the same column twice
    #[error("duplicate column `{column}` in header")]
    DuplicateColumn { column: String },

    /// A row has a different number of cells than the header
    #[error("row {row} has {found} cells, header has {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A row has no value in the identifier column
    #[error("row {row} has an empty identifier")]
    MissingIdentifier { row: usize },

    /// The two snapshots being compared do not have the same columns
    #[error("column sets differ: only in old {only_old:?}, only in new {only_new:?}")]
    SchemaMismatch {
        only_old: Vec<String>,
        only_new: Vec<String>,
    },

    /// The snapshots use different identifier columns
    #[error("identifier columns differ: old `{old}`, new `{new}`")]
    IdColumnMismatch { old: String, new: String },
}

impl From<DeltaError> for ExError {
    fn from(err: DeltaError) -> Self {
        let message = err.to_string();
        match err {
            DeltaError::MissingIdColumn { .. } => {
                ExError::new(ExErrorKind::MissingIdColumn).with_message(message)
            }
            DeltaError::DuplicateColumn { .. }
            | DeltaError::RowWidthMismatch { .. }
            | DeltaError::MissingIdentifier { .. } => {
                ExError::new(ExErrorKind::InvalidSnapshot).with_message(message)
            }
            DeltaError::SchemaMismatch { .. } => {
                ExError::new(ExErrorKind::SchemaMismatch).with_message(message)
            }
            DeltaError::IdColumnMismatch { .. } => {
                ExError::new(ExErrorKind::DiffComparison).with_message(message)
            }
        }
    }
}
