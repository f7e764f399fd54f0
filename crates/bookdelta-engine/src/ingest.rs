//! Downstream ingestion seam.
//!
//! One request per cycle, one acknowledgment back. There is no partial
//! success and no retry: a failed call is reported once and left for an
//! operator to replay.

use crate::config::{IngestMode, UpdateConfig};
use bookdelta_core::errors::{ExError, ExErrorKind};
use bookdelta_core::render::render_record_texts;
use bookdelta_core_types::{RequestId, Sensitive};
use bookdelta_store::errors::Result;
use bookdelta_store::read_snapshot;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Body of the ingestion call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngestRequest {
    /// `{"path": "..."}`: the service reads the file itself
    Path { path: String },
    /// `{"texts": [...], "ids": [...]}`: rendered documents, parallel to ids
    Inline { texts: Vec<String>, ids: Vec<String> },
}

impl IngestRequest {
    /// Build the request for `file` in the given mode.
    ///
    /// Inline mode reads the file and renders every record.
    pub fn for_file(file: &Path, mode: IngestMode, id_column: &str) -> Result<Self> {
        match mode {
            IngestMode::Path => Ok(IngestRequest::Path {
                path: file.display().to_string(),
            }),
            IngestMode::Inline => {
                let snapshot = read_snapshot(file, id_column)?;
                let (texts, ids) = render_record_texts(&snapshot);
                Ok(IngestRequest::Inline { texts, ids })
            }
        }
    }

    /// Number of documents carried inline, if any
    pub fn document_count(&self) -> Option<usize> {
        match self {
            IngestRequest::Path { .. } => None,
            IngestRequest::Inline { ids, .. } => Some(ids.len()),
        }
    }
}

/// Successful acknowledgment from the ingestion service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestAck {
    pub status: u16,
    pub message: Option<String>,
}

/// Receives new or changed records for re-indexing.
pub trait IngestionSink {
    /// # Errors
    ///
    /// - `Notification` if the call failed or was rejected
    /// - `Timeout` if no answer arrived in time
    fn ingest(&self, request: &IngestRequest) -> Result<IngestAck>;
}

#[derive(Debug, Deserialize)]
struct AckBody {
    message: Option<String>,
}

/// Blocking HTTP client posting the request as JSON.
pub struct HttpIngestionSink {
    client: reqwest::blocking::Client,
    url: String,
    token: Option<Sensitive<String>>,
}

impl HttpIngestionSink {
    /// # Errors
    ///
    /// `InvalidConfig` if the HTTP client cannot be constructed.
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        token: Option<Sensitive<String>>,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ExError::new(ExErrorKind::InvalidConfig)
                    .with_op("build_http_client")
                    .with_message(e.to_string())
            })?;
        Ok(Self {
            client,
            url: url.into(),
            token,
        })
    }

    pub fn from_config(config: &UpdateConfig) -> Result<Self> {
        Self::new(
            config.ingest_url.clone(),
            config.ingest_timeout,
            config.ingest_token.clone(),
        )
    }
}

fn transport_error(err: reqwest::Error) -> ExError {
    let kind = if err.is_timeout() {
        ExErrorKind::Timeout
    } else {
        ExErrorKind::Notification
    };
    ExError::new(kind)
        .with_op("ingest")
        .with_message(err.to_string())
}

impl IngestionSink for HttpIngestionSink {
    fn ingest(&self, request: &IngestRequest) -> Result<IngestAck> {
        let request_id = RequestId::new();
        tracing::debug!(url = %self.url, request_id = %request_id, "posting ingestion request");

        let mut req = self
            .client
            .post(&self.url)
            .header("x-request-id", request_id.as_str())
            .json(request);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token.expose());
        }

        let response = req.send().map_err(transport_error)?;
        let status = response.status();
        let body = response.text().map_err(transport_error)?;

        if !status.is_success() {
            return Err(ExError::new(ExErrorKind::Notification)
                .with_op("ingest")
                .with_message(format!(
                    "ingestion service answered {}: {}",
                    status,
                    body.trim()
                )));
        }

        let message = serde_json::from_str::<AckBody>(&body)
            .ok()
            .and_then(|ack| ack.message);
        Ok(IngestAck {
            status: status.as_u16(),
            message,
        })
    }
}

/// Accepts every request without sending anything (dry runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopIngestionSink;

impl IngestionSink for NoopIngestionSink {
    fn ingest(&self, request: &IngestRequest) -> Result<IngestAck> {
        tracing::info!(
            document_count = ?request.document_count(),
            "dry run: ingestion skipped"
        );
        Ok(IngestAck {
            status: 0,
            message: Some("dry run".to_string()),
        })
    }
}
