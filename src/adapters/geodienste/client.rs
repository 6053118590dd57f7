//! Provider client trait
//!
//! The [`GeodiensteApi`] trait abstracts the geodienste.ch download API so
//! the export coordinator and pipeline can be driven against test doubles.
//! The HTTP implementation lives in [`http`](super::http).

use super::models::ExportStatus;
use crate::domain::{Result, StatusCode, Topic};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Outcome of an export submission request.
#[derive(Debug, Clone)]
pub struct ExportResponse {
    /// HTTP status code of the response.
    pub code: StatusCode,

    /// HTTP reason phrase of the response.
    pub reason: String,

    /// Provider error message; present on non-success responses.
    pub error: Option<String>,
}

impl ExportResponse {
    /// `true` if the submission was accepted.
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}

/// Outcome of an export status query.
#[derive(Debug, Clone)]
pub struct StatusResponse {
    /// HTTP status code of the response.
    pub code: StatusCode,

    /// HTTP reason phrase of the response.
    pub reason: String,

    /// Provider-reported export state; present on success responses.
    pub status: Option<ExportStatus>,

    /// Information about the export; present on success responses.
    pub info: Option<String>,

    /// Download URL for the exported data, once the export succeeded.
    pub download_url: Option<String>,

    /// When the data was exported.
    pub exported_at: Option<NaiveDateTime>,

    /// Provider error message; present on non-success responses.
    pub error: Option<String>,
}

impl StatusResponse {
    /// `true` if the status query itself succeeded.
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}

/// Access to the geodienste.ch download API.
#[async_trait]
pub trait GeodiensteApi: Send + Sync {
    /// Lists all topics for the configured base topics and cantons.
    async fn request_topic_info(&self) -> Result<Vec<Topic>>;

    /// Submits an export request for `topic` using `token`.
    async fn start_export(&self, topic: &Topic, token: &str) -> Result<ExportResponse>;

    /// Queries the status of the export for `topic`.
    async fn check_export_status(&self, topic: &Topic, token: &str) -> Result<StatusResponse>;

    /// Downloads the export archive from `download_url` and extracts the
    /// layer files into `destination`. Returns the destination directory.
    async fn download_export(&self, download_url: &str, destination: &Path) -> Result<PathBuf>;
}
