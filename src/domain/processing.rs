//! Processing results
//!
//! The [`ProcessingResult`] is the only value that outlives a pipeline run.
//! It is built immutably: the pipeline starts from an in-progress
//! placeholder and merges exactly one terminal outcome into it, so no
//! partially-written result can ever escape the run.

use super::errors::HarvestError;
use super::status::StatusCode;
use super::topic::{Canton, Topic};
use chrono::NaiveDateTime;
use serde::Serialize;

/// The terminal, typed outcome of processing one topic/canton pair.
///
/// Invariants: `code == OK` implies `download_url` is present; any non-OK
/// code implies `reason` is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingResult {
    /// Outcome status code.
    pub code: StatusCode,

    /// Reason phrase; present for every terminal non-OK outcome.
    pub reason: Option<String>,

    /// Additional human-readable information.
    pub info: Option<String>,

    /// Title of the processed topic.
    pub topic_title: String,

    /// Canton of the processed topic.
    pub canton: Canton,

    /// Echo of the topic's last update timestamp.
    pub updated_at: Option<NaiveDateTime>,

    /// URL to download the processed data; present on success.
    pub download_url: Option<String>,
}

impl ProcessingResult {
    /// The in-progress placeholder produced when a pipeline run starts.
    pub fn in_progress(topic: &Topic) -> Self {
        Self {
            code: StatusCode::PROCESSING,
            reason: None,
            info: None,
            topic_title: topic.topic_title.clone(),
            canton: topic.canton,
            updated_at: topic.updated_at,
            download_url: None,
        }
    }

    /// Merges a successful outcome into the placeholder.
    pub fn succeeded(self, download_url: impl Into<String>) -> Self {
        Self {
            code: StatusCode::OK,
            reason: Some("Success".to_string()),
            info: Some("Data processed successfully".to_string()),
            download_url: Some(download_url.into()),
            ..self
        }
    }

    /// Merges a failure into the placeholder, mapping each classified
    /// error to its own code/reason/info and everything else to an
    /// internal server error carrying the error's message.
    pub fn failed(self, error: &HarvestError) -> Self {
        let (code, reason, info) = match error {
            HarvestError::Provider(provider) => (
                provider.code,
                Some(provider.reason.clone()),
                provider.info.clone(),
            ),
            HarvestError::TokenNotFound { .. } => {
                (StatusCode::NOT_FOUND, Some(error.to_string()), None)
            }
            HarvestError::InvalidGeometry(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(error.to_string()),
                None,
            ),
            HarvestError::Cancelled => (StatusCode::CANCELLED, Some("Cancelled".to_string()), None),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(other.to_string()),
                None,
            ),
        };

        Self {
            code,
            reason,
            info,
            download_url: None,
            ..self
        }
    }

    /// `true` if the run completed successfully.
    pub fn is_success(&self) -> bool {
        self.code == StatusCode::OK
    }
}
