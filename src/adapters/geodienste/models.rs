//! Wire models for the geodienste.ch download API
//!
//! Response shapes for `info/services.json`, `downloads/.../export.json`
//! and `downloads/.../status.json`, including the provider's well-known
//! error messages.

use crate::domain::Topic;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Success response for `info/services.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct InfoData {
    /// All services (topics) available for the given query parameters.
    pub services: Vec<Topic>,
}

/// Error response for `export.json` and `status.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// The provider's error message.
    pub error: String,
}

impl ErrorBody {
    /// Message if the token is invalid.
    pub const INVALID_TOKEN: &'static str = "Data export information not found. Invalid token?";

    /// Message if another data export is pending.
    pub const PENDING: &'static str =
        "Cannot start data export because there is another data export pending";

    /// Message if only one data export per topic is allowed every 24 h.
    pub const ONLY_ONE_EXPORT: &'static str = "Only one data export per topic allowed every 24 h";

    /// Message if an unexpected error occurred.
    pub const UNEXPECTED: &'static str =
        "An unexpected error occurred. Please try again by starting a new data export";
}

/// State of a geodata export as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Queued,
    Working,
    Success,
    Failed,
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportStatus::Queued => "Queued",
            ExportStatus::Working => "Working",
            ExportStatus::Success => "Success",
            ExportStatus::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Success response for `status.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusBody {
    /// The status of the geodata export.
    pub status: ExportStatus,

    /// Information about the export.
    pub info: String,

    /// The download URL for the exported geodata.
    #[serde(default)]
    pub download_url: Option<String>,

    /// The date and time when the geodata was exported.
    #[serde(default)]
    pub exported_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_deserialization() {
        let json = r#"{
            "status": "success",
            "info": "Data ready to be downloaded. Provide your credentials to download the data.",
            "download_url": "test.com/data.zip",
            "exported_at": "2022-03-24T09:31:05.508"
        }"#;

        let body: StatusBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, ExportStatus::Success);
        assert_eq!(body.download_url.as_deref(), Some("test.com/data.zip"));
        assert!(body.exported_at.is_some());
    }

    #[test]
    fn test_status_body_failed_without_url() {
        let json = r#"{"status": "failed", "info": "An unexpected error occurred."}"#;
        let body: StatusBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, ExportStatus::Failed);
        assert!(body.download_url.is_none());
        assert!(body.exported_at.is_none());
    }

    #[test]
    fn test_error_body_deserialization() {
        let json = r#"{"error": "Only one data export per topic allowed every 24 h"}"#;
        let body: ErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error, ErrorBody::ONLY_ONE_EXPORT);
    }

    #[test]
    fn test_export_status_display() {
        assert_eq!(ExportStatus::Queued.to_string(), "Queued");
        assert_eq!(ExportStatus::Failed.to_string(), "Failed");
    }
}
