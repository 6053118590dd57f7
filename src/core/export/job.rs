//! Export job classification
//!
//! An [`ExportJob`] is the transient state tied to one (topic, token)
//! pair during a single coordinator invocation: submitted, resolved to a
//! download location, still pending on the provider side, or failed with a
//! typed error. It never outlives the invocation.

use crate::adapters::geodienste::ExportStatus;
use crate::domain::{ProviderError, StatusCode};
use chrono::NaiveDateTime;

/// A resolved export: where to download the data and when the provider
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExport {
    /// Location of the export archive.
    pub download_url: String,

    /// Provider-reported export timestamp.
    pub exported_at: Option<NaiveDateTime>,
}

/// State of one export job.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportJob {
    /// Submitted, but the provider reported nothing resolvable yet.
    Submitted,

    /// The export finished and can be downloaded.
    Success(ResolvedExport),

    /// The export is still queued or running; a later invocation will
    /// resolve it.
    Conflict {
        state: ExportStatus,
        info: Option<String>,
    },

    /// The export failed with a classified provider error.
    Failed(ProviderError),
}

impl ExportJob {
    /// Converts the job into the coordinator's result. Non-terminal states
    /// become transient-conflict errors so the external scheduler simply
    /// re-invokes the pipeline later.
    pub fn into_result(self) -> Result<ResolvedExport, ProviderError> {
        match self {
            ExportJob::Success(resolved) => Ok(resolved),
            ExportJob::Conflict { state, info } => {
                let mut error = ProviderError::new(StatusCode::CONFLICT, state.to_string());
                error.info = info;
                Err(error)
            }
            ExportJob::Failed(error) => Err(error),
            ExportJob::Submitted => Err(ProviderError::new(
                StatusCode::CONFLICT,
                "Submitted".to_string(),
            )),
        }
    }
}
