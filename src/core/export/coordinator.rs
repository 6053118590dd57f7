//! Export coordinator
//!
//! Drives one export through the provider's submit/status workflow and
//! classifies the outcome. The coordinator is level-triggered and
//! idempotent: exactly one submit and one status check per invocation, no
//! internal retry loop — the external scheduler re-invokes the whole
//! pipeline on its own interval until a terminal state is reached.

use super::job::{ExportJob, ResolvedExport};
use crate::adapters::geodienste::{
    ErrorBody, ExportResponse, ExportStatus, GeodiensteApi, StatusResponse,
};
use crate::domain::{ProviderError, Result, StatusCode, Topic};

/// Coordinates exports against the provider API.
pub struct ExportCoordinator<'a> {
    api: &'a dyn GeodiensteApi,
}

impl<'a> ExportCoordinator<'a> {
    /// Creates a coordinator over `api`.
    pub fn new(api: &'a dyn GeodiensteApi) -> Self {
        Self { api }
    }

    /// Submits an export for `topic` and resolves its download location.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] for every classified failure: rejected
    /// submission, failed status query, provider-side export failure,
    /// missing download location, or an export still in flight.
    pub async fn submit_and_resolve(&self, topic: &Topic, token: &str) -> Result<ResolvedExport> {
        tracing::info!(topic = %topic, "Exporting topic");

        let submission = self.api.start_export(topic, token).await?;
        if let Some(error) = classify_submission(&submission) {
            tracing::error!(
                topic = %topic,
                code = %error.code,
                reason = %error.reason,
                "Failed to start export"
            );
            return Err(error.into());
        }

        let status = self.api.check_export_status(topic, token).await?;
        let job = resolve_status(status);
        match job.into_result() {
            Ok(resolved) => Ok(resolved),
            Err(error) => {
                tracing::error!(
                    topic = %topic,
                    code = %error.code,
                    reason = %error.reason,
                    info = error.info.as_deref().unwrap_or_default(),
                    "Export did not resolve to a download location"
                );
                Err(error.into())
            }
        }
    }
}

/// Classifies a submission response. `None` means the workflow proceeds to
/// the status check: either the submission was accepted, or it was refused
/// because an equivalent export is already pending or ran within the last
/// 24 h — refusals that leave a resolvable export behind.
fn classify_submission(response: &ExportResponse) -> Option<ProviderError> {
    if response.is_success() {
        return None;
    }

    let message = response.error.as_deref().unwrap_or_default();
    if message.contains(ErrorBody::ONLY_ONE_EXPORT) || message.contains(ErrorBody::PENDING) {
        tracing::info!("Another export is already pending; checking its status instead");
        return None;
    }

    let mut error = ProviderError::new(response.code, response.reason.clone());
    if response.code != StatusCode::UNAUTHORIZED {
        error.info = response.error.clone();
    }
    Some(error)
}

/// Classifies a status response into an [`ExportJob`].
fn resolve_status(response: StatusResponse) -> ExportJob {
    if !response.is_success() {
        let mut error = ProviderError::new(response.code, response.reason);
        if response.code == StatusCode::NOT_FOUND {
            error.info = response.error;
        }
        return ExportJob::Failed(error);
    }

    match response.status {
        Some(ExportStatus::Success) => match response.download_url {
            Some(download_url) => ExportJob::Success(ResolvedExport {
                download_url,
                exported_at: response.exported_at,
            }),
            None => ExportJob::Failed(
                ProviderError::new(StatusCode::NOT_FOUND, ExportStatus::Success.to_string())
                    .with_info("Download-URL not found"),
            ),
        },
        Some(ExportStatus::Failed) => {
            let mut error = ProviderError::new(response.code, ExportStatus::Failed.to_string());
            error.info = response.info;
            ExportJob::Failed(error)
        }
        Some(state @ (ExportStatus::Queued | ExportStatus::Working)) => ExportJob::Conflict {
            state,
            info: response.info,
        },
        None => ExportJob::Submitted,
    }
}
