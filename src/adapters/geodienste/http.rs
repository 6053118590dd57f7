//! HTTP implementation of the geodienste.ch client
//!
//! URL scheme: `{base}/info/services.json?...` for the topic listing and
//! `{base}/downloads/{topic}/{token}/export.json` / `status.json` for the
//! export workflow. Download archives are zip files holding one GeoJSON
//! file per layer; they are extracted into the caller's scratch directory.

use super::client::{ExportResponse, GeodiensteApi, StatusResponse};
use super::models::{ErrorBody, InfoData, StatusBody};
use crate::config::ProviderConfig;
use crate::domain::{BaseTopic, Canton, HarvestError, Result, StatusCode, Topic};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;
use zip::ZipArchive;

/// HTTP client for the geodienste.ch download API.
pub struct GeodiensteHttpClient {
    base_url: String,
    language: String,
    client: Client,
}

impl GeodiensteHttpClient {
    /// Creates a client from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HarvestError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            client,
        })
    }

    fn download_url_for(&self, topic: &Topic, token: &str, resource: &str) -> String {
        format!(
            "{}/downloads/{}/{}/{}",
            self.base_url, topic.base_topic, token, resource
        )
    }

    fn reason_of(response: &Response) -> String {
        response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string()
    }

    async fn error_of(response: Response) -> Option<String> {
        let text = response.text().await.ok()?;
        serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .map(|body| body.error)
    }
}

#[async_trait]
impl GeodiensteApi for GeodiensteHttpClient {
    async fn request_topic_info(&self) -> Result<Vec<Topic>> {
        let base_topics: Vec<&str> = BaseTopic::ALL.iter().map(|topic| topic.id()).collect();
        let topics: Vec<String> = BaseTopic::ALL
            .iter()
            .map(|topic| topic.topic_name())
            .collect();
        let cantons: Vec<&str> = Canton::ALL.iter().map(|canton| canton.code()).collect();

        let url = format!(
            "{}/info/services.json?base_topics={}&topics={}&cantons={}&language={}",
            self.base_url,
            base_topics.join(","),
            topics.join(","),
            cantons.join(","),
            self.language,
        );
        tracing::info!(url = %url, "Requesting topic information");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HarvestError::Other(format!("Failed to request topic information: {e}")))?;

        let code = StatusCode::new(response.status().as_u16());
        if !code.is_success() {
            return Err(HarvestError::Other(format!(
                "Topic information request failed with status {code}"
            )));
        }

        let info: InfoData = response
            .json()
            .await
            .map_err(|e| HarvestError::Serialization(format!("Invalid services response: {e}")))?;
        Ok(info.services)
    }

    async fn start_export(&self, topic: &Topic, token: &str) -> Result<ExportResponse> {
        let url = self.download_url_for(topic, token, "export.json");
        tracing::info!(topic = %topic, "Starting data export");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HarvestError::Other(format!("Failed to start export: {e}")))?;

        let code = StatusCode::new(response.status().as_u16());
        let reason = Self::reason_of(&response);
        let error = if code.is_success() {
            None
        } else {
            Self::error_of(response).await
        };

        Ok(ExportResponse {
            code,
            reason,
            error,
        })
    }

    async fn check_export_status(&self, topic: &Topic, token: &str) -> Result<StatusResponse> {
        let url = self.download_url_for(topic, token, "status.json");
        tracing::info!(topic = %topic, "Checking export status");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HarvestError::Other(format!("Failed to check export status: {e}")))?;

        let code = StatusCode::new(response.status().as_u16());
        let reason = Self::reason_of(&response);

        if !code.is_success() {
            let error = Self::error_of(response).await;
            return Ok(StatusResponse {
                code,
                reason,
                status: None,
                info: None,
                download_url: None,
                exported_at: None,
                error,
            });
        }

        let body: StatusBody = response
            .json()
            .await
            .map_err(|e| HarvestError::Serialization(format!("Invalid status response: {e}")))?;

        Ok(StatusResponse {
            code,
            reason,
            status: Some(body.status),
            info: Some(body.info),
            download_url: body.download_url,
            exported_at: body.exported_at,
            error: None,
        })
    }

    async fn download_export(&self, download_url: &str, destination: &Path) -> Result<PathBuf> {
        tracing::info!(url = %download_url, "Downloading export archive");
        std::fs::create_dir_all(destination)?;

        let response = self
            .client
            .get(download_url)
            .send()
            .await
            .map_err(|e| HarvestError::Other(format!("Failed to download export: {e}")))?;

        let code = StatusCode::new(response.status().as_u16());
        if !code.is_success() {
            return Err(HarvestError::Other(format!(
                "Export download failed with status {code}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HarvestError::Io(format!("Failed to read download stream: {e}")))?;

        let mut archive = ZipArchive::new(Cursor::new(bytes.as_ref()))?;
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let name = entry.name().to_string();
            if !name.to_lowercase().ends_with(".geojson") {
                continue;
            }

            // Flatten archive paths; layer files are identified by name only.
            let file_name = Path::new(&name)
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or(name);
            let target = destination.join(file_name);
            let mut output = std::fs::File::create(&target)?;
            std::io::copy(&mut entry, &mut output)?;
        }

        Ok(destination.to_path_buf())
    }
}
