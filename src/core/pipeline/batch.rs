//! Batch harvesting
//!
//! Selects the topics with fresh data and runs one pipeline per selected
//! topic/canton pair. Runs are independent — each owns its scratch
//! directory — so they execute concurrently; the returned results keep the
//! provider's listing order for downstream reporting.

use super::runner::TopicPipeline;
use crate::adapters::geodienste::GeodiensteApi;
use crate::adapters::storage::ArtifactStore;
use crate::config::HarvestConfig;
use crate::domain::{ProcessingResult, Result, Topic};
use chrono::Local;
use tokio::sync::watch;

/// Batch runner over all topics of the provider listing.
pub struct Harvester<'a> {
    api: &'a dyn GeodiensteApi,
    store: &'a dyn ArtifactStore,
    config: &'a HarvestConfig,
    shutdown: watch::Receiver<bool>,
}

impl<'a> Harvester<'a> {
    /// Creates a harvester over the given collaborators.
    pub fn new(
        api: &'a dyn GeodiensteApi,
        store: &'a dyn ArtifactStore,
        config: &'a HarvestConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            api,
            store,
            config,
            shutdown,
        }
    }

    /// Fetches the topic listing and keeps the topics updated within the
    /// last 24 hours. Topics without an update timestamp are not available
    /// for their canton and are excluded.
    pub async fn topics_to_process(&self) -> Result<Vec<Topic>> {
        let topics = self.api.request_topic_info().await?;
        let now = Local::now().naive_local();

        let selected: Vec<Topic> = topics
            .into_iter()
            .filter(|topic| match topic.updated_at {
                Some(updated_at) => {
                    if (now - updated_at).num_days() < 1 {
                        tracing::info!(
                            topic = %topic,
                            updated_at = %updated_at,
                            "Topic was updated and will be processed"
                        );
                        true
                    } else {
                        tracing::info!(
                            topic = %topic,
                            updated_at = %updated_at,
                            "Topic has not been updated since"
                        );
                        false
                    }
                }
                None => {
                    tracing::info!(topic = %topic, "Topic is not available");
                    false
                }
            })
            .collect();

        tracing::info!(count = selected.len(), "Topics selected for processing");
        Ok(selected)
    }

    /// Processes every selected topic and returns the ordered results.
    pub async fn run(&self) -> Result<Vec<ProcessingResult>> {
        let topics = self.topics_to_process().await?;
        let pipeline = TopicPipeline::new(self.api, self.store, self.config, self.shutdown.clone());

        let results =
            futures::future::join_all(topics.iter().map(|topic| pipeline.process(topic))).await;

        let succeeded = results.iter().filter(|result| result.is_success()).count();
        tracing::info!(
            total = results.len(),
            succeeded,
            failed = results.len() - succeeded,
            "Batch run finished"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::geodienste::{ExportResponse, StatusResponse};
    use crate::domain::{BaseTopic, Canton};
    use async_trait::async_trait;
    use chrono::Duration;
    use std::path::{Path, PathBuf};

    struct ListingApi {
        topics: Vec<Topic>,
    }

    #[async_trait]
    impl GeodiensteApi for ListingApi {
        async fn request_topic_info(&self) -> Result<Vec<Topic>> {
            Ok(self.topics.clone())
        }

        async fn start_export(&self, _topic: &Topic, _token: &str) -> Result<ExportResponse> {
            unimplemented!("not used by listing tests")
        }

        async fn check_export_status(
            &self,
            _topic: &Topic,
            _token: &str,
        ) -> Result<StatusResponse> {
            unimplemented!("not used by listing tests")
        }

        async fn download_export(&self, _url: &str, _destination: &Path) -> Result<PathBuf> {
            unimplemented!("not used by listing tests")
        }
    }

    fn topic_updated(base: BaseTopic, canton: Canton, hours_ago: Option<i64>) -> Topic {
        let mut topic = Topic::derived(base, canton);
        topic.updated_at =
            hours_ago.map(|hours| Local::now().naive_local() - Duration::hours(hours));
        topic
    }

    fn config() -> HarvestConfig {
        toml::from_str("[storage]\nroot = \"/var/lib/geoharvest\"\n").unwrap()
    }

    struct NoopStore;

    #[async_trait]
    impl ArtifactStore for NoopStore {
        async fn upload_file(&self, _logical_path: &str, _local_path: &Path) -> Result<String> {
            unimplemented!("not used by listing tests")
        }
    }

    #[tokio::test]
    async fn test_freshness_filter() {
        let api = ListingApi {
            topics: vec![
                topic_updated(BaseTopic::PerimeterLnSf, Canton::SH, Some(4)),
                topic_updated(BaseTopic::PerimeterLnSf, Canton::ZG, Some(23)),
                topic_updated(BaseTopic::Rebbaukataster, Canton::SH, Some(30)),
                topic_updated(BaseTopic::Rebbaukataster, Canton::ZG, None),
            ],
        };
        let config = config();
        let (_tx, rx) = watch::channel(false);
        let harvester = Harvester::new(&api, &NoopStore, &config, rx);

        let selected = harvester.topics_to_process().await.unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].canton, Canton::SH);
        assert_eq!(selected[0].base_topic, BaseTopic::PerimeterLnSf);
        assert_eq!(selected[1].canton, Canton::ZG);
        assert_eq!(selected[1].base_topic, BaseTopic::PerimeterLnSf);
    }

    #[tokio::test]
    async fn test_empty_listing_selects_nothing() {
        let api = ListingApi { topics: vec![] };
        let config = config();
        let (_tx, rx) = watch::channel(false);
        let harvester = Harvester::new(&api, &NoopStore, &config, rx);
        assert!(harvester.topics_to_process().await.unwrap().is_empty());
    }
}
