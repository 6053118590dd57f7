//! Topics command implementation
//!
//! Lists the topics the next run would process, without exporting anything.

use crate::adapters::geodienste::GeodiensteHttpClient;
use crate::adapters::storage::LocalArtifactStore;
use crate::config::load_config;
use crate::core::pipeline::Harvester;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the topics command
#[derive(Args, Debug)]
pub struct TopicsArgs {}

impl TopicsArgs {
    /// Execute the topics command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = load_config(config_path)?;
        let api = GeodiensteHttpClient::new(&config.provider)?;
        let store = LocalArtifactStore::new(config.storage.root.clone());
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let harvester = Harvester::new(&api, &store, &config, shutdown_rx);
        let topics = harvester.topics_to_process().await?;

        if topics.is_empty() {
            println!("No topics with fresh data");
            return Ok(0);
        }

        for topic in &topics {
            let updated_at = topic
                .updated_at
                .map(|timestamp| timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!("{} ({}) - updated at {updated_at}", topic.topic_title, topic.canton);
        }
        Ok(0)
    }
}
