//! Run command implementation
//!
//! Processes every topic with fresh data and prints one result line per
//! topic/canton pair.

use crate::adapters::geodienste::GeodiensteHttpClient;
use crate::adapters::storage::LocalArtifactStore;
use crate::config::load_config;
use crate::core::pipeline::Harvester;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting harvest run");

        let config = load_config(config_path)?;
        let api = GeodiensteHttpClient::new(&config.provider)?;
        let store = LocalArtifactStore::new(config.storage.root.clone());

        let harvester = Harvester::new(&api, &store, &config, shutdown_signal);
        let results = harvester.run().await?;

        for result in &results {
            match (&result.download_url, &result.reason) {
                (Some(url), _) => {
                    println!("{} ({}): {} - {url}", result.topic_title, result.canton, result.code);
                }
                (None, Some(reason)) => {
                    println!(
                        "{} ({}): {} - {reason}{}",
                        result.topic_title,
                        result.canton,
                        result.code,
                        result
                            .info
                            .as_deref()
                            .map(|info| format!(" ({info})"))
                            .unwrap_or_default(),
                    );
                }
                (None, None) => {
                    println!("{} ({}): {}", result.topic_title, result.canton, result.code);
                }
            }
        }

        if results.iter().all(|result| result.is_success()) {
            Ok(0)
        } else {
            Ok(2)
        }
    }
}
