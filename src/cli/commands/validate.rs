//! Validate-config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match load_config(config_path) {
            Ok(config) => {
                println!("Configuration is valid");
                println!("  provider: {}", config.provider.base_url);
                println!("  storage:  {}", config.storage.root.display());
                println!("  tokens:   {} topic(s)", config.tokens.entries.len());
                Ok(0)
            }
            Err(error) => {
                eprintln!("Configuration is invalid: {error}");
                Ok(1)
            }
        }
    }
}
