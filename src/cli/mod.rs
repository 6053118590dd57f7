//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// Geoharvest - geodienste.ch harvesting ETL tool
#[derive(Parser, Debug)]
#[command(name = "geoharvest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "geoharvest.toml", env = "GEOHARVEST_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GEOHARVEST_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process all topics with fresh data and publish the results
    Run(commands::run::RunArgs),

    /// List the topics that would be processed
    Topics(commands::topics::TopicsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}
