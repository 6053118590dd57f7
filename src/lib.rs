//! # Geoharvest - geodienste.ch harvesting ETL
//!
//! Geoharvest harvests agricultural geodata topics published per canton on
//! geodienste.ch, normalizes each dataset to a fixed target layout and
//! publishes the result as a zipped artifact with a retrievable URL.
//!
//! ## Overview
//!
//! For every topic with fresh data the pipeline:
//! - **Exports** the topic through the provider's submit/status workflow
//!   (level-triggered: one submit, one status check per run)
//! - **Transforms** each declared layer: field type coercion, partial-date
//!   parsing, LNF domain-code filtering, multipart-to-singlepart geometry
//!   decomposition with validity enforcement
//! - **Packages** the normalized layers into a zip artifact
//! - **Publishes** the artifact and reports a typed [`ProcessingResult`]
//!
//! [`ProcessingResult`]: domain::ProcessingResult
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export, transform, pipeline)
//! - [`adapters`] - External integrations (provider API, storage, GeoJSON)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use geoharvest::adapters::geodienste::GeodiensteHttpClient;
//! use geoharvest::adapters::storage::LocalArtifactStore;
//! use geoharvest::config::load_config;
//! use geoharvest::core::pipeline::Harvester;
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("geoharvest.toml")?;
//!     let api = GeodiensteHttpClient::new(&config.provider)?;
//!     let store = LocalArtifactStore::new(config.storage.root.clone());
//!     let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!
//!     let harvester = Harvester::new(&api, &store, &config, shutdown_rx);
//!     for result in harvester.run().await? {
//!         println!("{} ({}): {}", result.topic_title, result.canton, result.code);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
