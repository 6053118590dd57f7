//! Configuration management
//!
//! TOML-based configuration with environment variable substitution and
//! secret-wrapped canton tokens.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    HarvestConfig, LoggingConfig, ProcessingConfig, ProviderConfig, StorageConfig, TokenEntry,
    TokensConfig,
};
pub use secret::{SecretString, SecretValue};
