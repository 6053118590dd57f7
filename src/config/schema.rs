//! Configuration schema types
//!
//! The configuration maps one-to-one to the TOML file: provider endpoint,
//! per-topic canton tokens, scratch and storage locations, and logging.

use super::secret::{deserialize_secret, serialize_secret, SecretString};
use crate::domain::{BaseTopic, Canton, HarvestError, Result};
use regex::Regex;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Geodata provider endpoint settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Per-topic canton tokens.
    #[serde(default)]
    pub tokens: TokensConfig,

    /// Scratch directory settings.
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Artifact storage settings.
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HarvestConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error message naming the first invalid value.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.provider.base_url.is_empty() {
            return Err("provider.base_url must not be empty".to_string());
        }
        url::Url::parse(&self.provider.base_url)
            .map_err(|e| format!("provider.base_url is not a valid URL: {e}"))?;

        if self.provider.timeout_seconds == 0 {
            return Err("provider.timeout_seconds must be greater than zero".to_string());
        }

        if self.storage.root.as_os_str().is_empty() {
            return Err("storage.root must not be empty".to_string());
        }

        for topic_id in self.tokens.entries.keys() {
            if topic_id.parse::<BaseTopic>().is_err() {
                return Err(format!("tokens.{topic_id} does not name a known topic"));
            }
        }

        Ok(())
    }

    /// Resolves the download token for a (topic, canton) pair.
    ///
    /// Token entries use the provider's settings format, one assignment per
    /// canton: `"LU=token1;BE=token2"`.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::TokenNotFound`] when no token is configured
    /// for the pair.
    pub fn resolve_token(&self, topic: BaseTopic, canton: Canton) -> Result<String> {
        let entry = self
            .tokens
            .entries
            .get(topic.id())
            .ok_or(HarvestError::TokenNotFound { topic, canton })?;

        let pattern = Regex::new(&format!(r"{}=(?P<token>[^;]+)", canton.code()))
            .map_err(|e| HarvestError::Configuration(format!("Invalid token pattern: {e}")))?;

        pattern
            .captures(entry.0.expose_secret().as_ref())
            .and_then(|captures| captures.name("token"))
            .map(|token| token.as_str().to_string())
            .ok_or(HarvestError::TokenNotFound { topic, canton })
    }
}

/// Geodata provider endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Language requested for topic titles.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            language: default_language(),
        }
    }
}

fn default_base_url() -> String {
    "https://geodienste.ch".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_language() -> String {
    "de".to_string()
}

/// A secret-wrapped token settings string for one topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEntry(
    #[serde(
        deserialize_with = "deserialize_secret",
        serialize_with = "serialize_secret"
    )]
    pub SecretString,
);

/// Per-topic canton tokens, keyed by base topic id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokensConfig {
    #[serde(flatten)]
    pub entries: HashMap<String, TokenEntry>,
}

/// Scratch directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Root of the per-run scratch directories.
    #[serde(default = "default_temp_root")]
    pub temp_root: PathBuf,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            temp_root: default_temp_root(),
        }
    }
}

fn default_temp_root() -> PathBuf {
    std::env::temp_dir().join("geoharvest")
}

/// Artifact storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory the artifact store publishes into.
    pub root: PathBuf,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn config_with_tokens() -> HarvestConfig {
        let mut entries = HashMap::new();
        entries.insert(
            "lwb_rebbaukataster".to_string(),
            TokenEntry(Secret::new("LU=token1;BE=token2;SO=token3".to_string().into())),
        );
        HarvestConfig {
            provider: ProviderConfig::default(),
            tokens: TokensConfig { entries },
            processing: ProcessingConfig::default(),
            storage: StorageConfig {
                root: PathBuf::from("/var/lib/geoharvest"),
            },
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_resolve_token() {
        let config = config_with_tokens();
        let token = config
            .resolve_token(BaseTopic::Rebbaukataster, Canton::BE)
            .unwrap();
        assert_eq!(token, "token2");
    }

    #[test]
    fn test_resolve_token_unconfigured_canton() {
        let config = config_with_tokens();
        let err = config
            .resolve_token(BaseTopic::Rebbaukataster, Canton::AI)
            .unwrap_err();
        assert!(matches!(
            err,
            HarvestError::TokenNotFound {
                topic: BaseTopic::Rebbaukataster,
                canton: Canton::AI,
            }
        ));
    }

    #[test]
    fn test_resolve_token_unconfigured_topic() {
        let config = config_with_tokens();
        let err = config
            .resolve_token(BaseTopic::Nutzungsflaechen, Canton::BE)
            .unwrap_err();
        assert!(matches!(err, HarvestError::TokenNotFound { .. }));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let config = config_with_tokens();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = config_with_tokens();
        config.provider.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_token_topic() {
        let mut config = config_with_tokens();
        config.tokens.entries.insert(
            "lwb_unknown".to_string(),
            TokenEntry(Secret::new("BE=x".to_string().into())),
        );
        assert!(config.validate().unwrap_err().contains("lwb_unknown"));
    }
}
