//! Domain error types
//!
//! The error taxonomy separates expected, classifiable failures (provider
//! rejections, missing tokens, invalid geometries) from genuinely
//! unexpected ones. Expected failures are converted to typed results as
//! early as possible; only unclassified errors travel to the single
//! pipeline boundary. No third-party error types leak into signatures.

use super::status::StatusCode;
use super::topic::{BaseTopic, Canton};
use thiserror::Error;

/// Main error type used throughout the crate.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Classified non-success response from the geodata provider
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// No token configured for a (topic, canton) pair
    #[error("Token not found for topic {topic} and canton {canton}")]
    TokenNotFound { topic: BaseTopic, canton: Canton },

    /// Topologically invalid feature geometry; fatal for the layer
    #[error(transparent)]
    InvalidGeometry(#[from] InvalidGeometryError),

    /// Layer transformation errors other than geometry validity
    #[error("Transform error: {0}")]
    Transform(String),

    /// Artifact publishing errors
    #[error("Publish error: {0}")]
    Publish(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Run aborted by a shutdown signal
    #[error("Operation cancelled")]
    Cancelled,

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// A classified non-success submit or status response from the provider.
///
/// `info` is only populated where the provider supplies a useful detail
/// message (e.g. the invalid-token hint on not-found responses).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Provider error {code}: {reason}")]
pub struct ProviderError {
    /// Status code of the provider response.
    pub code: StatusCode,

    /// Reason phrase or provider-reported state.
    pub reason: String,

    /// Optional detail message from the provider.
    pub info: Option<String>,
}

impl ProviderError {
    /// Creates a provider error without a detail message.
    pub fn new(code: StatusCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
            info: None,
        }
    }

    /// Attaches the provider's detail message.
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }
}

/// A feature geometry violated polygon validity rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid geometry for feature with ID {feature_id}")]
pub struct InvalidGeometryError {
    /// Identifier of the offending feature.
    pub feature_id: i64,
}

impl InvalidGeometryError {
    /// Creates a new invalid-geometry error for `feature_id`.
    pub fn new(feature_id: i64) -> Self {
        Self { feature_id }
    }
}

impl From<std::io::Error> for HarvestError {
    fn from(err: std::io::Error) -> Self {
        HarvestError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HarvestError {
    fn from(err: serde_json::Error) -> Self {
        HarvestError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for HarvestError {
    fn from(err: toml::de::Error) -> Self {
        HarvestError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<zip::result::ZipError> for HarvestError {
    fn from(err: zip::result::ZipError) -> Self {
        HarvestError::Io(format!("Zip error: {err}"))
    }
}
