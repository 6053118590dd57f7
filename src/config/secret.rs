//! Secure token handling using the secrecy crate
//!
//! Canton tokens grant download access to unpublished cantonal data, so
//! they are held in [`Secret`] wrappers: memory is zeroed on drop, debug
//! output is redacted, and access requires an explicit `expose_secret()`.

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for `String` implementing the traits `Secret` requires.
#[derive(Clone, Debug, Zeroize, Serialize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// `true` if the wrapped value is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Type alias for a secret string value.
pub type SecretString = Secret<SecretValue>;

/// Deserializes a plain TOML string into a [`SecretString`].
pub fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(Secret::new(SecretValue::from(value)))
}

/// Serializes a [`SecretString`] as a redaction marker, never the value.
pub fn serialize_secret<S>(_secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    "[REDACTED]".serialize(serializer)
}
