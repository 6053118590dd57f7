//! Domain status codes
//!
//! Processing outcomes are reported with HTTP-like status codes because the
//! provider speaks HTTP and downstream reporting reuses its vocabulary. The
//! newtype keeps third-party HTTP types out of domain signatures.

use serde::{Deserialize, Serialize};

/// An HTTP-like status code attached to provider responses and
/// [`ProcessingResult`](crate::domain::ProcessingResult)s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(u16);

impl StatusCode {
    /// Interim code while a pipeline run is still in flight.
    pub const PROCESSING: StatusCode = StatusCode(102);

    /// Successful completion.
    pub const OK: StatusCode = StatusCode(200);

    /// Credential rejected by the provider.
    pub const UNAUTHORIZED: StatusCode = StatusCode(401);

    /// Export information or download location not found.
    pub const NOT_FOUND: StatusCode = StatusCode(404);

    /// Export still queued or working on the provider side.
    pub const CONFLICT: StatusCode = StatusCode(409);

    /// Run aborted by a shutdown signal.
    pub const CANCELLED: StatusCode = StatusCode(499);

    /// Unclassified failure inside the pipeline.
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// Creates a status code from a raw `u16` value.
    pub const fn new(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the raw `u16` value.
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns `true` for 2xx codes.
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Canonical reason phrase for the codes the pipeline produces itself.
    pub fn canonical_reason(self) -> Option<&'static str> {
        match self.0 {
            102 => Some("Processing"),
            200 => Some("OK"),
            401 => Some("Unauthorized"),
            404 => Some("Not Found"),
            409 => Some("Conflict"),
            499 => Some("Cancelled"),
            500 => Some("Internal Server Error"),
            _ => None,
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.canonical_reason() {
            Some(reason) => write!(f, "{} {}", self.0, reason),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}
