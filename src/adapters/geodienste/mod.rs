//! geodienste.ch provider adapter
//!
//! Trait-based access to the provider's download API plus the `reqwest`
//! implementation and wire models.

pub mod client;
pub mod http;
pub mod models;

pub use client::{ExportResponse, GeodiensteApi, StatusResponse};
pub use http::GeodiensteHttpClient;
pub use models::{ErrorBody, ExportStatus, InfoData, StatusBody};
