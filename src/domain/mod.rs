//! Domain models and types
//!
//! Core domain vocabulary shared by every component: topics and cantons,
//! the in-memory dataset model, status codes, processing results and the
//! error taxonomy. Everything here is free of I/O and third-party
//! transport types.

pub mod dataset;
pub mod errors;
pub mod processing;
pub mod result;
pub mod status;
pub mod topic;

// Re-export commonly used types for convenience
pub use dataset::{Dataset, Feature, FieldDef, FieldType, FieldValue, Layer};
pub use errors::{HarvestError, InvalidGeometryError, ProviderError};
pub use processing::ProcessingResult;
pub use result::Result;
pub use status::StatusCode;
pub use topic::{BaseTopic, Canton, Topic};
