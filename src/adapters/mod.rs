//! External integrations
//!
//! Adapters wrap everything outside the pipeline core: the geodienste.ch
//! download API, artifact storage, and the GeoJSON layer-file format.

pub mod dataset;
pub mod geodienste;
pub mod storage;
