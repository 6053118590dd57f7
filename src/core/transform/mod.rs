//! Layer transformation
//!
//! The transformation engine plus its supporting pieces: partial-date
//! coercion and geometry validity/decomposition primitives.

pub mod dates;
pub mod engine;
pub mod geometry;

pub use engine::{transform_layer, FieldOverride, TransformOptions};
