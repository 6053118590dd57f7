//! Topic pipeline
//!
//! The generic pipeline runner, the per-topic transform plan registry,
//! artifact packaging and the batch harvester.

pub mod batch;
pub mod package;
pub mod plan;
pub mod runner;

pub use batch::Harvester;
pub use plan::{plan_for, JoinStep, LayerStep, TopicPlan};
pub use runner::TopicPipeline;
