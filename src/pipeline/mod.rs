//! Two-stage style/back-translation pipeline.

pub mod orchestrator;
pub mod stages;

pub use orchestrator::Pipeline;
