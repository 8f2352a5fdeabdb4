// sri_manifest/src/pipeline/mod.rs

//! Defines `SriPipeline`, its lifecycle states and the events it emits.

pub mod events;
pub mod instance;
pub mod lifecycle;

// Re-export the main pipeline struct
pub use events::{PipelineEvent, PipelineOutput};
pub use instance::SriPipeline;
pub use lifecycle::Lifecycle;
