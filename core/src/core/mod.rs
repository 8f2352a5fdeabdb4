pub mod artifact;
pub mod entry;
pub mod path;
pub mod record;

// Re-export key types for easier access from other modules (and lib.rs)
pub use artifact::OutputArtifact;
pub use entry::{AccumulatorEntry, Manifest};
pub use path::relative_path;
pub use record::{Contents, FileRecord};
