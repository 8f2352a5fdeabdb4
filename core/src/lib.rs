// src/lib.rs

//! sri-manifest: an asynchronous Subresource Integrity manifest builder.
//!
//! A build pipeline pushes in-memory file records into an [`SriPipeline`]. Each
//! record is hashed the moment it arrives, and its digest is stored under the
//! record's path relative to its working directory. When input ends, the
//! pipeline waits for its digests, runs the configured transform and formatter,
//! and emits one artifact (by default `sri.json`):
//!
//! ```json
//! {"folder/file.ext":"sha256-LCa0a2j/xo/5m0U8HTBBNBNCLXBkg7+g+YpeiGJm564="}
//! ```
//!
//! Digests are collected in an [`Accumulator`] keyed by output file name.
//! Pipelines built against the same accumulator with the same file name share
//! one entry, so independent runs merge into one manifest.

pub mod accumulator;
pub mod core;
pub mod digest;
pub mod error;
pub mod finalize;
pub mod options;
pub mod pipeline;

// --- Re-exports for the Public API ---

pub use crate::core::artifact::OutputArtifact;
pub use crate::core::entry::{AccumulatorEntry, Manifest};
pub use crate::core::path::relative_path;
pub use crate::core::record::{Contents, FileRecord};

pub use crate::accumulator::Accumulator;
pub use crate::digest::{slice_digest, Digester, SriDigester, DEFAULT_ALGORITHMS};
pub use crate::error::{ErrorKind, SriError, SriResult};
pub use crate::finalize::{
  formatter_async, formatter_fn, transform_async, transform_fn, Formatter, IdentityTransform, JsonFormatter, Transform,
};
pub use crate::options::{OptionBag, OptionValue, OptionsInput, SriConfig, ValueKind, DEFAULT_FILE_NAME};
pub use crate::pipeline::{Lifecycle, PipelineEvent, PipelineOutput, SriPipeline};

/*
    Typical flow:
    1. Create one `Accumulator` and share it (e.g. in an `Arc`) between every pipeline
       whose results should be able to merge.
    2. Build a pipeline: `SriPipeline::new(&accumulator, options)?`, where options is
       `()`, a file name, an `OptionBag`, or JSON through `OptionsInput::from_json`.
    3. From inside a Tokio runtime, `accept` each `FileRecord`.
    4. `end_input().await` (or `spawn_end_input()`), then read the outcome from the
       returned `PipelineOutput`.
*/
