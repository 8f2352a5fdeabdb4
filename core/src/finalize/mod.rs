// sri_manifest/src/finalize/mod.rs

//! What happens once a pipeline's input is exhausted and its digests have settled.

pub mod callbacks;
pub mod protocol;

pub use callbacks::{
  formatter_async, formatter_fn, transform_async, transform_fn, FnFormatter, FnTransform, Formatter, IdentityTransform,
  JsonFormatter, Transform,
};
pub use protocol::run_finalize;
