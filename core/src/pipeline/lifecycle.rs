// sri_manifest/src/pipeline/lifecycle.rs

//! Defines the states a pipeline instance moves through.

/// State of an `SriPipeline`. Transitions only move forward:
/// `Open → Draining → Finalizing → Done`, with `Failed` reachable from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
  /// Accepting records.
  Open,
  /// End of input received; waiting for pending digests to settle.
  Draining,
  /// Running the transform and formatter.
  Finalizing,
  /// The artifact was emitted.
  Done,
  /// An error was emitted. No artifact will be produced.
  Failed,
}

impl Lifecycle {
  pub fn is_terminal(self) -> bool {
    matches!(self, Lifecycle::Done | Lifecycle::Failed)
  }
}
