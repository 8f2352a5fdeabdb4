// sri_manifest/src/pipeline/instance.rs

//! Contains `SriPipeline`, one running invocation: it accepts records, hashes
//! them eagerly into its shared accumulator entry, and finalizes once input ends.

use crate::accumulator::Accumulator;
use crate::core::entry::AccumulatorEntry;
use crate::core::path::relative_path;
use crate::core::record::{Contents, FileRecord};
use crate::digest::{slice_digest, Digester, SriDigester};
use crate::error::{SriError, SriResult};
use crate::finalize::protocol::run_finalize;
use crate::options::{OptionsInput, SriConfig};
use crate::pipeline::events::{self, EventSender, PipelineOutput};
use crate::pipeline::lifecycle::Lifecycle;

use anyhow::anyhow;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{event, instrument, Level};

/// A pipeline instance.
///
/// Records are hashed as soon as they are accepted, each digest on the runtime's
/// blocking pool. The results land in the accumulator entry for the configured
/// output identity, which every instance built with that identity against the
/// same `Accumulator` shares.
///
/// Run-time failures are never returned to the caller. They are emitted on the
/// instance's [`PipelineOutput`] and end the instance.
pub struct SriPipeline {
  config: SriConfig,
  entry: AccumulatorEntry,
  digester: Arc<dyn Digester>,
  base_dir: Option<PathBuf>,
  pending: JoinSet<SriResult<()>>,
  state: Lifecycle,
  events: EventSender,
}

impl SriPipeline {
  /// Validates `options`, acquires the accumulator entry for the configured
  /// output identity and returns the instance with its output receiver.
  ///
  /// Configuration errors are returned here, before any record is accepted.
  pub fn new(accumulator: &Accumulator, options: impl Into<OptionsInput>) -> SriResult<(Self, PipelineOutput)> {
    let config = SriConfig::assign(options)?;
    let entry = accumulator.acquire(config.file_name());
    let (sender, output) = events::channel();

    event!(
      Level::DEBUG,
      output_identity = %config.file_name(),
      algorithms = ?config.algorithms(),
      length = ?config.length(),
      "Pipeline created."
    );

    Ok((
      Self {
        config,
        entry,
        digester: Arc::new(SriDigester),
        base_dir: None,
        pending: JoinSet::new(),
        state: Lifecycle::Open,
        events: sender,
      },
      output,
    ))
  }

  /// Replaces the default SHA-2 digester.
  pub fn with_digester(mut self, digester: Arc<dyn Digester>) -> Self {
    self.digester = digester;
    self
  }

  /// Directory the output identity is resolved under. Defaults to the process
  /// working directory at finalize time.
  pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
    self.base_dir = Some(base_dir.into());
    self
  }

  pub fn state(&self) -> Lifecycle {
    self.state
  }

  pub fn config(&self) -> &SriConfig {
    &self.config
  }

  pub fn output_identity(&self) -> &str {
    self.config.file_name()
  }

  /// Handle to the shared accumulator entry this instance writes to.
  pub fn entry(&self) -> &AccumulatorEntry {
    &self.entry
  }

  /// Number of digest tasks not yet collected.
  pub fn pending_len(&self) -> usize {
    self.pending.len()
  }

  /// Accepts one record. Never blocks; must be called from within a Tokio runtime.
  ///
  /// - `Null` records are skipped.
  /// - `Stream` records emit `SriError::UnsupportedInput` and fail the instance.
  /// - Buffered records start hashing immediately.
  ///
  /// Records arriving after the instance failed are ignored.
  pub fn accept(&mut self, record: FileRecord) {
    if self.state != Lifecycle::Open {
      event!(Level::WARN, path = %record.path().display(), state = ?self.state, "Record ignored, pipeline is not open.");
      return;
    }

    let (cwd, path, contents) = record.into_parts();
    let bytes = match contents {
      Contents::Buffer(bytes) => bytes,
      Contents::Null => {
        event!(Level::TRACE, path = %path.display(), "Null record skipped.");
        return;
      }
      Contents::Stream => {
        self.fail(SriError::UnsupportedInput {
          path: path.display().to_string(),
        });
        return;
      }
    };

    let key = relative_path(&cwd, &path);
    event!(Level::TRACE, key = %key, bytes = bytes.len(), "Record accepted, hashing.");

    let entry = self.entry.clone();
    let digester = Arc::clone(&self.digester);
    let algorithms = self.config.algorithms().to_vec();
    let length = self.config.length();

    self.pending.spawn_blocking(move || {
      let digest = digester
        .digest(&bytes, &algorithms)
        .map_err(|source| SriError::Hash { source })?;
      let digest = slice_digest(&digest, length);
      event!(Level::TRACE, key = %key, digest = %digest, "Digest recorded.");
      entry.insert(key, digest);
      Ok(())
    });
  }

  /// Waits until every digest started so far has settled, without ending input.
  ///
  /// Useful when several instances share an output identity and each must see
  /// the others' writes. A failed digest fails the instance here.
  pub async fn flush(&mut self) {
    self.settle_pending().await;
  }

  /// Signals end of input: waits for pending digests, then finalizes.
  ///
  /// Returns the terminal state. The outcome itself (artifact or error) is
  /// delivered on the instance's `PipelineOutput`.
  #[instrument(
    name = "SriPipeline::end_input",
    skip_all,
    fields(output_identity = %self.config.file_name(), pending = self.pending.len())
  )]
  pub async fn end_input(mut self) -> Lifecycle {
    if self.state.is_terminal() {
      event!(Level::DEBUG, "Input ended on a failed pipeline, nothing to finalize.");
      return self.state;
    }

    self.state = Lifecycle::Draining;
    self.settle_pending().await;
    if self.state == Lifecycle::Failed {
      return self.state;
    }

    self.state = Lifecycle::Finalizing;
    let snapshot = self.entry.snapshot();
    event!(Level::DEBUG, entries = snapshot.len(), "Pending work settled, finalizing.");

    let outcome = match self.resolve_base_dir() {
      Ok(base) => run_finalize(&self.config, snapshot, &base).await,
      Err(err) => Err(err),
    };

    match outcome {
      Ok(artifact) => {
        event!(Level::INFO, path = %artifact.path().display(), "Manifest emitted.");
        self.state = Lifecycle::Done;
        self.events.data(artifact);
        self.events.end();
      }
      Err(err) => self.fail(err),
    }
    self.state
  }

  /// Runs [`SriPipeline::end_input`] as a task on the current runtime.
  pub fn spawn_end_input(self) -> JoinHandle<Lifecycle> {
    tokio::spawn(self.end_input())
  }

  // Joins pending digests in completion order. The first failure fails the
  // instance.
  async fn settle_pending(&mut self) {
    while let Some(joined) = self.pending.join_next().await {
      if let Err(err) = joined.unwrap_or_else(|join_err| Err(digest_task_error(join_err))) {
        self.fail(err);
        return;
      }
    }
  }

  fn resolve_base_dir(&self) -> SriResult<PathBuf> {
    match &self.base_dir {
      Some(base) => Ok(base.clone()),
      None => std::env::current_dir().map_err(|source| SriError::WorkingDirectory { source }),
    }
  }

  // Digest tasks still in flight are detached, not aborted: they may still
  // write to the shared entry after the instance is dropped.
  fn fail(&mut self, err: SriError) {
    event!(Level::ERROR, error = %err, kind = ?err.kind(), "Pipeline failed.");
    self.pending.detach_all();
    self.state = Lifecycle::Failed;
    self.events.error(err);
  }
}

/// A panicking digester is a digest failure like any other.
fn digest_task_error(join_err: JoinError) -> SriError {
  if !join_err.is_panic() {
    return SriError::Internal(format!("digest task did not complete: {}", join_err));
  }
  let payload = join_err.into_panic();
  let message = payload
    .downcast_ref::<&str>()
    .map(|msg| msg.to_string())
    .or_else(|| payload.downcast_ref::<String>().cloned())
    .unwrap_or_else(|| "unknown panic payload".to_string());
  SriError::Hash {
    source: anyhow!("digester panicked: {}", message),
  }
}

impl std::fmt::Debug for SriPipeline {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SriPipeline")
      .field("config", &self.config)
      .field("base_dir", &self.base_dir)
      .field("pending", &self.pending.len())
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}
