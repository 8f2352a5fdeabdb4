// sri_manifest/src/pipeline/events.rs

//! The output side of a pipeline: the events an instance emits and the
//! receiver the host reads them from.

use crate::core::artifact::OutputArtifact;
use crate::error::{SriError, SriResult};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{event, Level};

/// What a pipeline delivers to its host.
///
/// A successful instance emits `Data` followed by `End`. A failed one emits a
/// single `Error` and nothing else.
#[derive(Debug)]
pub enum PipelineEvent {
  Data(OutputArtifact),
  End,
  Error(SriError),
}

pub(crate) fn channel() -> (EventSender, PipelineOutput) {
  let (tx, rx) = unbounded_channel();
  (EventSender { tx }, PipelineOutput { rx })
}

#[derive(Debug)]
pub(crate) struct EventSender {
  tx: UnboundedSender<PipelineEvent>,
}

impl EventSender {
  pub(crate) fn data(&self, artifact: OutputArtifact) {
    self.send(PipelineEvent::Data(artifact));
  }

  pub(crate) fn end(&self) {
    self.send(PipelineEvent::End);
  }

  pub(crate) fn error(&self, err: SriError) {
    self.send(PipelineEvent::Error(err));
  }

  fn send(&self, pipeline_event: PipelineEvent) {
    if let Err(unsent) = self.tx.send(pipeline_event) {
      event!(Level::DEBUG, dropped_event = ?unsent.0, "Output receiver dropped, event discarded.");
    }
  }
}

/// Receiving half of a pipeline's event channel.
///
/// The channel closes once the pipeline instance is dropped, which
/// `SriPipeline::end_input` does when it returns.
#[derive(Debug)]
pub struct PipelineOutput {
  rx: UnboundedReceiver<PipelineEvent>,
}

impl PipelineOutput {
  /// Next event, or `None` once the pipeline is gone and everything was read.
  pub async fn next(&mut self) -> Option<PipelineEvent> {
    self.rx.recv().await
  }

  /// Waits for the outcome: the emitted artifact or the emitted error.
  pub async fn artifact(mut self) -> SriResult<OutputArtifact> {
    match self.next().await {
      Some(PipelineEvent::Data(artifact)) => Ok(artifact),
      Some(PipelineEvent::Error(err)) => Err(err),
      Some(PipelineEvent::End) | None => Err(SriError::Internal(
        "pipeline closed without emitting an artifact".to_string(),
      )),
    }
  }

  /// Reads every event until the channel closes.
  pub async fn collect(mut self) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    while let Some(pipeline_event) = self.next().await {
      events.push(pipeline_event);
    }
    events
  }
}
