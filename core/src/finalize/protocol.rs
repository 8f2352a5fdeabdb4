// sri_manifest/src/finalize/protocol.rs

//! The finalize sequence: snapshot → transform → formatter → artifact.

use crate::core::artifact::OutputArtifact;
use crate::core::entry::Manifest;
use crate::error::{SriError, SriResult};
use crate::options::SriConfig;

use serde_json::Value;
use std::path::Path;
use tracing::{event, instrument, Level};

/// Runs the configured transform and formatter over `snapshot` and builds the
/// artifact for `config.file_name()` under `base`.
///
/// A transform error becomes `SriError::TransformResult`. A formatter error,
/// or a formatter result that is not a string, becomes `SriError::Format`.
#[instrument(
  name = "finalize",
  skip_all,
  fields(output_identity = %config.file_name(), entries = snapshot.len()),
  err(Display)
)]
pub async fn run_finalize(config: &SriConfig, snapshot: Manifest, base: &Path) -> SriResult<OutputArtifact> {
  event!(Level::TRACE, "Running transform.");
  let transformed = config
    .transform()
    .transform(snapshot)
    .await
    .map_err(|source| SriError::TransformResult { source })?;

  event!(Level::TRACE, "Running formatter.");
  let formatted = config
    .formatter()
    .format(transformed)
    .await
    .map_err(|source| SriError::Format {
      message: "`formatter` failed".to_string(),
      source: Some(source),
    })?;

  let text = match formatted {
    Value::String(text) => text,
    other => {
      return Err(SriError::format_message(format!(
        "Return/fulfill value of `formatter` must be a string (got {})",
        json_kind(&other)
      )))
    }
  };

  event!(Level::DEBUG, bytes = text.len(), "Manifest formatted.");
  Ok(OutputArtifact::new(base, config.file_name(), text))
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
