// sri_manifest/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Every failure the crate can report.
///
/// Configuration variants are returned synchronously from construction.
/// The others are delivered through the instance's event channel.
#[derive(Debug, Error)]
pub enum SriError {
  #[error("Streaming not supported: record '{path}' has no buffered contents")]
  UnsupportedInput { path: String },

  #[error("Hashing failed. Source: {source}")]
  Hash {
    #[source]
    source: AnyhowError,
  },

  #[error("`transform` failed. Source: {source}")]
  TransformResult {
    #[source]
    source: AnyhowError,
  },

  #[error("{message}")]
  Format {
    message: String,
    #[source]
    source: Option<AnyhowError>,
  },

  #[error("Unsupported option: {option}")]
  UnsupportedOption { option: String },

  #[error("options.{option} must be of type {expected} (got {actual})")]
  InvalidOptionType {
    option: String,
    expected: String,
    actual: String,
  },

  #[error("Could not resolve the output base directory. Source: {source}")]
  WorkingDirectory {
    #[source]
    source: std::io::Error,
  },

  #[error("Internal sri-manifest error: {0}")]
  Internal(String),
}

/// Tag identifying the class of an [`SriError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  UnsupportedInput,
  Hash,
  TransformResult,
  Format,
  UnsupportedOption,
  InvalidOptionType,
  WorkingDirectory,
  Internal,
}

impl SriError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      SriError::UnsupportedInput { .. } => ErrorKind::UnsupportedInput,
      SriError::Hash { .. } => ErrorKind::Hash,
      SriError::TransformResult { .. } => ErrorKind::TransformResult,
      SriError::Format { .. } => ErrorKind::Format,
      SriError::UnsupportedOption { .. } => ErrorKind::UnsupportedOption,
      SriError::InvalidOptionType { .. } => ErrorKind::InvalidOptionType,
      SriError::WorkingDirectory { .. } => ErrorKind::WorkingDirectory,
      SriError::Internal(_) => ErrorKind::Internal,
    }
  }

  /// True for the variants raised while validating options.
  pub fn is_configuration(&self) -> bool {
    matches!(
      self.kind(),
      ErrorKind::UnsupportedOption | ErrorKind::InvalidOptionType
    )
  }

  pub(crate) fn format_message(message: impl Into<String>) -> Self {
    SriError::Format {
      message: message.into(),
      source: None,
    }
  }
}

pub type SriResult<T, E = SriError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_are_tagged() {
    let err = SriError::UnsupportedOption { option: "foo".into() };
    assert_eq!(err.kind(), ErrorKind::UnsupportedOption);
    assert!(err.is_configuration());
    assert_eq!(err.to_string(), "Unsupported option: foo");

    let err = SriError::Hash {
      source: anyhow::anyhow!("boom"),
    };
    assert_eq!(err.kind(), ErrorKind::Hash);
    assert!(!err.is_configuration());
    assert!(std::error::Error::source(&err).is_some());
  }
}
