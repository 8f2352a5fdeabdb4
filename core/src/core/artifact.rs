// sri_manifest/src/core/artifact.rs

//! The single record a pipeline emits when it finalizes.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
  base: PathBuf,
  path: PathBuf,
  contents: Vec<u8>,
}

impl OutputArtifact {
  /// Builds the artifact for `output_identity` resolved under `base`.
  pub fn new(base: impl Into<PathBuf>, output_identity: &str, formatted: String) -> Self {
    let base = base.into();
    Self {
      path: base.join(output_identity),
      base,
      contents: formatted.into_bytes(),
    }
  }

  pub fn base(&self) -> &Path {
    &self.base
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// The path relative to the base directory, i.e. the output identity.
  pub fn relative(&self) -> &Path {
    self.path.strip_prefix(&self.base).unwrap_or(&self.path)
  }

  pub fn contents(&self) -> &[u8] {
    &self.contents
  }

  /// Contents as text. Always valid, the payload is built from a `String`.
  pub fn contents_str(&self) -> &str {
    std::str::from_utf8(&self.contents).unwrap_or_default()
  }
}
