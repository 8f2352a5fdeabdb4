// sri_manifest/src/core/record.rs

//! The file record handed to a pipeline by its host.

use std::path::{Path, PathBuf};

/// What a record carries as content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
  /// Fully buffered bytes. The only state that gets hashed.
  Buffer(Vec<u8>),
  /// No content at all (directories, placeholders). Silently skipped.
  Null,
  /// Content that would only be available as a stream. Not supported.
  Stream,
}

/// An in-memory file flowing through a build pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
  cwd: PathBuf,
  path: PathBuf,
  contents: Contents,
}

impl FileRecord {
  pub fn new(cwd: impl Into<PathBuf>, path: impl Into<PathBuf>, contents: Contents) -> Self {
    Self {
      cwd: cwd.into(),
      path: path.into(),
      contents,
    }
  }

  /// Shorthand for a record with buffered contents.
  pub fn buffered(cwd: impl Into<PathBuf>, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
    Self::new(cwd, path, Contents::Buffer(bytes.into()))
  }

  pub fn cwd(&self) -> &Path {
    &self.cwd
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn contents(&self) -> &Contents {
    &self.contents
  }

  pub fn is_null(&self) -> bool {
    matches!(self.contents, Contents::Null)
  }

  pub fn is_stream(&self) -> bool {
    matches!(self.contents, Contents::Stream)
  }

  pub(crate) fn into_parts(self) -> (PathBuf, PathBuf, Contents) {
    (self.cwd, self.path, self.contents)
  }
}
