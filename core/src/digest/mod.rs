// sri_manifest/src/digest/mod.rs

//! Digest computation: the `Digester` seam, the default SRI implementation
//! and the slicing policy applied before a digest is stored.

pub mod sri;

pub use sri::SriDigester;

/// Algorithms used when none are configured.
pub const DEFAULT_ALGORITHMS: &[&str] = &["sha256"];

/// Computes the integrity string for a record's bytes.
///
/// Implementations are pure and synchronous; the pipeline runs them on the
/// blocking pool. The returned string is stored as-is (after slicing), so
/// its format is owned by the implementation.
pub trait Digester: Send + Sync + 'static {
  fn digest(&self, contents: &[u8], algorithms: &[String]) -> anyhow::Result<String>;
}

impl<F> Digester for F
where
  F: Fn(&[u8], &[String]) -> anyhow::Result<String> + Send + Sync + 'static,
{
  fn digest(&self, contents: &[u8], algorithms: &[String]) -> anyhow::Result<String> {
    self(contents, algorithms)
  }
}

/// Applies the slicing policy to a digest string.
///
/// A positive `length` keeps that many leading characters, a negative one
/// keeps that many trailing characters. `None` and `0` keep everything.
pub fn slice_digest(digest: &str, length: Option<i64>) -> String {
  let total = digest.chars().count();
  match length {
    Some(n) if n > 0 => {
      let keep = usize::try_from(n).unwrap_or(usize::MAX).min(total);
      digest.chars().take(keep).collect()
    }
    Some(n) if n < 0 => {
      let keep = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX).min(total);
      digest.chars().skip(total - keep).collect()
    }
    _ => digest.to_string(),
  }
}
