// sri_manifest/src/digest/sri.rs

//! Default `Digester`: SHA-2 family digests in Subresource Integrity form,
//! `algorithm-base64(digest)`.

use super::{Digester, DEFAULT_ALGORITHMS};
use anyhow::bail;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256, Sha384, Sha512};

#[derive(Debug, Clone, Copy, Default)]
pub struct SriDigester;

impl SriDigester {
  pub const SUPPORTED: &'static [&'static str] = &["sha256", "sha384", "sha512"];

  fn single(contents: &[u8], algorithm: &str) -> anyhow::Result<String> {
    let raw = match algorithm {
      "sha256" => Sha256::digest(contents).to_vec(),
      "sha384" => Sha384::digest(contents).to_vec(),
      "sha512" => Sha512::digest(contents).to_vec(),
      other => bail!(
        "unsupported hashing algorithm '{}' (supported: {})",
        other,
        Self::SUPPORTED.join(", ")
      ),
    };
    Ok(format!("{}-{}", algorithm, STANDARD.encode(raw)))
  }
}

impl Digester for SriDigester {
  fn digest(&self, contents: &[u8], algorithms: &[String]) -> anyhow::Result<String> {
    let selected: Vec<&str> = if algorithms.is_empty() {
      DEFAULT_ALGORITHMS.to_vec()
    } else {
      algorithms.iter().map(String::as_str).collect()
    };
    let parts = selected
      .into_iter()
      .map(|algorithm| Self::single(contents, algorithm))
      .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(parts.join(" "))
  }
}
