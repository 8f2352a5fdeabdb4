// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use sri_manifest::{Digester, FileRecord, PipelineEvent, PipelineOutput};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

// --- Common Fixtures ---
pub const CWD: &str = "C:/users/ult/";
pub const FILE_PATH: &str = "C:/users/ult/test/file.js";
pub const FILE2_PATH: &str = "C:/users/ult/test/file2.js";
pub const FILE_KEY: &str = "test/file.js";
pub const FILE2_KEY: &str = "test/file2.js";

pub const FILE_CONTENTS: &[u8] = b"foo";
// Transparent 1x1 GIF
pub const FILE2_CONTENTS: &[u8] = &[
  0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff,
  0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02,
  0x01, 0x44, 0x00, 0x3b,
];

pub const FILE_SHA256: &str = "sha256-LCa0a2j/xo/5m0U8HTBBNBNCLXBkg7+g+YpeiGJm564=";
pub const FILE2_SHA256: &str = "sha256-7xlVrnV8i5ZsgySDUDMb06MPZYztEfOH+OvwWrM2hik=";

pub const BASE_DIR: &str = "/build/out";

pub fn file() -> FileRecord {
  FileRecord::buffered(CWD, FILE_PATH, FILE_CONTENTS)
}

pub fn file2() -> FileRecord {
  FileRecord::buffered(CWD, FILE2_PATH, FILE2_CONTENTS)
}

pub fn parse_manifest(contents: &[u8]) -> serde_json::Map<String, serde_json::Value> {
  match serde_json::from_slice(contents).expect("artifact is not JSON") {
    serde_json::Value::Object(map) => map,
    other => panic!("Expected a JSON object, got {}", other),
  }
}

// --- Test Digesters ---

/// Fails for every record whose contents equal `poison`, hashes the rest.
pub struct PoisonDigester {
  pub poison: &'static [u8],
}

impl Digester for PoisonDigester {
  fn digest(&self, contents: &[u8], algorithms: &[String]) -> anyhow::Result<String> {
    if contents == self.poison {
      anyhow::bail!("poisoned contents");
    }
    sri_manifest::SriDigester.digest(contents, algorithms)
  }
}

/// Sleeps before hashing so digests settle in reverse arrival order.
pub struct SlowDigester {
  pub calls: Arc<AtomicUsize>,
}

impl Digester for SlowDigester {
  fn digest(&self, contents: &[u8], algorithms: &[String]) -> anyhow::Result<String> {
    let call = self.calls.fetch_add(1, Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(40u64.saturating_sub(call as u64 * 10)));
    sri_manifest::SriDigester.digest(contents, algorithms)
  }
}

/// Panics inside the digest task, like a crashing hashing backend.
pub struct PanickingDigester;

impl Digester for PanickingDigester {
  fn digest(&self, _contents: &[u8], _algorithms: &[String]) -> anyhow::Result<String> {
    panic!("digest backend crashed");
  }
}

// --- Event helpers ---

/// Asserts the stream is exactly `Data`, `End` and returns the artifact.
pub async fn expect_success(output: PipelineOutput) -> sri_manifest::OutputArtifact {
  let mut events = output.collect().await.into_iter();
  let artifact = match events.next() {
    Some(PipelineEvent::Data(artifact)) => artifact,
    other => panic!("Expected Data event, got {:?}", other),
  };
  assert!(matches!(events.next(), Some(PipelineEvent::End)), "Expected End after Data");
  assert!(events.next().is_none(), "Expected no events after End");
  artifact
}

/// Asserts the stream is exactly one `Error` and returns it.
pub async fn expect_failure(output: PipelineOutput) -> sri_manifest::SriError {
  let mut events = output.collect().await.into_iter();
  let err = match events.next() {
    Some(PipelineEvent::Error(err)) => err,
    other => panic!("Expected Error event, got {:?}", other),
  };
  assert!(events.next().is_none(), "Expected no events after Error");
  err
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
