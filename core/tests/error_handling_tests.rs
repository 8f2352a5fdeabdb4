// tests/error_handling_tests.rs
mod common;
use common::*;
use sri_manifest::{
  Accumulator, Contents, ErrorKind, FileRecord, Lifecycle, OptionBag, OptionValue, OptionsInput, PipelineEvent,
  SriPipeline,
};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_unsupported_algorithm_emits_hash_error() {
  setup_tracing();
  let accumulator = Accumulator::new();
  let (pipeline, output) =
    SriPipeline::new(&accumulator, OptionBag::new().set("algorithms", vec!["UltHasher9000"])).unwrap();
  let mut pipeline = pipeline.with_base_dir(BASE_DIR);

  pipeline.accept(file());
  assert_eq!(pipeline.end_input().await, Lifecycle::Failed);

  let err = expect_failure(output).await;
  assert_eq!(err.kind(), ErrorKind::Hash);
  assert!(format!("{:#}", anyhow::Error::new(err)).contains("UltHasher9000"));
  assert!(accumulator.get("sri.json").unwrap().is_empty());
}

#[tokio::test]
async fn test_streaming_record_is_rejected() {
  setup_tracing();
  let accumulator = Accumulator::new();
  let (pipeline, output) = SriPipeline::new(&accumulator, ()).unwrap();
  let mut pipeline = pipeline.with_base_dir(BASE_DIR);

  pipeline.accept(FileRecord::new(CWD, FILE_PATH, Contents::Stream));
  assert_eq!(pipeline.state(), Lifecycle::Failed);

  // Later records are ignored, and ending input produces nothing more.
  pipeline.accept(file2());
  assert_eq!(pipeline.pending_len(), 0);
  assert_eq!(pipeline.end_input().await, Lifecycle::Failed);

  let err = expect_failure(output).await;
  assert_eq!(err.kind(), ErrorKind::UnsupportedInput);
  assert!(err.to_string().contains("Streaming not supported"));
}

#[tokio::test]
async fn test_panicking_digester_emits_hash_error() {
  setup_tracing();
  let accumulator = Accumulator::new();
  let (pipeline, output) = SriPipeline::new(&accumulator, ()).unwrap();
  let mut pipeline = pipeline.with_base_dir(BASE_DIR).with_digester(Arc::new(PanickingDigester));

  pipeline.accept(file());
  assert_eq!(pipeline.end_input().await, Lifecycle::Failed);

  // Exactly one Error event, no Data.
  let err = expect_failure(output).await;
  assert_eq!(err.kind(), ErrorKind::Hash);
  assert!(format!("{:#}", anyhow::Error::new(err)).contains("digest backend crashed"));
  assert!(accumulator.get("sri.json").unwrap().is_empty());
}

#[tokio::test]
async fn test_digests_in_flight_still_land_after_stream_failure() {
  setup_tracing();
  let accumulator = Accumulator::new();
  let (pipeline, output) = SriPipeline::new(&accumulator, ()).unwrap();
  let mut pipeline = pipeline.with_base_dir(BASE_DIR).with_digester(Arc::new(SlowDigester {
    calls: Arc::new(AtomicUsize::new(0)),
  }));

  pipeline.accept(file());
  pipeline.accept(FileRecord::new(CWD, FILE2_PATH, Contents::Stream));
  assert_eq!(pipeline.state(), Lifecycle::Failed);
  // Ending input on the failed instance drops it while the digest is running.
  assert_eq!(pipeline.end_input().await, Lifecycle::Failed);
  assert_eq!(expect_failure(output).await.kind(), ErrorKind::UnsupportedInput);

  let entry = accumulator.get("sri.json").unwrap();
  for _ in 0..100 {
    if !entry.is_empty() {
      break;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
  assert_eq!(entry.get(FILE_KEY).as_deref(), Some(FILE_SHA256));
}

#[tokio::test]
async fn test_failed_digest_keeps_partial_writes() {
  setup_tracing();
  let accumulator = Accumulator::new();
  let (pipeline, output) = SriPipeline::new(&accumulator, "shared.json").unwrap();
  let mut pipeline = pipeline
    .with_base_dir(BASE_DIR)
    .with_digester(Arc::new(PoisonDigester { poison: FILE2_CONTENTS }));

  pipeline.accept(file());
  pipeline.flush().await;
  assert_eq!(pipeline.state(), Lifecycle::Open);

  pipeline.accept(file2());
  assert_eq!(pipeline.end_input().await, Lifecycle::Failed);

  let err = expect_failure(output).await;
  assert_eq!(err.kind(), ErrorKind::Hash);

  // The successful digest stays visible to anyone sharing the entry.
  let (sibling, sibling_output) = SriPipeline::new(&accumulator, "shared.json").unwrap();
  sibling.with_base_dir(BASE_DIR).end_input().await;
  let manifest = parse_manifest(expect_success(sibling_output).await.contents());
  assert_eq!(manifest.len(), 1);
  assert_eq!(manifest[FILE_KEY], FILE_SHA256);
}

#[tokio::test]
async fn test_flush_surfaces_failure_before_end_of_input() {
  setup_tracing();
  let accumulator = Accumulator::new();
  let (pipeline, mut output) = SriPipeline::new(&accumulator, ()).unwrap();
  let mut pipeline = pipeline
    .with_base_dir(BASE_DIR)
    .with_digester(Arc::new(PoisonDigester { poison: FILE_CONTENTS }));

  pipeline.accept(file());
  pipeline.flush().await;
  assert_eq!(pipeline.state(), Lifecycle::Failed);
  assert!(matches!(
    output.next().await,
    Some(PipelineEvent::Error(err)) if err.kind() == ErrorKind::Hash
  ));

  assert_eq!(pipeline.end_input().await, Lifecycle::Failed);
  assert!(output.next().await.is_none());
}

#[tokio::test]
async fn test_failure_in_one_pipeline_does_not_affect_other_identities() {
  setup_tracing();
  let accumulator = Accumulator::new();
  let (failing, failing_output) =
    SriPipeline::new(&accumulator, OptionBag::new().set("file_name", "a.json").set("algorithms", vec!["md5"])).unwrap();
  let (healthy, healthy_output) = SriPipeline::new(&accumulator, "b.json").unwrap();
  let mut failing = failing.with_base_dir(BASE_DIR);
  let mut healthy = healthy.with_base_dir(BASE_DIR);

  failing.accept(file());
  healthy.accept(file());
  let (failing_state, healthy_state) = tokio::join!(failing.end_input(), healthy.end_input());
  assert_eq!(failing_state, Lifecycle::Failed);
  assert_eq!(healthy_state, Lifecycle::Done);

  assert_eq!(expect_failure(failing_output).await.kind(), ErrorKind::Hash);
  let manifest = parse_manifest(expect_success(healthy_output).await.contents());
  assert_eq!(manifest[FILE_KEY], FILE_SHA256);
}

#[test]
fn test_unknown_option_is_rejected_at_construction() {
  let accumulator = Accumulator::new();
  let err = SriPipeline::new(&accumulator, OptionBag::new().set("foo", 0_i64)).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::UnsupportedOption);
  assert!(err.is_configuration());
  // Nothing was registered for a pipeline that never got built.
  assert!(accumulator.identities().is_empty());
}

#[test]
fn test_wrong_option_shape_is_rejected_at_construction() {
  let accumulator = Accumulator::new();
  for bag in [
    OptionBag::new().set("file_name", 42_i64),
    OptionBag::new().set("algorithms", "sha256"),
    OptionBag::new().set("transform", OptionValue::Null),
    OptionBag::new().set("formatter", "JSON.stringify"),
    OptionBag::new().set("length", "16"),
  ] {
    let err = SriPipeline::new(&accumulator, bag).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOptionType, "{}", err);
  }
}

#[test]
fn test_json_configuration_is_validated() {
  let accumulator = Accumulator::new();
  let input = OptionsInput::from_json(serde_json::json!({ "fileName": "sri.json" })).unwrap();
  let err = SriPipeline::new(&accumulator, input).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::UnsupportedOption);
  assert!(err.to_string().contains("fileName"));
}
