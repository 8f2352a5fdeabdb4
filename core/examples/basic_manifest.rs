// sri_manifest/examples/basic_manifest.rs

use serde_json::{json, Value};
use sri_manifest::{
  formatter_fn, transform_fn, Accumulator, FileRecord, OptionBag, OptionsInput, PipelineEvent, SriError, SriPipeline,
};
use tracing::info;

fn assets(root: &str) -> Vec<FileRecord> {
  vec![
    FileRecord::buffered(root, format!("{}/js/app.js", root), "console.log('app');"),
    FileRecord::buffered(root, format!("{}/css/site.css", root), "body { margin: 0; }"),
  ]
}

#[tokio::main]
async fn main() -> Result<(), SriError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- SRI Manifest Example ---");

  // 1. One accumulator shared by every pipeline that should be able to merge.
  let accumulator = Accumulator::new();

  // 2. Default configuration: sri.json, sha256, JSON object output.
  let (pipeline, output) = SriPipeline::new(&accumulator, ())?;
  let mut pipeline = pipeline.with_base_dir("/tmp/site");
  for record in assets("/tmp/site") {
    pipeline.accept(record);
  }
  pipeline.end_input().await;
  let artifact = output.artifact().await?;
  info!(path = %artifact.path().display(), "{}", artifact.contents_str());

  // 3. Configuration read from JSON, e.g. a build config file.
  let options =
    OptionsInput::from_json(json!({ "file_name": "integrity.json", "algorithms": ["sha384"], "length": 24 }))?;
  let (pipeline, output) = SriPipeline::new(&accumulator, options)?;
  let mut pipeline = pipeline.with_base_dir("/tmp/site");
  for record in assets("/tmp/site") {
    pipeline.accept(record);
  }
  pipeline.end_input().await;
  info!("{}", output.artifact().await?.contents_str());

  // 4. Custom transform and formatter: an HTML snippet per asset.
  let transform = transform_fn(|hashes| {
    Ok(Value::Array(
      hashes.into_iter().map(|(src, integrity)| json!({ "src": src, "integrity": integrity })).collect(),
    ))
  });
  let formatter = formatter_fn(|value| {
    let tags: Vec<String> = value
      .as_array()
      .map(|items| {
        items
          .iter()
          .map(|item| {
            format!(
              r#"<script src="/{}" integrity="{}"></script>"#,
              item["src"].as_str().unwrap_or_default(),
              item["integrity"].as_str().unwrap_or_default()
            )
          })
          .collect()
      })
      .unwrap_or_default();
    Ok(Value::String(tags.join("\n")))
  });
  let (pipeline, mut output) = SriPipeline::new(
    &accumulator,
    OptionBag::new()
      .set("file_name", "tags.html")
      .set("transform", transform)
      .set("formatter", formatter),
  )?;
  let mut pipeline = pipeline.with_base_dir("/tmp/site");
  pipeline.accept(FileRecord::buffered("/tmp/site", "/tmp/site/js/vendor.js", "/* vendor */"));
  let handle = pipeline.spawn_end_input();

  while let Some(pipeline_event) = output.next().await {
    match pipeline_event {
      PipelineEvent::Data(artifact) => info!(path = %artifact.path().display(), "\n{}", artifact.contents_str()),
      PipelineEvent::End => info!("End of output."),
      PipelineEvent::Error(err) => return Err(err),
    }
  }
  info!(state = ?handle.await.ok(), "Pipeline finished.");

  // 5. Errors arrive on the output channel, not from `end_input`.
  let (pipeline, output) = SriPipeline::new(&accumulator, OptionBag::new().set("algorithms", vec!["md5"]))?;
  let mut pipeline = pipeline.with_base_dir("/tmp/site");
  pipeline.accept(FileRecord::buffered("/tmp/site", "/tmp/site/legacy.js", "legacy"));
  pipeline.end_input().await;
  match output.artifact().await {
    Ok(_) => info!("Unexpected success."),
    Err(err) => info!(kind = ?err.kind(), "Expected failure: {}", err),
  }

  info!(identities = ?accumulator.identities(), "--- Example Finished ---");
  Ok(())
}
