// sri_manifest/src/finalize/callbacks.rs

//! Defines the `Transform` and `Formatter` traits run by the finalize protocol,
//! their defaults, and closure-backed implementations.
//!
//! Both traits are async. A synchronous callback is simply one whose future is
//! already ready, so finalize awaits every callback through the same path.

use crate::core::entry::Manifest;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::future::{ready, Future};
use std::marker::PhantomData;
use std::sync::Arc;

/// Turns the snapshot of collected digests into the value handed to the formatter.
#[async_trait]
pub trait Transform: Send + Sync + 'static {
  async fn transform(&self, hashes: Manifest) -> anyhow::Result<Value>;
}

/// Turns the transformed value into the artifact text.
///
/// The result must be a `Value::String`; anything else fails finalize.
#[async_trait]
pub trait Formatter: Send + Sync + 'static {
  async fn format(&self, value: Value) -> anyhow::Result<Value>;
}

// --- Defaults ---

/// Passes the manifest through as a JSON object of `key -> digest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

#[async_trait]
impl Transform for IdentityTransform {
  async fn transform(&self, hashes: Manifest) -> anyhow::Result<Value> {
    Ok(Value::Object(
      hashes.into_iter().map(|(key, digest)| (key, Value::String(digest))).collect::<Map<_, _>>(),
    ))
  }
}

/// Serializes the value as compact JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

#[async_trait]
impl Formatter for JsonFormatter {
  async fn format(&self, value: Value) -> anyhow::Result<Value> {
    Ok(Value::String(serde_json::to_string(&value)?))
  }
}

// --- Closure-backed implementations ---

/// A `Transform` backed by a function returning a future.
pub struct FnTransform<F, Fut>
where
  F: Fn(Manifest) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
  f: F,
  _phantom_fut: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnTransform<F, Fut>
where
  F: Fn(Manifest) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
  pub fn new(f: F) -> Self {
    Self {
      f,
      _phantom_fut: PhantomData,
    }
  }
}

#[async_trait]
impl<F, Fut> Transform for FnTransform<F, Fut>
where
  F: Fn(Manifest) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
  async fn transform(&self, hashes: Manifest) -> anyhow::Result<Value> {
    (self.f)(hashes).await
  }
}

/// A `Formatter` backed by a function returning a future.
pub struct FnFormatter<F, Fut>
where
  F: Fn(Value) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
  f: F,
  _phantom_fut: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnFormatter<F, Fut>
where
  F: Fn(Value) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
  pub fn new(f: F) -> Self {
    Self {
      f,
      _phantom_fut: PhantomData,
    }
  }
}

#[async_trait]
impl<F, Fut> Formatter for FnFormatter<F, Fut>
where
  F: Fn(Value) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
  async fn format(&self, value: Value) -> anyhow::Result<Value> {
    (self.f)(value).await
  }
}

/// Wraps a synchronous transform.
pub fn transform_fn<F>(f: F) -> Arc<dyn Transform>
where
  F: Fn(Manifest) -> anyhow::Result<Value> + Send + Sync + 'static,
{
  Arc::new(FnTransform::new(move |hashes| ready(f(hashes))))
}

/// Wraps a deferred transform.
pub fn transform_async<F, Fut>(f: F) -> Arc<dyn Transform>
where
  F: Fn(Manifest) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
  Arc::new(FnTransform::new(f))
}

/// Wraps a synchronous formatter.
pub fn formatter_fn<F>(f: F) -> Arc<dyn Formatter>
where
  F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
{
  Arc::new(FnFormatter::new(move |value| ready(f(value))))
}

/// Wraps a deferred formatter.
pub fn formatter_async<F, Fut>(f: F) -> Arc<dyn Formatter>
where
  F: Fn(Value) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
  Arc::new(FnFormatter::new(f))
}
