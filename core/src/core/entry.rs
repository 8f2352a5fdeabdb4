// sri_manifest/src/core/entry.rs
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Plain relative-key → digest mapping handed to transforms. Ordered, so the
/// default JSON output is stable.
pub type Manifest = BTreeMap<String, String>;

/// One accumulator partition: the digests collected for a single output
/// identity, shared by every pipeline instance configured with it.
///
/// Cloning produces another handle to the same map. Writes from digest tasks
/// running on other threads go through the inner `parking_lot::RwLock`; no
/// method hands out a guard, so none can be held across an `.await`.
#[derive(Debug, Default)]
pub struct AccumulatorEntry(Arc<RwLock<HashMap<String, String>>>);

impl AccumulatorEntry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records `digest` under `key`, replacing (and returning) any previous digest.
  pub fn insert(&self, key: impl Into<String>, digest: impl Into<String>) -> Option<String> {
    self.0.write().insert(key.into(), digest.into())
  }

  pub fn get(&self, key: &str) -> Option<String> {
    self.0.read().get(key).cloned()
  }

  pub fn len(&self) -> usize {
    self.0.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.read().is_empty()
  }

  /// Copies the current contents. Later writes do not affect the copy.
  pub fn snapshot(&self) -> Manifest {
    self
      .0
      .read()
      .iter()
      .map(|(key, digest)| (key.clone(), digest.clone()))
      .collect()
  }

  /// True when both handles point at the same partition.
  pub fn same_entry(&self, other: &AccumulatorEntry) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Clone for AccumulatorEntry {
  fn clone(&self) -> Self {
    AccumulatorEntry(Arc::clone(&self.0))
  }
}
