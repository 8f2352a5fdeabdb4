// sri_manifest/src/accumulator.rs

//! Defines the `Accumulator`, a registry of `AccumulatorEntry` partitions keyed by
//! output identity. Pipelines constructed against the same accumulator with the
//! same output identity share one entry and therefore merge into one manifest.

use crate::core::entry::AccumulatorEntry;

use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{event, Level};

/// The Accumulator registry.
///
/// Share it between pipelines with an `Arc<Accumulator>`. Entries live as long
/// as the accumulator unless [`Accumulator::reset`] is called.
#[derive(Debug, Default)]
pub struct Accumulator {
  entries: Mutex<HashMap<String, AccumulatorEntry>>,
}

impl Accumulator {
  /// Creates a new, empty accumulator.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the entry registered for `output_identity`, registering an empty
  /// one first if none exists.
  pub fn acquire(&self, output_identity: &str) -> AccumulatorEntry {
    let mut entries = self.entries.lock();
    if let Some(entry) = entries.get(output_identity) {
      event!(Level::TRACE, output_identity, "Reusing accumulator entry.");
      return entry.clone();
    }
    event!(Level::DEBUG, output_identity, "Registering accumulator entry.");
    let entry = AccumulatorEntry::new();
    entries.insert(output_identity.to_string(), entry.clone());
    entry
  }

  /// Looks up an entry without registering one.
  pub fn get(&self, output_identity: &str) -> Option<AccumulatorEntry> {
    self.entries.lock().get(output_identity).cloned()
  }

  /// Sorted list of registered output identities.
  pub fn identities(&self) -> Vec<String> {
    let mut identities: Vec<String> = self.entries.lock().keys().cloned().collect();
    identities.sort();
    identities
  }

  /// Drops every entry. Pipelines already holding an entry keep their handle;
  /// pipelines created afterwards start from empty partitions.
  pub fn reset(&self) {
    let dropped = {
      let mut entries = self.entries.lock();
      let count = entries.len();
      entries.clear();
      count
    };
    event!(Level::DEBUG, dropped, "Accumulator reset.");
  }
}

#[cfg(test)]
mod tests {
  use super::Accumulator;

  #[test]
  fn acquire_returns_same_entry_for_same_identity() {
    let accumulator = Accumulator::new();
    let first = accumulator.acquire("sri.json");
    let second = accumulator.acquire("sri.json");
    let other = accumulator.acquire("other.json");

    assert!(first.same_entry(&second));
    assert!(!first.same_entry(&other));
    assert_eq!(accumulator.identities(), vec!["other.json", "sri.json"]);
  }

  #[test]
  fn reset_detaches_existing_entries() {
    let accumulator = Accumulator::new();
    let before = accumulator.acquire("sri.json");
    before.insert("a.js", "sha256-a");

    accumulator.reset();
    assert!(accumulator.get("sri.json").is_none());

    let after = accumulator.acquire("sri.json");
    assert!(after.is_empty());
    assert!(!before.same_entry(&after));
    assert_eq!(before.len(), 1);
  }
}
