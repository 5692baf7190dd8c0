//! Wildcard index: every fact precomputed under all eight query shapes.
//!
//! Inserting a triple writes it into eight buckets (`S P O`, `? P O`, `S ? O`,
//! `S P ?`, `? ? O`, `? P ?`, `S ? ?`, `? ? ?`). Any pattern then resolves with
//! one `DashMap` lookup instead of a scan, at the cost of eight set inserts and
//! eight references per fact.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;

use super::{IndexKey, Triple};

/// Map from [`IndexKey`] to the set of triples matching it.
///
/// The index exclusively owns each bucket. [`lookup`](Self::lookup) hands out
/// a snapshot, never the live set.
pub struct WildcardIndex {
    buckets: DashMap<IndexKey, HashSet<Arc<Triple>>>,
}

impl WildcardIndex {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-size for roughly `triples` facts.
    pub fn with_capacity(triples: usize) -> Self {
        Self {
            buckets: DashMap::with_capacity(triples.saturating_mul(4)),
        }
    }

    /// Add `triple` to all eight buckets it satisfies.
    ///
    /// Idempotent: re-indexing a triple leaves every bucket unchanged.
    /// Returns how many buckets actually gained the triple.
    pub(crate) fn index_triple(&self, triple: &Arc<Triple>) -> usize {
        IndexKey::fan_out(triple.key())
            .into_iter()
            .filter(|key| self.buckets.entry(*key).or_default().insert(Arc::clone(triple)))
            .count()
    }

    /// Snapshot of the triples under `key`; empty if the key was never populated.
    pub fn lookup(&self, key: &IndexKey) -> Vec<Arc<Triple>> {
        self.buckets
            .get(key)
            .map(|bucket| bucket.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of triples under `key` without copying them.
    pub fn count(&self, key: &IndexKey) -> usize {
        self.buckets.get(key).map(|b| b.len()).unwrap_or(0)
    }

    /// Number of populated buckets.
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total bucket memberships (eight per distinct fact).
    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(|b| b.value().len()).sum()
    }
}

impl Default for WildcardIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WildcardIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WildcardIndex")
            .field("keys", &self.key_count())
            .field("entries", &self.entry_count())
            .finish()
    }
}
