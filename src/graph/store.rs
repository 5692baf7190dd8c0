//! Fact store: one [`Triple`] per distinct (subject, predicate, object).

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::symbol::{Node, Predicate};

use super::{FactKey, Triple};

/// Outcome of [`FactStore::upsert`].
#[derive(Debug, Clone)]
pub struct Upserted {
    /// The canonical instance for the fact.
    pub triple: Arc<Triple>,
    /// Whether this call created it.
    pub created: bool,
}

/// Deduplicating table of facts keyed by [`FactKey`].
///
/// No deletion and no update: the key is the content.
pub struct FactStore {
    facts: DashMap<FactKey, Arc<Triple>>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            facts: DashMap::with_capacity(capacity),
        }
    }

    /// Return the triple for the given entities, creating it if absent.
    pub(crate) fn upsert(&self, subject: Arc<Node>, predicate: Arc<Predicate>, object: Arc<Node>) -> Upserted {
        let key = FactKey {
            subject: subject.id(),
            predicate: predicate.id(),
            object: object.id(),
        };
        match self.facts.entry(key) {
            Entry::Occupied(e) => Upserted {
                triple: Arc::clone(e.get()),
                created: false,
            },
            Entry::Vacant(e) => {
                let triple = Arc::new(Triple::new(subject, predicate, object));
                tracing::debug!(identifier = triple.identifier(), "new triple");
                e.insert(Arc::clone(&triple));
                Upserted {
                    triple,
                    created: true,
                }
            }
        }
    }

    pub fn get(&self, key: &FactKey) -> Option<Arc<Triple>> {
        self.facts.get(key).map(|t| Arc::clone(t.value()))
    }

    /// All stored triples, in no particular order.
    pub fn all(&self) -> Vec<Arc<Triple>> {
        self.facts.iter().map(|t| Arc::clone(t.value())).collect()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl Default for FactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactStore").field("triples", &self.len()).finish()
    }
}
