//! Entity registry: case-insensitive interning of nodes and predicates.
//!
//! The [`EntityRegistry`] keeps one `DashMap` per namespace, keyed by the
//! canonical (uppercase) identifier. Interning goes through the map's entry
//! API, so the check-then-insert is atomic per key even without the engine's
//! write gate.

use std::sync::Arc;

use dashmap::DashMap;

use crate::symbol::{
    AtomicSymbolAllocator, Entity, EntityKind, Node, NodeKind, Predicate, PredicateKind, SymbolId,
    canonicalize,
};

/// One namespace of interned entities.
struct Interner<K: EntityKind> {
    by_identifier: DashMap<String, Arc<Entity<K>>>,
}

impl<K: EntityKind> Interner<K> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            by_identifier: DashMap::with_capacity(capacity),
        }
    }

    fn intern(&self, raw: Option<&str>, allocator: &AtomicSymbolAllocator) -> Arc<Entity<K>> {
        let identifier = canonicalize(raw);
        if let Some(existing) = self.by_identifier.get(&identifier) {
            return Arc::clone(existing.value());
        }
        let entry = self
            .by_identifier
            .entry(identifier.clone())
            .or_insert_with(|| {
                let id = allocator.next_id();
                tracing::debug!(kind = K::NAME, %id, %identifier, "interned entity");
                Arc::new(Entity::new(id, identifier.clone()))
            });
        Arc::clone(entry.value())
    }

    fn lookup(&self, raw: &str) -> Option<Arc<Entity<K>>> {
        self.by_identifier
            .get(&canonicalize(Some(raw)))
            .map(|e| Arc::clone(e.value()))
    }

    fn all(&self) -> Vec<Arc<Entity<K>>> {
        self.by_identifier.iter().map(|e| Arc::clone(e.value())).collect()
    }

    fn len(&self) -> usize {
        self.by_identifier.len()
    }
}

/// Registry of every node and predicate seen so far.
///
/// Entities are created lazily on first reference and never removed.
pub struct EntityRegistry {
    nodes: Interner<NodeKind>,
    predicates: Interner<PredicateKind>,
    allocator: AtomicSymbolAllocator,
}

impl EntityRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty registry pre-sized for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Interner::with_capacity(capacity),
            predicates: Interner::with_capacity(0),
            allocator: AtomicSymbolAllocator::new(),
        }
    }

    /// Return the node for `identifier`, creating it on first use.
    ///
    /// `None` is treated as the empty identifier.
    pub(crate) fn intern_node(&self, identifier: Option<&str>) -> Arc<Node> {
        self.nodes.intern(identifier, &self.allocator)
    }

    /// Return the predicate for `identifier`, creating it on first use.
    pub(crate) fn intern_predicate(&self, identifier: Option<&str>) -> Arc<Predicate> {
        self.predicates.intern(identifier, &self.allocator)
    }

    /// Look up a node without creating it (case-insensitive).
    pub fn lookup_node(&self, identifier: &str) -> Option<Arc<Node>> {
        self.nodes.lookup(identifier)
    }

    /// Look up a predicate without creating it (case-insensitive).
    pub fn lookup_predicate(&self, identifier: &str) -> Option<Arc<Predicate>> {
        self.predicates.lookup(identifier)
    }

    /// Resolve a node identifier to its symbol ID.
    pub fn node_id(&self, identifier: &str) -> Option<SymbolId> {
        self.lookup_node(identifier).map(|n| n.id())
    }

    /// Resolve a predicate identifier to its symbol ID.
    pub fn predicate_id(&self, identifier: &str) -> Option<SymbolId> {
        self.lookup_predicate(identifier).map(|p| p.id())
    }

    /// All interned nodes, in no particular order.
    pub fn nodes(&self) -> Vec<Arc<Node>> {
        self.nodes.all()
    }

    /// All interned predicates, in no particular order.
    pub fn predicates(&self) -> Vec<Arc<Predicate>> {
        self.predicates.all()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("nodes", &self.node_count())
            .field("predicates", &self.predicate_count())
            .finish()
    }
}
