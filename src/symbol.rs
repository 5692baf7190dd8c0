//! Core entity types for the trine store.
//!
//! Subjects and objects are [`Node`]s, relation labels are [`Predicate`]s.
//! Both are [`Entity`] values distinguished by a zero-sized kind marker, so a
//! predicate can never be passed where a node is expected even when the two
//! share a textual identifier. The [`AtomicSymbolAllocator`] hands out
//! monotonically increasing [`SymbolId`]s that double as creation order.

use std::fmt;
use std::marker::PhantomData;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Unique, niche-optimized identifier for an entity.
///
/// Uses `NonZeroU64` so that `Option<SymbolId>` is the same size as `SymbolId`.
/// Wildcard slots in index keys are `None`, so this costs nothing there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SymbolId(NonZeroU64);

impl SymbolId {
    /// Create a `SymbolId` from a raw `u64`.
    ///
    /// Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(SymbolId)
    }

    /// Get the underlying `u64` value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym:{}", self.0)
    }
}

/// Namespace marker for an [`Entity`].
pub trait EntityKind: Send + Sync + 'static {
    /// Name used in logs and exports.
    const NAME: &'static str;
}

/// Marker for subjects and objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKind;

impl EntityKind for NodeKind {
    const NAME: &'static str = "node";
}

/// Marker for relation labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PredicateKind;

impl EntityKind for PredicateKind {
    const NAME: &'static str = "predicate";
}

/// An interned, case-normalized identifier.
///
/// Immutable after creation. Two entities of the same kind are the same
/// entity iff their canonical identifiers are equal; the registry guarantees
/// exactly one instance per canonical identifier.
pub struct Entity<K: EntityKind> {
    id: SymbolId,
    identifier: String,
    created_at: u64,
    kind: PhantomData<K>,
}

/// A subject or object.
pub type Node = Entity<NodeKind>;

/// A relation label.
pub type Predicate = Entity<PredicateKind>;

impl<K: EntityKind> Entity<K> {
    /// Create an entity with the current timestamp.
    ///
    /// `identifier` must already be canonical (see [`canonicalize`]).
    pub(crate) fn new(id: SymbolId, identifier: String) -> Self {
        Self {
            id,
            identifier,
            created_at: now_millis(),
            kind: PhantomData,
        }
    }

    /// Allocation-order identifier, unique across both namespaces.
    pub fn id(&self) -> SymbolId {
        self.id
    }

    /// Canonical (uppercase) identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Creation time in milliseconds since the UNIX epoch.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Namespace name (`node` or `predicate`).
    pub fn kind_name(&self) -> &'static str {
        K::NAME
    }
}

impl<K: EntityKind> PartialEq for Entity<K> {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl<K: EntityKind> Eq for Entity<K> {}

impl<K: EntityKind> std::hash::Hash for Entity<K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl<K: EntityKind> fmt::Debug for Entity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("kind", &K::NAME)
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl<K: EntityKind> fmt::Display for Entity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

/// Normalize a raw identifier to its canonical uppercase form.
///
/// A missing identifier canonicalizes to the empty string.
pub fn canonicalize(raw: Option<&str>) -> String {
    raw.map(str::to_uppercase).unwrap_or_default()
}

pub(crate) fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Thread-safe symbol ID allocator.
///
/// Produces monotonically increasing IDs starting from 1.
#[derive(Debug)]
pub struct AtomicSymbolAllocator {
    next: AtomicU64,
}

impl AtomicSymbolAllocator {
    /// Create a new allocator that starts from ID 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Create an allocator that resumes from a given ID.
    pub fn starting_from(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start.max(1)),
        }
    }

    /// Allocate the next symbol ID.
    ///
    /// The counter never wraps, so an ID is never handed out twice.
    ///
    /// # Panics
    ///
    /// Panics when the ID space is exhausted (the last ID is `u64::MAX - 1`).
    /// Reaching that takes 2^64 - 2 interned identifiers, far beyond what
    /// fits in memory.
    pub fn next_id(&self) -> SymbolId {
        let raw = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .ok()
            .and_then(SymbolId::new);
        raw.expect("symbol ID space exhausted")
    }

    /// Return the next ID that *would* be allocated, without consuming it.
    pub fn peek_next(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for AtomicSymbolAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_id_niche_optimization() {
        assert_eq!(
            std::mem::size_of::<Option<SymbolId>>(),
            std::mem::size_of::<SymbolId>()
        );
    }

    #[test]
    fn symbol_id_zero_is_none() {
        assert!(SymbolId::new(0).is_none());
        assert_eq!(SymbolId::new(42).unwrap().get(), 42);
        assert_eq!(SymbolId::new(42).unwrap().to_string(), "sym:42");
    }

    #[test]
    fn allocator_produces_sequential_ids() {
        let alloc = AtomicSymbolAllocator::new();
        assert_eq!(alloc.next_id().get(), 1);
        assert_eq!(alloc.next_id().get(), 2);
        assert_eq!(alloc.peek_next(), 3);
    }

    #[test]
    fn allocator_last_id_before_exhaustion() {
        let alloc = AtomicSymbolAllocator::starting_from(u64::MAX - 1);
        assert_eq!(alloc.next_id().get(), u64::MAX - 1);
        assert_eq!(alloc.peek_next(), u64::MAX);
    }

    #[test]
    #[should_panic(expected = "symbol ID space exhausted")]
    fn allocator_refuses_to_wrap() {
        let alloc = AtomicSymbolAllocator::starting_from(u64::MAX);
        alloc.next_id();
    }

    #[test]
    fn canonicalize_uppercases_and_defaults() {
        assert_eq!(canonicalize(Some("lives_in")), "LIVES_IN");
        assert_eq!(canonicalize(Some("House1")), "HOUSE1");
        assert_eq!(canonicalize(None), "");
    }

    #[test]
    fn entity_equality_is_by_identifier() {
        let a = Node::new(SymbolId::new(1).unwrap(), "BOB".into());
        let b = Node::new(SymbolId::new(2).unwrap(), "BOB".into());
        assert_eq!(a, b);
        assert_eq!(a.kind_name(), "node");
        assert_eq!(a.to_string(), "BOB");
        assert!(a.created_at() > 0);
    }
}
