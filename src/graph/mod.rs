//! Knowledge graph: deduplicated facts plus a precomputed wildcard index.
//!
//! The graph stores triples (subject, predicate, object) over interned entities.
//!
//! - **Fact store** ([`store::FactStore`]): one [`Triple`] per distinct [`FactKey`]
//! - **Wildcard index** ([`index::WildcardIndex`]): every triple fanned out
//!   into the eight [`IndexKey`] shapes it satisfies, so any mix of concrete
//!   and wildcard slots resolves with a single map lookup

pub mod index;
pub mod store;

use std::fmt;
use std::sync::Arc;

use crate::symbol::{Node, Predicate, SymbolId, now_millis};

/// One position of a three-slot pattern: a concrete value or `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot<T> {
    Literal(T),
    Wildcard,
}

impl<T> Slot<T> {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Slot::Wildcard)
    }

    /// The literal value, or `None` for a wildcard.
    pub fn literal(&self) -> Option<&T> {
        match self {
            Slot::Literal(v) => Some(v),
            Slot::Wildcard => None,
        }
    }

    /// Resolve the literal with `f`. A wildcard stays a wildcard; a literal
    /// that `f` cannot resolve yields `None`.
    pub fn try_map<U>(&self, f: impl FnOnce(&T) -> Option<U>) -> Option<Slot<U>> {
        match self {
            Slot::Literal(v) => f(v).map(Slot::Literal),
            Slot::Wildcard => Some(Slot::Wildcard),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Literal(v) => v.fmt(f),
            Slot::Wildcard => f.write_str("?"),
        }
    }
}

/// Canonical identity of a fact: the symbol IDs of its three components.
///
/// Symbol IDs are in bijection with canonical identifiers, so this key is
/// equivalent to the `"<S> <P> <O>"` identifier string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactKey {
    pub subject: SymbolId,
    pub predicate: SymbolId,
    pub object: SymbolId,
}

/// Key of one wildcard-index bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub subject: Slot<SymbolId>,
    pub predicate: Slot<SymbolId>,
    pub object: Slot<SymbolId>,
}

impl IndexKey {
    /// The eight keys a fact satisfies: each slot independently concrete or `?`.
    pub fn fan_out(fact: FactKey) -> [IndexKey; 8] {
        use Slot::{Literal as L, Wildcard as W};
        let (s, p, o) = (fact.subject, fact.predicate, fact.object);
        [
            Self::new(L(s), L(p), L(o)),
            Self::new(W, L(p), L(o)),
            Self::new(L(s), W, L(o)),
            Self::new(L(s), L(p), W),
            Self::new(W, W, L(o)),
            Self::new(W, L(p), W),
            Self::new(L(s), W, W),
            Self::new(W, W, W),
        ]
    }

    pub fn new(subject: Slot<SymbolId>, predicate: Slot<SymbolId>, object: Slot<SymbolId>) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// A fact (subject, predicate, object) over interned entities.
///
/// Immutable after creation. The fact store keeps exactly one instance per
/// [`FactKey`]; equality and hashing go through that key.
pub struct Triple {
    subject: Arc<Node>,
    predicate: Arc<Predicate>,
    object: Arc<Node>,
    identifier: String,
    created_at: u64,
}

impl Triple {
    /// Create a triple stamped with the current time.
    pub fn new(subject: Arc<Node>, predicate: Arc<Predicate>, object: Arc<Node>) -> Self {
        let identifier = Self::identifier_for(&subject, &predicate, &object);
        Self {
            subject,
            predicate,
            object,
            identifier,
            created_at: now_millis(),
        }
    }

    /// `"<SUBJECT> <PREDICATE> <OBJECT>"` from the entities' canonical identifiers.
    pub fn identifier_for(subject: &Node, predicate: &Predicate, object: &Node) -> String {
        format!(
            "{} {} {}",
            subject.identifier(),
            predicate.identifier(),
            object.identifier()
        )
    }

    pub fn key(&self) -> FactKey {
        FactKey {
            subject: self.subject.id(),
            predicate: self.predicate.id(),
            object: self.object.id(),
        }
    }

    pub fn subject(&self) -> &Arc<Node> {
        &self.subject
    }

    pub fn predicate(&self) -> &Arc<Predicate> {
        &self.predicate
    }

    pub fn object(&self) -> &Arc<Node> {
        &self.object
    }

    /// Canonical identifier, also the display form.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Creation time in milliseconds since the UNIX epoch.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }
}

impl PartialEq for Triple {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Triple {}

impl std::hash::Hash for Triple {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Triple")
            .field("identifier", &self.identifier)
            .field("key", &self.key())
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}
