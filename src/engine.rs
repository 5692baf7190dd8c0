//! Engine facade: top-level API for the trine store.
//!
//! The `Engine` owns the entity registry, the fact store and the wildcard
//! index, and is the single object ingestion and query code share. Construct
//! one per process (or per test) and pass it by reference.

use std::sync::{Arc, PoisonError, RwLock};

use crate::export::{SymbolExport, TripleExport};
use crate::graph::index::WildcardIndex;
use crate::graph::store::FactStore;
use crate::graph::{IndexKey, Triple};
use crate::query::QueryPattern;
use crate::registry::EntityRegistry;

/// Sizing hints for the engine's tables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Expected number of distinct subjects and objects.
    pub node_capacity: usize,
    /// Expected number of distinct facts.
    pub triple_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            node_capacity: 1024,
            triple_capacity: 4096,
        }
    }
}

/// The trine triple store.
///
/// Writes (intern, upsert, index fan-out) are serialized through a write
/// gate so a fact is either fully indexed or not visible at all. Queries take
/// the read side and may run concurrently with each other.
pub struct Engine {
    config: EngineConfig,
    registry: EntityRegistry,
    facts: FactStore,
    index: WildcardIndex,
    gate: RwLock<()>,
}

impl Engine {
    /// Create an empty engine.
    pub fn new(config: EngineConfig) -> Self {
        tracing::debug!(
            node_capacity = config.node_capacity,
            triple_capacity = config.triple_capacity,
            "initializing trine engine"
        );
        Self {
            registry: EntityRegistry::with_capacity(config.node_capacity),
            facts: FactStore::with_capacity(config.triple_capacity),
            index: WildcardIndex::with_capacity(config.triple_capacity),
            gate: RwLock::new(()),
            config,
        }
    }

    /// Add a fact, returning its canonical triple.
    ///
    /// Re-importing an existing fact is a no-op apart from re-running the
    /// (idempotent) index fan-out.
    pub fn import_triple(&self, subject: &str, predicate: &str, object: &str) -> Arc<Triple> {
        let _write = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        self.upsert_locked(subject, predicate, object)
    }

    /// Add many facts under a single hold of the write gate.
    ///
    /// Returns the number of facts that were new.
    pub fn import_triples<I, S>(&self, triples: I) -> usize
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: AsRef<str>,
    {
        let _write = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        let before = self.facts.len();
        for (s, p, o) in triples {
            self.upsert_locked(s.as_ref(), p.as_ref(), o.as_ref());
        }
        self.facts.len() - before
    }

    fn upsert_locked(&self, subject: &str, predicate: &str, object: &str) -> Arc<Triple> {
        let upserted = self.facts.upsert(
            self.registry.intern_node(Some(subject)),
            self.registry.intern_predicate(Some(predicate)),
            self.registry.intern_node(Some(object)),
        );
        self.index.index_triple(&upserted.triple);
        upserted.triple
    }

    /// Triples matching `pattern`, as a snapshot in arbitrary order.
    ///
    /// A literal that names no known entity matches nothing. Never modifies
    /// the graph.
    pub fn lookup(&self, pattern: &QueryPattern) -> Vec<Arc<Triple>> {
        let _read = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        match self.index_key(pattern) {
            Some(key) => self.index.lookup(&key),
            None => Vec::new(),
        }
    }

    fn index_key(&self, pattern: &QueryPattern) -> Option<IndexKey> {
        Some(IndexKey::new(
            pattern.subject.try_map(|s| self.registry.node_id(s))?,
            pattern.predicate.try_map(|p| self.registry.predicate_id(p))?,
            pattern.object.try_map(|o| self.registry.node_id(o))?,
        ))
    }

    /// Read-only view of the registry. Writes go through the import methods.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    pub fn index(&self) -> &WildcardIndex {
        &self.index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Counts of every table.
    pub fn info(&self) -> EngineInfo {
        let _read = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        EngineInfo {
            node_count: self.registry.node_count(),
            predicate_count: self.registry.predicate_count(),
            triple_count: self.facts.len(),
            index_key_count: self.index.key_count(),
            index_entry_count: self.index.entry_count(),
        }
    }

    /// All facts, label-resolved, sorted by identifier.
    pub fn export_triples(&self) -> Vec<TripleExport> {
        let _read = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let mut exports: Vec<TripleExport> =
            self.facts.all().iter().map(|t| TripleExport::from(t.as_ref())).collect();
        exports.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        exports
    }

    /// Every interned node and predicate, in allocation order.
    pub fn export_symbols(&self) -> Vec<SymbolExport> {
        let _read = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let mut exports: Vec<SymbolExport> = self
            .registry
            .nodes()
            .iter()
            .map(|n| SymbolExport::from(n.as_ref()))
            .chain(
                self.registry
                    .predicates()
                    .iter()
                    .map(|p| SymbolExport::from(p.as_ref())),
            )
            .collect();
        exports.sort_by_key(|s| s.id);
        exports
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Summary information about the engine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    pub node_count: usize,
    pub predicate_count: usize,
    pub triple_count: usize,
    pub index_key_count: usize,
    pub index_entry_count: usize,
}

impl std::fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "trine engine info")?;
        writeln!(f, "  nodes:         {}", self.node_count)?;
        writeln!(f, "  predicates:    {}", self.predicate_count)?;
        writeln!(f, "  triples:       {}", self.triple_count)?;
        writeln!(f, "  index keys:    {}", self.index_key_count)?;
        writeln!(f, "  index entries: {}", self.index_entry_count)?;
        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("facts", &self.facts)
            .field("index", &self.index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Slot;

    fn pattern(text: &str) -> QueryPattern {
        QueryPattern::parse(text).unwrap()
    }

    #[test]
    fn empty_engine_info() {
        let engine = Engine::default();
        let info = engine.info();
        assert_eq!(info.triple_count, 0);
        assert_eq!(info.index_key_count, 0);
        assert!(info.to_string().contains("triples:       0"));
    }

    #[test]
    fn repeated_import_keeps_one_instance_and_stable_index() {
        let engine = Engine::default();
        let first = engine.import_triple("Bob", "lives_in", "House1");
        let entries = engine.index().entry_count();
        for _ in 0..5 {
            let again = engine.import_triple("bob", "LIVES_IN", "house1");
            assert!(Arc::ptr_eq(&first, &again));
        }
        assert_eq!(engine.facts().len(), 1);
        assert_eq!(engine.index().entry_count(), entries);
        assert_eq!(entries, 8);
    }

    #[test]
    fn every_shape_finds_the_fact() {
        let engine = Engine::default();
        engine.import_triple("S", "P", "O");
        for q in [
            "S P O.", "? P O.", "S ? O.", "S P ?.", "? ? O.", "? P ?.", "S ? ?.", "? ? ?.",
        ] {
            let hits = engine.lookup(&pattern(q));
            assert_eq!(hits.len(), 1, "pattern {q}");
            assert_eq!(hits[0].identifier(), "S P O");
        }
    }

    #[test]
    fn unknown_literal_matches_nothing_and_interns_nothing() {
        let engine = Engine::default();
        engine.import_triple("Bob", "owns", "Dog1");
        assert!(engine.lookup(&pattern("? ? Cat1.")).is_empty());
        assert!(engine.registry().lookup_node("CAT1").is_none());
        assert_eq!(engine.info().node_count, 2);
    }

    #[test]
    fn predicate_literal_does_not_match_node_namespace() {
        let engine = Engine::default();
        engine.import_triple("owns", "owns", "Dog1");
        assert_eq!(engine.lookup(&pattern("owns ? ?.")).len(), 1);
        assert_eq!(engine.lookup(&pattern("? owns ?.")).len(), 1);
        assert!(engine.lookup(&pattern("? Dog1 ?.")).is_empty());
    }

    #[test]
    fn batch_import_counts_new_facts() {
        let engine = Engine::default();
        let created = engine.import_triples([
            ("Bob", "lives_in", "House1"),
            ("Alice", "lives_in", "House1"),
            ("BOB", "LIVES_IN", "HOUSE1"),
        ]);
        assert_eq!(created, 2);
        assert_eq!(engine.info().triple_count, 2);
    }

    #[test]
    fn concurrent_writers_keep_single_instance() {
        let engine = Arc::new(Engine::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        engine.import_triple(&format!("n{i}"), "links", "hub");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(engine.facts().len(), 50);
        assert_eq!(engine.lookup(&pattern("? links hub.")).len(), 50);
        assert_eq!(engine.index().entry_count(), 50 * 8);
    }

    #[test]
    fn exports_are_sorted() {
        let engine = Engine::default();
        engine.import_triple("Bob", "owns", "Dog1");
        engine.import_triple("Alice", "owns", "Cat1");

        let triples = engine.export_triples();
        assert_eq!(triples[0].identifier, "ALICE OWNS CAT1");
        assert_eq!(triples[1].identifier, "BOB OWNS DOG1");

        let symbols = engine.export_symbols();
        assert_eq!(symbols.len(), 5);
        assert!(symbols.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn full_wildcard_count_matches_fact_count() {
        let engine = Engine::default();
        engine.import_triple("Bob", "owns", "Dog1");
        engine.import_triples([("Alice", "owns", "Cat1"), ("bob", "OWNS", "dog1")]);
        engine.import_triple("Carol", "knows", "Bob");

        assert_eq!(engine.facts().len(), 3);
        assert_eq!(engine.lookup(&pattern("? ? ?.")).len(), engine.facts().len());
        let everything = IndexKey::new(Slot::Wildcard, Slot::Wildcard, Slot::Wildcard);
        assert_eq!(engine.index().count(&everything), 3);
    }

    #[test]
    fn readers_never_see_a_partially_indexed_fact() {
        const WRITERS: usize = 4;
        const PER_WRITER: usize = 100;
        let engine = Arc::new(Engine::default());
        let done = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let done = Arc::clone(&done);
                std::thread::spawn(move || {
                    while !done.load(std::sync::atomic::Ordering::Acquire) {
                        for i in 0..WRITERS * PER_WRITER {
                            let subject = format!("n{i}");
                            if engine.lookup(&pattern(&format!("{subject} edge hub."))).is_empty() {
                                continue;
                            }
                            let expected = format!("N{i} EDGE HUB");
                            for shape in [
                                "? edge hub.".to_string(),
                                format!("{subject} ? hub."),
                                format!("{subject} edge ?."),
                                "? ? hub.".to_string(),
                                "? edge ?.".to_string(),
                                format!("{subject} ? ?."),
                                "? ? ?.".to_string(),
                            ] {
                                let hits = engine.lookup(&pattern(&shape));
                                assert!(
                                    hits.iter().any(|t| t.identifier() == expected),
                                    "{expected} visible by exact key but missing from {shape}"
                                );
                            }
                        }
                    }
                })
            })
            .collect();

        let writers: Vec<_> = (0..WRITERS)
            .map(|w| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    for i in 0..PER_WRITER {
                        engine.import_triple(&format!("n{}", w * PER_WRITER + i), "edge", "hub");
                    }
                })
            })
            .collect();
        for h in writers {
            h.join().unwrap();
        }
        done.store(true, std::sync::atomic::Ordering::Release);
        for h in readers {
            h.join().unwrap();
        }

        let all = engine.lookup(&pattern("? ? ?."));
        assert_eq!(all.len(), WRITERS * PER_WRITER);
        assert_eq!(engine.index().entry_count(), WRITERS * PER_WRITER * 8);
    }

    #[test]
    fn exports_during_writes_are_consistent() {
        let engine = Arc::new(Engine::default());
        let writer = {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for i in 0..200 {
                    engine.import_triple(&format!("s{i}"), &format!("p{}", i % 7), &format!("o{i}"));
                }
            })
        };

        for _ in 0..20 {
            let triples = engine.export_triples();
            let symbols = engine.export_symbols();
            let labels: std::collections::HashSet<(&str, &str)> = symbols
                .iter()
                .map(|s| (s.kind.as_str(), s.label.as_str()))
                .collect();
            for t in &triples {
                assert!(labels.contains(&("node", t.subject.as_str())), "{}", t.identifier);
                assert!(labels.contains(&("predicate", t.predicate.as_str())), "{}", t.identifier);
                assert!(labels.contains(&("node", t.object.as_str())), "{}", t.identifier);
            }
        }
        writer.join().unwrap();

        assert_eq!(engine.export_triples().len(), 200);
        assert_eq!(engine.export_symbols().len(), 400 + 7);
    }
}
