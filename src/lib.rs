// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # trine
//!
//! An in-memory triple store with case-insensitive exact and wildcard queries.
//!
//! ## Architecture
//!
//! - **Entity registry** (`registry`): interns subjects/objects as nodes and
//!   relation labels as predicates, one canonical uppercase instance each
//! - **Fact store** (`graph::store`): one triple per distinct fact
//! - **Wildcard index** (`graph::index`): each fact precomputed under all eight
//!   subject/predicate/object wildcard shapes for single-lookup queries
//! - **Query engine** (`query`): `S P O.` patterns, single or batched
//! - **Import** (`import`): fail-fast triple file reader
//!
//! ## Library usage
//!
//! ```
//! use trine::engine::Engine;
//! use trine::query::QueryEngine;
//!
//! let engine = Engine::default();
//! engine.import_triple("Bob", "lives_in", "House1");
//! engine.import_triple("Alice", "lives_in", "House1");
//!
//! let answer = QueryEngine::new(&engine).execute_query("? LIVES_IN house1.").unwrap();
//! assert_eq!(answer.len(), 2);
//! assert!(answer.contains("ALICE LIVES_IN HOUSE1"));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod graph;
pub mod import;
pub mod query;
pub mod registry;
pub mod symbol;
