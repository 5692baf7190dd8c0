//! Export types for serializing engine state.
//!
//! These types provide flat, label-resolved representations of entities and
//! triples suitable for JSON export.

use serde::{Deserialize, Serialize};

use crate::graph::Triple;
use crate::symbol::{Entity, EntityKind};

/// Exported node or predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolExport {
    /// Numeric symbol ID (allocation order).
    pub id: u64,
    /// Canonical identifier.
    pub label: String,
    /// `node` or `predicate`.
    pub kind: String,
    /// Creation timestamp (milliseconds since UNIX epoch).
    pub created_at: u64,
}

impl<K: EntityKind> From<&Entity<K>> for SymbolExport {
    fn from(entity: &Entity<K>) -> Self {
        Self {
            id: entity.id().get(),
            label: entity.identifier().to_string(),
            kind: entity.kind_name().to_string(),
            created_at: entity.created_at(),
        }
    }
}

/// Exported triple with resolved labels for all positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripleExport {
    /// `"<SUBJECT> <PREDICATE> <OBJECT>"`.
    pub identifier: String,
    pub subject: String,
    pub predicate: String,
    pub object: String,
    /// Creation timestamp (milliseconds since UNIX epoch).
    pub created_at: u64,
}

impl From<&Triple> for TripleExport {
    fn from(t: &Triple) -> Self {
        Self {
            identifier: t.identifier().to_string(),
            subject: t.subject().identifier().to_string(),
            predicate: t.predicate().identifier().to_string(),
            object: t.object().identifier().to_string(),
            created_at: t.created_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EntityRegistry;

    #[test]
    fn triple_export_serializes_labels() {
        let reg = EntityRegistry::new();
        let t = Triple::new(
            reg.intern_node(Some("Bob")),
            reg.intern_predicate(Some("owns")),
            reg.intern_node(Some("Dog1")),
        );
        let json = serde_json::to_value(TripleExport::from(&t)).unwrap();
        assert_eq!(json["identifier"], "BOB OWNS DOG1");
        assert_eq!(json["predicate"], "OWNS");
    }

    #[test]
    fn symbol_export_records_kind() {
        let reg = EntityRegistry::new();
        let p = reg.intern_predicate(Some("lives_in"));
        let export = SymbolExport::from(p.as_ref());
        assert_eq!(export.kind, "predicate");
        assert_eq!(export.label, "LIVES_IN");
    }
}
