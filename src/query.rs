//! Query engine: parse `S P O.` patterns and resolve them against the index.
//!
//! A pattern is three whitespace-separated tokens terminated by a period; any
//! token may be the `?` wildcard. Literals are matched case-insensitively.
//!
//! Single queries propagate parse errors to the caller. Batch execution is
//! fail-soft: each line yields its own outcome and a malformed line never
//! stops the lines after it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::config::OutputConfig;
use crate::engine::Engine;
use crate::error::QueryError;
use crate::graph::{Slot, Triple};
use crate::symbol::canonicalize;

const WILDCARD: &str = "?";

/// A parsed three-slot pattern with canonical (uppercase) literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryPattern {
    pub subject: Slot<String>,
    pub predicate: Slot<String>,
    pub object: Slot<String>,
}

impl QueryPattern {
    /// Parse `text`. Anything after the first period is ignored.
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        let Some((head, _)) = text.split_once('.') else {
            return Err(QueryError::MissingPeriod {
                query: format!("{}.", text.trim()),
            });
        };

        let tokens: Vec<&str> = head.split_whitespace().collect();
        let [subject, predicate, object] = tokens.as_slice() else {
            return Err(QueryError::ArgumentCount {
                query: format!("{}.", head.trim()),
                found: tokens.len(),
            });
        };

        Ok(Self {
            subject: slot(subject),
            predicate: slot(predicate),
            object: slot(object),
        })
    }

    /// Number of wildcard slots (0 to 3).
    pub fn wildcard_count(&self) -> usize {
        [&self.subject, &self.predicate, &self.object]
            .iter()
            .filter(|s| s.is_wildcard())
            .count()
    }
}

fn slot(token: &str) -> Slot<String> {
    if token == WILDCARD {
        Slot::Wildcard
    } else {
        Slot::Literal(canonicalize(Some(token)))
    }
}

impl fmt::Display for QueryPattern {
    /// Normalized query text followed by a period.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}.", self.subject, self.predicate, self.object)
    }
}

/// Triples matching one pattern. An empty answer is a valid outcome.
#[derive(Debug, Clone)]
pub struct QueryAnswer {
    pub pattern: QueryPattern,
    pub triples: Vec<Arc<Triple>>,
}

impl QueryAnswer {
    /// Canonical identifiers of the matching triples, in arbitrary order.
    pub fn identifiers(&self) -> Vec<&str> {
        self.triples.iter().map(|t| t.identifier()).collect()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.triples.iter().any(|t| t.identifier() == identifier)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Render per the output contract: the echoed pattern, then either the
    /// null marker or one line per matching triple.
    pub fn render(&self, output: &OutputConfig) -> String {
        let mut lines = vec![self.pattern.to_string()];
        if self.triples.is_empty() {
            lines.push(output.null_marker.clone());
        } else {
            let mut ids = self.identifiers();
            if output.sorted {
                ids.sort_unstable();
            }
            lines.extend(ids.into_iter().map(str::to_string));
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

/// Outcome of one line in a batch.
#[derive(Debug)]
pub struct BatchEntry {
    /// 0-based line index in the batch input.
    pub line: usize,
    pub outcome: Result<QueryAnswer, QueryError>,
}

/// Read-only query front end over an [`Engine`].
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'e> {
    engine: &'e Engine,
}

impl<'e> QueryEngine<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self { engine }
    }

    /// Parse and run a single pattern.
    pub fn execute_query(&self, text: &str) -> Result<QueryAnswer, QueryError> {
        let pattern = QueryPattern::parse(text)?;
        let triples = self.engine.lookup(&pattern);
        tracing::debug!(%pattern, matches = triples.len(), "executed query");
        Ok(QueryAnswer { pattern, triples })
    }

    /// Run every non-blank line of `text` independently.
    pub fn execute_batch(&self, text: &str) -> Vec<BatchEntry> {
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(line, query)| {
                let outcome = self.execute_query(query);
                if let Err(ref e) = outcome {
                    tracing::warn!(line, query = e.query(), cause = %e.cause(), "skipping malformed query");
                }
                BatchEntry { line, outcome }
            })
            .collect()
    }

    /// Read `path` and run it as a batch.
    pub fn execute_query_file(&self, path: &Path) -> Result<Vec<BatchEntry>, QueryError> {
        let text = std::fs::read_to_string(path).map_err(|source| QueryError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(self.execute_batch(&text))
    }
}
