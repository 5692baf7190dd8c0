//! Triple file import: line-oriented `<subject> <predicate> <object>.` facts.
//!
//! Imports are fail-fast. A file is parsed completely before any of its facts
//! reach the engine, so a malformed line leaves the graph untouched. Blank
//! lines are skipped but still count toward the 0-based line index.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::engine::Engine;
use crate::error::ImportError;

/// Raw tokens of one valid import line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// Validate one line. Returns `Ok(None)` for blank lines.
///
/// Checks run in order: a period must be present, `?` must not appear, and
/// the text before the first period must hold exactly three tokens. Anything
/// after the first period is ignored.
pub fn parse_triple_line(line: usize, text: &str) -> Result<Option<ParsedTriple>, ImportError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let Some((head, _)) = text.split_once('.') else {
        return Err(ImportError::MissingPeriod { line });
    };
    if text.contains('?') {
        return Err(ImportError::Wildcard { line });
    }

    let tokens: Vec<&str> = head.split_whitespace().collect();
    match tokens.as_slice() {
        [subject, predicate, object] => Ok(Some(ParsedTriple {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object: object.to_string(),
        })),
        _ => Err(ImportError::ComponentCount {
            line,
            found: tokens.len(),
        }),
    }
}

/// Parse every line, stopping at the first malformed one.
pub fn parse_triple_lines<I, S>(lines: I) -> Result<Vec<ParsedTriple>, ImportError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(i, l)| parse_triple_line(i, l.as_ref()).transpose())
        .collect()
}

fn parse_triple_file(path: &Path) -> Result<Vec<ParsedTriple>, ImportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_triple_lines(text.lines()).map_err(|e| ImportError::InFile {
        path: path.display().to_string(),
        inner: Box::new(e),
    })
}

/// Counts from a successful import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Valid fact lines read.
    pub facts: usize,
    /// Facts that were not already in the graph.
    pub created: usize,
}

/// Feeds parsed triple files into an [`Engine`].
#[derive(Debug, Clone, Copy)]
pub struct Importer<'e> {
    engine: &'e Engine,
    parallel: bool,
}

impl<'e> Importer<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            parallel: true,
        }
    }

    /// Parse multiple files on the rayon pool (default) or sequentially.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Import already-read lines.
    pub fn import_lines<I, S>(&self, lines: I) -> Result<ImportSummary, ImportError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = parse_triple_lines(lines)?;
        Ok(self.apply(&parsed))
    }

    /// Read and import one file.
    pub fn import_file(&self, path: &Path) -> Result<ImportSummary, ImportError> {
        let parsed = parse_triple_file(path)?;
        let summary = self.apply(&parsed);
        tracing::info!(
            path = %path.display(),
            facts = summary.facts,
            created = summary.created,
            "imported triple file"
        );
        Ok(summary)
    }

    /// Import several files, all or nothing.
    ///
    /// Every file is parsed before any fact is applied; facts are then
    /// applied in the order the files were given.
    pub fn import_files(&self, paths: &[PathBuf]) -> Result<ImportSummary, ImportError> {
        let parsed: Vec<Vec<ParsedTriple>> = if self.parallel {
            paths
                .par_iter()
                .map(|p| parse_triple_file(p))
                .collect::<Result<Vec<_>, ImportError>>()?
        } else {
            paths
                .iter()
                .map(|p| parse_triple_file(p))
                .collect::<Result<Vec<_>, ImportError>>()?
        };

        let mut total = ImportSummary::default();
        for (path, facts) in paths.iter().zip(&parsed) {
            let summary = self.apply(facts);
            tracing::info!(
                path = %path.display(),
                facts = summary.facts,
                created = summary.created,
                "imported triple file"
            );
            total.facts += summary.facts;
            total.created += summary.created;
        }
        Ok(total)
    }

    fn apply(&self, parsed: &[ParsedTriple]) -> ImportSummary {
        let created = self.engine.import_triples(
            parsed
                .iter()
                .map(|t| (t.subject.as_str(), t.predicate.as_str(), t.object.as_str())),
        );
        ImportSummary {
            facts: parsed.len(),
            created,
        }
    }
}
