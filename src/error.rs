//! Rich diagnostic error types for the trine triple store.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the trine store.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum TrineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Import errors
// ---------------------------------------------------------------------------

/// A malformed triple-import line, or a triple file that could not be read.
///
/// Imports are fail-fast: the first error aborts the whole import.
#[derive(Debug, Error, Diagnostic)]
pub enum ImportError {
    #[error("issue importing line {line}: lines should end with a period")]
    #[diagnostic(
        code(trine::import::missing_period),
        help("Terminate every triple with a period, e.g. `Bob lives_in House1.`")
    )]
    MissingPeriod { line: usize },

    #[error("issue importing line {line}: input triple lines cannot contain question marks")]
    #[diagnostic(
        code(trine::import::wildcard),
        help("`?` is a query wildcard. Imported facts must name a concrete subject, predicate and object.")
    )]
    Wildcard { line: usize },

    #[error("issue importing line {line}: input triple has to contain 3 components, found {found}")]
    #[diagnostic(
        code(trine::import::component_count),
        help("Write exactly `<subject> <predicate> <object>.` separated by spaces.")
    )]
    ComponentCount { line: usize, found: usize },

    #[error("failed to read triple file: {path}")]
    #[diagnostic(
        code(trine::import::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {inner}")]
    #[diagnostic(code(trine::import::in_file))]
    InFile { path: String, inner: Box<ImportError> },
}

impl ImportError {
    /// 0-based index of the offending line, if the error concerns a line.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MissingPeriod { line }
            | Self::Wildcard { line }
            | Self::ComponentCount { line, .. } => Some(*line),
            Self::Read { .. } => None,
            Self::InFile { inner, .. } => inner.line(),
        }
    }

    /// Human-readable cause without positional context.
    pub fn cause(&self) -> String {
        match self {
            Self::MissingPeriod { .. } => "Lines should end with a period.".into(),
            Self::Wildcard { .. } => "Input triple lines cannot contain question marks.".into(),
            Self::ComponentCount { .. } => "Input triple has to contain 3 components.".into(),
            Self::Read { source, .. } => source.to_string(),
            Self::InFile { inner, .. } => inner.cause(),
        }
    }
}

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

/// A malformed query pattern, or a query file that could not be read.
#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("query {query}: a query should end in a period")]
    #[diagnostic(
        code(trine::query::missing_period),
        help("Terminate the pattern with a period, e.g. `? lives_in House1.`")
    )]
    MissingPeriod { query: String },

    #[error("query {query}: a query should have 3 arguments, found {found}")]
    #[diagnostic(
        code(trine::query::argument_count),
        help("Write `<subject> <predicate> <object>.` where any slot may be `?`.")
    )]
    ArgumentCount { query: String, found: usize },

    #[error("failed to read query file: {path}")]
    #[diagnostic(
        code(trine::query::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl QueryError {
    /// The offending query text (or file path for read failures).
    pub fn query(&self) -> &str {
        match self {
            Self::MissingPeriod { query } | Self::ArgumentCount { query, .. } => query,
            Self::Read { path, .. } => path,
        }
    }

    /// Human-readable cause without the query text.
    pub fn cause(&self) -> String {
        match self {
            Self::MissingPeriod { .. } => "A query should end in a period.".into(),
            Self::ArgumentCount { .. } => "A query should have 3 arguments.".into(),
            Self::Read { source, .. } => source.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(trine::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(trine::config::parse),
        help("Check the TOML syntax in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(trine::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for functions returning trine results.
pub type TrineResult<T> = std::result::Result<T, TrineError>;
