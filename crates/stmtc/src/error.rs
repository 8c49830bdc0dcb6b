//! Error types for statement compilation.

use stmtc_lang::ParseError;
use thiserror::Error;

/// Errors raised by the statement builders and the migration session.
///
/// Every error aborts the build call that raised it; no partial statement
/// sequence is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// Catalog lookup failed or the mapping metadata is invalid.
    #[error("metadata error: {0}")]
    Metadata(#[from] stmtc_core::Error),

    /// A statement rejected a field or condition.
    #[error("statement error: {0}")]
    Statement(#[from] stmtc_proto::Error),

    /// The query text does not follow the accepted grammar.
    #[error("malformed query: {0}")]
    MalformedQuery(#[from] ParseError),

    /// The query is native, or a form the compiler does not translate.
    #[error("unsupported query form: {0}")]
    UnsupportedQueryForm(String),

    /// A placeholder has no binding.
    #[error("no value bound for parameter '{0}'")]
    MissingParameter(String),

    /// The operator is not allowed where it appears.
    #[error("operator '{op}' is not supported in the {clause} clause")]
    UnsupportedOperator { op: String, clause: &'static str },

    /// A join table row needs a key that is not set.
    #[error("entity '{entity}' has no key value for join table '{join_table}'")]
    MissingKey { entity: String, join_table: String },

    /// Cascades went deeper than the configured ceiling.
    #[error("cascade depth {depth} exceeds the limit of {limit}")]
    MaxDepthExceeded { depth: usize, limit: usize },

    /// The sink refused a batch.
    ///
    /// [`MigrationSink`](crate::MigrationSink) implementations return this when
    /// the propagation layer cannot take the statements.
    #[error("sink error: {0}")]
    Sink(String),
}

impl Error {
    /// Check if the error is a missing catalog entry.
    pub fn is_metadata_not_found(&self) -> bool {
        matches!(self, Error::Metadata(stmtc_core::Error::MetadataNotFound(_)))
    }

    /// Format the error, with source context for malformed queries.
    pub fn format_with_source(&self, source: &str) -> String {
        match self {
            Error::MalformedQuery(e) => e.format_with_source(source),
            other => format!("error: {}\n", other),
        }
    }
}

/// Result type for statement compilation.
pub type Result<T> = std::result::Result<T, Error>;
