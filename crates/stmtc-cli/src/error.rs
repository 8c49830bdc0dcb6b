//! CLI error type.

use thiserror::Error;

/// Errors surfaced to the command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// File could not be read.
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Schema or entity file is not valid.
    #[error("invalid {what}: {message}")]
    Input { what: &'static str, message: String },

    /// A `--param` argument is not `name=value`.
    #[error("invalid parameter '{0}', expected name=value")]
    Param(String),

    /// Compilation failed.
    #[error("{0}")]
    Compile(#[from] stmtc::Error),

    /// Catalog could not be built.
    #[error("{0}")]
    Catalog(#[from] stmtc::MetadataError),

    /// Output could not be encoded.
    #[error("cannot encode output: {0}")]
    Encode(String),
}
