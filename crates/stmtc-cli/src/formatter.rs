//! Output formatting for compiled statements.

use crate::error::CliError;
use clap::ValueEnum;
use stmtc::{Statement, StatementBatch};

/// Output format for compiled statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One canonical statement per line
    Text,
    /// JSON array of statements
    Json,
    /// Hex-encoded binary batch
    Hex,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Hex => write!(f, "hex"),
        }
    }
}

/// Render statements in the requested format.
pub fn format_statements(
    statements: Vec<Statement>,
    format: OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(statements
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => serde_json::to_string_pretty(&statements)
            .map_err(|e| CliError::Encode(e.to_string())),
        OutputFormat::Hex => StatementBatch::from_statements(statements)
            .to_bytes()
            .map(hex::encode)
            .map_err(|e| CliError::Encode(e.to_string())),
    }
}
