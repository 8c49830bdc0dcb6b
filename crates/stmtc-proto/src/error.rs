//! Statement model error types.

use crate::statement::StatementKind;
use thiserror::Error;

/// Errors raised while assembling or encoding statements.
#[derive(Debug, Error)]
pub enum Error {
    /// Serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The statement's table was already set.
    #[error("table already set to '{table}', cannot change it to '{requested}'")]
    TableAlreadySet { table: String, requested: String },

    /// A field or condition was added before the table.
    #[error("statement table must be set before fields or conditions")]
    TableNotSet,

    /// The same column was assigned twice.
    #[error("column '{column}' already has a value in statement on '{table}'")]
    DuplicateField { table: String, column: String },

    /// The statement kind has no field list.
    #[error("{kind} statements do not support field lists (column '{column}')")]
    UnsupportedField { kind: StatementKind, column: String },

    /// NaN and infinities have no literal form.
    #[error("column '{column}' cannot hold non-finite value {value}")]
    NonFiniteValue { column: String, value: f64 },

    /// The statement kind has no WHERE clause.
    #[error("{kind} statements do not support conditions (column '{column}')")]
    UnsupportedCondition { kind: StatementKind, column: String },
}
