//! Core error types.

use thiserror::Error;

/// Catalog and object model errors.
#[derive(Debug, Error)]
pub enum Error {
    /// No entity is registered under the given entity or table name.
    #[error("metadata not found for '{0}'")]
    MetadataNotFound(String),

    /// The entity has no field with the given name.
    #[error("unknown field '{field}' on entity '{entity}'")]
    UnknownField { entity: String, field: String },

    /// The mapping metadata is inconsistent.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// A process-wide catalog was already installed.
    #[error("a catalog is already installed")]
    AlreadyInstalled,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}
