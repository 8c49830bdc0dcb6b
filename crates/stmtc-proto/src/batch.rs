//! Batches of statements handed to the propagation layer.

use crate::error::Error;
use crate::statement::Statement;
use rkyv::Archive;

/// The ordered output of one build, replayed in order against the target store.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct StatementBatch {
    /// Statements to replay in order.
    pub statements: Vec<Statement>,
}

impl StatementBatch {
    /// Create a new empty batch.
    pub fn new() -> Self {
        Self { statements: vec![] }
    }

    /// Create a batch from statements.
    pub fn from_statements(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Add a statement to the batch.
    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Get the number of statements in the batch.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Iterate over the statements in replay order.
    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    /// Serialize the batch to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a batch from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }
}

impl Default for StatementBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Statement> for StatementBatch {
    fn from_iter<T: IntoIterator<Item = Statement>>(iter: T) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for StatementBatch {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}
