//! Field definitions for entities.

use super::relation::RelationDef;
use serde::{Deserialize, Serialize};

/// What a field means to the statement compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    /// An ordinary persistent column.
    Plain,
    /// The identifying key column.
    Id,
    /// A relation to another entity.
    Relation(RelationDef),
}

/// A persistent field of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as used by the application and the query language.
    pub name: String,
    /// Physical column name. For owning relations this is the join column.
    pub column: String,
    /// Semantic role.
    pub role: FieldRole,
}

impl FieldDef {
    fn with_role(name: impl Into<String>, role: FieldRole) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            role,
        }
    }

    /// Create an ordinary field whose column defaults to the field name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_role(name, FieldRole::Plain)
    }

    /// Create the identifying field.
    pub fn id(name: impl Into<String>) -> Self {
        Self::with_role(name, FieldRole::Id)
    }

    /// Create a relational field.
    pub fn relation(name: impl Into<String>, relation: RelationDef) -> Self {
        Self::with_role(name, FieldRole::Relation(relation))
    }

    /// Set the physical column name.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Check if this is the identifying field.
    pub fn is_id(&self) -> bool {
        matches!(self.role, FieldRole::Id)
    }

    /// Check if this field holds a relation.
    pub fn is_relational(&self) -> bool {
        matches!(self.role, FieldRole::Relation(_))
    }

    /// Get the relation, if any.
    pub fn relation_def(&self) -> Option<&RelationDef> {
        match &self.role {
            FieldRole::Relation(rel) => Some(rel),
            _ => None,
        }
    }

    /// Check if this field is the owning side of a relation.
    pub fn owns_relation(&self) -> bool {
        self.relation_def().is_some_and(RelationDef::is_owning)
    }
}
