//! Entity definitions.

use super::field::FieldDef;
use serde::{Deserialize, Serialize};

/// An entity definition: its table and persistent fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Entity name, as used by the query language.
    pub name: String,
    /// Physical table name.
    pub table: String,
    /// Field definitions in declaration order.
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Create a new entity definition whose table defaults to the entity name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table: name.clone(),
            name,
            fields: Vec::new(),
        }
    }

    /// Set the physical table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Add a field to the entity.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the identifying field definition.
    pub fn id_field(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.is_id())
    }

    /// Get all relational fields.
    pub fn relational_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.is_relational())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RelationDef;

    #[test]
    fn test_entity_builder() {
        let entity = EntityDef::new("Employee")
            .with_table("EMPLOYEE")
            .with_field(FieldDef::id("id").with_column("EMPLOYEE_ID"))
            .with_field(FieldDef::new("name").with_column("NAME"))
            .with_field(FieldDef::relation("phone", RelationDef::one_to_one("Phone")));

        assert_eq!(entity.name, "Employee");
        assert_eq!(entity.table, "EMPLOYEE");
        assert_eq!(entity.fields.len(), 3);
        assert_eq!(entity.relational_fields().count(), 1);
    }

    #[test]
    fn test_get_field() {
        let entity = EntityDef::new("Phone")
            .with_field(FieldDef::id("id"))
            .with_field(FieldDef::new("number"));

        assert_eq!(entity.table, "Phone");
        assert!(entity.get_field("number").is_some());
        assert!(entity.get_field("nonexistent").is_none());
        assert_eq!(entity.id_field().map(|f| f.name.as_str()), Some("id"));
    }
}
