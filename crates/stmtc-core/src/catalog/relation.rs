//! Relation metadata: cardinality, owning side, cascades and join tables.

use serde::{Deserialize, Serialize};

/// Cardinality of a relation as seen from the declaring field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// One-to-one relation (unique foreign key on the owning side).
    OneToOne,
    /// Many-to-one relation (foreign key on this side).
    ManyToOne,
    /// One-to-many relation (foreign key on the target side).
    OneToMany,
    /// Many-to-many relation (rows in a join table).
    ManyToMany,
}

impl Cardinality {
    /// Check if the declaring field holds a collection.
    pub fn is_collection(&self) -> bool {
        matches!(self, Cardinality::OneToMany | Cardinality::ManyToMany)
    }

    /// The cardinality the other end of the relation must declare.
    pub fn mirrored(&self) -> Cardinality {
        match self {
            Cardinality::OneToOne => Cardinality::OneToOne,
            Cardinality::ManyToOne => Cardinality::OneToMany,
            Cardinality::OneToMany => Cardinality::ManyToOne,
            Cardinality::ManyToMany => Cardinality::ManyToMany,
        }
    }
}

/// Operations that propagate from an owner to its related entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeType {
    /// Every operation cascades.
    All,
    /// Inserts cascade.
    Persist,
    /// Updates cascade.
    Merge,
    /// Deletes cascade.
    Remove,
    /// Reloads cascade. No statement kind reacts to it.
    Refresh,
    /// Detaching cascades. No statement kind reacts to it.
    Detach,
}

/// A many-to-many association table, declared on the owning side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinTable {
    /// Join table name.
    pub name: String,
    /// Column referencing the owning entity's key.
    pub join_column: String,
    /// Column referencing the target entity's key.
    pub inverse_join_column: String,
}

impl JoinTable {
    /// Create a join table descriptor.
    pub fn new(
        name: impl Into<String>,
        join_column: impl Into<String>,
        inverse_join_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            join_column: join_column.into(),
            inverse_join_column: inverse_join_column.into(),
        }
    }
}

/// Which end of the relation a field sits on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationSide {
    /// The owning side writes the foreign key or the join table rows.
    Owning {
        /// Join table, required for many-to-many.
        join_table: Option<JoinTable>,
    },
    /// The inverse side is mapped by a field on the target entity.
    Inverse {
        /// Name of the owning field on the target entity.
        mapped_by: String,
    },
}

/// A relation declared by an entity field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDef {
    /// Target entity name.
    pub target: String,
    /// Relation cardinality.
    pub cardinality: Cardinality,
    /// Owning or inverse side.
    pub side: RelationSide,
    /// Declared cascade policies.
    #[serde(default)]
    pub cascade: Vec<CascadeType>,
}

impl RelationDef {
    fn owning(target: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            target: target.into(),
            cardinality,
            side: RelationSide::Owning { join_table: None },
            cascade: Vec::new(),
        }
    }

    /// Create an owning one-to-one relation.
    pub fn one_to_one(target: impl Into<String>) -> Self {
        Self::owning(target, Cardinality::OneToOne)
    }

    /// Create an owning many-to-one relation.
    pub fn many_to_one(target: impl Into<String>) -> Self {
        Self::owning(target, Cardinality::ManyToOne)
    }

    /// Create a one-to-many relation. Call [`RelationDef::mapped_by`] to
    /// point it at the many-to-one field that owns it.
    pub fn one_to_many(target: impl Into<String>) -> Self {
        Self::owning(target, Cardinality::OneToMany)
    }

    /// Create an owning many-to-many relation stored in `join_table`.
    pub fn many_to_many(target: impl Into<String>, join_table: JoinTable) -> Self {
        Self {
            side: RelationSide::Owning {
                join_table: Some(join_table),
            },
            ..Self::owning(target, Cardinality::ManyToMany)
        }
    }

    /// Create an inverse many-to-many relation mapped by `mapped_by` on the target.
    pub fn many_to_many_inverse(target: impl Into<String>, mapped_by: impl Into<String>) -> Self {
        Self::owning(target, Cardinality::ManyToMany).mapped_by(mapped_by)
    }

    /// Turn this relation into the inverse side of `mapped_by`.
    pub fn mapped_by(mut self, mapped_by: impl Into<String>) -> Self {
        self.side = RelationSide::Inverse {
            mapped_by: mapped_by.into(),
        };
        self
    }

    /// Set the declared cascade policies.
    pub fn with_cascade(mut self, cascade: impl IntoIterator<Item = CascadeType>) -> Self {
        self.cascade = cascade.into_iter().collect();
        self
    }

    /// Check if this is the owning side.
    pub fn is_owning(&self) -> bool {
        matches!(self.side, RelationSide::Owning { .. })
    }

    /// Check if this is a many-to-many relation.
    pub fn is_many_to_many(&self) -> bool {
        self.cardinality == Cardinality::ManyToMany
    }

    /// Join table declared on the owning side.
    pub fn join_table(&self) -> Option<&JoinTable> {
        match &self.side {
            RelationSide::Owning { join_table } => join_table.as_ref(),
            RelationSide::Inverse { .. } => None,
        }
    }

    /// Owning field name on the target, for inverse relations.
    pub fn mapped_by_field(&self) -> Option<&str> {
        match &self.side {
            RelationSide::Owning { .. } => None,
            RelationSide::Inverse { mapped_by } => Some(mapped_by),
        }
    }

    /// Check if any declared cascade policy is in `relevant`.
    pub fn cascades_any(&self, relevant: &[CascadeType]) -> bool {
        self.cascade.iter().any(|c| relevant.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_to_one_relation() {
        let rel = RelationDef::one_to_one("Phone").with_cascade([CascadeType::All]);

        assert_eq!(rel.cardinality, Cardinality::OneToOne);
        assert!(rel.is_owning());
        assert!(rel.join_table().is_none());
        assert!(rel.cascades_any(&[CascadeType::All, CascadeType::Persist]));
    }

    #[test]
    fn test_many_to_many_relation() {
        let rel = RelationDef::many_to_many(
            "Project",
            JoinTable::new("EMPLOYEE_PROJECT", "EMPLOYEE_ID", "PROJECT_ID"),
        );

        assert!(rel.is_many_to_many());
        assert!(rel.cardinality.is_collection());
        assert_eq!(rel.join_table().map(|j| j.name.as_str()), Some("EMPLOYEE_PROJECT"));
    }

    #[test]
    fn test_inverse_relation() {
        let rel = RelationDef::many_to_many_inverse("Employee", "projects");

        assert!(!rel.is_owning());
        assert_eq!(rel.mapped_by_field(), Some("projects"));
        assert!(rel.join_table().is_none());
    }

    #[test]
    fn test_cascade_intersection() {
        let rel = RelationDef::many_to_one("Department").with_cascade([CascadeType::Persist]);

        assert!(rel.cascades_any(&[CascadeType::All, CascadeType::Persist]));
        assert!(!rel.cascades_any(&[CascadeType::All, CascadeType::Remove]));
        assert!(!RelationDef::many_to_one("Department").cascades_any(&[CascadeType::All]));
    }

    #[test]
    fn test_mirrored_cardinality() {
        assert_eq!(Cardinality::ManyToOne.mirrored(), Cardinality::OneToMany);
        assert_eq!(Cardinality::ManyToMany.mirrored(), Cardinality::ManyToMany);
    }
}
