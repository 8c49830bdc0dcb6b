//! Read-only catalog of entity mappings.
//!
//! The catalog is built once from a [`SchemaBundle`], validated, and then only
//! read. It can be shared between threads behind an `Arc` and optionally
//! installed as the process-wide instance.

use super::{Cardinality, EntityDef, FieldDef, RelationSide, SchemaBundle};
use crate::error::Error;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Arc<Catalog>> = OnceLock::new();

/// Validated entity metadata, indexed by entity name and table name.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Schema version the catalog was built from.
    version: u64,
    /// Entity definitions keyed by entity name.
    entities: HashMap<String, EntityDef>,
    /// Entity names keyed by physical table name.
    tables: HashMap<String, String>,
}

impl Catalog {
    /// Build a catalog from a schema bundle.
    ///
    /// Fails with [`Error::InvalidMetadata`] when the mappings are inconsistent:
    /// missing or duplicate key fields, unknown relation targets, or inverse
    /// relations that are not mapped by an owning field on their target.
    pub fn new(bundle: SchemaBundle) -> Result<Self, Error> {
        let mut entities = HashMap::with_capacity(bundle.entities.len());
        let mut tables = HashMap::with_capacity(bundle.entities.len());

        for entity in bundle.entities {
            validate_fields(&entity)?;
            if let Some(other) = tables.insert(entity.table.clone(), entity.name.clone()) {
                return Err(Error::InvalidMetadata(format!(
                    "table '{}' is mapped by both '{}' and '{}'",
                    entity.table, other, entity.name
                )));
            }
            if entities.contains_key(&entity.name) {
                return Err(Error::InvalidMetadata(format!(
                    "entity '{}' is registered twice",
                    entity.name
                )));
            }
            entities.insert(entity.name.clone(), entity);
        }

        let catalog = Self {
            version: bundle.version,
            entities,
            tables,
        };
        catalog.validate_relations()?;

        tracing::debug!(
            version = catalog.version,
            entities = catalog.entities.len(),
            "catalog built"
        );
        Ok(catalog)
    }

    /// Install this catalog as the process-wide instance.
    ///
    /// Can be done once; later calls fail with [`Error::AlreadyInstalled`].
    pub fn install(self) -> Result<Arc<Catalog>, Error> {
        let catalog = Arc::new(self);
        GLOBAL
            .set(Arc::clone(&catalog))
            .map_err(|_| Error::AlreadyInstalled)?;
        Ok(catalog)
    }

    /// Get the process-wide catalog, if one was installed.
    pub fn global() -> Option<Arc<Catalog>> {
        GLOBAL.get().cloned()
    }

    /// Get the schema version the catalog was built from.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get an entity definition by entity name.
    pub fn entity(&self, name: &str) -> Result<&EntityDef, Error> {
        self.entities
            .get(name)
            .ok_or_else(|| Error::MetadataNotFound(name.to_string()))
    }

    /// Resolve a logical name used in a query to its entity definition.
    ///
    /// The entity name is tried first, then the physical table name.
    pub fn entity_for_table(&self, name: &str) -> Result<&EntityDef, Error> {
        if let Some(entity) = self.entities.get(name) {
            return Ok(entity);
        }
        self.tables
            .get(name)
            .and_then(|entity| self.entities.get(entity))
            .ok_or_else(|| Error::MetadataNotFound(name.to_string()))
    }

    /// Get a field of an entity.
    pub fn field(&self, entity: &str, field: &str) -> Result<&FieldDef, Error> {
        self.entity(entity)?
            .get_field(field)
            .ok_or_else(|| Error::UnknownField {
                entity: entity.to_string(),
                field: field.to_string(),
            })
    }

    /// Get the physical column of an entity field.
    pub fn column_for(&self, entity: &str, field: &str) -> Result<&str, Error> {
        self.field(entity, field).map(|f| f.column.as_str())
    }

    /// Get the key field of an entity.
    pub fn id_field(&self, entity: &str) -> Result<&FieldDef, Error> {
        let def = self.entity(entity)?;
        // Presence is checked when the catalog is built.
        def.id_field().ok_or_else(|| Error::MetadataNotFound(format!("{}.<id>", entity)))
    }

    /// Find the owning field behind an inverse relation field.
    ///
    /// Returns the target entity and its owning field.
    pub fn owning_side(&self, inverse: &FieldDef) -> Result<(&EntityDef, &FieldDef), Error> {
        let relation = inverse.relation_def().ok_or_else(|| {
            Error::InvalidMetadata(format!("field '{}' is not relational", inverse.name))
        })?;
        let mapped_by = relation.mapped_by_field().ok_or_else(|| {
            Error::InvalidMetadata(format!("field '{}' is not an inverse relation", inverse.name))
        })?;
        let target = self.entity(&relation.target)?;
        let owner = target.get_field(mapped_by).ok_or_else(|| Error::UnknownField {
            entity: target.name.clone(),
            field: mapped_by.to_string(),
        })?;
        Ok((target, owner))
    }

    /// List all entity names, sorted.
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn validate_relations(&self) -> Result<(), Error> {
        for entity in self.entities.values() {
            for field in entity.relational_fields() {
                let Some(relation) = field.relation_def() else {
                    continue;
                };
                let context = format!("{}.{}", entity.name, field.name);
                let target = self.entities.get(&relation.target).ok_or_else(|| {
                    Error::InvalidMetadata(format!(
                        "{} targets unknown entity '{}'",
                        context, relation.target
                    ))
                })?;

                match &relation.side {
                    RelationSide::Owning { join_table } => {
                        if relation.cardinality == Cardinality::OneToMany {
                            return Err(Error::InvalidMetadata(format!(
                                "{} is one-to-many and must be mapped by a many-to-one on '{}'",
                                context, target.name
                            )));
                        }
                        if relation.is_many_to_many() != join_table.is_some() {
                            return Err(Error::InvalidMetadata(format!(
                                "{} must declare a join table exactly when it is many-to-many",
                                context
                            )));
                        }
                    }
                    RelationSide::Inverse { mapped_by } => {
                        let owner = target.get_field(mapped_by).ok_or_else(|| {
                            Error::InvalidMetadata(format!(
                                "{} is mapped by unknown field '{}.{}'",
                                context, target.name, mapped_by
                            ))
                        })?;
                        let owner_relation = owner
                            .relation_def()
                            .filter(|r| r.is_owning())
                            .ok_or_else(|| {
                                Error::InvalidMetadata(format!(
                                    "{} is mapped by '{}.{}', which is not an owning relation",
                                    context, target.name, mapped_by
                                ))
                            })?;
                        if owner_relation.target != entity.name
                            || owner_relation.cardinality != relation.cardinality.mirrored()
                        {
                            return Err(Error::InvalidMetadata(format!(
                                "{} does not mirror '{}.{}'",
                                context, target.name, mapped_by
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn validate_fields(entity: &EntityDef) -> Result<(), Error> {
    let ids = entity.fields.iter().filter(|f| f.is_id()).count();
    if ids != 1 {
        return Err(Error::InvalidMetadata(format!(
            "entity '{}' must declare exactly one key field, found {}",
            entity.name, ids
        )));
    }

    let mut names = HashSet::new();
    let mut columns = HashSet::new();
    for field in &entity.fields {
        if !names.insert(field.name.as_str()) {
            return Err(Error::InvalidMetadata(format!(
                "field '{}.{}' is declared twice",
                entity.name, field.name
            )));
        }
        // Collection relations have no column of their own.
        let has_column = field
            .relation_def()
            .map_or(true, |r| r.is_owning() && !r.cardinality.is_collection());
        if has_column && !columns.insert(field.column.as_str()) {
            return Err(Error::InvalidMetadata(format!(
                "column '{}' is mapped twice in entity '{}'",
                field.column, entity.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CascadeType, JoinTable, RelationDef};

    fn sample_schema() -> SchemaBundle {
        let employee = EntityDef::new("Employee")
            .with_table("EMPLOYEE")
            .with_field(FieldDef::id("id").with_column("EMPLOYEE_ID"))
            .with_field(FieldDef::new("name").with_column("NAME"))
            .with_field(FieldDef::new("salary").with_column("SALARY"))
            .with_field(
                FieldDef::relation(
                    "projects",
                    RelationDef::many_to_many(
                        "Project",
                        JoinTable::new("EMPLOYEE_PROJECT", "EMPLOYEE_ID", "PROJECT_ID"),
                    )
                    .with_cascade([CascadeType::Persist]),
                ),
            );
        let project = EntityDef::new("Project")
            .with_table("PROJECT")
            .with_field(FieldDef::id("id").with_column("PROJECT_ID"))
            .with_field(FieldDef::relation(
                "members",
                RelationDef::many_to_many_inverse("Employee", "projects"),
            ));

        SchemaBundle::new(3).with_entity(employee).with_entity(project)
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::new(sample_schema()).unwrap();

        assert_eq!(catalog.version(), 3);
        assert_eq!(catalog.entity("Employee").unwrap().table, "EMPLOYEE");
        assert_eq!(catalog.entity_names(), vec!["Employee", "Project"]);
        assert_eq!(catalog.column_for("Employee", "salary").unwrap(), "SALARY");
        assert_eq!(catalog.id_field("Project").unwrap().column, "PROJECT_ID");
    }

    #[test]
    fn test_entity_for_table() {
        let catalog = Catalog::new(sample_schema()).unwrap();

        assert_eq!(catalog.entity_for_table("Employee").unwrap().name, "Employee");
        assert_eq!(catalog.entity_for_table("PROJECT").unwrap().name, "Project");

        let err = catalog.entity_for_table("Department").unwrap_err();
        assert!(matches!(err, Error::MetadataNotFound(ref t) if t == "Department"));
    }

    #[test]
    fn test_unknown_field() {
        let catalog = Catalog::new(sample_schema()).unwrap();

        let err = catalog.column_for("Employee", "age").unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn test_owning_side_lookup() {
        let catalog = Catalog::new(sample_schema()).unwrap();
        let project = catalog.entity("Project").unwrap();
        let members = project.get_field("members").unwrap();

        let (owner_entity, owner_field) = catalog.owning_side(members).unwrap();
        assert_eq!(owner_entity.name, "Employee");
        assert_eq!(
            owner_field
                .relation_def()
                .and_then(|r| r.join_table())
                .map(|j| j.name.as_str()),
            Some("EMPLOYEE_PROJECT")
        );
    }

    #[test]
    fn test_rejects_missing_key() {
        let schema = SchemaBundle::new(1).with_entity(
            EntityDef::new("Orphan").with_field(FieldDef::new("name")),
        );
        assert!(matches!(Catalog::new(schema), Err(Error::InvalidMetadata(_))));
    }

    #[test]
    fn test_rejects_duplicate_table() {
        let schema = SchemaBundle::new(1)
            .with_entity(EntityDef::new("A").with_table("T").with_field(FieldDef::id("id")))
            .with_entity(EntityDef::new("B").with_table("T").with_field(FieldDef::id("id")));
        assert!(matches!(Catalog::new(schema), Err(Error::InvalidMetadata(_))));
    }

    #[test]
    fn test_rejects_unknown_target() {
        let schema = SchemaBundle::new(1).with_entity(
            EntityDef::new("Employee")
                .with_field(FieldDef::id("id"))
                .with_field(FieldDef::relation("phone", RelationDef::one_to_one("Phone"))),
        );
        assert!(matches!(Catalog::new(schema), Err(Error::InvalidMetadata(_))));
    }

    #[test]
    fn test_rejects_two_inverse_sides() {
        // Both ends claim to be mapped by the other, so neither owns the relation.
        let schema = SchemaBundle::new(1)
            .with_entity(
                EntityDef::new("A").with_field(FieldDef::id("id")).with_field(
                    FieldDef::relation("bs", RelationDef::many_to_many_inverse("B", "as_")),
                ),
            )
            .with_entity(
                EntityDef::new("B").with_field(FieldDef::id("id")).with_field(
                    FieldDef::relation("as_", RelationDef::many_to_many_inverse("A", "bs")),
                ),
            );
        assert!(matches!(Catalog::new(schema), Err(Error::InvalidMetadata(_))));
    }

    #[test]
    fn test_rejects_many_to_many_without_join_table() {
        let mut relation = RelationDef::many_to_many(
            "B",
            JoinTable::new("A_B", "A_ID", "B_ID"),
        );
        relation.side = RelationSide::Owning { join_table: None };
        let schema = SchemaBundle::new(1)
            .with_entity(
                EntityDef::new("A")
                    .with_field(FieldDef::id("id"))
                    .with_field(FieldDef::relation("bs", relation)),
            )
            .with_entity(EntityDef::new("B").with_field(FieldDef::id("id")));
        assert!(matches!(Catalog::new(schema), Err(Error::InvalidMetadata(_))));
    }

    #[test]
    fn test_rejects_owning_one_to_many() {
        let schema = SchemaBundle::new(1)
            .with_entity(
                EntityDef::new("Department")
                    .with_field(FieldDef::id("id"))
                    .with_field(FieldDef::relation(
                        "employees",
                        RelationDef::one_to_many("Employee"),
                    )),
            )
            .with_entity(EntityDef::new("Employee").with_field(FieldDef::id("id")));
        assert!(matches!(Catalog::new(schema), Err(Error::InvalidMetadata(_))));
    }

    #[test]
    fn test_catalog_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog>();
        assert_send_sync::<Arc<Catalog>>();
    }
}
