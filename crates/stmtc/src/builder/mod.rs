//! Statement builders.
//!
//! One traversal drives all three statement kinds. What differs per kind is
//! which cascade policies it follows, how the key, plain and relational
//! fields land in the statement, and which join table rows it writes. Those
//! hooks are a `match` on [`StatementKind`] below.
//!
//! Entity mode walks an [`EntityObject`] graph and may produce many ordered
//! statements. Query mode (see [`query`]) scans an update or delete query and
//! produces exactly one.

pub mod query;
mod stack;

pub use stack::StatementStack;

use crate::config::BuilderConfig;
use crate::error::{Error, Result};
use std::collections::HashSet;
use stmtc_core::{
    CascadeType, Catalog, EntityDef, EntityObject, FieldDef, FieldRole, JoinTable, ObjectValue,
    RelationDef,
};
use stmtc_proto::{CompareOp, LogicOp, Statement, StatementKind, Value};
use tracing::{debug, warn};

/// Builds ordered statements of one kind from entities or queries.
#[derive(Debug, Clone)]
pub struct StatementBuilder<'a> {
    catalog: &'a Catalog,
    kind: StatementKind,
    config: BuilderConfig,
}

impl<'a> StatementBuilder<'a> {
    /// Create a builder for `kind` with the default configuration.
    pub fn new(catalog: &'a Catalog, kind: StatementKind) -> Self {
        Self {
            catalog,
            kind,
            config: BuilderConfig::default(),
        }
    }

    /// Create an INSERT builder.
    pub fn insert(catalog: &'a Catalog) -> Self {
        Self::new(catalog, StatementKind::Insert)
    }

    /// Create an UPDATE builder.
    pub fn update(catalog: &'a Catalog) -> Self {
        Self::new(catalog, StatementKind::Update)
    }

    /// Create a DELETE builder.
    pub fn delete(catalog: &'a Catalog) -> Self {
        Self::new(catalog, StatementKind::Delete)
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the statement kind this builder produces.
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Get the configuration.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Cascade policies this builder follows.
    pub fn cascade_policies(&self) -> &'static [CascadeType] {
        match self.kind {
            StatementKind::Insert => &[CascadeType::All, CascadeType::Persist],
            StatementKind::Update => &[CascadeType::All, CascadeType::Merge],
            StatementKind::Delete => &[CascadeType::All, CascadeType::Remove],
        }
    }

    /// Build the ordered statements for an entity and whatever it cascades to.
    pub fn build_entity(&self, entity: &EntityObject) -> Result<Vec<Statement>> {
        let mut visited = HashSet::new();
        let stack = self.build_recursive(entity, &mut visited, 0)?;
        let statements = stack.into_statements();
        debug!(
            kind = %self.kind,
            entity = %entity.entity,
            count = statements.len(),
            "entity compiled"
        );
        Ok(statements)
    }

    fn build_recursive(
        &self,
        object: &EntityObject,
        visited: &mut HashSet<(String, String)>,
        depth: usize,
    ) -> Result<StatementStack> {
        if depth > self.config.max_cascade_depth {
            return Err(Error::MaxDepthExceeded {
                depth,
                limit: self.config.max_cascade_depth,
            });
        }

        let mut stack = StatementStack::new(self.kind);
        let def = self.catalog.entity(&object.entity)?;
        let key = object.key(def);

        // An instance reached twice through the graph is built once.
        if !key.is_null() && !visited.insert((def.name.clone(), key.to_string())) {
            debug!(entity = %def.name, key = %key, "already built, skipping");
            return Ok(stack);
        }

        let mut statement = Statement::with_table(self.kind, def.table.as_str());

        for field in &def.fields {
            match &field.role {
                FieldRole::Relation(relation) if relation.is_owning() => {
                    if self.follows(relation) {
                        for related in object.related(&field.name) {
                            warn!(
                                kind = %self.kind,
                                from = %def.name,
                                field = %field.name,
                                to = %related.entity,
                                "following cascade"
                            );
                            stack.push_cascaded(self.build_recursive(related, visited, depth + 1)?);
                        }
                    }
                    match relation.join_table() {
                        Some(join) => {
                            for related in object.related(&field.name) {
                                if let Some(row) =
                                    self.owning_join_row(join, def, &key, relation, related)?
                                {
                                    stack.push_join(row);
                                }
                            }
                        }
                        None => self.on_relational_field(&mut statement, field, relation, object)?,
                    }
                }
                FieldRole::Relation(relation) => {
                    if relation.is_many_to_many() {
                        let (_, owner) = self.catalog.owning_side(field)?;
                        let join = owner
                            .relation_def()
                            .and_then(RelationDef::join_table)
                            .ok_or_else(|| {
                                stmtc_core::Error::InvalidMetadata(format!(
                                    "{}.{} is mapped by a field without a join table",
                                    def.name, field.name
                                ))
                            })?;
                        if let Some(row) = self.inverse_join_row(join, def, &key)? {
                            stack.push_join(row);
                        }
                    }
                }
                FieldRole::Id => self.on_id_field(&mut statement, field, key.clone())?,
                FieldRole::Plain => {
                    self.on_plain_field(&mut statement, field, object.scalar(&field.name))?
                }
            }
        }

        // An UPDATE with an empty SET list has no valid rendering.
        if self.kind == StatementKind::Update && statement.fields().is_empty() {
            debug!(entity = %def.name, key = %key, "nothing to assign, owner update dropped");
        } else {
            stack.set_owner(statement);
        }
        Ok(stack)
    }

    fn follows(&self, relation: &RelationDef) -> bool {
        self.config.follow_cascades && relation.cascades_any(self.cascade_policies())
    }

    fn on_id_field(&self, statement: &mut Statement, field: &FieldDef, key: Value) -> Result<()> {
        debug!(field = %field.name, column = %field.column, value = %key, "key field");
        match self.kind {
            StatementKind::Insert => statement.add_field(field.column.as_str(), key)?,
            StatementKind::Update | StatementKind::Delete => {
                statement.add_condition(field.column.as_str(), CompareOp::Equal, key)?
            }
        }
        Ok(())
    }

    fn on_plain_field(
        &self,
        statement: &mut Statement,
        field: &FieldDef,
        value: Value,
    ) -> Result<()> {
        match self.kind {
            StatementKind::Insert | StatementKind::Update => {
                debug!(field = %field.name, column = %field.column, value = %value, "plain field");
                statement.add_field(field.column.as_str(), value)?;
            }
            // Rows are deleted by key alone.
            StatementKind::Delete => {}
        }
        Ok(())
    }

    fn on_relational_field(
        &self,
        statement: &mut Statement,
        field: &FieldDef,
        relation: &RelationDef,
        object: &EntityObject,
    ) -> Result<()> {
        if self.kind == StatementKind::Delete {
            return Ok(());
        }
        let value = match object.get(&field.name) {
            Some(ObjectValue::Scalar(value)) => value.clone(),
            _ => match object.related(&field.name).next() {
                Some(related) => related.key(self.catalog.entity(&relation.target)?),
                None => Value::Null,
            },
        };
        debug!(field = %field.name, column = %field.column, value = %value, "foreign key");
        statement.add_field(field.column.as_str(), value)?;
        Ok(())
    }

    /// Row linking the driving entity to one related element.
    fn owning_join_row(
        &self,
        join: &JoinTable,
        def: &EntityDef,
        key: &Value,
        relation: &RelationDef,
        related: &EntityObject,
    ) -> Result<Option<Statement>> {
        if self.kind == StatementKind::Update {
            return Ok(None);
        }
        let target = self.catalog.entity(&relation.target)?;
        let owner_key = require_key(key, def, join)?;
        let related_key = require_key(&related.key(target), target, join)?;

        let mut row = Statement::with_table(self.kind, join.name.as_str());
        if self.kind == StatementKind::Insert {
            row.add_field(join.join_column.as_str(), owner_key)?;
            row.add_field(join.inverse_join_column.as_str(), related_key)?;
        } else {
            row.add_condition(join.join_column.as_str(), CompareOp::Equal, owner_key)?;
            row.add_connective(LogicOp::And)?;
            row.add_condition(join.inverse_join_column.as_str(), CompareOp::Equal, related_key)?;
        }
        Ok(Some(row))
    }

    /// Row removal for the current entity's side of an association it does not own.
    fn inverse_join_row(
        &self,
        join: &JoinTable,
        def: &EntityDef,
        key: &Value,
    ) -> Result<Option<Statement>> {
        if self.kind != StatementKind::Delete {
            return Ok(None);
        }
        let mut row = Statement::with_table(self.kind, join.name.as_str());
        row.add_condition(
            join.inverse_join_column.as_str(),
            CompareOp::Equal,
            require_key(key, def, join)?,
        )?;
        Ok(Some(row))
    }
}

fn require_key(key: &Value, def: &EntityDef, join: &JoinTable) -> Result<Value> {
    if key.is_null() {
        return Err(Error::MissingKey {
            entity: def.name.clone(),
            join_table: join.name.clone(),
        });
    }
    Ok(key.clone())
}
