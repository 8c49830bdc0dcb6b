//! Live entity values handed to the statement builders.
//!
//! An [`EntityObject`] is a dynamic snapshot of one entity instance: its
//! entity name plus the value of each persistent field. Relational fields
//! hold nested objects, so a whole object graph can be described.

use crate::catalog::EntityDef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stmtc_proto::Value;

/// Value of one field on an entity instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectValue {
    /// A column value.
    Scalar(Value),
    /// A single related entity, or none.
    One(Option<Box<EntityObject>>),
    /// A collection of related entities, in iteration order.
    Many(Vec<EntityObject>),
}

impl ObjectValue {
    /// Iterate over the related entities held by this value.
    ///
    /// Scalars and empty references yield nothing.
    pub fn related(&self) -> impl Iterator<Item = &EntityObject> {
        let (one, many): (Option<&EntityObject>, &[EntityObject]) = match self {
            ObjectValue::One(Some(obj)) => (Some(obj.as_ref()), &[]),
            ObjectValue::Many(items) => (None, items.as_slice()),
            ObjectValue::Scalar(_) | ObjectValue::One(None) => (None, &[]),
        };
        one.into_iter().chain(many.iter())
    }

    /// Get the scalar value, if this is one.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            ObjectValue::Scalar(v) => Some(v),
            _ => None,
        }
    }
}

/// A snapshot of one entity instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityObject {
    /// Entity name the instance belongs to.
    pub entity: String,
    /// Field values keyed by field name. Missing fields read as null.
    #[serde(default)]
    pub values: HashMap<String, ObjectValue>,
}

impl EntityObject {
    /// Create an instance of `entity` with no field values.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            values: HashMap::new(),
        }
    }

    /// Set a scalar field value.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values
            .insert(field.into(), ObjectValue::Scalar(value.into()));
        self
    }

    /// Set a single related entity.
    pub fn with_one(mut self, field: impl Into<String>, related: EntityObject) -> Self {
        self.values
            .insert(field.into(), ObjectValue::One(Some(Box::new(related))));
        self
    }

    /// Set an empty single reference.
    pub fn with_none(mut self, field: impl Into<String>) -> Self {
        self.values.insert(field.into(), ObjectValue::One(None));
        self
    }

    /// Set a collection of related entities.
    pub fn with_many(
        mut self,
        field: impl Into<String>,
        related: impl IntoIterator<Item = EntityObject>,
    ) -> Self {
        self.values
            .insert(field.into(), ObjectValue::Many(related.into_iter().collect()));
        self
    }

    /// Get the raw value of a field.
    pub fn get(&self, field: &str) -> Option<&ObjectValue> {
        self.values.get(field)
    }

    /// Get the scalar value of a field, reading missing fields as null.
    pub fn scalar(&self, field: &str) -> Value {
        self.values
            .get(field)
            .and_then(ObjectValue::as_scalar)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Iterate over the entities related through `field`.
    pub fn related(&self, field: &str) -> impl Iterator<Item = &EntityObject> {
        self.values.get(field).into_iter().flat_map(ObjectValue::related)
    }

    /// Get the key value of this instance according to `def`.
    pub fn key(&self, def: &EntityDef) -> Value {
        def.id_field()
            .map(|f| self.scalar(&f.name))
            .unwrap_or(Value::Null)
    }
}

/// A statically typed entity that can snapshot itself for a build.
pub trait Entity {
    /// Entity name in the catalog.
    const NAME: &'static str;

    /// Capture the current field values.
    fn to_object(&self) -> EntityObject;
}
