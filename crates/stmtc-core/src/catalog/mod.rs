//! Entity mapping catalog.
//!
//! The catalog holds the relational mapping of every entity: table, columns,
//! key field, relation cardinality and ownership, cascade policies and join
//! tables. It is populated once at startup and only read afterwards.

mod catalog;
mod entity;
mod field;
mod relation;
mod schema;

pub use catalog::Catalog;
pub use entity::EntityDef;
pub use field::{FieldDef, FieldRole};
pub use relation::{Cardinality, CascadeType, JoinTable, RelationDef, RelationSide};
pub use schema::SchemaBundle;
