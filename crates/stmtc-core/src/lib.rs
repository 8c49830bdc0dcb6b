//! stmtc core - entity catalog and object model.
//!
//! This crate holds the metadata the statement compiler reads: the validated
//! [`Catalog`] of entity mappings and the [`EntityObject`] graph that
//! carries live field values into a build.

pub mod catalog;
pub mod error;
pub mod object;

pub use catalog::{
    Cardinality, CascadeType, Catalog, EntityDef, FieldDef, FieldRole, JoinTable, RelationDef,
    RelationSide, SchemaBundle,
};
pub use error::Error;
pub use object::{Entity, EntityObject, ObjectValue};

/// Re-export statement model types.
pub use stmtc_proto as proto;
