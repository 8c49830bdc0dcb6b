//! stmtc - statement compiler for live migrations.
//!
//! Turns two kinds of input into an ordered sequence of INSERT, UPDATE and
//! DELETE statements that can be replayed against a target datastore:
//!
//! - an entity object graph, walked with the mapping metadata of a
//!   [`Catalog`], following cascades and writing join table rows;
//! - an update or delete query in the object query language.
//!
//! # Usage
//!
//! ```rust
//! use stmtc::{Catalog, EntityDef, FieldDef, Query, SchemaBundle, StatementBuilder, Value};
//!
//! let schema = SchemaBundle::new(1).with_entity(
//!     EntityDef::new("Employee")
//!         .with_table("EMPLOYEE")
//!         .with_field(FieldDef::id("id").with_column("EMPLOYEE_ID"))
//!         .with_field(FieldDef::new("salary").with_column("SALARY")),
//! );
//! let catalog = Catalog::new(schema).unwrap();
//!
//! let query = Query::new("UPDATE Employee e SET e.salary = :s WHERE e.id = :id")
//!     .with_parameter("s", 5000i64)
//!     .with_parameter("id", "E1");
//! let statements = StatementBuilder::for_query(&catalog, &query)
//!     .and_then(|b| b.build_query(&query))
//!     .unwrap();
//!
//! assert_eq!(
//!     statements[0].to_string(),
//!     "UPDATE EMPLOYEE SET SALARY = 5000 WHERE EMPLOYEE_ID = 'E1'"
//! );
//! assert_eq!(statements[0].field("SALARY"), Some(&Value::Int64(5000)));
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod migration;
pub mod query;

pub use builder::query::query_kind;
pub use builder::{StatementBuilder, StatementStack};
pub use config::{BuilderConfig, DEFAULT_MAX_CASCADE_DEPTH};
pub use error::{Error, Result};
pub use migration::{Dispatch, InMemorySink, MigrationSession, MigrationSink};
pub use query::{Query, QueryForm};
pub use stmtc_core::Error as MetadataError;

// Re-export the model so callers need a single dependency.
pub use stmtc_core::{
    Cardinality, CascadeType, Catalog, Entity, EntityDef, EntityObject, FieldDef, FieldRole,
    JoinTable, ObjectValue, RelationDef, RelationSide, SchemaBundle,
};
pub use stmtc_lang::{tokenize, Token, TokenKind};
pub use stmtc_proto::{
    CompareOp, Condition, FieldValue, LogicOp, Statement, StatementBatch, StatementKind, Value,
};

/// Re-export the underlying crates.
pub use stmtc_lang as lang;
pub use stmtc_proto as proto;
