//! stmtc statement model.
//!
//! This crate defines the values and statements produced by the compiler and
//! handed to the propagation layer during a live migration.
//!
//! # Modules
//!
//! - [`value`] - Runtime values bound to columns
//! - [`statement`] - INSERT / UPDATE / DELETE statements and their rendering
//! - [`batch`] - Ordered statement batches and their byte encoding
//! - [`error`] - Statement model errors
//!
//! # Rendering
//!
//! Every statement renders to canonical text, preserving field and condition
//! insertion order:
//!
//! ```
//! use stmtc_proto::{CompareOp, Statement, StatementKind};
//!
//! let mut stmt = Statement::with_table(StatementKind::Update, "EMPLOYEE");
//! stmt.add_field("SALARY", 5000i64).unwrap();
//! stmt.add_condition("NAME", CompareOp::Equal, "Bob").unwrap();
//!
//! assert_eq!(stmt.to_string(), "UPDATE EMPLOYEE SET SALARY = 5000 WHERE NAME = 'Bob'");
//! ```

pub mod batch;
pub mod error;
pub mod statement;
pub mod value;

pub use error::Error;

// Re-export commonly used types at crate root
pub use batch::StatementBatch;
pub use statement::{
    CompareOp, Condition, DeleteStatement, FieldValue, InsertStatement, LogicOp, Statement,
    StatementKind, UpdateStatement,
};
pub use value::Value;
