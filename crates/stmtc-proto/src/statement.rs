//! Statement model: INSERT, UPDATE and DELETE with canonical text rendering.
//!
//! A [`Statement`] is built incrementally by the compiler: the table is set
//! exactly once, then fields and conditions are appended. Field and condition
//! order is insertion order and is preserved by rendering.

use crate::error::Error;
use crate::value::Value;
use rkyv::Archive;
use std::fmt;

/// The kind of a statement.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum StatementKind {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        })
    }
}

/// Comparison operator of a condition.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum CompareOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl CompareOp {
    /// Parse an operator symbol as written in the query language.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(CompareOp::Equal),
            "<>" | "!=" => Some(CompareOp::NotEqual),
            "<" => Some(CompareOp::LessThan),
            "<=" => Some(CompareOp::LessThanOrEqual),
            ">" => Some(CompareOp::GreaterThan),
            ">=" => Some(CompareOp::GreaterThanOrEqual),
            _ => None,
        }
    }

    /// Canonical symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "<>",
            CompareOp::LessThan => "<",
            CompareOp::LessThanOrEqual => "<=",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterThanOrEqual => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Logical connective between two conditions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    /// Parse a connective keyword, case-insensitively.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if keyword.eq_ignore_ascii_case("AND") {
            Some(LogicOp::And)
        } else if keyword.eq_ignore_ascii_case("OR") {
            Some(LogicOp::Or)
        } else {
            None
        }
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
        })
    }
}

/// A column name and value pair.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FieldValue {
    /// Column name.
    pub column: String,
    /// Column value.
    pub value: Value,
}

impl FieldValue {
    /// Create a new column-value pair.
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// One element of a WHERE clause.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum Condition {
    /// `column op value`.
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
    },
    /// A connective kept verbatim between comparisons.
    Connective(LogicOp),
}

impl Condition {
    /// Create a comparison condition.
    pub fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Condition::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Create an equality condition.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Equal, value)
    }

    /// Check if this is a connective.
    pub fn is_connective(&self) -> bool {
        matches!(self, Condition::Connective(_))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Compare { column, op, value } => write!(f, "{} {} {}", column, op, value),
            Condition::Connective(op) => write!(f, "{}", op),
        }
    }
}

/// An INSERT statement.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct InsertStatement {
    table: Option<String>,
    fields: Vec<FieldValue>,
}

/// An UPDATE statement.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct UpdateStatement {
    table: Option<String>,
    fields: Vec<FieldValue>,
    conditions: Vec<Condition>,
}

/// A DELETE statement. Carries no field list.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct DeleteStatement {
    table: Option<String>,
    conditions: Vec<Condition>,
}

/// A primitive mutation statement.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum Statement {
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}

impl Statement {
    /// Create an empty statement of the given kind.
    pub fn new(kind: StatementKind) -> Self {
        match kind {
            StatementKind::Insert => Statement::Insert(InsertStatement::default()),
            StatementKind::Update => Statement::Update(UpdateStatement::default()),
            StatementKind::Delete => Statement::Delete(DeleteStatement::default()),
        }
    }

    /// Create an empty statement targeting `table`.
    pub fn with_table(kind: StatementKind, table: impl Into<String>) -> Self {
        let table = Some(table.into());
        match kind {
            StatementKind::Insert => Statement::Insert(InsertStatement {
                table,
                ..Default::default()
            }),
            StatementKind::Update => Statement::Update(UpdateStatement {
                table,
                ..Default::default()
            }),
            StatementKind::Delete => Statement::Delete(DeleteStatement {
                table,
                ..Default::default()
            }),
        }
    }

    /// Get the kind of this statement.
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Update(_) => StatementKind::Update,
            Statement::Delete(_) => StatementKind::Delete,
        }
    }

    /// Get the target table, if set.
    pub fn table(&self) -> Option<&str> {
        self.table_slot().as_deref()
    }

    fn table_slot(&self) -> &Option<String> {
        match self {
            Statement::Insert(s) => &s.table,
            Statement::Update(s) => &s.table,
            Statement::Delete(s) => &s.table,
        }
    }

    fn table_slot_mut(&mut self) -> &mut Option<String> {
        match self {
            Statement::Insert(s) => &mut s.table,
            Statement::Update(s) => &mut s.table,
            Statement::Delete(s) => &mut s.table,
        }
    }

    /// Set the target table. A table can only be set once.
    pub fn set_table(&mut self, table: impl Into<String>) -> Result<(), Error> {
        let table = table.into();
        let slot = self.table_slot_mut();
        if let Some(current) = slot {
            return Err(Error::TableAlreadySet {
                table: current.clone(),
                requested: table,
            });
        }
        *slot = Some(table);
        Ok(())
    }

    fn require_table(&self) -> Result<&str, Error> {
        self.table().ok_or(Error::TableNotSet)
    }

    /// Append a column-value pair to the field list.
    ///
    /// Fails on DELETE statements, on duplicate columns and on non-finite floats.
    pub fn add_field(
        &mut self,
        column: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), Error> {
        let column = column.into();
        let value = finite(&column, value.into())?;
        let table = self.require_table()?.to_string();
        let kind = self.kind();
        let fields = match self {
            Statement::Insert(s) => &mut s.fields,
            Statement::Update(s) => &mut s.fields,
            Statement::Delete(_) => {
                return Err(Error::UnsupportedField { kind, column });
            }
        };
        if fields.iter().any(|f| f.column == column) {
            return Err(Error::DuplicateField { table, column });
        }
        fields.push(FieldValue::new(column, value));
        Ok(())
    }

    fn conditions_mut(&mut self, column: &str) -> Result<&mut Vec<Condition>, Error> {
        self.require_table()?;
        let kind = self.kind();
        match self {
            Statement::Insert(_) => Err(Error::UnsupportedCondition {
                kind,
                column: column.to_string(),
            }),
            Statement::Update(s) => Ok(&mut s.conditions),
            Statement::Delete(s) => Ok(&mut s.conditions),
        }
    }

    /// Append a `column op value` condition to the WHERE clause.
    pub fn add_condition(
        &mut self,
        column: impl Into<String>,
        op: CompareOp,
        value: impl Into<Value>,
    ) -> Result<(), Error> {
        let column = column.into();
        let value = finite(&column, value.into())?;
        let conditions = self.conditions_mut(&column)?;
        conditions.push(Condition::compare(column, op, value));
        Ok(())
    }

    /// Append a connective to the WHERE clause.
    pub fn add_connective(&mut self, op: LogicOp) -> Result<(), Error> {
        let conditions = self.conditions_mut(&op.to_string())?;
        conditions.push(Condition::Connective(op));
        Ok(())
    }

    /// Ordered field list. Empty for DELETE.
    pub fn fields(&self) -> &[FieldValue] {
        match self {
            Statement::Insert(s) => &s.fields,
            Statement::Update(s) => &s.fields,
            Statement::Delete(_) => &[],
        }
    }

    /// Ordered condition list. Empty for INSERT.
    pub fn conditions(&self) -> &[Condition] {
        match self {
            Statement::Insert(_) => &[],
            Statement::Update(s) => &s.conditions,
            Statement::Delete(s) => &s.conditions,
        }
    }

    /// Check if this statement has a WHERE clause.
    pub fn has_conditions(&self) -> bool {
        !self.conditions().is_empty()
    }

    /// Get the value bound to `column` in the field list.
    pub fn field(&self, column: &str) -> Option<&Value> {
        self.fields()
            .iter()
            .find(|f| f.column == column)
            .map(|f| &f.value)
    }
}

fn finite(column: &str, value: Value) -> Result<Value, Error> {
    match value.as_f64() {
        Some(v) if !v.is_finite() => Err(Error::NonFiniteValue {
            column: column.to_string(),
            value: v,
        }),
        _ => Ok(value),
    }
}

fn join_display<T: fmt::Display>(items: impl Iterator<Item = T>, sep: &str) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(sep)
}

fn write_where(f: &mut fmt::Formatter<'_>, conditions: &[Condition]) -> fmt::Result {
    if conditions.is_empty() {
        return Ok(());
    }
    write!(f, " WHERE {}", join_display(conditions.iter(), " "))
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table().unwrap_or_default();
        match self {
            Statement::Insert(s) => write!(
                f,
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                join_display(s.fields.iter().map(|fv| &fv.column), ", "),
                join_display(s.fields.iter().map(|fv| &fv.value), ", "),
            ),
            Statement::Update(s) => {
                write!(
                    f,
                    "UPDATE {} SET {}",
                    table,
                    join_display(
                        s.fields
                            .iter()
                            .map(|fv| format!("{} = {}", fv.column, fv.value)),
                        ", "
                    )
                )?;
                write_where(f, &s.conditions)
            }
            Statement::Delete(s) => {
                write!(f, "DELETE FROM {}", table)?;
                write_where(f, &s.conditions)
            }
        }
    }
}
