//! Queries handed to the compiler in query mode.

use std::collections::HashMap;
use stmtc_proto::Value;

/// How the query text is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryForm {
    /// Object query language, addressing entities and fields.
    Object,
    /// Datastore-specific SQL. Never translated.
    Native,
}

/// A query text plus its parameter bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    text: String,
    form: QueryForm,
    parameters: HashMap<String, Value>,
}

impl Query {
    /// Create an object-language query.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            form: QueryForm::Object,
            parameters: HashMap::new(),
        }
    }

    /// Create a native query.
    pub fn native(sql: impl Into<String>) -> Self {
        Self {
            form: QueryForm::Native,
            ..Self::new(sql)
        }
    }

    /// Bind a named parameter (`:name`).
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_parameter(name, value);
        self
    }

    /// Bind a positional parameter (`?1`).
    pub fn with_position(self, position: usize, value: impl Into<Value>) -> Self {
        self.with_parameter(position.to_string(), value)
    }

    /// Bind a named parameter in place, replacing an earlier binding.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.parameters.insert(name.into(), value.into());
    }

    /// Get the query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the query form.
    pub fn form(&self) -> QueryForm {
        self.form
    }

    /// Get the value bound to a parameter.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }
}
