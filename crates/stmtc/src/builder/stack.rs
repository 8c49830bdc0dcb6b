//! Ordering of the statements produced by one build.

use stmtc_proto::{Statement, StatementKind};

/// Collects the owner statement, its cascaded statements and its join table
/// rows, and flattens them in an order the target store can apply.
///
/// Inserts create dependencies first: `[cascaded.., owner, joins..]`.
/// Updates and deletes detach first: `[joins.., owner, cascaded..]`.
/// Each cascaded build stays contiguous and keeps its generated order.
#[derive(Debug)]
pub struct StatementStack {
    kind: StatementKind,
    owner: Option<Statement>,
    cascaded: Vec<Statement>,
    joins: Vec<Statement>,
}

impl StatementStack {
    /// Create an empty stack for builds of `kind`.
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            owner: None,
            cascaded: Vec::new(),
            joins: Vec::new(),
        }
    }

    /// Set the statement of the entity being built.
    pub fn set_owner(&mut self, statement: Statement) {
        self.owner = Some(statement);
    }

    /// Append the statements of a cascaded build.
    pub fn push_cascaded(&mut self, stack: StatementStack) {
        self.cascaded.extend(stack.into_statements());
    }

    /// Append a join table row.
    pub fn push_join(&mut self, statement: Statement) {
        self.joins.push(statement);
    }

    /// Number of statements on the stack.
    pub fn len(&self) -> usize {
        usize::from(self.owner.is_some()) + self.cascaded.len() + self.joins.len()
    }

    /// Check if the stack holds no statements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into the final ordered sequence.
    pub fn into_statements(self) -> Vec<Statement> {
        let mut out = Vec::with_capacity(self.len());
        match self.kind {
            StatementKind::Insert => {
                out.extend(self.cascaded);
                out.extend(self.owner);
                out.extend(self.joins);
            }
            StatementKind::Update | StatementKind::Delete => {
                out.extend(self.joins);
                out.extend(self.owner);
                out.extend(self.cascaded);
            }
        }
        out
    }
}
