//! Query mode: update and delete statements from object query text.
//!
//! Accepted forms:
//!
//! ```text
//! UPDATE <entity> <alias> SET <alias>.<field> = <value> [, ...] [WHERE <cond> [(AND|OR) <cond>]*]
//! DELETE FROM <entity> <alias> [WHERE <cond> [(AND|OR) <cond>]*]
//! ```
//!
//! A value is a `:name` or `?N` placeholder or an inline literal. Query mode
//! touches exactly one table: it never follows cascades or writes join rows,
//! and fields can only be addressed one level deep.

use super::StatementBuilder;
use crate::error::{Error, Result};
use crate::query::{Query, QueryForm};
use stmtc_core::{EntityDef, FieldDef};
use stmtc_lang::{ParseError, Token, TokenCursor, TokenKind};
use stmtc_proto::{CompareOp, Statement, StatementKind, Value};
use tracing::{debug, info};

const VALUE_TOKENS: &[TokenKind] = &[
    TokenKind::Param,
    TokenKind::QuotedString,
    TokenKind::HexString,
    TokenKind::Number,
    TokenKind::True,
    TokenKind::False,
    TokenKind::Null,
];

/// Statement kind a query compiles to, judged by its leading keyword.
pub fn query_kind(query: &Query) -> Result<StatementKind> {
    if query.form() == QueryForm::Native {
        return Err(native_rejected());
    }
    let mut cursor = TokenCursor::new(query.text());
    let token = cursor.expect_one_of(
        &[
            TokenKind::Update,
            TokenKind::Delete,
            TokenKind::Select,
            TokenKind::Insert,
        ],
        "UPDATE or DELETE",
    )?;
    match token.kind {
        TokenKind::Update => Ok(StatementKind::Update),
        TokenKind::Delete => Ok(StatementKind::Delete),
        _ => Err(Error::UnsupportedQueryForm(format!(
            "{} queries produce no migration statements",
            token.text.to_ascii_uppercase()
        ))),
    }
}

fn native_rejected() -> Error {
    Error::UnsupportedQueryForm("native queries cannot be translated".to_string())
}

/// Where the scanner is in the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Set,
    Where,
    /// Before WHERE in a DELETE.
    Head,
}

impl Clause {
    fn name(self) -> &'static str {
        match self {
            Clause::Set => "SET",
            Clause::Where => "WHERE",
            Clause::Head => "FROM",
        }
    }
}

impl<'a> StatementBuilder<'a> {
    /// Pick the builder for a query by its leading keyword.
    pub fn for_query(catalog: &'a stmtc_core::Catalog, query: &Query) -> Result<Self> {
        Ok(Self::new(catalog, query_kind(query)?))
    }

    /// Build the statement for an update or delete query.
    ///
    /// The result always holds a single statement.
    pub fn build_query(&self, query: &Query) -> Result<Vec<Statement>> {
        if query.form() == QueryForm::Native {
            return Err(native_rejected());
        }
        info!(kind = %self.kind, query = %query.text(), "compiling query");

        let mut cursor = TokenCursor::new(query.text());
        let (def, alias) = self.scan_head(&mut cursor)?;
        let mut statement = Statement::with_table(self.kind, def.table.as_str());

        let mut clause = match self.kind {
            StatementKind::Update => Clause::Set,
            _ => Clause::Head,
        };
        // True while a comparison or assignment is required next.
        let mut expect_term = clause == Clause::Set;

        while let Some(token) = cursor.next() {
            match token.kind {
                TokenKind::Column if clause == Clause::Head => {
                    return Err(stmtc_proto::Error::UnsupportedField {
                        kind: self.kind,
                        column: token.text.to_string(),
                    }
                    .into());
                }
                TokenKind::Column if expect_term => {
                    let field = resolve_column(self.catalog, self.kind, def, alias, &token)?;
                    let op_token = cursor.expect(TokenKind::CompareOp)?;
                    let op = op_token.compare_op().ok_or_else(|| Error::UnsupportedOperator {
                        op: op_token.text.to_string(),
                        clause: clause.name(),
                    })?;
                    let value = read_value(&mut cursor, query)?;
                    debug!(
                        clause = clause.name(),
                        field = %field.name,
                        column = %field.column,
                        value = %value,
                        "query term"
                    );

                    if clause == Clause::Set {
                        if op != CompareOp::Equal {
                            return Err(Error::UnsupportedOperator {
                                op: op_token.text.to_string(),
                                clause: clause.name(),
                            });
                        }
                        statement.add_field(field.column.as_str(), value)?;
                    } else {
                        statement.add_condition(field.column.as_str(), op, value)?;
                    }
                    expect_term = false;
                }
                TokenKind::Comma if clause == Clause::Set && !expect_term => expect_term = true,
                TokenKind::Where if clause != Clause::Where && !expect_term => {
                    clause = Clause::Where;
                    expect_term = true;
                }
                TokenKind::LogicOp if clause == Clause::Where && !expect_term => {
                    if let Some(op) = token.logic_op() {
                        statement.add_connective(op)?;
                    }
                    expect_term = true;
                }
                _ => return Err(unexpected(&token, expect_term).into()),
            }
        }

        if expect_term {
            return Err(ParseError::new(
                format!("expected column after {}, found end of input", clause.name()),
                stmtc_lang::Span::eof(cursor.source()),
            )
            .into());
        }
        Ok(vec![statement])
    }

    /// Read the statement head up to the alias and resolve the entity.
    fn scan_head<'s>(&self, cursor: &mut TokenCursor<'s>) -> Result<(&'a EntityDef, &'s str)> {
        match self.kind {
            StatementKind::Update => {
                cursor.expect(TokenKind::Update)?;
            }
            StatementKind::Delete => {
                cursor.expect(TokenKind::Delete)?;
                cursor.expect(TokenKind::From)?;
            }
            StatementKind::Insert => {
                return Err(Error::UnsupportedQueryForm(
                    "INSERT statements are only built from entities".to_string(),
                ));
            }
        }

        let entity = cursor.expect(TokenKind::Ident)?;
        let def = self.catalog.entity_for_table(entity.text)?;
        let alias = cursor.expect(TokenKind::Ident).map_err(|e| {
            e.with_hint(format!(
                "name an alias after the entity, as in '{} x'",
                entity.text
            ))
        })?;
        if self.kind == StatementKind::Update {
            cursor.expect(TokenKind::Set)?;
        }
        Ok((def, alias.text))
    }
}

fn resolve_column<'c>(
    catalog: &'c stmtc_core::Catalog,
    kind: StatementKind,
    def: &EntityDef,
    alias: &str,
    token: &Token<'_>,
) -> Result<&'c FieldDef> {
    let Some((prefix, path)) = token.column_path() else {
        return Err(unexpected(token, true).into());
    };
    if prefix != alias {
        return Err(ParseError::new(
            format!("column '{}' is not qualified by alias '{}'", token.text, alias),
            token.span,
        )
        .with_hint(format!("write '{}.{}'", alias, path))
        .into());
    }

    let unsupported = || stmtc_proto::Error::UnsupportedField {
        kind,
        column: token.text.to_string(),
    };
    // Navigating into related entities would touch other tables.
    if path.contains('.') {
        return Err(unsupported().into());
    }
    let field = catalog.field(&def.name, path)?;
    if let Some(relation) = field.relation_def() {
        if !relation.is_owning() || relation.cardinality.is_collection() {
            return Err(unsupported().into());
        }
    }
    Ok(field)
}

fn read_value(cursor: &mut TokenCursor<'_>, query: &Query) -> Result<Value> {
    let token = cursor.expect_one_of(VALUE_TOKENS, "parameter or literal")?;
    if let Some(name) = token.param_name() {
        return query
            .parameter(name)
            .cloned()
            .ok_or_else(|| Error::MissingParameter(name.to_string()));
    }
    token.literal_value().ok_or_else(|| {
        ParseError::new(format!("invalid literal '{}'", token.text), token.span).into()
    })
}

fn unexpected(token: &Token<'_>, expect_term: bool) -> ParseError {
    let message = match token.kind {
        TokenKind::Comma | TokenKind::LParen | TokenKind::RParen | TokenKind::Unknown => {
            format!("unexpected '{}'", token.text)
        }
        kind => format!("unexpected {} '{}'", kind, token.text),
    };
    let err = ParseError::new(message, token.span);
    match (expect_term, token.kind) {
        (true, TokenKind::Ident) => err.with_hint("qualify columns with the entity alias"),
        (_, TokenKind::LParen | TokenKind::RParen) => {
            err.with_hint("grouped conditions are not supported")
        }
        _ => err,
    }
}
