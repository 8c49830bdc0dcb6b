//! Tokenizer for the object query language using logos.
//!
//! Tokenizing is total: every input produces a token sequence. Characters
//! that start no valid token come out as [`TokenKind::Unknown`] and are left
//! for the consumer to reject.

use crate::error::ParseError;
use crate::span::Span;
use logos::Logos;
use std::fmt;
use stmtc_proto::{CompareOp, LogicOp, Value};

/// Token classes of the query language.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Statement keywords
    #[token("select", ignore(ascii_case))]
    Select,
    #[token("update", ignore(ascii_case))]
    Update,
    #[token("delete", ignore(ascii_case))]
    Delete,
    #[token("insert", ignore(ascii_case))]
    Insert,

    // Clause keywords
    #[token("into", ignore(ascii_case))]
    Into,
    #[token("values", ignore(ascii_case))]
    Values,
    #[token("from", ignore(ascii_case))]
    From,
    #[token("set", ignore(ascii_case))]
    Set,
    #[token("where", ignore(ascii_case))]
    Where,

    #[token("and", ignore(ascii_case))]
    #[token("or", ignore(ascii_case))]
    LogicOp,

    // Keyword literals
    #[token("true", ignore(ascii_case))]
    True,
    #[token("false", ignore(ascii_case))]
    False,
    #[token("null", ignore(ascii_case))]
    Null,

    /// Bare identifier: entity names and aliases.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    /// Alias-qualified path such as `e.salary`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)+")]
    Column,

    /// Named (`:name`) or positional (`?1`) placeholder.
    #[regex(r":[A-Za-z_][A-Za-z0-9_]*")]
    #[regex(r"\?[0-9]+")]
    Param,

    #[token("=")]
    #[token("<>")]
    #[token("!=")]
    #[token("<")]
    #[token("<=")]
    #[token(">")]
    #[token(">=")]
    CompareOp,

    /// Single-quoted string, `''` escapes a quote.
    #[regex(r"'([^']|'')*'")]
    QuotedString,

    /// Hex byte string such as `X'dead'`.
    #[regex(r"[xX]'([0-9a-fA-F][0-9a-fA-F])*'")]
    HexString,

    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    /// A run of whitespace, collapsed into one token.
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    /// Input the tokenizer could not classify.
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Select => "SELECT",
            TokenKind::Update => "UPDATE",
            TokenKind::Delete => "DELETE",
            TokenKind::Insert => "INSERT",
            TokenKind::Into => "INTO",
            TokenKind::Values => "VALUES",
            TokenKind::From => "FROM",
            TokenKind::Set => "SET",
            TokenKind::Where => "WHERE",
            TokenKind::LogicOp => "AND/OR",
            TokenKind::True | TokenKind::False => "boolean literal",
            TokenKind::Null => "NULL",
            TokenKind::Ident => "identifier",
            TokenKind::Column => "column",
            TokenKind::Param => "parameter",
            TokenKind::CompareOp => "comparison operator",
            TokenKind::QuotedString => "string literal",
            TokenKind::HexString => "hex literal",
            TokenKind::Number => "number",
            TokenKind::Comma => "','",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Unknown => "unrecognized input",
        })
    }
}

/// A classified slice of the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'source> {
    pub kind: TokenKind,
    pub text: &'source str,
    pub span: Span,
}

impl<'source> Token<'source> {
    /// Check if the token matters to the grammar (is not whitespace).
    pub fn is_significant(&self) -> bool {
        self.kind != TokenKind::Whitespace
    }

    /// Literal value of a string, hex, number or keyword literal.
    pub fn literal_value(&self) -> Option<Value> {
        match self.kind {
            TokenKind::QuotedString => {
                let inner = &self.text[1..self.text.len() - 1];
                Some(Value::String(inner.replace("''", "'")))
            }
            TokenKind::HexString => hex::decode(&self.text[2..self.text.len() - 1])
                .ok()
                .map(Value::Bytes),
            TokenKind::Number if self.text.contains('.') => {
                self.text.parse::<f64>().ok().map(Value::Float64)
            }
            TokenKind::Number => self.text.parse::<i64>().ok().map(Value::Int64),
            TokenKind::True => Some(Value::Bool(true)),
            TokenKind::False => Some(Value::Bool(false)),
            TokenKind::Null => Some(Value::Null),
            _ => None,
        }
    }

    /// Binding name of a placeholder: `name` for `:name`, `1` for `?1`.
    pub fn param_name(&self) -> Option<&'source str> {
        match self.kind {
            TokenKind::Param => Some(&self.text[1..]),
            _ => None,
        }
    }

    /// Split a column token into its alias and field path.
    pub fn column_path(&self) -> Option<(&'source str, &'source str)> {
        match self.kind {
            TokenKind::Column => self.text.split_once('.'),
            _ => None,
        }
    }

    /// Comparison operator of a comparison token.
    pub fn compare_op(&self) -> Option<CompareOp> {
        match self.kind {
            TokenKind::CompareOp => CompareOp::from_symbol(self.text),
            _ => None,
        }
    }

    /// Connective of a logic token.
    pub fn logic_op(&self) -> Option<LogicOp> {
        match self.kind {
            TokenKind::LogicOp => LogicOp::from_keyword(self.text),
            _ => None,
        }
    }
}

/// Lexer that produces tokens with their text and span.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, TokenKind>,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
        }
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Token<'source>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?.unwrap_or(TokenKind::Unknown);
        Some(Token {
            kind,
            text: self.inner.slice(),
            span: self.inner.span().into(),
        })
    }
}

/// Tokenize a source string. Never fails.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).collect()
}

/// Forward-only cursor over the significant tokens of a query.
///
/// Whitespace is skipped. Structural checks are made with [`TokenCursor::expect`],
/// which reports a [`ParseError`] pointing at the offending token or at the
/// end of the input.
pub struct TokenCursor<'source> {
    source: &'source str,
    tokens: Vec<Token<'source>>,
    pos: usize,
}

impl<'source> TokenCursor<'source> {
    /// Tokenize `source` and position the cursor at its start.
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            tokens: tokenize(source)
                .into_iter()
                .filter(Token::is_significant)
                .collect(),
            pos: 0,
        }
    }

    /// Get the source string.
    pub fn source(&self) -> &'source str {
        self.source
    }

    /// Consume the next token, which must be of `kind`.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'source>, ParseError> {
        self.expect_one_of(&[kind], &kind.to_string())
    }

    /// Consume the next token, which must be one of `kinds`.
    ///
    /// `what` describes the expected token in the error message.
    pub fn expect_one_of(
        &mut self,
        kinds: &[TokenKind],
        what: &str,
    ) -> Result<Token<'source>, ParseError> {
        match self.next() {
            Some(token) if kinds.contains(&token.kind) => Ok(token),
            Some(token) => Err(ParseError::new(
                format!("expected {}, found '{}'", what, token.text),
                token.span,
            )),
            None => Err(ParseError::new(
                format!("expected {}, found end of input", what),
                Span::eof(self.source),
            )),
        }
    }
}

impl<'source> Iterator for TokenCursor<'source> {
    type Item = Token<'source>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.tokens.get(self.pos).copied()?;
        self.pos += 1;
        Some(token)
    }
}
