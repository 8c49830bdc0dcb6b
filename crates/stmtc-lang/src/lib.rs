//! stmtc query language tokenizer.
//!
//! The statement compiler accepts a small object query language for bulk
//! updates and deletes:
//!
//! ```text
//! UPDATE Employee e SET e.salary = :s WHERE e.name = :n
//! DELETE FROM Employee e WHERE e.id = ?1 OR e.salary < 1000
//! ```
//!
//! This crate turns such text into a flat sequence of classified tokens.
//! Tokenizing never fails; structural validation belongs to the consumer,
//! which walks the tokens with a [`TokenCursor`] and reports [`ParseError`]s.
//!
//! # Usage
//!
//! ```rust
//! use stmtc_lang::{tokenize, TokenKind};
//!
//! let tokens = tokenize("DELETE FROM Employee e WHERE e.id = :id");
//! assert_eq!(tokens[0].kind, TokenKind::Delete);
//! assert_eq!(tokens.last().and_then(|t| t.param_name()), Some("id"));
//! ```

pub mod error;
pub mod lexer;
pub mod span;

pub use error::ParseError;
pub use lexer::{tokenize, Lexer, Token, TokenCursor, TokenKind};
pub use span::Span;
