//! `--param name=value` parsing.

use crate::error::CliError;
use stmtc::{tokenize, Token, Value};

/// Parse one `name=value` argument.
///
/// The value is read as a query literal when it is one (`42`, `2.5`, `'text'`,
/// `TRUE`, `NULL`); anything else is taken as a plain string.
pub fn parse_param(arg: &str) -> Result<(String, Value), CliError> {
    let (name, raw) = arg
        .split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .ok_or_else(|| CliError::Param(arg.to_string()))?;

    let name = name.trim().trim_start_matches([':', '?']).to_string();
    Ok((name, literal_or_string(raw)))
}

fn literal_or_string(raw: &str) -> Value {
    let tokens: Vec<Token> = tokenize(raw.trim())
        .into_iter()
        .filter(Token::is_significant)
        .collect();
    match tokens.as_slice() {
        [single] => single
            .literal_value()
            .unwrap_or_else(|| Value::from(raw)),
        _ => Value::from(raw),
    }
}
