//! Single-statement enforcement.
//!
//! sqlx runs every `;`-separated statement in the text it is given, while
//! each operation here must run exactly one. SQL is tokenized with
//! [sqlparser](https://docs.rs/sqlparser/)'s SQLite dialect so that
//! semicolons inside strings, quoted identifiers and comments are not
//! mistaken for separators. Only tokenizing is done: whether the statement
//! itself is valid is left to SQLite.

use crate::error::{DbError, DbResult};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

pub const MULTIPLE_STATEMENTS: &str = "Only one SQL statement may be executed per call";

/// Reject `sql` unless it holds at most one statement.
///
/// Trailing semicolons, whitespace and comments after the statement are
/// allowed.
pub fn ensure_single_statement(sql: &str) -> DbResult<()> {
    let dialect = SQLiteDialect {};
    let tokens = Tokenizer::new(&dialect, sql)
        .tokenize()
        .map_err(|e| DbError::engine(format!("Failed to tokenize SQL: {}", e)))?;

    let trailing = tokens
        .iter()
        .skip_while(|token| !matches!(token, Token::SemiColon))
        .any(|token| !matches!(token, Token::SemiColon | Token::Whitespace(_) | Token::EOF));

    if trailing {
        return Err(DbError::engine(MULTIPLE_STATEMENTS));
    }
    Ok(())
}
