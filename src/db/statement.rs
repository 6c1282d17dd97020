//! SQL statement construction.
//!
//! Every statement the server builds from structured arguments is assembled
//! here. Values always travel as bound `?` parameters. Table and column names
//! do not: SQLite cannot bind identifiers, so they are written into the SQL
//! text verbatim by [`push_identifier`]. Nothing checks them against the live
//! schema; a malformed name only surfaces when the engine rejects the
//! statement.

use crate::models::{JsonRow, QueryParam};

/// User tables, excluding SQLite's internal `sqlite_` catalog.
pub const LIST_TABLES: &str =
    "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'";

pub const COUNT_TABLES: &str =
    "SELECT count(*) AS count FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'";

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl Statement {
    /// `INSERT INTO <table> (<cols>) VALUES (?, ...)`, columns in key order.
    pub fn insert(table: &str, data: &JsonRow) -> Self {
        let mut sql = String::from("INSERT INTO ");
        push_identifier(&mut sql, table);
        sql.push_str(" (");
        for (i, column) in data.keys().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            push_identifier(&mut sql, column);
        }
        sql.push_str(") VALUES (");
        sql.push_str(&vec!["?"; data.len()].join(", "));
        sql.push(')');

        Self {
            sql,
            params: data.values().map(QueryParam::from).collect(),
        }
    }

    /// `SELECT * FROM <table>` with optional equality filter and paging.
    ///
    /// `limit` and `offset` are written into the text; `offset` is dropped
    /// when no `limit` is given.
    pub fn select(
        table: &str,
        conditions: Option<&JsonRow>,
        limit: Option<f64>,
        offset: Option<f64>,
    ) -> Self {
        let mut sql = String::from("SELECT * FROM ");
        push_identifier(&mut sql, table);
        let mut params = Vec::new();

        if let Some(conditions) = conditions.filter(|c| !c.is_empty()) {
            sql.push_str(" WHERE ");
            push_assignments(&mut sql, conditions, " AND ");
            params.extend(conditions.values().map(QueryParam::from));
        }

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
            if let Some(offset) = offset {
                sql.push_str(&format!(" OFFSET {}", offset));
            }
        }

        Self { sql, params }
    }

    /// `UPDATE <table> SET ... WHERE ...`; `data` values bind before
    /// `conditions` values, matching placeholder order in the text.
    pub fn update(table: &str, data: &JsonRow, conditions: &JsonRow) -> Self {
        let mut sql = String::from("UPDATE ");
        push_identifier(&mut sql, table);
        sql.push_str(" SET ");
        push_assignments(&mut sql, data, ", ");
        sql.push_str(" WHERE ");
        push_assignments(&mut sql, conditions, " AND ");

        let params = data
            .values()
            .chain(conditions.values())
            .map(QueryParam::from)
            .collect();

        Self { sql, params }
    }

    /// `DELETE FROM <table> WHERE ...`
    pub fn delete(table: &str, conditions: &JsonRow) -> Self {
        let mut sql = String::from("DELETE FROM ");
        push_identifier(&mut sql, table);
        sql.push_str(" WHERE ");
        push_assignments(&mut sql, conditions, " AND ");

        Self {
            sql,
            params: conditions.values().map(QueryParam::from).collect(),
        }
    }

    /// `PRAGMA table_info(<table>)`
    pub fn table_info(table: &str) -> Self {
        let mut sql = String::from("PRAGMA table_info(");
        push_identifier(&mut sql, table);
        sql.push(')');

        Self {
            sql,
            params: Vec::new(),
        }
    }
}

/// Write a caller-supplied identifier into the SQL text, unquoted and
/// unchecked.
fn push_identifier(sql: &mut String, identifier: &str) {
    sql.push_str(identifier);
}

/// `<col> = ?` for every key, joined by `separator`.
fn push_assignments(sql: &mut String, columns: &JsonRow, separator: &str) {
    for (i, column) in columns.keys().enumerate() {
        if i > 0 {
            sql.push_str(separator);
        }
        push_identifier(sql, column);
        sql.push_str(" = ?");
    }
}
