//! Schema-related data models.
//!
//! This module defines the shapes returned by table listing and
//! `PRAGMA table_info` introspection.

use serde::{Deserialize, Serialize};

/// A user table, as reported by `list_tables`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub name: String,
}

impl TableEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One column of a table, field names as SQLite reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Zero-based column position
    pub cid: i64,
    pub name: String,
    /// Declared type, empty when the column has none
    #[serde(rename = "type")]
    pub data_type: String,
    pub notnull: bool,
    /// Default value expression as written in the DDL
    pub dflt_value: Option<String>,
    /// 1-based position within the primary key, 0 if not part of it
    pub pk: i64,
}

impl ColumnInfo {
    /// Create a column with no constraints.
    pub fn new(cid: i64, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            cid,
            name: name.into(),
            data_type: data_type.into(),
            notnull: false,
            dflt_value: None,
            pk: 0,
        }
    }

    /// Set the NOT NULL flag.
    pub fn with_notnull(mut self, notnull: bool) -> Self {
        self.notnull = notnull;
        self
    }

    /// Set the default value expression.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.dflt_value = Some(default.into());
        self
    }

    /// Set the primary key position.
    pub fn with_pk(mut self, pk: i64) -> Self {
        self.pk = pk;
        self
    }
}
