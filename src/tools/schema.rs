//! Schema introspection tools.
//!
//! This module implements the `db_info`, `list_tables` and
//! `get_table_schema` operations.

use crate::db::SqliteHandler;
use crate::error::DbResult;
use crate::models::{ColumnInfo, TableEntry};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Input for the db_info tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DbInfoInput {}

/// Input for the list_tables tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListTablesInput {}

/// Input for the get_table_schema tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTableSchemaInput {
    /// Name of the table to describe
    #[serde(rename = "tableName")]
    pub table_name: String,
}

/// Output from the db_info tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbInfoOutput {
    /// Absolute path of the database file
    pub db_path: String,
    pub exists: bool,
    /// File size in bytes, 0 when the file does not exist
    pub size: u64,
    pub size_human: String,
    /// RFC 3339 modification time
    pub last_modified: Option<String>,
    /// User tables currently in the database
    pub table_count: i64,
    /// Whether the database was opened successfully at startup
    pub connected: bool,
}

/// Format bytes as human-readable size string.
///
/// Uses binary units (1 KB = 1024 bytes), via the `humansize` WINDOWS preset.
///
/// # Examples
///
/// ```
/// use sqlite_mcp_server::tools::schema::format_size;
///
/// assert_eq!(format_size(512), "512 B");
/// ```
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::WINDOWS)
}

pub struct SchemaToolHandler {
    handler: Arc<SqliteHandler>,
}

impl SchemaToolHandler {
    pub fn new(handler: Arc<SqliteHandler>) -> Self {
        Self { handler }
    }

    pub async fn db_info(&self, _input: DbInfoInput) -> DbResult<DbInfoOutput> {
        let path = self.handler.path();
        let (exists, size, last_modified) = match tokio::fs::metadata(path).await {
            Ok(meta) => (
                true,
                meta.len(),
                meta.modified()
                    .ok()
                    .map(|t| DateTime::<Utc>::from(t).to_rfc3339()),
            ),
            Err(_) => (false, 0, None),
        };

        let table_count = self.handler.count_tables().await?;

        Ok(DbInfoOutput {
            db_path: path.display().to_string(),
            exists,
            size,
            size_human: format_size(size),
            last_modified,
            table_count,
            connected: self.handler.is_connected(),
        })
    }

    pub async fn list_tables(&self, _input: ListTablesInput) -> DbResult<Vec<TableEntry>> {
        let tables = self.handler.list_tables().await?;

        info!(count = tables.len(), "Listed tables");
        Ok(tables)
    }

    pub async fn get_table_schema(&self, input: GetTableSchemaInput) -> DbResult<Vec<ColumnInfo>> {
        let columns = self.handler.get_table_schema(&input.table_name).await?;

        info!(
            table = %input.table_name,
            columns = columns.len(),
            "Described table"
        );
        Ok(columns)
    }
}
