//! Raw query tool.
//!
//! This module implements the `query` operation: arbitrary SQL with
//! optional positional values, returning the produced rows.

use crate::db::SqliteHandler;
use crate::error::DbResult;
use crate::models::{JsonRow, QueryParam, QueryParamInput};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Input for the query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// SQL statement to execute. Use ? placeholders for values.
    pub sql: String,
    /// Values bound to the ? placeholders, in order of appearance
    #[serde(default)]
    pub values: Option<Vec<QueryParamInput>>,
}

pub struct QueryToolHandler {
    handler: Arc<SqliteHandler>,
}

impl QueryToolHandler {
    pub fn new(handler: Arc<SqliteHandler>) -> Self {
        Self { handler }
    }

    pub async fn query(&self, input: QueryInput) -> DbResult<Vec<JsonRow>> {
        let params: Vec<QueryParam> = input
            .values
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect();

        let rows = self.handler.execute_query(&input.sql, &params).await?;

        info!(row_count = rows.len(), "Query executed");
        Ok(rows)
    }
}
