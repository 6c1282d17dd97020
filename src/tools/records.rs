//! Record (CRUD) tools.
//!
//! This module implements `create_record`, `read_records`, `update_records`
//! and `delete_records`. The SQL for each is built by
//! [`crate::db::Statement`].

use crate::db::SqliteHandler;
use crate::error::DbResult;
use crate::models::JsonRow;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Input for the create_record tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateRecordInput {
    /// Table to insert into
    pub table: String,
    /// Column names mapped to the values to insert
    pub data: JsonRow,
}

/// Input for the read_records tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadRecordsInput {
    /// Table to read from
    pub table: String,
    /// Column names mapped to required values (combined with AND)
    #[serde(default)]
    pub conditions: Option<JsonRow>,
    /// Maximum number of rows to return
    #[serde(default)]
    pub limit: Option<f64>,
    /// Rows to skip; only applied together with limit
    #[serde(default)]
    pub offset: Option<f64>,
}

/// Input for the update_records tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateRecordsInput {
    /// Table to update
    pub table: String,
    /// Column names mapped to their new values
    pub data: JsonRow,
    /// Column names mapped to required values (combined with AND)
    pub conditions: JsonRow,
}

/// Input for the delete_records tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteRecordsInput {
    /// Table to delete from
    pub table: String,
    /// Column names mapped to required values (combined with AND)
    pub conditions: JsonRow,
}

/// Output from the create_record tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordOutput {
    pub message: String,
    /// Rowid of the inserted record
    pub inserted_id: i64,
}

/// Output from the update_records and delete_records tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsAffectedOutput {
    pub message: String,
    pub rows_affected: u64,
}

pub struct RecordToolHandler {
    handler: Arc<SqliteHandler>,
}

impl RecordToolHandler {
    pub fn new(handler: Arc<SqliteHandler>) -> Self {
        Self { handler }
    }

    pub async fn create_record(&self, input: CreateRecordInput) -> DbResult<CreateRecordOutput> {
        let result = self.handler.create_record(&input.table, &input.data).await?;

        info!(
            table = %input.table,
            inserted_id = result.last_insert_id,
            "Record created"
        );

        Ok(CreateRecordOutput {
            message: "Record created successfully".to_string(),
            inserted_id: result.last_insert_id,
        })
    }

    pub async fn read_records(&self, input: ReadRecordsInput) -> DbResult<Vec<JsonRow>> {
        let rows = self
            .handler
            .read_records(
                &input.table,
                input.conditions.as_ref(),
                input.limit,
                input.offset,
            )
            .await?;

        info!(table = %input.table, row_count = rows.len(), "Records read");
        Ok(rows)
    }

    pub async fn update_records(&self, input: UpdateRecordsInput) -> DbResult<RowsAffectedOutput> {
        let result = self
            .handler
            .update_records(&input.table, &input.data, &input.conditions)
            .await?;

        info!(
            table = %input.table,
            rows_affected = result.rows_affected,
            "Records updated"
        );

        Ok(RowsAffectedOutput {
            message: "Records updated successfully".to_string(),
            rows_affected: result.rows_affected,
        })
    }

    pub async fn delete_records(&self, input: DeleteRecordsInput) -> DbResult<RowsAffectedOutput> {
        let result = self
            .handler
            .delete_records(&input.table, &input.conditions)
            .await?;

        info!(
            table = %input.table,
            rows_affected = result.rows_affected,
            "Records deleted"
        );

        Ok(RowsAffectedOutput {
            message: "Records deleted successfully".to_string(),
            rows_affected: result.rows_affected,
        })
    }
}
