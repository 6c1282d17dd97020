//! Operation dispatch.
//!
//! [`OperationRouter::call`] is the single entry point every transport goes
//! through: it resolves the operation name, validates the arguments, runs the
//! operation and folds any failure into a [`ToolResponse`].

use crate::db::SqliteHandler;
use crate::error::{DbError, DbResult};
use crate::tools::envelope::ToolResponse;
use crate::tools::operation::{JsonObject, OperationArgs, OperationRegistry};
use crate::tools::query::QueryToolHandler;
use crate::tools::records::RecordToolHandler;
use crate::tools::schema::SchemaToolHandler;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct OperationRouter {
    registry: OperationRegistry,
    schema_tools: SchemaToolHandler,
    query_tool: QueryToolHandler,
    record_tools: RecordToolHandler,
}

impl OperationRouter {
    pub fn new(handler: Arc<SqliteHandler>) -> Self {
        Self {
            registry: OperationRegistry::new(),
            schema_tools: SchemaToolHandler::new(handler.clone()),
            query_tool: QueryToolHandler::new(handler.clone()),
            record_tools: RecordToolHandler::new(handler),
        }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Run operation `name` with `arguments` (absent means `{}`).
    ///
    /// Never fails: unknown names, bad arguments and engine errors all come
    /// back as failure envelopes.
    pub async fn call(&self, name: &str, arguments: Option<JsonObject>) -> ToolResponse {
        let Some(descriptor) = self.registry.get(name) else {
            let err = DbError::unknown_operation(name);
            warn!(operation = %name, kind = ?err.kind(), "Unknown operation requested");
            return ToolResponse::failure("", &err);
        };
        let kind = descriptor.kind;

        debug!(operation = kind.name(), "Dispatching operation");

        let outcome = match kind.parse_args(arguments.unwrap_or_default()) {
            Ok(args) => self.dispatch(args).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    operation = kind.name(),
                    kind = ?err.kind(),
                    code = err.code(),
                    error = %err,
                    "Operation failed"
                );
                ToolResponse::failure(kind.error_prefix(), &err)
            }
        }
    }

    async fn dispatch(&self, args: OperationArgs) -> DbResult<ToolResponse> {
        let response = match args {
            OperationArgs::DbInfo(input) => {
                ToolResponse::json(&self.schema_tools.db_info(input).await?)
            }
            OperationArgs::Query(input) => ToolResponse::json(&self.query_tool.query(input).await?),
            OperationArgs::ListTables(input) => {
                ToolResponse::json(&self.schema_tools.list_tables(input).await?)
            }
            OperationArgs::GetTableSchema(input) => {
                ToolResponse::json(&self.schema_tools.get_table_schema(input).await?)
            }
            OperationArgs::CreateRecord(input) => {
                ToolResponse::json(&self.record_tools.create_record(input).await?)
            }
            OperationArgs::ReadRecords(input) => {
                ToolResponse::json(&self.record_tools.read_records(input).await?)
            }
            OperationArgs::UpdateRecords(input) => {
                ToolResponse::json(&self.record_tools.update_records(input).await?)
            }
            OperationArgs::DeleteRecords(input) => {
                ToolResponse::json(&self.record_tools.delete_records(input).await?)
            }
        };
        Ok(response)
    }
}
