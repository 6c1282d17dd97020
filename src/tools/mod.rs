//! MCP tool implementations.
//!
//! This module contains all database tool handlers:
//! - `db_info`: Report file and connection information
//! - `query`: Execute raw SQL with optional positional values
//! - `list_tables`: List user tables
//! - `get_table_schema`: Get table column information
//! - `create_record`, `read_records`, `update_records`, `delete_records`:
//!   Structured CRUD over a single table
//!
//! [`OperationRouter`] ties them together behind one call entry point.

pub mod envelope;
pub mod operation;
pub mod query;
pub mod records;
pub mod router;
pub mod schema;

pub use envelope::{ContentBlock, ToolResponse};
pub use operation::{JsonObject, OperationArgs, OperationDescriptor, OperationKind, OperationRegistry};
pub use query::{QueryInput, QueryToolHandler};
pub use records::{
    CreateRecordInput, CreateRecordOutput, DeleteRecordsInput, ReadRecordsInput,
    RecordToolHandler, RowsAffectedOutput, UpdateRecordsInput,
};
pub use router::OperationRouter;
pub use schema::{DbInfoInput, DbInfoOutput, GetTableSchemaInput, ListTablesInput, SchemaToolHandler};
