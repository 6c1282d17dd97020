//! The closed set of operations the server exposes.
//!
//! Each [`OperationKind`] carries its wire name, description, failure
//! prefix and input schema. Arguments are parsed into [`OperationArgs`]
//! before anything touches the database.

use crate::error::{DbError, DbResult};
use crate::tools::query::QueryInput;
use crate::tools::records::{
    CreateRecordInput, DeleteRecordsInput, ReadRecordsInput, UpdateRecordsInput,
};
use crate::tools::schema::{DbInfoInput, GetTableSchemaInput, ListTablesInput};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// A JSON object, as received for tool arguments.
pub type JsonObject = serde_json::Map<String, JsonValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    DbInfo,
    Query,
    ListTables,
    GetTableSchema,
    CreateRecord,
    ReadRecords,
    UpdateRecords,
    DeleteRecords,
}

impl OperationKind {
    /// Every operation, in advertised order.
    pub const ALL: [OperationKind; 8] = [
        OperationKind::DbInfo,
        OperationKind::Query,
        OperationKind::ListTables,
        OperationKind::GetTableSchema,
        OperationKind::CreateRecord,
        OperationKind::ReadRecords,
        OperationKind::UpdateRecords,
        OperationKind::DeleteRecords,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::DbInfo => "db_info",
            Self::Query => "query",
            Self::ListTables => "list_tables",
            Self::GetTableSchema => "get_table_schema",
            Self::CreateRecord => "create_record",
            Self::ReadRecords => "read_records",
            Self::UpdateRecords => "update_records",
            Self::DeleteRecords => "delete_records",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::DbInfo => {
                "Get information about the SQLite database including path, existence, size, and table count"
            }
            Self::Query => {
                "Execute a raw SQL query against the database with optional parameter values"
            }
            Self::ListTables => {
                "List all user tables in the SQLite database (excludes system tables)"
            }
            Self::GetTableSchema => {
                "Get the schema information for a specific table including column details"
            }
            Self::CreateRecord => "Insert a new record into a table with specified data",
            Self::ReadRecords => {
                "Read records from a table with optional conditions, limit, and offset"
            }
            Self::UpdateRecords => "Update records in a table based on specified conditions",
            Self::DeleteRecords => "Delete records from a table based on specified conditions",
        }
    }

    /// Text prepended to engine failures raised by this operation.
    pub fn error_prefix(self) -> &'static str {
        match self {
            Self::DbInfo => "Error getting database info: ",
            Self::Query => "Error: ",
            Self::ListTables => "Error listing tables: ",
            Self::GetTableSchema => "Error getting schema: ",
            Self::CreateRecord => "Error creating record: ",
            Self::ReadRecords => "Error reading records: ",
            Self::UpdateRecords => "Error updating records: ",
            Self::DeleteRecords => "Error deleting records: ",
        }
    }

    /// Exact, case-sensitive lookup by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// JSON Schema of the arguments object.
    pub fn input_schema(self) -> JsonObject {
        match self {
            Self::DbInfo => schema_object::<DbInfoInput>(),
            Self::Query => schema_object::<QueryInput>(),
            Self::ListTables => schema_object::<ListTablesInput>(),
            Self::GetTableSchema => schema_object::<GetTableSchemaInput>(),
            Self::CreateRecord => schema_object::<CreateRecordInput>(),
            Self::ReadRecords => schema_object::<ReadRecordsInput>(),
            Self::UpdateRecords => schema_object::<UpdateRecordsInput>(),
            Self::DeleteRecords => schema_object::<DeleteRecordsInput>(),
        }
    }

    /// Validate `arguments` against this operation's input shape.
    pub fn parse_args(self, arguments: JsonObject) -> DbResult<OperationArgs> {
        Ok(match self {
            Self::DbInfo => OperationArgs::DbInfo(parse(self, arguments)?),
            Self::Query => OperationArgs::Query(parse(self, arguments)?),
            Self::ListTables => OperationArgs::ListTables(parse(self, arguments)?),
            Self::GetTableSchema => OperationArgs::GetTableSchema(parse(self, arguments)?),
            Self::CreateRecord => OperationArgs::CreateRecord(parse(self, arguments)?),
            Self::ReadRecords => OperationArgs::ReadRecords(parse(self, arguments)?),
            Self::UpdateRecords => OperationArgs::UpdateRecords(parse(self, arguments)?),
            Self::DeleteRecords => OperationArgs::DeleteRecords(parse(self, arguments)?),
        })
    }
}

/// Parsed arguments of one operation call.
#[derive(Debug, Clone)]
pub enum OperationArgs {
    DbInfo(DbInfoInput),
    Query(QueryInput),
    ListTables(ListTablesInput),
    GetTableSchema(GetTableSchemaInput),
    CreateRecord(CreateRecordInput),
    ReadRecords(ReadRecordsInput),
    UpdateRecords(UpdateRecordsInput),
    DeleteRecords(DeleteRecordsInput),
}

impl OperationArgs {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::DbInfo(_) => OperationKind::DbInfo,
            Self::Query(_) => OperationKind::Query,
            Self::ListTables(_) => OperationKind::ListTables,
            Self::GetTableSchema(_) => OperationKind::GetTableSchema,
            Self::CreateRecord(_) => OperationKind::CreateRecord,
            Self::ReadRecords(_) => OperationKind::ReadRecords,
            Self::UpdateRecords(_) => OperationKind::UpdateRecords,
            Self::DeleteRecords(_) => OperationKind::DeleteRecords,
        }
    }
}

/// Advertised entry for one operation.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    pub kind: OperationKind,
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Arc<JsonObject>,
}

/// Descriptors for every operation, built once at startup.
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    descriptors: Vec<OperationDescriptor>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        let descriptors = OperationKind::ALL
            .into_iter()
            .map(|kind| OperationDescriptor {
                kind,
                name: kind.name(),
                description: kind.description(),
                input_schema: Arc::new(kind.input_schema()),
            })
            .collect();
        Self { descriptors }
    }

    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn descriptors(&self) -> &[OperationDescriptor] {
        &self.descriptors
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse<T: DeserializeOwned>(kind: OperationKind, arguments: JsonObject) -> DbResult<T> {
    serde_json::from_value(JsonValue::Object(arguments))
        .map_err(|e| DbError::invalid_arguments(kind.name(), e.to_string()))
}

fn schema_object<T: JsonSchema>() -> JsonObject {
    let mut object = match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(JsonValue::Object(map)) => map,
        _ => JsonObject::new(),
    };
    object
        .entry("type")
        .or_insert_with(|| JsonValue::String("object".to_string()));
    object
}
