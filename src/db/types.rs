//! SQLite value to JSON mapping.
//!
//! SQLite is dynamically typed: a column declared `INTEGER` may hold text,
//! and expression columns carry no declared type at all. Values are therefore
//! classified by the storage class of the value itself, not by the column
//! declaration.

use crate::models::JsonRow;
use serde_json::Value as JsonValue;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// SQLite storage class of a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Null,
    Integer,
    Real,
    Text,
    Blob,
}

/// Classify a value type name as reported by the engine.
pub fn storage_class(type_name: &str) -> StorageClass {
    match type_name.to_ascii_uppercase().as_str() {
        "NULL" => StorageClass::Null,
        "INTEGER" | "INT" | "INT8" | "BIGINT" | "BOOLEAN" => StorageClass::Integer,
        "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => StorageClass::Real,
        "BLOB" => StorageClass::Blob,
        _ => StorageClass::Text,
    }
}

/// Encode blob bytes for JSON transport.
pub fn encode_blob(bytes: &[u8]) -> JsonValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    JsonValue::String(STANDARD.encode(bytes))
}

/// Trait for converting database rows to JSON maps.
pub trait RowToJson {
    fn to_json_map(&self) -> JsonRow;
}

impl RowToJson for SqliteRow {
    fn to_json_map(&self) -> JsonRow {
        self.columns()
            .iter()
            .map(|col| (col.name().to_string(), decode_column(self, col.ordinal())))
            .collect()
    }
}

fn decode_column(row: &SqliteRow, idx: usize) -> JsonValue {
    let class = match row.try_get_raw(idx) {
        Ok(value) if value.is_null() => StorageClass::Null,
        Ok(value) => storage_class(value.type_info().name()),
        Err(_) => return JsonValue::Null,
    };

    match class {
        StorageClass::Null => JsonValue::Null,
        StorageClass::Integer => row
            .try_get_unchecked::<i64, _>(idx)
            .map(|v| JsonValue::Number(v.into()))
            .unwrap_or(JsonValue::Null),
        StorageClass::Real => row
            .try_get_unchecked::<f64, _>(idx)
            .map(|v| {
                serde_json::Number::from_f64(v)
                    .map(JsonValue::Number)
                    .unwrap_or_else(|| JsonValue::String(v.to_string()))
            })
            .unwrap_or(JsonValue::Null),
        StorageClass::Blob => row
            .try_get_unchecked::<Vec<u8>, _>(idx)
            .map(|v| encode_blob(&v))
            .unwrap_or(JsonValue::Null),
        StorageClass::Text => row
            .try_get_unchecked::<String, _>(idx)
            .map(JsonValue::String)
            .unwrap_or(JsonValue::Null),
    }
}
