//! Data models for the SQLite MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod query;
pub mod schema;

// Re-export commonly used types
pub use query::{JsonRow, QueryParam, QueryParamInput, RunResult};
pub use schema::{ColumnInfo, TableEntry};
