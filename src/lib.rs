//! SQLite MCP Server Library
//!
//! This library exposes a single SQLite database to AI assistants as a small
//! set of MCP tools: raw queries, schema introspection and structured
//! single-table CRUD.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use db::SqliteHandler;
pub use error::{DbError, DbResult};
pub use mcp::SqliteService;
pub use tools::{OperationRouter, ToolResponse};
