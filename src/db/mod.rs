//! Database access layer.
//!
//! This module provides database access functionality:
//! - The connection-owning handler with one method per operation
//! - SQL statement construction
//! - Parameter binding
//! - Single-statement enforcement
//! - Row to JSON mapping

pub mod handler;
pub mod params;
pub mod sql_validator;
pub mod statement;
pub mod types;

pub use handler::SqliteHandler;
pub use statement::Statement;
