//! Error types for the SQLite MCP Server.
//!
//! Every failure an operation can hit is one of the variants below. The
//! operation router converts each of them into a failure envelope, so none of
//! them ever escapes a tool call.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    #[error("Invalid arguments for {operation}: {message}")]
    InvalidArguments { operation: String, message: String },

    /// The engine rejected or failed a statement.
    #[error("{message}")]
    Engine {
        message: String,
        /// SQLite extended result code, e.g. "1" for SQLITE_ERROR
        code: Option<String>,
    },

    #[error("Failed to open database {path}: {message}")]
    ConnectionOpen { path: String, message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },
}

/// Coarse classification of a [`DbError`], used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownOperation,
    InvalidArguments,
    Engine,
    ConnectionOpen,
    Transport,
}

impl DbError {
    /// Create an unknown operation error.
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    /// Create an invalid arguments error.
    pub fn invalid_arguments(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an engine error without a result code.
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
            code: None,
        }
    }

    /// Create a connection open error.
    pub fn connection_open(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConnectionOpen {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            Self::InvalidArguments { .. } => ErrorKind::InvalidArguments,
            Self::Engine { .. } => ErrorKind::Engine,
            Self::ConnectionOpen { .. } => ErrorKind::ConnectionOpen,
            Self::Transport { .. } => ErrorKind::Transport,
        }
    }

    /// SQLite result code, if the engine reported one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Engine { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// Everything sqlx can report while running a statement is the engine's
/// business, so all of it lands in [`DbError::Engine`].
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::Engine {
                message: db_err.message().to_string(),
                code: db_err.code().map(|c| c.to_string()),
            },
            sqlx::Error::RowNotFound => DbError::engine("No rows returned"),
            sqlx::Error::ColumnNotFound(col) => {
                DbError::engine(format!("Column not found: {}", col))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::engine(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => DbError::engine(format!("Decode error: {}", source)),
            sqlx::Error::Io(io_err) => DbError::engine(format!("I/O error: {}", io_err)),
            sqlx::Error::Configuration(msg) => {
                DbError::engine(format!("Configuration error: {}", msg))
            }
            sqlx::Error::WorkerCrashed => DbError::engine("Database worker crashed"),
            other => DbError::engine(other.to_string()),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;
