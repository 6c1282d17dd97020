//! SQLite data access layer.
//!
//! [`SqliteHandler`] owns the one connection the server uses for its whole
//! lifetime and exposes one method per supported operation. Statements are
//! serialized through an async mutex around the connection; nothing here
//! times out, retries or closes the connection.

use crate::db::params::bind_all;
use crate::db::sql_validator::ensure_single_statement;
use crate::db::statement::{self, Statement};
use crate::db::types::RowToJson;
use crate::error::{DbError, DbResult};
use crate::models::{ColumnInfo, JsonRow, QueryParam, RunResult, TableEntry};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Executor, Row};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

enum ConnectionState {
    Open(Mutex<SqliteConnection>),
    /// Opening failed at startup; every statement reports this message.
    Failed(String),
}

pub struct SqliteHandler {
    db_path: PathBuf,
    state: ConnectionState,
}

impl SqliteHandler {
    /// Open (creating if missing) the database file at `db_path`.
    ///
    /// A failed open is logged and remembered rather than returned, so the
    /// server keeps running and each operation fails on its own.
    pub async fn open(db_path: impl Into<PathBuf>) -> Self {
        let db_path = db_path.into();
        let state = match connect(&db_path).await {
            Ok(conn) => {
                info!(path = %db_path.display(), "Opened SQLite database");
                ConnectionState::Open(Mutex::new(conn))
            }
            Err(e) => {
                error!(error = %e, "Error opening database");
                ConnectionState::Failed(e.to_string())
            }
        };

        Self { db_path, state }
    }

    /// Wrap an already-open connection. `db_path` is only reported, never
    /// opened.
    pub fn from_connection(db_path: impl Into<PathBuf>, conn: SqliteConnection) -> Self {
        Self {
            db_path: db_path.into(),
            state: ConnectionState::Open(Mutex::new(conn)),
        }
    }

    /// Open a private in-memory database.
    pub async fn in_memory() -> DbResult<Self> {
        let conn = SqliteConnectOptions::from_str("sqlite::memory:")?
            .disable_statement_logging()
            .connect()
            .await?;
        Ok(Self::from_connection(":memory:", conn))
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Whether the startup open succeeded.
    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Open(_))
    }

    fn connection(&self) -> DbResult<&Mutex<SqliteConnection>> {
        match &self.state {
            ConnectionState::Open(conn) => Ok(conn),
            ConnectionState::Failed(reason) => Err(DbError::engine(format!(
                "Database connection is not open: {}",
                reason
            ))),
        }
    }

    /// Run a statement and return its rows as JSON objects.
    pub async fn execute_query(&self, sql: &str, values: &[QueryParam]) -> DbResult<Vec<JsonRow>> {
        debug!(sql = %sql, params = values.len(), "Executing query");

        let rows = self.fetch_rows(sql, values).await?;
        Ok(rows.iter().map(RowToJson::to_json_map).collect())
    }

    /// Run a mutating statement (INSERT/UPDATE/DELETE/DDL).
    pub async fn execute_run(&self, sql: &str, values: &[QueryParam]) -> DbResult<RunResult> {
        debug!(sql = %sql, params = values.len(), "Executing statement");

        ensure_single_statement(sql)?;
        let mut conn = self.connection()?.lock().await;
        let result = if values.is_empty() {
            (&mut *conn).execute(sql).await?
        } else {
            bind_all(sql, values).execute(&mut *conn).await?
        };

        Ok(RunResult {
            last_insert_id: result.last_insert_rowid(),
            rows_affected: result.rows_affected(),
        })
    }

    async fn fetch_rows(&self, sql: &str, values: &[QueryParam]) -> DbResult<Vec<SqliteRow>> {
        ensure_single_statement(sql)?;
        let mut conn = self.connection()?.lock().await;
        let rows = if values.is_empty() {
            (&mut *conn).fetch_all(sql).await?
        } else {
            bind_all(sql, values).fetch_all(&mut *conn).await?
        };
        Ok(rows)
    }

    /// List user tables (names starting with `sqlite_` are excluded).
    pub async fn list_tables(&self) -> DbResult<Vec<TableEntry>> {
        let rows = self.fetch_rows(statement::LIST_TABLES, &[]).await?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in &rows {
            tables.push(TableEntry::new(row.try_get::<String, _>("name")?));
        }

        debug!(count = tables.len(), "Listed SQLite tables");
        Ok(tables)
    }

    /// Count user tables.
    pub async fn count_tables(&self) -> DbResult<i64> {
        let mut conn = self.connection()?.lock().await;
        let count = sqlx::query_scalar::<_, i64>(statement::COUNT_TABLES)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    /// Column descriptors of `table_name`; empty when the table does not
    /// exist.
    pub async fn get_table_schema(&self, table_name: &str) -> DbResult<Vec<ColumnInfo>> {
        let stmt = Statement::table_info(table_name);
        let rows = self.fetch_rows(&stmt.sql, &stmt.params).await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            columns.push(ColumnInfo {
                cid: row.try_get("cid")?,
                name: row.try_get("name")?,
                data_type: row.try_get("type")?,
                notnull: row.try_get::<i64, _>("notnull")? != 0,
                dflt_value: row.try_get("dflt_value")?,
                pk: row.try_get("pk")?,
            });
        }
        Ok(columns)
    }

    /// Insert one row built from `data`.
    pub async fn create_record(&self, table: &str, data: &JsonRow) -> DbResult<RunResult> {
        let stmt = Statement::insert(table, data);
        self.execute_run(&stmt.sql, &stmt.params).await
    }

    /// Select rows matching every condition, with optional paging.
    pub async fn read_records(
        &self,
        table: &str,
        conditions: Option<&JsonRow>,
        limit: Option<f64>,
        offset: Option<f64>,
    ) -> DbResult<Vec<JsonRow>> {
        let stmt = Statement::select(table, conditions, limit, offset);
        self.execute_query(&stmt.sql, &stmt.params).await
    }

    /// Update rows matching every condition.
    pub async fn update_records(
        &self,
        table: &str,
        data: &JsonRow,
        conditions: &JsonRow,
    ) -> DbResult<RunResult> {
        let stmt = Statement::update(table, data, conditions);
        self.execute_run(&stmt.sql, &stmt.params).await
    }

    /// Delete rows matching every condition.
    pub async fn delete_records(&self, table: &str, conditions: &JsonRow) -> DbResult<RunResult> {
        let stmt = Statement::delete(table, conditions);
        self.execute_run(&stmt.sql, &stmt.params).await
    }
}

async fn connect(db_path: &Path) -> DbResult<SqliteConnection> {
    SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .disable_statement_logging()
        .connect()
        .await
        .map_err(|e| DbError::connection_open(db_path.display().to_string(), e.to_string()))
}
