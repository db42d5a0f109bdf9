// SPDX-License-Identifier: Apache-2.0

//! SQLite Driver
//!
//! Implements the DataEngine trait for a single SQLite database file using SQLx.
//!
//! ## SQLite Specifics
//!
//! - Every call opens its own connection and closes it before returning;
//!   there is no pool and no session state between requests
//! - The file is created if it does not exist yet
//! - SQLite has dynamic typing, so cell values are classified from the
//!   storage class of each value rather than the declared column type

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Executor, Row, Statement, ValueRef};
use tracing::{debug, warn};

use sqldesk_core::{
    DataEngine, EngineError, EngineResult, QueryResult, TableColumn, TableInfo, Value,
};

const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// SQLite driver implementation
pub struct SqliteDriver {
    db_path: PathBuf,
}

impl SqliteDriver {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    fn build_connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.db_path)
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT)
    }

    async fn open(&self) -> EngineResult<SqliteConnection> {
        SqliteConnection::connect_with(&self.build_connect_options())
            .await
            .map_err(|e| EngineError::connection_failed(engine_message(e)))
    }

    async fn close(conn: SqliteConnection) {
        if let Err(e) = conn.close().await {
            warn!("Failed to close SQLite connection: {}", e);
        }
    }

    fn quote_ident(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    async fn run_query(conn: &mut SqliteConnection, query: &str) -> EngineResult<QueryResult> {
        let sqlite_rows: Vec<SqliteRow> = sqlx::query(query)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| EngineError::execution_error(engine_message(e)))?;

        let columns = match sqlite_rows.first() {
            Some(first) => Self::column_names(first),
            // No rows to read the descriptor from; ask the prepared statement.
            None => match (&mut *conn).prepare(query).await {
                Ok(statement) => statement
                    .columns()
                    .iter()
                    .map(|col| col.name().to_string())
                    .collect(),
                Err(e) => {
                    debug!("No column descriptor for empty result: {}", e);
                    Vec::new()
                }
            },
        };

        let rows = sqlite_rows
            .iter()
            .map(|row| Self::convert_row(row, columns.len()))
            .collect();

        Ok(QueryResult::new(columns, rows))
    }

    fn column_names(row: &SqliteRow) -> Vec<String> {
        row.columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Converts a SQLx row to exactly `width` values.
    fn convert_row(row: &SqliteRow, width: usize) -> Vec<Value> {
        (0..width).map(|idx| Self::extract_value(row, idx)).collect()
    }

    /// Extracts a value from a SqliteRow at the given index
    ///
    /// Tries the storage classes in order: INTEGER, REAL, TEXT, BLOB.
    /// BLOBs are carried as base64 text.
    fn extract_value(row: &SqliteRow, idx: usize) -> Value {
        match row.try_get_raw(idx) {
            Ok(raw) if !raw.is_null() => {}
            _ => return Value::Null,
        }

        if let Ok(v) = row.try_get::<i64, _>(idx) {
            return Value::Int(v);
        }
        if let Ok(v) = row.try_get::<f64, _>(idx) {
            return Value::Float(v);
        }
        if let Ok(v) = row.try_get::<String, _>(idx) {
            return Value::Text(v);
        }
        if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
            return Value::Text(STANDARD.encode(v));
        }

        Value::Null
    }

    async fn inspect(conn: &mut SqliteConnection) -> EngineResult<Vec<TableInfo>> {
        let names: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(&mut *conn)
                .await
                .map_err(|e| EngineError::inspection_error(engine_message(e)))?;

        let mut tables = Vec::with_capacity(names.len());
        for (name,) in names {
            let table_ident = Self::quote_ident(&name);

            // cid, name, type, notnull, dflt_value, pk
            let pragma_query = format!("PRAGMA table_info({})", table_ident);
            let column_rows: Vec<(i64, String, String, i64, Option<String>, i64)> =
                sqlx::query_as(&pragma_query)
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(|e| EngineError::inspection_error(engine_message(e)))?;

            let columns = column_rows
                .into_iter()
                .map(|(_cid, name, data_type, _notnull, _dflt_value, _pk)| TableColumn {
                    name,
                    data_type,
                })
                .collect();

            let count_query = format!("SELECT COUNT(*) FROM {}", table_ident);
            let (row_count,): (i64,) = sqlx::query_as(&count_query)
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| EngineError::inspection_error(engine_message(e)))?;

            tables.push(TableInfo {
                name,
                columns,
                row_count: row_count.max(0) as u64,
            });
        }

        Ok(tables)
    }
}

/// The engine's own error text, without SQLx's wrapping.
fn engine_message(err: sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl DataEngine for SqliteDriver {
    fn driver_id(&self) -> &'static str {
        "sqlite"
    }

    async fn execute(&self, query: &str) -> EngineResult<QueryResult> {
        let start = Instant::now();
        let mut conn = self.open().await?;
        let result = Self::run_query(&mut conn, query).await;
        Self::close(conn).await;

        if let Ok(ref res) = result {
            debug!(
                rows = res.row_count,
                elapsed_ms = start.elapsed().as_micros() as f64 / 1000.0,
                "SQLite query finished"
            );
        }
        result
    }

    async fn list_tables(&self) -> EngineResult<Vec<TableInfo>> {
        let mut conn = self
            .open()
            .await
            .map_err(|e| EngineError::inspection_error(e.to_string()))?;
        let result = Self::inspect(&mut conn).await;
        Self::close(conn).await;
        result
    }
}
