//! SQLite database client implementation.
//!
//! Provides the `SqliteConnector` struct that opens one sqlx connection per
//! session against a local database file.

use crate::db::{ColumnInfo, DatabaseConnector, DatabaseSession, QueryResult, Row, Value};
use crate::error::{AskError, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column as SqlxColumn, Connection, Either, Executor, Row as SqlxRow, TypeInfo, ValueRef};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Query timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 30;

/// Maximum rows to return from a query.
const MAX_ROWS: usize = 1000;

/// Opens connections to an existing SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
    read_only: bool,
}

impl SqliteConnector {
    /// Creates a read-only connector for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_only: true,
        }
    }

    /// Sets whether connections are opened read-only.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(false)
            .read_only(self.read_only)
    }
}

#[async_trait]
impl DatabaseConnector for SqliteConnector {
    async fn open(&self) -> Result<Box<dyn DatabaseSession>> {
        debug!(path = %self.path.display(), read_only = self.read_only, "Opening database");

        let conn = SqliteConnection::connect_with(&self.connect_options())
            .await
            .map_err(|e| {
                AskError::connection(format!(
                    "{} ({})",
                    format_query_error(e),
                    self.path.display()
                ))
            })?;

        Ok(Box::new(SqliteSession { conn: Some(conn) }))
    }
}

/// One open SQLite connection.
#[derive(Debug)]
pub struct SqliteSession {
    conn: Option<SqliteConnection>,
}

#[async_trait]
impl DatabaseSession for SqliteSession {
    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| AskError::internal("Session is already closed"))?;

        let start = Instant::now();

        let (result, total_rows) = tokio::time::timeout(
            Duration::from_secs(QUERY_TIMEOUT_SECS),
            fetch_first_result_set(conn, sql),
        )
        .await
        .map_err(|_| {
            AskError::query(format!("Query timed out after {QUERY_TIMEOUT_SECS} seconds"))
        })?
        .map_err(|e| AskError::query(format_query_error(e)))?;

        let execution_time = start.elapsed();

        // Column metadata comes from the first row; empty results have none
        let columns: Vec<ColumnInfo> = result
            .first()
            .map(|first_row| {
                first_row
                    .columns()
                    .iter()
                    .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                    .collect()
            })
            .unwrap_or_default();

        let was_truncated = total_rows > MAX_ROWS;

        if was_truncated {
            warn!(
                "Query returned {} rows, truncating to {} rows",
                total_rows, MAX_ROWS
            );
        }

        let rows: Vec<Row> = result.iter().map(convert_row).collect();
        let row_count = rows.len();

        Ok(QueryResult {
            columns,
            rows,
            execution_time,
            row_count,
            total_rows: Some(total_rows),
            was_truncated,
        })
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|e| AskError::connection(format!("Failed to close database: {e}")))?;
        }
        Ok(())
    }
}

/// Reads the rows of the first statement in `sql`.
///
/// SQLite runs statements one at a time; reading stops at the end of the
/// first one, so later statements are never stepped past their start. At most
/// [`MAX_ROWS`] rows are kept, alongside the total count.
async fn fetch_first_result_set(
    conn: &mut SqliteConnection,
    sql: &str,
) -> std::result::Result<(Vec<SqliteRow>, usize), sqlx::Error> {
    let mut stream = (&mut *conn).fetch_many(sqlx::query(sql));
    let mut rows = Vec::new();
    let mut total = 0;

    while let Some(step) = stream.try_next().await? {
        match step {
            Either::Left(_) => break,
            Either::Right(row) => {
                total += 1;
                if rows.len() < MAX_ROWS {
                    rows.push(row);
                }
            }
        }
    }

    Ok((rows, total))
}

/// Converts a SQLite row to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a single value using its runtime storage class.
///
/// SQLite columns are dynamically typed, so the declared column type is not
/// a reliable guide (expressions such as `COUNT(*)` have none at all).
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match type_name.as_str() {
        "INTEGER" => row
            .try_get_unchecked::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or(Value::Null),
        "REAL" | "NUMERIC" => row
            .try_get_unchecked::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or(Value::Null),
        "BOOLEAN" => row
            .try_get_unchecked::<bool, _>(index)
            .map(Value::Bool)
            .unwrap_or(Value::Null),
        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(Value::Bytes)
            .unwrap_or(Value::Null),
        _ => row
            .try_get_unchecked::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

/// Extracts the database's own message from a sqlx error.
///
/// For SQLite errors this is the text SQLite reports, e.g.
/// `no such table: ordersx`.
fn format_query_error(error: sqlx::Error) -> String {
    match error {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}
