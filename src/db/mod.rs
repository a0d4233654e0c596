//! Database abstraction layer for olist-ask.
//!
//! A [`DatabaseConnector`] opens a fresh [`DatabaseSession`] for every query;
//! callers are expected to close the session once they are done with it.

mod mock;
mod sqlite;
mod types;

pub use mock::MockDatabaseConnector;
pub use sqlite::SqliteConnector;
pub use types::{ColumnInfo, QueryResult, Record, Row, Value};

use crate::error::Result;
use async_trait::async_trait;

/// Opens database sessions.
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// Opens a new session against the database.
    async fn open(&self) -> Result<Box<dyn DatabaseSession>>;
}

/// A single open connection.
#[async_trait]
pub trait DatabaseSession: Send {
    /// Executes a SQL statement as opaque text and returns the results.
    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult>;

    /// Closes the connection. Closing twice is a no-op.
    async fn close(&mut self) -> Result<()>;
}
