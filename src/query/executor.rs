//! Query execution with a read-only guard.
//!
//! Each call opens its own session and releases it before returning, on the
//! success path and on every failure path alike.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::db::{DatabaseConnector, QueryResult};
use crate::error::{AskError, Result};
use crate::safety::SqlClassifier;

/// Runs generated SQL against the database.
pub struct QueryExecutor {
    connector: Arc<dyn DatabaseConnector>,
    classifier: SqlClassifier,
    allow_writes: bool,
}

impl QueryExecutor {
    /// Creates an executor that refuses statements which are not read-only.
    pub fn new(connector: Arc<dyn DatabaseConnector>) -> Self {
        Self {
            connector,
            classifier: SqlClassifier::new(),
            allow_writes: false,
        }
    }

    /// Lets statements that modify the database through.
    pub fn allow_writes(mut self, allow_writes: bool) -> Self {
        self.allow_writes = allow_writes;
        self
    }

    /// Refuses statements that parse as anything but read-only.
    ///
    /// Text that does not parse is let through so the database reports
    /// the problem itself.
    pub fn check(&self, sql: &str) -> Result<()> {
        if self.allow_writes {
            return Ok(());
        }

        match self.classifier.classify(sql) {
            Ok(classification) if classification.is_read_only() => Ok(()),
            Ok(classification) => {
                warn!(
                    level = %classification.level,
                    statement = %classification.statement_type,
                    "Refusing generated statement"
                );
                Err(AskError::rejected(format!(
                    "refusing to run {} statement: only read-only queries are allowed \
                     (use --allow-writes to override)",
                    classification.statement_type
                )))
            }
            Err(e) => {
                debug!("Statement guard could not classify SQL: {}", e);
                Ok(())
            }
        }
    }

    /// Executes `sql` in a fresh session and returns its rows.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult> {
        self.check(sql)?;

        let mut session = self.connector.open().await?;
        let result = session.execute_query(sql).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close database session: {}", e);
        }

        let result = result?;
        if let Some(warning) = result.truncation_warning() {
            warn!("{}", warning);
        }
        debug!(
            rows = result.row_count,
            elapsed_ms = result.execution_time.as_millis() as u64,
            "Query executed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ColumnInfo, MockDatabaseConnector, Value};

    fn count_result(n: i64) -> QueryResult {
        QueryResult::with_data(
            vec![ColumnInfo::new("COUNT(DISTINCT customer_id)", "INTEGER")],
            vec![vec![Value::Int(n)]],
        )
    }

    #[tokio::test]
    async fn test_success_returns_rows_unmodified() {
        let connector = MockDatabaseConnector::new().with_rows("customers", count_result(42));
        let executor = QueryExecutor::new(Arc::new(connector.clone()));

        let sql = "SELECT COUNT(DISTINCT customer_id) FROM customers WHERE customer_state = 'SP';";
        let result = executor.execute(sql).await.unwrap();

        assert_eq!(result, count_result(42));
        assert_eq!(connector.opens(), 1);
        assert_eq!(connector.closes(), 1);
    }

    #[tokio::test]
    async fn test_failure_propagates_and_releases_session() {
        let connector =
            MockDatabaseConnector::new().with_error("ordersx", "no such table: ordersx");
        let executor = QueryExecutor::new(Arc::new(connector.clone()));

        let err = executor.execute("SELECT * FROM ordersx").await.unwrap_err();

        assert_eq!(err.detail(), "no such table: ordersx");
        assert_eq!(connector.opens(), 1);
        assert_eq!(connector.closes(), 1);
    }

    #[tokio::test]
    async fn test_open_failure_propagates() {
        let connector = MockDatabaseConnector::new().failing_open("unable to open database file");
        let executor = QueryExecutor::new(Arc::new(connector.clone()));

        let err = executor.execute("SELECT 1").await.unwrap_err();

        assert_eq!(err.category(), "Connection Error");
        assert_eq!(connector.opens(), 1);
        assert!(connector.executed().is_empty());
    }

    #[tokio::test]
    async fn test_guard_refuses_destructive_without_opening() {
        let connector = MockDatabaseConnector::new();
        let executor = QueryExecutor::new(Arc::new(connector.clone()));

        let err = executor.execute("DROP TABLE orders;").await.unwrap_err();

        assert_eq!(err.category(), "Rejected");
        assert!(err.detail().starts_with("refusing to run DROP statement"));
        assert_eq!(connector.opens(), 0);
    }

    #[tokio::test]
    async fn test_guard_lets_unparseable_text_reach_database() {
        let connector =
            MockDatabaseConnector::new().with_error("here is", "near \"Here\": syntax error");
        let executor = QueryExecutor::new(Arc::new(connector.clone()));

        let err = executor
            .execute("Here is your query: SELECT 1")
            .await
            .unwrap_err();

        assert_eq!(err.detail(), "near \"Here\": syntax error");
        assert_eq!(connector.opens(), 1);
    }

    #[tokio::test]
    async fn test_allow_writes_disables_guard() {
        let connector = MockDatabaseConnector::new();
        let executor = QueryExecutor::new(Arc::new(connector.clone())).allow_writes(true);

        executor
            .execute("UPDATE orders SET order_status = 'x'")
            .await
            .unwrap();

        assert_eq!(
            connector.executed(),
            vec!["UPDATE orders SET order_status = 'x'"]
        );
    }
}
