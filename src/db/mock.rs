//! Mock database connector for testing.
//!
//! Returns scripted results and counts how often sessions are opened and
//! closed, so tests can check that every opened session is released.

use super::{DatabaseConnector, DatabaseSession, QueryResult};
use crate::error::{AskError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted outcome of executing a statement.
#[derive(Debug, Clone)]
enum Outcome {
    Rows(QueryResult),
    Fail(String),
}

#[derive(Debug, Default)]
struct Counters {
    opens: AtomicUsize,
    closes: AtomicUsize,
    executed: Mutex<Vec<String>>,
}

/// A mock connector whose sessions return predefined results.
///
/// Statements are matched case-insensitively against the registered
/// patterns in insertion order; unmatched statements return an empty result.
#[derive(Debug, Clone, Default)]
pub struct MockDatabaseConnector {
    outcomes: Vec<(String, Outcome)>,
    open_error: Option<String>,
    counters: Arc<Counters>,
}

impl MockDatabaseConnector {
    /// Creates a connector that returns empty results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `result` for statements containing `pattern`.
    pub fn with_rows(mut self, pattern: impl Into<String>, result: QueryResult) -> Self {
        self.outcomes.push((pattern.into(), Outcome::Rows(result)));
        self
    }

    /// Fails with a query error for statements containing `pattern`.
    pub fn with_error(mut self, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        self.outcomes
            .push((pattern.into(), Outcome::Fail(message.into())));
        self
    }

    /// Makes every `open` fail with a connection error.
    pub fn failing_open(mut self, message: impl Into<String>) -> Self {
        self.open_error = Some(message.into());
        self
    }

    /// Number of `open` calls so far, including failed ones.
    pub fn opens(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    /// Number of sessions closed so far.
    pub fn closes(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }

    /// Statements executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.counters
            .executed
            .lock()
            .map(|executed| executed.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DatabaseConnector for MockDatabaseConnector {
    async fn open(&self) -> Result<Box<dyn DatabaseSession>> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.open_error {
            return Err(AskError::connection(message.clone()));
        }

        Ok(Box::new(MockSession {
            outcomes: self.outcomes.clone(),
            counters: Arc::clone(&self.counters),
            closed: false,
        }))
    }
}

struct MockSession {
    outcomes: Vec<(String, Outcome)>,
    counters: Arc<Counters>,
    closed: bool,
}

#[async_trait]
impl DatabaseSession for MockSession {
    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        if self.closed {
            return Err(AskError::internal("Session is already closed"));
        }

        if let Ok(mut executed) = self.counters.executed.lock() {
            executed.push(sql.to_string());
        }

        let sql_lower = sql.to_lowercase();
        for (pattern, outcome) in &self.outcomes {
            if sql_lower.contains(&pattern.to_lowercase()) {
                return match outcome {
                    Outcome::Rows(result) => Ok(result.clone()),
                    Outcome::Fail(message) => Err(AskError::query(message.clone())),
                };
            }
        }

        Ok(QueryResult::new())
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
