//! The question loop.
//!
//! Questions are handled strictly one after another. A failed model call
//! ends the run; a failed query is reported and the loop moves on.

use std::io::Write;

use tracing::{debug, info};

use crate::error::{AskError, Result};
use crate::llm::QueryGenerator;
use crate::query::QueryExecutor;
use crate::report::ConsoleReporter;

/// Counts for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Questions for which a query was generated.
    pub asked: usize,
    /// Queries that returned rows.
    pub succeeded: usize,
    /// Queries that failed or were refused.
    pub failed: usize,
}

/// Generates and executes one query per question.
pub struct Pipeline {
    generator: QueryGenerator,
    executor: QueryExecutor,
}

impl Pipeline {
    pub fn new(generator: QueryGenerator, executor: QueryExecutor) -> Self {
        Self {
            generator,
            executor,
        }
    }

    /// Handles a single question.
    ///
    /// Returns `Ok(true)` when the query ran, `Ok(false)` when it failed and
    /// the failure was reported, and `Err` when the model call failed.
    pub async fn ask<O: Write, E: Write>(
        &self,
        question: &str,
        reporter: &mut ConsoleReporter<O, E>,
    ) -> Result<bool> {
        debug!(question, "Generating SQL");
        let sql = self.generator.generate(question).await?;

        reporter.question(question).map_err(report_error)?;
        reporter.query(&sql).map_err(report_error)?;

        let succeeded = match self.executor.execute(&sql).await {
            Ok(result) => {
                reporter.rows(&result).map_err(report_error)?;
                true
            }
            Err(e) => {
                debug!("Query failed: {}", e);
                reporter.execution_error(&e).map_err(report_error)?;
                false
            }
        };

        reporter.delimiter().map_err(report_error)?;
        Ok(succeeded)
    }

    /// Asks every question in order.
    pub async fn run<Q, O, E>(
        &self,
        questions: &[Q],
        reporter: &mut ConsoleReporter<O, E>,
    ) -> Result<RunSummary>
    where
        Q: AsRef<str>,
        O: Write,
        E: Write,
    {
        info!("Asking {} questions", questions.len());
        let mut summary = RunSummary::default();

        for question in questions {
            let succeeded = self.ask(question.as_ref(), reporter).await?;
            summary.asked += 1;
            if succeeded {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Run finished"
        );
        Ok(summary)
    }
}

fn report_error(e: std::io::Error) -> AskError {
    AskError::internal(format!("Failed to write report: {e}"))
}
