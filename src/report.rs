//! Console reporting.
//!
//! Writes the plain-text transcript of a run: the question, the generated
//! query, then either the rows or the execution error, followed by a
//! delimiter line. Errors go to a separate sink (stderr in the binary).

use std::io::{self, Write};

use crate::db::QueryResult;
use crate::error::AskError;

/// Line printed after each question.
pub const DELIMITER: &str = "--------------------------------------------------------";

/// Writes run output to an output sink and an error sink.
pub struct ConsoleReporter<O: Write, E: Write> {
    out: O,
    err: E,
}

impl ConsoleReporter<io::Stdout, io::Stderr> {
    /// Reporter writing to the process's stdout and stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    /// Creates a reporter over the given sinks.
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn question(&mut self, question: &str) -> io::Result<()> {
        writeln!(self.out, "Question: {question}")
    }

    pub fn query(&mut self, sql: &str) -> io::Result<()> {
        writeln!(self.out, "SQL Query: {sql}")
    }

    /// Prints the rows as a JSON array of records.
    pub fn rows(&mut self, result: &QueryResult) -> io::Result<()> {
        let rendered = render_rows(result)?;
        writeln!(self.out, "Query executed successfully: {rendered}")
    }

    /// Prints an execution failure without its category prefix.
    pub fn execution_error(&mut self, error: &AskError) -> io::Result<()> {
        writeln!(self.err, "Error executing query: {}", error.detail())
    }

    pub fn delimiter(&mut self) -> io::Result<()> {
        writeln!(self.out, "{DELIMITER}")?;
        self.out.flush()?;
        self.err.flush()
    }

    /// Consumes the reporter, returning both sinks.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

/// Renders result rows as a compact JSON array of objects.
pub fn render_rows(result: &QueryResult) -> io::Result<String> {
    serde_json::to_string(&result.to_records()).map_err(io::Error::from)
}
