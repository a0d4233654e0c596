//! Query execution for olist-ask.
//!
//! Isolates statement guarding and execution from the driver loop.

pub mod executor;

pub use executor::QueryExecutor;
