//! Integration tests for olist-ask.

pub mod pipeline_test;
pub mod sqlite_test;
