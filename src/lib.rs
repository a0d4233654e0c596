//! olist-ask - ask analytics questions about the Olist dataset in plain language.
//!
//! Each question is turned into SQL by a language model and run against a
//! local SQLite copy of the dataset.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod query;
pub mod questions;
pub mod report;
pub mod safety;
