//! Command-line argument parsing for olist-ask.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Ask analytics questions about the Olist dataset in plain language.
#[derive(Parser, Debug)]
#[command(name = "olist-ask")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the Olist SQLite database file
    #[arg(short = 'd', long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Model to request from the LLM provider
    #[arg(short = 'm', long, value_name = "MODEL", env = "OLLAMA_MODEL")]
    pub model: Option<String>,

    /// Base URL of the Ollama API
    #[arg(long, value_name = "URL", env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// LLM provider to use ("ollama" or "mock")
    #[arg(long, value_name = "PROVIDER")]
    pub llm: Option<String>,

    /// Question to ask; repeat to ask several (replaces the built-in list)
    #[arg(short = 'q', long = "question", value_name = "TEXT")]
    pub questions: Vec<String>,

    /// Run generated statements even when they modify the database.
    ///
    /// By default the database is opened read-only and any statement other
    /// than a read-only query is reported as an error instead of being run.
    #[arg(long)]
    pub allow_writes: bool,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Overrides config file values with the ones given on the command line.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(database) = &self.database {
            config.database.path = database.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(url) = &self.ollama_url {
            config.llm.url = url.clone();
        }
        if let Some(provider) = &self.llm {
            config.llm.provider = provider.clone();
        }
        if self.allow_writes {
            config.database.allow_writes = true;
        }
        if !self.questions.is_empty() {
            config.questions = Some(self.questions.clone());
        }
    }
}
