//! Configuration management for olist-ask.
//!
//! Handles loading configuration from a TOML file, with settings for the LLM
//! provider, the SQLite database and an optional replacement question list.

use crate::error::{AskError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Questions to ask instead of the built-in list.
    #[serde(default)]
    pub questions: Option<Vec<String>>,

    /// LLM provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider: "ollama" or "mock".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name (e.g., "llama3.2", "codellama").
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the Ollama API.
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// SQLite database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the Olist SQLite file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Run non read-only statements and open the file read-write.
    #[serde(default)]
    pub allow_writes: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("olist.sqlite")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            allow_writes: false,
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("olist-ask")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AskError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    ///
    /// An explicit but empty `questions` list is rejected rather than
    /// producing a run that asks nothing.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            AskError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;

        if config.questions.as_ref().is_some_and(Vec::is_empty) {
            return Err(AskError::config(format!(
                "Configuration error in {}:\n  questions must not be empty",
                path.display()
            )));
        }

        Ok(config)
    }
}
