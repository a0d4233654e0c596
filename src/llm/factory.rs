//! LLM client factory.
//!
//! Centralizes provider-specific logic for creating LLM clients.

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::{AskError, Result};
use crate::llm::{LlmClient, LlmProvider, MockLlmClient, OllamaClient, OllamaConfig};

/// Creates an LLM client from the configured provider and model settings.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    let provider: LlmProvider = config.provider.parse().map_err(AskError::config)?;

    match provider {
        LlmProvider::Ollama => Ok(Arc::new(OllamaClient::new(OllamaConfig::from(config))?)),
        LlmProvider::Mock => Ok(Arc::new(MockLlmClient::new())),
    }
}
