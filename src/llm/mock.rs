//! Mock LLM client for testing and dry runs.
//!
//! Provides deterministic responses based on input patterns.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{AskError, Result};
use crate::llm::types::{Message, Role};
use crate::llm::LlmClient;

/// Reply used when no pattern matches.
const DEFAULT_REPLY: &str = "SELECT COUNT(*) FROM orders;";

/// Mock LLM client that returns canned responses based on input patterns.
///
/// Patterns are matched case-insensitively against the last user message,
/// in the order they were added.
#[derive(Debug, Clone)]
pub struct MockLlmClient {
    /// Pattern -> reply (Ok) or failure message (Err).
    responses: Vec<(String, std::result::Result<String, String>)>,
    default_reply: String,
    calls: Arc<AtomicUsize>,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self {
            responses: Vec::new(),
            default_reply: DEFAULT_REPLY.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockLlmClient {
    /// Creates a new mock client with the default reply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock client that answers every question with `reply`.
    pub fn always(reply: impl Into<String>) -> Self {
        Self {
            default_reply: reply.into(),
            ..Self::default()
        }
    }

    /// Adds a custom response mapping.
    ///
    /// When the input contains `pattern`, the mock will return `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.responses.push((pattern.into(), Ok(response.into())));
        self
    }

    /// Makes the mock fail with an LLM error when the input contains `pattern`.
    pub fn with_failure(mut self, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses.push((pattern.into(), Err(message.into())));
        self
    }

    /// Number of completions requested so far (shared across clones).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn mock_response(&self, input: &str) -> Result<String> {
        let input_lower = input.to_lowercase();

        for (pattern, response) in &self.responses {
            if input_lower.contains(&pattern.to_lowercase()) {
                return response.clone().map_err(AskError::llm);
            }
        }

        Ok(self.default_reply.clone())
    }

    /// Extracts the last user message content from a message list.
    fn extract_user_input(messages: &[Message]) -> &str {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.mock_response(Self::extract_user_input(messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_reply() {
        let client = MockLlmClient::new();
        let messages = vec![Message::user("What is the meaning of life?")];

        let response = client.complete(&messages).await.unwrap();

        assert_eq!(response, DEFAULT_REPLY);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_custom_response_case_insensitive() {
        let client = MockLlmClient::new().with_response("paulo", "SELECT 42;");

        let messages = vec![
            Message::system("schema"),
            Message::user("Orders in SAO PAULO?"),
        ];
        let response = client.complete(&messages).await.unwrap();

        assert_eq!(response, "SELECT 42;");
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let client = MockLlmClient::new().with_failure("boom", "model unavailable");

        let err = client.complete(&[Message::user("boom")]).await.unwrap_err();

        assert_eq!(err.to_string(), "LLM error: model unavailable");
    }

    #[tokio::test]
    async fn test_mock_calls_shared_across_clones() {
        let client = MockLlmClient::always("SELECT 1;");
        let clone = client.clone();

        clone.complete(&[Message::user("a")]).await.unwrap();
        clone.complete(&[Message::user("b")]).await.unwrap();

        assert_eq!(client.calls(), 2);
    }
}
