//! SQL generation from natural-language questions.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::llm::prompt::build_messages;
use crate::llm::LlmClient;

/// Turns a question into SQL text with a single model call.
///
/// The reply is returned exactly as the model produced it. No retries are
/// made and errors are propagated to the caller.
#[derive(Clone)]
pub struct QueryGenerator {
    client: Arc<dyn LlmClient>,
}

impl QueryGenerator {
    /// Creates a generator backed by the given client.
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Asks the model for a SQL statement answering `question`.
    pub async fn generate(&self, question: &str) -> Result<String> {
        let messages = build_messages(question);
        let reply = self.client.complete(&messages).await?;
        debug!(reply_len = reply.len(), "Model replied");
        Ok(reply)
    }
}
