//! Summaries generated by the completion API

use async_trait::async_trait;
use tracing::{debug, error};

use super::Summarizer;
use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::llm::{LlmClient, Message};

/// System instruction sent with every summary request
pub const SYSTEM_PROMPT: &str = "You are an AI assistant that creates concise summaries of notes. \
Your summary should be clear, informative, dont use bold styling and all just return plain text.";

/// Prefix of the user message; the note content follows it
pub const USER_PROMPT_PREFIX: &str = "Please summarize the following note: ";

/// Summarizer backed by a chat completion API
#[derive(Debug, Clone)]
pub struct LlmSummarizer {
    client: LlmClient,
}

impl LlmSummarizer {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Build a client from configuration and an API key
    pub fn from_config(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::new(LlmClient::new(config.clone(), api_key)?))
    }

    fn messages(content: &str) -> Vec<Message> {
        vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(format!("{}{}", USER_PROMPT_PREFIX, content)),
        ]
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, content: &str) -> Result<String> {
        let response = self
            .client
            .complete(Self::messages(content))
            .await
            .map_err(|e| {
                error!(error = %e, "Summary generation failed");
                match e {
                    Error::GenerationFailed(reason) => Error::GenerationFailed(reason),
                    other => Error::GenerationFailed(other.to_string()),
                }
            })?;

        debug!(
            model = %response.model,
            tokens = response.tokens_used,
            "Summary generated"
        );

        let summary = response.content.trim();
        if summary.is_empty() {
            return Err(Error::GenerationFailed("Completion API returned no text".to_string()));
        }
        Ok(summary.to_string())
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}
