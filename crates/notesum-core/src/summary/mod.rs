//! Summary Service
//!
//! Maps note content to a short summary. Two strategies exist behind the
//! [`Summarizer`] trait:
//! - [`LlmSummarizer`]: one call to the completion API
//! - [`FallbackSummarizer`]: deterministic sentence truncation
//!
//! The strategy is picked once, when the [`SummaryService`] is built, from
//! whether an API key is configured.

mod fallback;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::LlmConfig;
use crate::error::{Error, Result};

pub use fallback::{
    FALLBACK_RATIO, FallbackSummarizer, fallback_summary, sentences_to_keep, split_sentences,
};
pub use remote::{LlmSummarizer, SYSTEM_PROMPT, USER_PROMPT_PREFIX};

/// A way of turning content into a summary
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize already-validated, non-empty content
    async fn summarize(&self, content: &str) -> Result<String>;

    /// Short strategy name for logs and health output
    fn name(&self) -> &'static str;
}

/// Validating front for the selected summary strategy
#[derive(Clone)]
pub struct SummaryService {
    strategy: Arc<dyn Summarizer>,
}

impl std::fmt::Debug for SummaryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryService")
            .field("mode", &self.mode())
            .finish()
    }
}

impl SummaryService {
    /// Wrap an explicit strategy
    pub fn new(strategy: Arc<dyn Summarizer>) -> Self {
        Self { strategy }
    }

    /// Service that always uses the local heuristic
    pub fn fallback() -> Self {
        Self::new(Arc::new(FallbackSummarizer))
    }

    /// Pick the strategy for `config`: the completion API when `api_key`
    /// is present, the local heuristic otherwise
    pub fn with_api_key(config: &LlmConfig, api_key: Option<String>) -> Result<Self> {
        match api_key {
            Some(key) => {
                info!(
                    model = %config.default_model,
                    base_url = %config.base_url,
                    "Summaries will be generated by the completion API"
                );
                Ok(Self::new(Arc::new(LlmSummarizer::from_config(config, key)?)))
            }
            None => {
                warn!("No completion API key found. Using fallback summarization.");
                Ok(Self::fallback())
            }
        }
    }

    /// Pick the strategy from the API key found in the environment
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .resolved_api_key()
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        Self::with_api_key(config, api_key)
    }

    /// Name of the active strategy ("llm" or "fallback")
    pub fn mode(&self) -> &'static str {
        self.strategy.name()
    }

    /// Summarize `content`, rejecting empty input before any work is done
    pub async fn summarize(&self, content: &str) -> Result<String> {
        validate_content(content)?;
        tracing::debug!(
            mode = self.mode(),
            content_len = content.len(),
            "Summarizing content"
        );
        self.strategy.summarize(content).await
    }
}

/// Reject content that is empty or only whitespace
pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::invalid_input(
            "Content is required and must be a string",
        ));
    }
    Ok(())
}

/// Pull the `content` field out of an untyped JSON request body
///
/// Missing, null, or non-string values are validation errors; they are
/// never coerced to strings.
pub fn content_from_json(body: &serde_json::Value) -> Result<&str> {
    let content = body
        .get("content")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| Error::invalid_input("Content is required and must be a string"))?;
    validate_content(content)?;
    Ok(content)
}
