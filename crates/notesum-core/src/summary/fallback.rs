//! Local summary heuristic used when no completion API key is configured

use async_trait::async_trait;

use super::Summarizer;
use crate::Result;

/// Share of sentences kept by the fallback summary
pub const FALLBACK_RATIO: f64 = 0.2;

/// Characters that end a sentence. Runs of them count as one terminator.
const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Summarizer that keeps the leading fifth of the sentences (at least one)
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSummarizer;

#[async_trait]
impl Summarizer for FallbackSummarizer {
    async fn summarize(&self, content: &str) -> Result<String> {
        Ok(fallback_summary(content))
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

/// Split `content` into trimmed, non-empty sentences
pub fn split_sentences(content: &str) -> Vec<&str> {
    content
        .split(SENTENCE_TERMINATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Number of sentences the fallback keeps out of `total`
pub fn sentences_to_keep(total: usize) -> usize {
    ((total as f64 * FALLBACK_RATIO).ceil() as usize).max(1)
}

/// Deterministic summary: the first `ceil(20%)` sentences joined with
/// `". "` plus a trailing period
pub fn fallback_summary(content: &str) -> String {
    let sentences = split_sentences(content);

    if sentences.is_empty() {
        // Only punctuation: nothing to keep but the terminator
        return ".".to_string();
    }

    let keep = sentences_to_keep(sentences.len());
    format!("{}.", sentences[..keep].join(". "))
}
