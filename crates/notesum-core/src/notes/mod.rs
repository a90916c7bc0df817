//! Notes
//!
//! User-owned text documents. Every read and write goes through
//! [`NoteStore`] with both the note id and the owner id, so a note is never
//! reachable by anyone but its owner.

mod coordinator;
mod repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

pub use coordinator::NoteSummaryCoordinator;
pub use repository::NoteRepository;

/// Length of the content preview shown in note listings
pub const EXCERPT_CHARS: usize = 150;

/// A note owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique note identifier
    pub id: String,
    pub title: String,
    pub content: String,
    /// Generated summary, absent until the first summarize request
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Bumped by every mutation, summary assignment included
    pub updated_at: DateTime<Utc>,
    /// Owning user
    pub user_id: String,
}

impl Note {
    /// Build a new, unsaved note for `user_id`
    pub fn new(user_id: impl Into<String>, input: NoteInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            content: input.content,
            summary: None,
            created_at: now,
            updated_at: now,
            user_id: user_id.into(),
        }
    }

    /// Content preview for listings
    pub fn excerpt(&self) -> String {
        truncate_text(&self.content, EXCERPT_CHARS)
    }
}

/// Fields required to create a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Both fields must contain something other than whitespace
    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }
}

/// Partial update of a note's title and/or content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NoteUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.title.is_none() && self.content.is_none() {
            return Err(Error::invalid_input("Nothing to update"));
        }
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(content) = &self.content {
            require_text("content", content)?;
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_input(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Truncate to `max_chars` characters, appending "..." when cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Owner-scoped note persistence
///
/// Implementations must apply the `user_id` filter on every call and must
/// report [`Error::NoteNotFound`] when a write matches no row.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes of `user_id`, most recently updated first
    async fn list(&self, user_id: &str) -> Result<Vec<Note>>;

    async fn get(&self, id: &str, user_id: &str) -> Result<Option<Note>>;

    async fn create(&self, user_id: &str, input: NoteInput) -> Result<Note>;

    async fn update(&self, id: &str, user_id: &str, update: NoteUpdate) -> Result<Note>;

    /// Hard delete
    async fn delete(&self, id: &str, user_id: &str) -> Result<()>;

    /// Store `summary` on the note and bump `updated_at`
    async fn set_summary(&self, id: &str, user_id: &str, summary: &str) -> Result<Note>;
}
