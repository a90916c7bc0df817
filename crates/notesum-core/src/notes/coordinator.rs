//! Note Update Coordinator
//!
//! Summarizes content and stores the result on the owner's note. The two
//! steps are not wrapped in a transaction: when persistence fails, the
//! generated summary is dropped. Concurrent calls for the same note are not
//! coordinated; whichever write reaches the store last wins.

use std::sync::Arc;

use tracing::{info, warn};

use super::{Note, NoteStore};
use crate::error::{Error, Result};
use crate::summary::SummaryService;

/// Ties Summary Service output to a specific, owner-scoped note
#[derive(Clone)]
pub struct NoteSummaryCoordinator {
    summaries: SummaryService,
    store: Arc<dyn NoteStore>,
}

impl NoteSummaryCoordinator {
    pub fn new(summaries: SummaryService, store: Arc<dyn NoteStore>) -> Self {
        Self { summaries, store }
    }

    /// Summarize `content` and persist it on note `id` owned by `user_id`
    ///
    /// `content` is trusted to be the note's content; it is not re-read.
    pub async fn summarize_note(&self, id: &str, user_id: &str, content: &str) -> Result<Note> {
        let summary = self.summaries.summarize(content).await?;

        match self.store.set_summary(id, user_id, &summary).await {
            Ok(note) => {
                info!(note_id = %id, mode = self.summaries.mode(), "Note summarized");
                Ok(note)
            }
            Err(e) => {
                warn!(note_id = %id, error = %e, "Discarding summary, persistence failed");
                Err(e)
            }
        }
    }

    /// Summarize the note's stored content
    pub async fn summarize_stored(&self, id: &str, user_id: &str) -> Result<Note> {
        let note = self
            .store
            .get(id, user_id)
            .await?
            .ok_or_else(|| Error::NoteNotFound(id.to_string()))?;

        self.summarize_note(id, user_id, &note.content).await
    }
}
