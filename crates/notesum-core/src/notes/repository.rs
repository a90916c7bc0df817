//! SQLite-backed note store

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use super::{Note, NoteInput, NoteStore, NoteUpdate};
use crate::error::{Error, Result};
use crate::storage::Database;

const NOTE_COLUMNS: &str = "id, title, content, summary, created_at, updated_at, user_id";

/// Note repository for database operations
#[derive(Debug, Clone)]
pub struct NoteRepository {
    db: Database,
}

impl NoteRepository {
    /// Create a new note repository
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Count the notes owned by `user_id`
    pub async fn count(&self, user_id: &str) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await?;

        Ok(row.0)
    }

    /// Read back a note after a write; a vanished row means it was deleted
    /// in between, which callers see as not found
    async fn fetch_after_write(&self, id: &str, user_id: &str) -> Result<Note> {
        self.get(id, user_id)
            .await?
            .ok_or_else(|| Error::NoteNotFound(id.to_string()))
    }

    /// Convert a database row to a Note
    fn row_to_note(row: sqlx::sqlite::SqliteRow) -> Note {
        Note {
            id: row.get("id"),
            title: row.get("title"),
            content: row.get("content"),
            summary: row.get("summary"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            user_id: row.get("user_id"),
        }
    }
}

#[async_trait]
impl NoteStore for NoteRepository {
    async fn list(&self, user_id: &str) -> Result<Vec<Note>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM notes WHERE user_id = ? ORDER BY updated_at DESC, created_at DESC",
            NOTE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Self::row_to_note).collect())
    }

    async fn get(&self, id: &str, user_id: &str) -> Result<Option<Note>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM notes WHERE id = ? AND user_id = ?",
            NOTE_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Self::row_to_note))
    }

    async fn create(&self, user_id: &str, input: NoteInput) -> Result<Note> {
        input.validate()?;
        let note = Note::new(user_id, input);

        sqlx::query(
            r#"
            INSERT INTO notes (id, title, content, summary, created_at, updated_at, user_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&note.id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.summary)
        .bind(note.created_at)
        .bind(note.updated_at)
        .bind(&note.user_id)
        .execute(self.db.pool())
        .await?;

        debug!(note_id = %note.id, user_id = %user_id, "Note created");
        Ok(note)
    }

    async fn update(&self, id: &str, user_id: &str, update: NoteUpdate) -> Result<Note> {
        update.validate()?;

        let result = sqlx::query(
            r#"
            UPDATE notes
            SET title = COALESCE(?, title), content = COALESCE(?, content), updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&update.title)
        .bind(&update.content)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id.to_string()));
        }

        self.fetch_after_write(id, user_id).await
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id.to_string()));
        }

        debug!(note_id = %id, "Note deleted");
        Ok(())
    }

    async fn set_summary(&self, id: &str, user_id: &str, summary: &str) -> Result<Note> {
        let result =
            sqlx::query("UPDATE notes SET summary = ?, updated_at = ? WHERE id = ? AND user_id = ?")
                .bind(summary)
                .bind(Utc::now())
                .bind(id)
                .bind(user_id)
                .execute(self.db.pool())
                .await?;

        // A zero-row UPDATE is not an error in SQLite; surface it explicitly
        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id.to_string()));
        }

        self.fetch_after_write(id, user_id).await
    }
}
