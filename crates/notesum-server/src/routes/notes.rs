//! Owner-scoped note endpoints
//!
//! Every lookup is filtered by the authenticated user; a note owned by
//! someone else is indistinguishable from a missing one.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use notesum_core::Error;
use notesum_core::notes::{Note, NoteInput, NoteUpdate};
use notesum_core::summary::content_from_json;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

/// A note as shown in listings
#[derive(Debug, Serialize)]
pub struct NoteListItem {
    #[serde(flatten)]
    pub note: Note,
    pub excerpt: String,
}

impl From<Note> for NoteListItem {
    fn from(note: Note) -> Self {
        let excerpt = note.excerpt();
        Self { note, excerpt }
    }
}

/// `GET /api/notes`
pub async fn list_notes(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<NoteListItem>>, ApiError> {
    let notes = state.notes.list(&user.user_id).await?;
    Ok(Json(notes.into_iter().map(NoteListItem::from).collect()))
}

/// `POST /api/notes`
pub async fn create_note(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<NoteInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let Json(input) = body?;
    let note = state.notes.create(&user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// `GET /api/notes/:id`
pub async fn get_note(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    let note = state
        .notes
        .get(&id, &user.user_id)
        .await?
        .ok_or_else(|| Error::NoteNotFound(id.clone()))?;
    Ok(Json(note))
}

/// `PUT /api/notes/:id`
pub async fn update_note(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<NoteUpdate>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let Json(update) = body?;
    let note = state.notes.update(&id, &user.user_id, update).await?;
    Ok(Json(note))
}

/// `DELETE /api/notes/:id`
pub async fn delete_note(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.notes.delete(&id, &user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/notes/:id/summarize`
///
/// Summarizes the `content` given in the body, or the stored content when
/// the body is empty or has no `content` field.
pub async fn summarize_note(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Note>, ApiError> {
    let body = parse_optional_body(&body?)?;

    let note = match body.as_ref().filter(|b| has_content_field(b)) {
        Some(body) => {
            let content = content_from_json(body)?;
            state
                .coordinator
                .summarize_note(&id, &user.user_id, content)
                .await?
        }
        None => state.coordinator.summarize_stored(&id, &user.user_id).await?,
    };

    Ok(Json(note))
}

fn parse_optional_body(body: &[u8]) -> Result<Option<Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

fn has_content_field(body: &Value) -> bool {
    body.get("content").is_some_and(|c| !c.is_null())
}
