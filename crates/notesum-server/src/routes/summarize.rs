//! Stateless summarization endpoint

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;
use notesum_core::summary::content_from_json;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// `POST /api/summarize`
///
/// The body is read as untyped JSON so a missing or non-string `content`
/// is reported with the same message as an empty one.
pub async fn summarize(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(body) = body?;
    let content = content_from_json(&body)?;

    let summary = state.summaries.summarize(content).await?;
    Ok(Json(SummaryResponse { summary }))
}
