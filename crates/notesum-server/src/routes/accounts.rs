//! Registration, login, and profile endpoints

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;

use notesum_core::Error;
use notesum_core::accounts::{Profile, ProfileUpdate, Session};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let Json(req) = body?;
    let session = state
        .accounts
        .register(&req.email, &req.password, req.name.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Session>, ApiError> {
    let Json(req) = body?;
    let session = state.accounts.login(&req.email, &req.password).await?;
    Ok(Json(session))
}

/// `POST /api/auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<StatusCode, ApiError> {
    state.accounts.logout(&user.token).await?;
    tracing::debug!(user_id = %user.user_id, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/profile`
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .accounts
        .profiles()
        .get(&user.user_id)
        .await?
        .ok_or_else(|| Error::ProfileNotFound(user.user_id.clone()))?;
    Ok(Json(profile))
}

/// `PUT /api/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<Profile>, ApiError> {
    let Json(update) = body?;
    let profile = state.accounts.profiles().upsert(&user.user_id, update).await?;
    Ok(Json(profile))
}
