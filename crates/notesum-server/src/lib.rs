//! Notesum HTTP API
//!
//! Thin axum layer over `notesum-core`: request parsing, authentication,
//! and error mapping live here; all behavior lives in the core crate.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use notesum_core::config::ServerConfig;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Build the application router
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/summarize", post(routes::summarize::summarize))
        .route("/auth/register", post(routes::accounts::register))
        .route("/auth/login", post(routes::accounts::login))
        .route("/auth/logout", post(routes::accounts::logout))
        .route(
            "/profile",
            get(routes::accounts::get_profile).put(routes::accounts::update_profile),
        )
        .route(
            "/notes",
            get(routes::notes::list_notes).post(routes::notes::create_note),
        )
        .route(
            "/notes/:id",
            get(routes::notes::get_note)
                .put(routes::notes::update_note)
                .delete(routes::notes::delete_note),
        )
        .route("/notes/:id/summarize", post(routes::notes::summarize_note));

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(server.body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
