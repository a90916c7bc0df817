//! HTTP API integration tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot` against an
//! in-memory database.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

use notesum_core::accounts::AccountService;
use notesum_core::config::{AuthConfig, LlmConfig, ServerConfig};
use notesum_core::storage::Database;
use notesum_core::summary::SummaryService;
use notesum_server::{AppState, router};

/// Cheapest cost bcrypt accepts
const TEST_HASH_COST: u32 = 4;

async fn app_with(summaries: SummaryService) -> Router {
    let db = Database::in_memory().await.expect("Failed to create database");
    let accounts =
        AccountService::new(db.clone(), &AuthConfig::default()).with_hash_cost(TEST_HASH_COST);
    router(AppState::new(db, summaries, accounts), &ServerConfig::default())
}

async fn app() -> Router {
    app_with(SummaryService::fallback()).await
}

async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body)
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, text) = send_raw(app, method, uri, token, body.map(|b| b.to_string())).await;
    let value = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap()
    };
    (status, value)
}

/// Register a user and return its session token
async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": email, "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

async fn create_note(app: &Router, token: &str, title: &str, content: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/notes",
        Some(token),
        Some(json!({"title": title, "content": content})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

mod summarize_endpoint {
    use super::*;

    #[tokio::test]
    async fn test_single_sentence() {
        let app = app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/summarize",
            None,
            Some(json!({"content": "Buy milk"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"summary": "Buy milk."}));
    }

    #[tokio::test]
    async fn test_ten_sentences_keep_two() {
        let app = app().await;
        let content = "One. Two. Three. Four. Five. Six. Seven. Eight. Nine. Ten.";
        let (status, body) = send(
            &app,
            "POST",
            "/api/summarize",
            None,
            Some(json!({"content": content})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "One. Two.");
    }

    #[tokio::test]
    async fn test_invalid_content_is_rejected() {
        let app = app().await;

        for payload in [
            json!({}),
            json!({"content": ""}),
            json!({"content": "   "}),
            json!({"content": 42}),
            json!({"content": null}),
        ] {
            let (status, body) = send(&app, "POST", "/api/summarize", None, Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Content is required and must be a string");
        }
    }

    #[tokio::test]
    async fn test_oversized_body_is_json_413() {
        let app = app().await;
        let content = "a".repeat(1_100_000);
        let (status, text) = send_raw(
            &app,
            "POST",
            "/api/summarize",
            None,
            Some(json!({"content": content}).to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body, json!({"error": "Request body too large"}));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let app = app().await;
        let (status, text) =
            send_raw(&app, "POST", "/api/summarize", None, Some("{oops".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&text).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_upstream_failure_does_not_leak() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string("upstream secret: quota exceeded"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = LlmConfig {
            base_url: server.uri(),
            ..LlmConfig::default()
        };
        let summaries = SummaryService::with_api_key(&config, Some("test-key".to_string())).unwrap();
        let app = app_with(summaries).await;

        let (status, text) = send_raw(
            &app,
            "POST",
            "/api/summarize",
            None,
            Some(json!({"content": "Some note."}).to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!text.contains("secret"));
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body, json!({"error": "Failed to generate summary"}));
    }

    #[tokio::test]
    async fn test_upstream_summary_is_returned() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/chat/completions"))
            .and(matchers::header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cmpl-1",
                "model": "deepseek-chat",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "A grocery list."},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = LlmConfig {
            base_url: server.uri(),
            ..LlmConfig::default()
        };
        let summaries = SummaryService::with_api_key(&config, Some("test-key".to_string())).unwrap();
        let app = app_with(summaries).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/summarize",
            None,
            Some(json!({"content": "Eggs. Milk. Bread."})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "A grocery list.");
    }
}

mod accounts {
    use super::*;

    #[tokio::test]
    async fn test_register_login_logout() {
        let app = app().await;
        let first = register(&app, "ada@example.com").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "ADA@example.com", "password": "password123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let second = body["token"].as_str().unwrap().to_string();
        assert_ne!(first, second);

        let (status, _) = send(&app, "POST", "/api/auth/logout", Some(&second), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", "/api/notes", Some(&second), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // The other session is unaffected
        let (status, _) = send(&app, "GET", "/api/notes", Some(&first), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_duplicate_and_bad_credentials() {
        let app = app().await;
        register(&app, "ada@example.com").await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"email": "ada@example.com", "password": "password123"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "ada@example.com", "password": "nope-nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
    }

    #[tokio::test]
    async fn test_protected_routes_require_session() {
        let app = app().await;

        for (method, uri) in [
            ("GET", "/api/notes"),
            ("GET", "/api/notes/abc"),
            ("POST", "/api/notes/abc/summarize"),
            ("GET", "/api/profile"),
            ("POST", "/api/auth/logout"),
        ] {
            let (status, body) = send(&app, method, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert!(body["error"].is_string());

            let (status, _) = send(&app, method, uri, Some("bogus"), None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn test_session_cookie_is_accepted() {
        let app = app().await;
        let token = register(&app, "ada@example.com").await;

        let request = Request::builder()
            .method("GET")
            .uri("/api/notes")
            .header(header::COOKIE, format!("session_id={}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_profile_roundtrip() {
        let app = app().await;
        let token = register(&app, "ada@example.com").await;

        let (status, body) = send(&app, "GET", "/api/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "ada@example.com");
        assert!(body["name"].is_null());

        let (status, body) = send(
            &app,
            "PUT",
            "/api/profile",
            Some(&token),
            Some(json!({"name": "Ada Lovelace", "avatar_url": "https://img/ada.png"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Ada Lovelace");
        assert_eq!(body["avatar_url"], "https://img/ada.png");
    }
}

mod notes {
    use super::*;

    #[tokio::test]
    async fn test_summarize_oversized_body_is_json_413() {
        let app = app().await;
        let token = register(&app, "ada@example.com").await;
        let created = create_note(&app, &token, "Plan", "Stored.").await;
        let uri = format!("/api/notes/{}/summarize", created["id"].as_str().unwrap());

        let (status, text) = send_raw(
            &app,
            "POST",
            &uri,
            Some(&token),
            Some(json!({"content": "b".repeat(1_100_000)}).to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["error"], "Request body too large");
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let app = app().await;
        let token = register(&app, "ada@example.com").await;

        let created = create_note(&app, &token, "Groceries", "Eggs. Milk.").await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = send(&app, "GET", &format!("/api/notes/{}", id), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Groceries");
        assert_eq!(body["content"], "Eggs. Milk.");
        assert!(body["summary"].is_null());
    }

    #[tokio::test]
    async fn test_create_validation() {
        let app = app().await;
        let token = register(&app, "ada@example.com").await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/notes",
            Some(&token),
            Some(json!({"title": "  ", "content": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/api/notes",
            Some(&token),
            Some(json!({"title": "only a title"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_has_excerpt() {
        let app = app().await;
        let alice = register(&app, "alice@example.com").await;
        let bob = register(&app, "bob@example.com").await;

        create_note(&app, &alice, "Long", &"word ".repeat(60)).await;
        create_note(&app, &bob, "Bob's", "Private.").await;

        let (status, body) = send(&app, "GET", "/api/notes", Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);

        let notes = body.as_array().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0]["title"], "Long");

        let excerpt = notes[0]["excerpt"].as_str().unwrap();
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), 153);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let app = app().await;
        let token = register(&app, "ada@example.com").await;
        let created = create_note(&app, &token, "Draft", "First. Second.").await;
        let uri = format!("/api/notes/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({"title": "Final"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Final");
        assert_eq!(body["content"], "First. Second.");

        let (status, _) = send(&app, "PUT", &uri, Some(&token), Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Note not found");
    }

    #[tokio::test]
    async fn test_summarize_with_body_content() {
        let app = app().await;
        let token = register(&app, "ada@example.com").await;
        let created = create_note(&app, &token, "Plan", "Stored content.").await;
        let uri = format!("/api/notes/{}/summarize", created["id"].as_str().unwrap());

        let (status, body) = send(
            &app,
            "POST",
            &uri,
            Some(&token),
            Some(json!({"content": "Fresh content"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "Fresh content.");
        assert_eq!(body["content"], "Stored content.");
    }

    #[tokio::test]
    async fn test_summarize_stored_content() {
        let app = app().await;
        let token = register(&app, "ada@example.com").await;
        let created = create_note(&app, &token, "Plan", "Stored content. More detail.").await;
        let uri = format!("/api/notes/{}/summarize", created["id"].as_str().unwrap());

        let (status, body) = send(&app, "POST", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "Stored content.");

        let (status, body) = send(&app, "GET", "/api/notes", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["summary"], "Stored content.");
    }

    #[tokio::test]
    async fn test_summarize_invalid_content() {
        let app = app().await;
        let token = register(&app, "ada@example.com").await;
        let created = create_note(&app, &token, "Plan", "Stored.").await;
        let uri = format!("/api/notes/{}/summarize", created["id"].as_str().unwrap());

        let (status, body) =
            send(&app, "POST", &uri, Some(&token), Some(json!({"content": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Content is required and must be a string");

        let (_, note) = send(&app, "GET", &format!("/api/notes/{}", created["id"].as_str().unwrap()), Some(&token), None).await;
        assert!(note["summary"].is_null());
    }

    #[tokio::test]
    async fn test_other_users_note_is_not_found() {
        let app = app().await;
        let alice = register(&app, "alice@example.com").await;
        let bob = register(&app, "bob@example.com").await;

        let created = create_note(&app, &alice, "Secret", "Alice only.").await;
        let id = created["id"].as_str().unwrap();
        let note_uri = format!("/api/notes/{}", id);

        let (status, _) = send(
            &app,
            "POST",
            &format!("{}/summarize", note_uri),
            Some(&bob),
            Some(json!({"content": "Hijacked"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        for method in ["GET", "DELETE"] {
            let (status, _) = send(&app, method, &note_uri, Some(&bob), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
        let (status, _) =
            send(&app, "PUT", &note_uri, Some(&bob), Some(json!({"title": "Mine"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, "GET", &note_uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Secret");
        assert!(body["summary"].is_null());
    }
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "ok", "database": "ok", "summarizer": "fallback"})
    );
}
