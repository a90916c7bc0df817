//! Request-boundary error handling
//!
//! Every failure leaves the API as `{ "error": string }`. Messages for
//! server-side failures are generic; the detail goes to the log.

use axum::Json;
use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use notesum_core::Error;

/// Client-facing message for failed summary generation
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate summary";

/// Client-facing message for any other server-side failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Client-facing message for bodies over `server.body_limit_bytes`
pub const BODY_TOO_LARGE_MESSAGE: &str = "Request body too large";

/// Error type returned by handlers
#[derive(Debug)]
pub enum ApiError {
    /// Error raised by the core library
    Core(Error),
    /// Request body was not valid JSON for the endpoint
    BadRequest(String),
    /// Request body exceeded the configured limit
    PayloadTooLarge,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self::Core(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::PayloadTooLarge;
        }
        Self::BadRequest(rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::PayloadTooLarge;
        }
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// Status code and client-facing message
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                BODY_TOO_LARGE_MESSAGE.to_string(),
            ),
            ApiError::Core(err) => match err {
                Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                Error::Unauthorized => (StatusCode::UNAUTHORIZED, err.to_string()),
                Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
                Error::NoteNotFound(_) => (StatusCode::NOT_FOUND, "Note not found".to_string()),
                Error::ProfileNotFound(_) => {
                    (StatusCode::NOT_FOUND, "Profile not found".to_string())
                }
                Error::EmailTaken(_) => (StatusCode::CONFLICT, err.to_string()),
                Error::GenerationFailed(_) | Error::NetworkError(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERATION_FAILED_MESSAGE.to_string(),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        match &self {
            ApiError::Core(err) if status.is_server_error() => {
                tracing::error!(code = err.code(), error = %err, "Request failed");
            }
            ApiError::Core(err) => {
                tracing::debug!(code = err.code(), error = %err, "Request rejected");
            }
            ApiError::BadRequest(msg) => {
                tracing::debug!(error = %msg, "Malformed request body");
            }
            ApiError::PayloadTooLarge => {
                tracing::debug!("Request body over limit");
            }
        }

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: Error) -> (StatusCode, String) {
        ApiError::from(err).status_and_message()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(Error::invalid_input("x")).0, StatusCode::BAD_REQUEST);
        assert_eq!(status_of(Error::Unauthorized).0, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(Error::InvalidCredentials).0, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(Error::NoteNotFound("n".into())).0, StatusCode::NOT_FOUND);
        assert_eq!(status_of(Error::EmailTaken("e".into())).0, StatusCode::CONFLICT);
        assert_eq!(
            status_of(Error::Other("disk full".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_generation_detail_not_leaked() {
        let (status, message) = status_of(Error::GenerationFailed("provider said: quota".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, GENERATION_FAILED_MESSAGE);
    }

    #[test]
    fn test_store_detail_not_leaked() {
        let (_, message) = status_of(Error::Other("disk full".into()));
        assert_eq!(message, INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_payload_too_large() {
        let (status, message) = ApiError::PayloadTooLarge.status_and_message();
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(message, BODY_TOO_LARGE_MESSAGE);
    }

    #[test]
    fn test_not_found_message_does_not_echo_id() {
        let (_, message) = status_of(Error::NoteNotFound("secret-id".into()));
        assert!(!message.contains("secret-id"));
    }
}
