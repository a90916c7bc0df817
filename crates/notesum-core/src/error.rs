//! Error types for notesum

use thiserror::Error;

/// Result type alias using notesum's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Notesum error types
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (E001-E099)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Entity errors (E100-E199)
    /// No note matched the id + owner pair. Deliberately does not tell
    /// "missing" apart from "owned by someone else".
    #[error("Note '{0}' not found")]
    NoteNotFound(String),

    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),

    // Summary errors (E200-E299)
    #[error("Summary generation failed: {0}")]
    GenerationFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    // Auth errors (E300-E399)
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with email '{0}' already exists")]
    EmailTaken(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "E001",
            Self::NoteNotFound(_) => "E100",
            Self::ProfileNotFound(_) => "E101",
            Self::GenerationFailed(_) => "E200",
            Self::NetworkError(_) => "E201",
            Self::Unauthorized => "E300",
            Self::InvalidCredentials => "E301",
            Self::EmailTaken(_) => "E302",
            Self::PasswordHash(_) => "E303",
            Self::DatabaseError(_) => "E400",
            Self::ConfigError(_) => "E600",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Whether the caller caused this error (as opposed to the service or
    /// one of its collaborators)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::NoteNotFound(_)
                | Self::ProfileNotFound(_)
                | Self::Unauthorized
                | Self::InvalidCredentials
                | Self::EmailTaken(_)
        )
    }

    /// Shorthand for an `InvalidInput` error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
