//! Accounts
//!
//! Email/password registration, login sessions, and profiles. Sessions are
//! opaque bearer tokens; only their SHA-256 digest is stored.

pub mod credentials;
pub mod profiles;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::Row;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::storage::Database;

pub use credentials::{MIN_PASSWORD_LEN, normalize_email};
pub use profiles::{Profile, ProfileRepository, ProfileUpdate};

/// A freshly issued login session; `token` is only ever shown here
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// The user behind a valid session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

/// Registration, login, and session lookup
#[derive(Debug, Clone)]
pub struct AccountService {
    db: Database,
    session_ttl: Duration,
    hash_cost: u32,
    /// Hash verified against when the email is unknown, so both failure
    /// paths do the same work
    dummy_hash: std::sync::Arc<OnceCell<String>>,
}

impl AccountService {
    pub fn new(db: Database, config: &AuthConfig) -> Self {
        Self {
            db,
            session_ttl: Duration::hours(config.session_ttl_hours),
            hash_cost: bcrypt::DEFAULT_COST,
            dummy_hash: Default::default(),
        }
    }

    /// Override the bcrypt cost (tests use the minimum, 4)
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Access to the profile repository sharing this service's database
    pub fn profiles(&self) -> ProfileRepository {
        ProfileRepository::new(self.db.clone())
    }

    /// Create an account and its profile, and log it in
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<Session> {
        let email = normalize_email(email)?;
        credentials::validate_password(password)?;

        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(self.db.pool())
            .await?;
        if existing.is_some() {
            return Err(Error::EmailTaken(email));
        }

        let password_hash = credentials::hash_password(password, self.hash_cost).await?;
        let user_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        let mut tx = self.db.pool().begin().await?;

        sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
            .bind(&user_id)
            .bind(&email)
            .bind(&password_hash)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    Error::EmailTaken(email.clone())
                }
                other => Error::DatabaseError(other),
            })?;

        sqlx::query("INSERT INTO profiles (id, email, name, created_at) VALUES (?, ?, ?, ?)")
            .bind(&user_id)
            .bind(&email)
            .bind(name)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(user_id = %user_id, "Account registered");
        self.create_session(&user_id, &email).await
    }

    /// Check credentials and issue a session
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        // Malformed emails fail the same way unknown ones do
        let email = normalize_email(email).unwrap_or_default();

        let row = sqlx::query("SELECT id, password_hash FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(self.db.pool())
            .await?;

        let Some(row) = row else {
            let dummy = self.dummy_hash().await?;
            let _ = credentials::verify_password(password, dummy).await;
            return Err(Error::InvalidCredentials);
        };

        let user_id: String = row.get("id");
        let password_hash: String = row.get("password_hash");

        if !credentials::verify_password(password, &password_hash).await? {
            debug!(user_id = %user_id, "Rejected login: wrong password");
            return Err(Error::InvalidCredentials);
        }

        self.purge_expired().await?;
        self.create_session(&user_id, &email).await
    }

    /// Resolve a session token to its user
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        if token.is_empty() {
            return Err(Error::Unauthorized);
        }

        let row = sqlx::query(
            r#"
            SELECT s.user_id, s.expires_at, u.email
            FROM sessions s JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = ?
            "#,
        )
        .bind(credentials::hash_token(token))
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(Error::Unauthorized)?;

        let expires_at: DateTime<Utc> = row.get("expires_at");
        if expires_at <= Utc::now() {
            return Err(Error::Unauthorized);
        }

        Ok(AuthenticatedUser {
            user_id: row.get("user_id"),
            email: row.get("email"),
        })
    }

    /// End a session; unknown tokens are ignored
    pub async fn logout(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(credentials::hash_token(token))
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Remove expired sessions, returning how many were deleted
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn create_session(&self, user_id: &str, email: &str) -> Result<Session> {
        let token = credentials::generate_token();
        let now = Utc::now();
        let expires_at = now + self.session_ttl;

        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(credentials::hash_token(&token))
        .bind(user_id)
        .bind(now)
        .bind(expires_at)
        .execute(self.db.pool())
        .await?;

        Ok(Session {
            token,
            user_id: user_id.to_string(),
            email: email.to_string(),
            expires_at,
        })
    }

    async fn dummy_hash(&self) -> Result<&String> {
        let cost = self.hash_cost;
        self.dummy_hash
            .get_or_try_init(|| async move {
                credentials::hash_password("timing-equalizer", cost).await
            })
            .await
    }
}
