//! User profiles
//!
//! Display data for an account. The profile id equals the user id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

use super::credentials::normalize_email;
use crate::error::{Error, Result};
use crate::storage::Database;

/// A user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile fields to change; absent fields are left alone and empty
/// `name`/`avatar_url` values clear the field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Profile repository for database operations
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    db: Database,
}

impl ProfileRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get the profile of `user_id`
    pub async fn get(&self, user_id: &str) -> Result<Option<Profile>> {
        let row = sqlx::query(
            "SELECT id, email, name, avatar_url, created_at FROM profiles WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Self::row_to_profile))
    }

    /// Apply `update` to the profile of `user_id`, creating the profile from
    /// the account's email when it does not exist yet
    pub async fn upsert(&self, user_id: &str, update: ProfileUpdate) -> Result<Profile> {
        let mut profile = match self.get(user_id).await? {
            Some(profile) => profile,
            None => self.default_profile(user_id).await?,
        };

        if let Some(email) = update.email {
            profile.email = normalize_email(&email)?;
        }
        if let Some(name) = update.name {
            profile.name = non_blank(name);
        }
        if let Some(avatar_url) = update.avatar_url {
            profile.avatar_url = non_blank(avatar_url);
        }

        sqlx::query(
            r#"
            INSERT INTO profiles (id, email, name, avatar_url, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                name = excluded.name,
                avatar_url = excluded.avatar_url
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(&profile.avatar_url)
        .bind(profile.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(profile)
    }

    async fn default_profile(&self, user_id: &str) -> Result<Profile> {
        let row: Option<(String,)> = sqlx::query_as("SELECT email FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;
        let (email,) = row.ok_or_else(|| Error::ProfileNotFound(user_id.to_string()))?;

        Ok(Profile {
            id: user_id.to_string(),
            email,
            name: None,
            avatar_url: None,
            created_at: Utc::now(),
        })
    }

    fn row_to_profile(row: sqlx::sqlite::SqliteRow) -> Profile {
        Profile {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            avatar_url: row.get("avatar_url"),
            created_at: row.get("created_at"),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
