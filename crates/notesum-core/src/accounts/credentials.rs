//! Password hashing and session token helpers

use rand::{Rng, distributions::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Length of generated session tokens
const TOKEN_LENGTH: usize = 48;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Cheapest cost bcrypt accepts; keeps hashing fast in tests
#[cfg(test)]
pub(crate) const TEST_HASH_COST: u32 = 4;

/// Generate a random opaque session token
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Hex SHA-256 of a session token; only this form is stored
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Hash a password with bcrypt off the async runtime
pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| Error::Other(format!("Password hashing task failed: {}", e)))?
        .map_err(Error::from)
}

/// Check a password against a bcrypt hash off the async runtime
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| Error::Other(format!("Password verification task failed: {}", e)))?
        .map_err(Error::from)
}

/// Normalize and sanity-check an email address
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(Error::invalid_input("A valid email address is required"));
    }
    Ok(email)
}

/// Reject passwords that are too short
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::invalid_input(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
