//! User Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Sign-in provider for an account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthProvider {
    Local,
    Google,
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    /// Argon2 hash; absent for Google-provisioned accounts
    pub password_hash: Option<String>,
    pub provider: AuthProvider,
    #[serde(default)]
    pub is_verified: bool,
    /// Pending 6-digit verification code
    pub otp_code: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    /// Wishlist: record links into the product table
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub wishlist: Vec<RecordId>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Public view of a user (never exposes hash or OTP)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub provider: AuthProvider,
    pub is_verified: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            provider: user.provider,
            is_verified: user.is_verified,
        }
    }
}
