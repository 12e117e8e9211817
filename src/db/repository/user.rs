//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::User;
use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let rid = parse_record_id(USER_TABLE, id)?;
        let user: Option<User> = self.base.db().select(rid).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn create(&self, user: User) -> RepoResult<User> {
        let created: Option<User> = self.base.db().create(USER_TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Replace the whole user document (OTP, verification, wishlist edits)
    pub async fn save(&self, user: User) -> RepoResult<User> {
        let id = user
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("User has no id".to_string()))?;
        let updated: Option<User> = self.base.db().update(id).content(user).await?;
        updated.ok_or_else(|| RepoError::NotFound("User not found".to_string()))
    }

    pub async fn set_otp(
        &self,
        id: &RecordId,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $id SET otp_code = $code, otp_expires_at = $expires")
            .bind(("id", id.clone()))
            .bind(("code", code.to_string()))
            .bind(("expires", expires_at.to_rfc3339()))
            .await?;
        Ok(())
    }

    pub async fn mark_verified(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $id SET is_verified = true, otp_code = NONE, otp_expires_at = NONE")
            .bind(("id", id.clone()))
            .await?;
        Ok(())
    }

    pub async fn set_wishlist(&self, id: &RecordId, wishlist: Vec<String>) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $id SET wishlist = $wishlist")
            .bind(("id", id.clone()))
            .bind(("wishlist", wishlist))
            .await?;
        Ok(())
    }
}
