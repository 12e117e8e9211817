//! Cart Repository
//!
//! One cart document per user, created lazily on first access.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cart, CartItem};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const CART_TABLE: &str = "cart";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_user(&self, user_id: &RecordId) -> RepoResult<Option<Cart>> {
        let carts: Vec<Cart> = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user = $user")
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Find the user's cart, creating an empty one if missing
    pub async fn find_or_create(&self, user_id: &RecordId) -> RepoResult<Cart> {
        if let Some(cart) = self.find_by_user(user_id).await? {
            return Ok(cart);
        }
        let cart = Cart {
            id: None,
            user: user_id.clone(),
            items: Vec::new(),
        };
        let created: Option<Cart> = self.base.db().create(CART_TABLE).content(cart).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
    }

    pub async fn save_items(&self, cart_id: &RecordId, items: &[CartItem]) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $id SET items = $items")
            .bind(("id", cart_id.clone()))
            .bind((
                "items",
                serde_json::to_value(items).map_err(|e| RepoError::Database(e.to_string()))?,
            ))
            .await?;
        Ok(())
    }

    pub async fn clear(&self, cart_id: &RecordId) -> RepoResult<()> {
        self.save_items(cart_id, &[]).await
    }
}
