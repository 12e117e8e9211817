//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderItem, OrderStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = parse_record_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// All orders for a user, newest first
    pub async fn find_by_user(&self, user_id: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn set_status(&self, id: &RecordId, status: OrderStatus) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $id SET status = $status")
            .bind(("id", id.clone()))
            .bind(("status", status.as_str()))
            .await?;
        Ok(())
    }

    /// Persist status and line items together (return accounting)
    pub async fn save_items_and_status(
        &self,
        id: &RecordId,
        items: &[OrderItem],
        status: OrderStatus,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $id SET items = $items, status = $status")
            .bind(("id", id.clone()))
            .bind((
                "items",
                serde_json::to_value(items).map_err(|e| RepoError::Database(e.to_string()))?,
            ))
            .bind(("status", status.as_str()))
            .await?;
        Ok(())
    }

    /// True when the user has a DELIVERED order containing the product
    pub async fn has_delivered_product(
        &self,
        user_id: &RecordId,
        product_id: &RecordId,
    ) -> RepoResult<bool> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user AND status = $status")
            .bind(("user", user_id.to_string()))
            .bind(("status", OrderStatus::Delivered.as_str()))
            .await?
            .take(0)?;
        Ok(orders
            .iter()
            .flat_map(|o| o.items.iter())
            .any(|item| item.product == *product_id))
    }
}
