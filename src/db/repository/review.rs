//! Review Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::Review;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const REVIEW_TABLE: &str = "review";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(reviews)
    }

    pub async fn find_by_product(&self, product_id: &str) -> RepoResult<Vec<Review>> {
        let rid = parse_record_id("product", product_id)?;
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE product = $product ORDER BY created_at DESC")
            .bind(("product", rid.to_string()))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let rid = parse_record_id(REVIEW_TABLE, id)?;
        let review: Option<Review> = self.base.db().select(rid).await?;
        Ok(review)
    }

    pub async fn find_by_user_and_product(
        &self,
        user_id: &RecordId,
        product_id: &RecordId,
    ) -> RepoResult<Option<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE user = $user AND product = $product")
            .bind(("user", user_id.to_string()))
            .bind(("product", product_id.to_string()))
            .await?
            .take(0)?;
        Ok(reviews.into_iter().next())
    }

    pub async fn create(&self, review: Review) -> RepoResult<Review> {
        let created: Option<Review> = self.base.db().create(REVIEW_TABLE).content(review).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    pub async fn update_content(
        &self,
        id: &RecordId,
        rating: u8,
        comment: Option<String>,
    ) -> RepoResult<Review> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("UPDATE $id SET rating = $rating, comment = $comment RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("rating", rating as i64))
            .bind(("comment", comment))
            .await?
            .take(0)?;
        reviews
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("Review not found".to_string()))
    }

    pub async fn delete(&self, id: &RecordId) -> RepoResult<()> {
        let result: Option<Review> = self.base.db().delete(id.clone()).await?;
        if result.is_none() {
            return Err(RepoError::NotFound("Review not found".to_string()));
        }
        Ok(())
    }
}
