//! Subcategory Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Subcategory, SubcategoryCreate, SubcategoryUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const SUBCATEGORY_TABLE: &str = "subcategory";

#[derive(Clone)]
pub struct SubcategoryRepository {
    base: BaseRepository,
}

impl SubcategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Subcategory>> {
        let subcategories: Vec<Subcategory> = self
            .base
            .db()
            .query("SELECT * FROM subcategory ORDER BY name")
            .await?
            .take(0)?;
        Ok(subcategories)
    }

    pub async fn find_by_category(&self, category_id: &str) -> RepoResult<Vec<Subcategory>> {
        let rid = parse_record_id("category", category_id)?;
        let subcategories: Vec<Subcategory> = self
            .base
            .db()
            .query("SELECT * FROM subcategory WHERE category = $cat ORDER BY name")
            .bind(("cat", rid.to_string()))
            .await?
            .take(0)?;
        Ok(subcategories)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Subcategory>> {
        let rid = parse_record_id(SUBCATEGORY_TABLE, id)?;
        let subcategory: Option<Subcategory> = self.base.db().select(rid).await?;
        Ok(subcategory)
    }

    pub async fn create(&self, data: SubcategoryCreate) -> RepoResult<Subcategory> {
        let subcategory = Subcategory {
            id: None,
            name: data.name,
            image: data.image,
            category: data.category,
        };
        let created: Option<Subcategory> = self
            .base
            .db()
            .create(SUBCATEGORY_TABLE)
            .content(subcategory)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create subcategory".to_string()))
    }

    pub async fn update(&self, id: &str, data: SubcategoryUpdate) -> RepoResult<Subcategory> {
        let rid = parse_record_id(SUBCATEGORY_TABLE, id)?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.image.is_some() {
            set_parts.push("image = $image");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Subcategory {id} not found")));
        }

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("id", rid));
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.image {
            query = query.bind(("image", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v.to_string()));
        }

        let subcategories: Vec<Subcategory> = query.await?.take(0)?;
        subcategories
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Subcategory {id} not found")))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = parse_record_id(SUBCATEGORY_TABLE, id)?;
        let result: Option<Subcategory> = self.base.db().delete(rid).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Subcategory {id} not found")));
        }
        Ok(())
    }
}
