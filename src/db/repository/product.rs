//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{ColorVariant, Product, ProductCreate, ProductUpdate};
use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn find_by_subcategory(&self, subcategory_id: &str) -> RepoResult<Vec<Product>> {
        let rid = parse_record_id("subcategory", subcategory_id)?;
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE subcategory = $sub ORDER BY created_at DESC")
            .bind(("sub", rid.to_string()))
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let rid = parse_record_id(PRODUCT_TABLE, id)?;
        let product: Option<Product> = self.base.db().select(rid).await?;
        Ok(product)
    }

    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.variants.is_empty() {
            return Err(RepoError::Validation("variants cannot be empty".into()));
        }
        let product = Product {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            price: data.price,
            subcategory: data.subcategory,
            variants: data.variants,
            created_at: Some(Utc::now()),
        };
        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let rid = parse_record_id(PRODUCT_TABLE, id)?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.subcategory.is_some() {
            set_parts.push("subcategory = $subcategory");
        }
        if data.variants.is_some() {
            set_parts.push("variants = $variants");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")));
        }

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("id", rid));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.subcategory {
            query = query.bind(("subcategory", v.to_string()));
        }
        if let Some(v) = data.variants {
            query = query.bind(("variants", serde_json::to_value(&v).unwrap_or_default()));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
    }

    /// Persist only the variant tree (stock mutations)
    pub async fn save_variants(
        &self,
        id: &RecordId,
        variants: &[ColorVariant],
    ) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $id SET variants = $variants")
            .bind(("id", id.clone()))
            .bind((
                "variants",
                serde_json::to_value(variants)
                    .map_err(|e| RepoError::Database(e.to_string()))?,
            ))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = parse_record_id(PRODUCT_TABLE, id)?;
        let result: Option<Product> = self.base.db().delete(rid).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Product {id} not found")));
        }
        Ok(())
    }
}
