//! Advertisement Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Advertisement, AdvertisementCreate, AdvertisementUpdate};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const AD_TABLE: &str = "advertisement";

#[derive(Clone)]
pub struct AdvertisementRepository {
    base: BaseRepository,
}

impl AdvertisementRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Advertisement>> {
        let ads: Vec<Advertisement> = self
            .base
            .db()
            .query("SELECT * FROM advertisement ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(ads)
    }

    pub async fn find_active(&self) -> RepoResult<Vec<Advertisement>> {
        let ads: Vec<Advertisement> = self
            .base
            .db()
            .query("SELECT * FROM advertisement WHERE is_active = true ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(ads)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Advertisement>> {
        let rid = parse_record_id(AD_TABLE, id)?;
        let ad: Option<Advertisement> = self.base.db().select(rid).await?;
        Ok(ad)
    }

    pub async fn create(&self, data: AdvertisementCreate) -> RepoResult<Advertisement> {
        let ad = Advertisement {
            id: None,
            title: data.title,
            images: data.images,
            is_active: data.is_active.unwrap_or(true),
            created_at: Some(Utc::now()),
        };
        let created: Option<Advertisement> = self.base.db().create(AD_TABLE).content(ad).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create advertisement".to_string()))
    }

    pub async fn update(&self, id: &str, data: AdvertisementUpdate) -> RepoResult<Advertisement> {
        let rid = parse_record_id(AD_TABLE, id)?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.title.is_some() {
            set_parts.push("title = $title");
        }
        if data.images.is_some() {
            set_parts.push("images = $images");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }
        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Advertisement {id} not found")));
        }

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("id", rid));
        if let Some(v) = data.title {
            query = query.bind(("title", v));
        }
        if let Some(v) = data.images {
            query = query.bind(("images", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }

        let ads: Vec<Advertisement> = query.await?.take(0)?;
        ads.into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Advertisement {id} not found")))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = parse_record_id(AD_TABLE, id)?;
        let result: Option<Advertisement> = self.base.db().delete(rid).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Advertisement {id} not found")));
        }
        Ok(())
    }
}
