//! Address Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Address, AddressCreate, AddressUpdate};
use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const ADDRESS_TABLE: &str = "address";

#[derive(Clone)]
pub struct AddressRepository {
    base: BaseRepository,
}

impl AddressRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_user(&self, user_id: &RecordId) -> RepoResult<Vec<Address>> {
        let addresses: Vec<Address> = self
            .base
            .db()
            .query("SELECT * FROM address WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(addresses)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Address>> {
        let rid = parse_record_id(ADDRESS_TABLE, id)?;
        let address: Option<Address> = self.base.db().select(rid).await?;
        Ok(address)
    }

    /// Default address if set, otherwise the most recent one
    pub async fn find_default_or_latest(&self, user_id: &RecordId) -> RepoResult<Option<Address>> {
        let addresses = self.find_by_user(user_id).await?;
        Ok(addresses
            .iter()
            .find(|a| a.is_default)
            .cloned()
            .or_else(|| addresses.into_iter().next()))
    }

    pub async fn unset_defaults(&self, user_id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE address SET is_default = false WHERE user = $user")
            .bind(("user", user_id.to_string()))
            .await?;
        Ok(())
    }

    pub async fn create(&self, user_id: &RecordId, data: AddressCreate) -> RepoResult<Address> {
        let is_default = data.is_default.unwrap_or(false);
        if is_default {
            self.unset_defaults(user_id).await?;
        }
        let address = Address {
            id: None,
            user: user_id.clone(),
            full_name: data.full_name,
            phone: data.phone,
            line1: data.line1,
            line2: data.line2,
            city: data.city,
            state: data.state,
            pincode: data.pincode,
            is_default,
            created_at: Some(Utc::now()),
        };
        let created: Option<Address> = self
            .base
            .db()
            .create(ADDRESS_TABLE)
            .content(address)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create address".to_string()))
    }

    pub async fn update(
        &self,
        user_id: &RecordId,
        id: &str,
        data: AddressUpdate,
    ) -> RepoResult<Address> {
        let rid = parse_record_id(ADDRESS_TABLE, id)?;
        if data.is_default == Some(true) {
            self.unset_defaults(user_id).await?;
        }

        let mut set_parts: Vec<&str> = Vec::new();
        if data.full_name.is_some() {
            set_parts.push("full_name = $full_name");
        }
        if data.phone.is_some() {
            set_parts.push("phone = $phone");
        }
        if data.line1.is_some() {
            set_parts.push("line1 = $line1");
        }
        if data.line2.is_some() {
            set_parts.push("line2 = $line2");
        }
        if data.city.is_some() {
            set_parts.push("city = $city");
        }
        if data.state.is_some() {
            set_parts.push("state = $state");
        }
        if data.pincode.is_some() {
            set_parts.push("pincode = $pincode");
        }
        if data.is_default.is_some() {
            set_parts.push("is_default = $is_default");
        }
        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Address {id} not found")));
        }

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("id", rid));
        if let Some(v) = data.full_name {
            query = query.bind(("full_name", v));
        }
        if let Some(v) = data.phone {
            query = query.bind(("phone", v));
        }
        if let Some(v) = data.line1 {
            query = query.bind(("line1", v));
        }
        if let Some(v) = data.line2 {
            query = query.bind(("line2", v));
        }
        if let Some(v) = data.city {
            query = query.bind(("city", v));
        }
        if let Some(v) = data.state {
            query = query.bind(("state", v));
        }
        if let Some(v) = data.pincode {
            query = query.bind(("pincode", v));
        }
        if let Some(v) = data.is_default {
            query = query.bind(("is_default", v));
        }

        let addresses: Vec<Address> = query.await?.take(0)?;
        addresses
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Address {id} not found")))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = parse_record_id(ADDRESS_TABLE, id)?;
        let result: Option<Address> = self.base.db().delete(rid).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Address {id} not found")));
        }
        Ok(())
    }
}
