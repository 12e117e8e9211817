//! Advertisement Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Homepage advertisement banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advertisement {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub title: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertisementCreate {
    pub title: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertisementUpdate {
    pub title: Option<String>,
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
