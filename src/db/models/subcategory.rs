//! Subcategory Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Second-level catalog entry; products hang off subcategories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub image: Option<String>,
    /// Record link to the parent category
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcategoryCreate {
    pub name: String,
    pub image: Option<String>,
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcategoryUpdate {
    pub name: Option<String>,
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub category: Option<RecordId>,
}
