//! Product Model
//!
//! Stock lives inside the product document as nested color variants,
//! each carrying per-size quantity rows.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Per-size stock row inside a color variant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SizeStock {
    pub size: String,
    pub quantity: u32,
}

/// Color variant: its own image set plus size rows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorVariant {
    pub color: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<SizeStock>,
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    /// Record link to the subcategory
    #[serde(with = "serde_helpers::record_id")]
    pub subcategory: RecordId,
    #[serde(default)]
    pub variants: Vec<ColorVariant>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// First image of the first variant, used for order/cart snapshots
    pub fn cover_image(&self) -> Option<String> {
        self.variants
            .iter()
            .find_map(|v| v.images.first().cloned())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(with = "serde_helpers::record_id")]
    pub subcategory: RecordId,
    #[serde(default)]
    pub variants: Vec<ColorVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub subcategory: Option<RecordId>,
    pub variants: Option<Vec<ColorVariant>>,
}
