//! Cart Model
//!
//! One cart document per user. Items point at live products; the price
//! is resolved at read time and frozen only when an order is placed.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Cart line: product reference plus the chosen color/size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub color: String,
    pub size: String,
    pub quantity: u32,
}

/// Cart entity (unique per user)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(default)]
    pub items: Vec<CartItem>,
}
