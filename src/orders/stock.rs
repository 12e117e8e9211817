//! Stock ledger
//!
//! Stock is tracked per (product, color, size) inside the product
//! document. The pure mutation functions below keep two laws:
//!
//! - quantity never goes negative (reserve fails instead);
//! - release is the exact inverse of reserve, re-creating size rows
//!   and color variants that reserve emptied out.
//!
//! [`StockLedger`] wraps the pure functions with persistence and a
//! per-product async lock so the check-then-decrement sequence cannot
//! interleave between two requests for the same product.

use super::{OrderError, OrderResult};
use crate::db::models::{ColorVariant, Product, SizeStock};
use crate::db::repository::ProductRepository;
use dashmap::DashMap;
use std::sync::Arc;
use surrealdb::RecordId;
use tokio::sync::Mutex;

/// What happens to a size row when its quantity hits zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroStockPolicy {
    /// Drop the row (and the variant once its last row goes);
    /// absence of a size means sold out
    #[default]
    Remove,
    /// Keep the row at quantity 0
    Retain,
}

/// Decrement stock for one (color, size) line.
///
/// Fails without mutating when the variant or size is missing or the
/// quantity on hand is short; the error carries the exact amount left.
pub fn reserve(
    variants: &mut Vec<ColorVariant>,
    color: &str,
    size: &str,
    quantity: u32,
    policy: ZeroStockPolicy,
) -> OrderResult<()> {
    let variant_idx = variants
        .iter()
        .position(|v| v.color == color)
        .ok_or_else(|| OrderError::VariantNotFound(color.to_string()))?;

    let variant = &mut variants[variant_idx];
    let size_idx = variant
        .sizes
        .iter()
        .position(|s| s.size == size)
        .ok_or_else(|| OrderError::SizeNotFound {
            color: color.to_string(),
            size: size.to_string(),
        })?;

    let row = &mut variant.sizes[size_idx];
    if row.quantity < quantity {
        return Err(OrderError::InsufficientStock {
            available: row.quantity,
        });
    }

    row.quantity -= quantity;
    if policy == ZeroStockPolicy::Remove && row.quantity == 0 {
        variant.sizes.remove(size_idx);
        if variant.sizes.is_empty() {
            variants.remove(variant_idx);
        }
    }
    Ok(())
}

/// Increment stock for one (color, size) line.
///
/// Re-creates the size row, and the color variant itself, if reserve
/// removed them. Never fails.
pub fn release(variants: &mut Vec<ColorVariant>, color: &str, size: &str, quantity: u32) {
    let variant_idx = match variants.iter().position(|v| v.color == color) {
        Some(i) => i,
        None => {
            variants.push(ColorVariant {
                color: color.to_string(),
                images: Vec::new(),
                sizes: Vec::new(),
            });
            variants.len() - 1
        }
    };
    let variant = &mut variants[variant_idx];

    match variant.sizes.iter_mut().find(|s| s.size == size) {
        Some(row) => row.quantity += quantity,
        None => variant.sizes.push(SizeStock {
            size: size.to_string(),
            quantity,
        }),
    }
}

/// Serialized stock mutations against the product store
pub struct StockLedger {
    products: ProductRepository,
    policy: ZeroStockPolicy,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl StockLedger {
    pub fn new(products: ProductRepository, policy: ZeroStockPolicy) -> Self {
        Self {
            products,
            policy,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, product_id: &RecordId) -> Arc<Mutex<()>> {
        self.locks
            .entry(product_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Reserve stock and persist the mutated variant tree.
    ///
    /// Returns the product as loaded under the lock so callers can
    /// snapshot name/price/images from the same read.
    pub async fn reserve(
        &self,
        product_id: &RecordId,
        color: &str,
        size: &str,
        quantity: u32,
    ) -> OrderResult<Product> {
        let lock = self.lock_for(product_id);
        let _guard = lock.lock().await;

        let mut product = self
            .products
            .find_by_id(&product_id.to_string())
            .await?
            .ok_or_else(|| OrderError::ProductGone(product_id.to_string()))?;

        reserve(&mut product.variants, color, size, quantity, self.policy)?;
        self.products
            .save_variants(product_id, &product.variants)
            .await?;
        Ok(product)
    }

    /// Release stock back onto the product.
    ///
    /// A product deleted after the order was placed is skipped with a
    /// warning; the remaining lines still get their stock back.
    pub async fn release(
        &self,
        product_id: &RecordId,
        color: &str,
        size: &str,
        quantity: u32,
    ) -> OrderResult<()> {
        let lock = self.lock_for(product_id);
        let _guard = lock.lock().await;

        let Some(mut product) = self.products.find_by_id(&product_id.to_string()).await? else {
            tracing::warn!(
                product = %product_id,
                quantity,
                "Skipping stock release for deleted product"
            );
            return Ok(());
        };

        release(&mut product.variants, color, size, quantity);
        self.products
            .save_variants(product_id, &product.variants)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variants() -> Vec<ColorVariant> {
        vec![
            ColorVariant {
                color: "Red".into(),
                images: vec!["red.jpg".into()],
                sizes: vec![
                    SizeStock { size: "M".into(), quantity: 3 },
                    SizeStock { size: "L".into(), quantity: 1 },
                ],
            },
            ColorVariant {
                color: "Blue".into(),
                images: vec![],
                sizes: vec![SizeStock { size: "S".into(), quantity: 5 }],
            },
        ]
    }

    #[test]
    fn reserve_decrements_quantity() {
        let mut v = variants();
        reserve(&mut v, "Red", "M", 2, ZeroStockPolicy::Remove).unwrap();
        assert_eq!(v[0].sizes[0].quantity, 1);
    }

    #[test]
    fn reserve_fails_on_unknown_color_and_size() {
        let mut v = variants();
        assert!(matches!(
            reserve(&mut v, "Green", "M", 1, ZeroStockPolicy::Remove),
            Err(OrderError::VariantNotFound(_))
        ));
        assert!(matches!(
            reserve(&mut v, "Red", "XXL", 1, ZeroStockPolicy::Remove),
            Err(OrderError::SizeNotFound { .. })
        ));
        // failed reserve leaves stock untouched
        assert_eq!(v, variants());
    }

    #[test]
    fn reserve_reports_exact_available_on_shortfall() {
        let mut v = variants();
        let err = reserve(&mut v, "Red", "M", 4, ZeroStockPolicy::Remove).unwrap_err();
        assert!(matches!(err, OrderError::InsufficientStock { available: 3 }));
        assert_eq!(v, variants());
    }

    #[test]
    fn exhausted_size_row_is_removed() {
        let mut v = variants();
        reserve(&mut v, "Red", "L", 1, ZeroStockPolicy::Remove).unwrap();
        assert!(v[0].sizes.iter().all(|s| s.size != "L"));
        // and a follow-up reserve for it reports the size as gone
        assert!(matches!(
            reserve(&mut v, "Red", "L", 1, ZeroStockPolicy::Remove),
            Err(OrderError::SizeNotFound { .. })
        ));
    }

    #[test]
    fn exhausted_variant_is_removed() {
        let mut v = variants();
        reserve(&mut v, "Blue", "S", 5, ZeroStockPolicy::Remove).unwrap();
        assert!(v.iter().all(|variant| variant.color != "Blue"));
    }

    #[test]
    fn retain_policy_keeps_zero_rows() {
        let mut v = variants();
        reserve(&mut v, "Blue", "S", 5, ZeroStockPolicy::Retain).unwrap();
        let blue = v.iter().find(|variant| variant.color == "Blue").unwrap();
        assert_eq!(blue.sizes[0].quantity, 0);
    }

    #[test]
    fn release_is_inverse_of_reserve() {
        let mut v = variants();
        reserve(&mut v, "Red", "L", 1, ZeroStockPolicy::Remove).unwrap();
        release(&mut v, "Red", "L", 1);
        let red = v.iter().find(|variant| variant.color == "Red").unwrap();
        let l = red.sizes.iter().find(|s| s.size == "L").unwrap();
        assert_eq!(l.quantity, 1);
    }

    #[test]
    fn release_resurrects_removed_variant() {
        let mut v = variants();
        reserve(&mut v, "Blue", "S", 5, ZeroStockPolicy::Remove).unwrap();
        assert_eq!(v.len(), 1);
        release(&mut v, "Blue", "S", 5);
        let blue = v.iter().find(|variant| variant.color == "Blue").unwrap();
        assert_eq!(blue.sizes[0].quantity, 5);
        // the resurrected variant has no images; those were product data
        assert!(blue.images.is_empty());
    }

    #[test]
    fn release_onto_missing_size_creates_the_row() {
        let mut v = variants();
        release(&mut v, "Red", "XL", 2);
        let red = v.iter().find(|variant| variant.color == "Red").unwrap();
        let xl = red.sizes.iter().find(|s| s.size == "XL").unwrap();
        assert_eq!(xl.quantity, 2);
    }
}
