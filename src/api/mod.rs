//! API route modules
//!
//! One module per resource, each exposing `router()`:
//!
//! - [`health`] - liveness check
//! - [`auth`] - register / OTP verify / login / google / me
//! - [`categories`], [`subcategories`], [`products`] - catalog
//! - [`cart`], [`wishlist`] - shopping
//! - [`orders`] - checkout and order lifecycle
//! - [`reviews`] - purchase-gated product reviews
//! - [`advertisements`] - homepage banners
//! - [`addresses`] - saved shipping addresses
//! - [`upload`] - image upload and serving

pub mod addresses;
pub mod advertisements;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod subcategories;
pub mod upload;
pub mod wishlist;

use axum::Router;

use crate::core::ServerState;

/// Combined API router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(categories::router())
        .merge(subcategories::router())
        .merge(products::router())
        .merge(cart::router())
        .merge(wishlist::router())
        .merge(orders::router())
        .merge(reviews::router())
        .merge(advertisements::router())
        .merge(addresses::router())
        .merge(upload::router())
}

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
