//! Wishlist handlers
//!
//! The wishlist is a product-id list on the user document.

use axum::Json;
use axum::extract::{Extension, Path, State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, User};
use crate::db::repository::parse_record_id;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

async fn load_user(state: &ServerState, current: &CurrentUser) -> AppResult<User> {
    state
        .users
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::not_found("Account"))
}

pub async fn list(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    let user = load_user(&state, &current).await?;

    let mut products = Vec::with_capacity(user.wishlist.len());
    for product_id in &user.wishlist {
        // Deleted products simply drop out of the list
        if let Some(product) = state.products.find_by_id(&product_id.to_string()).await? {
            products.push(product);
        }
    }
    Ok(ok(products))
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub product: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub in_wishlist: bool,
}

pub async fn toggle(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ToggleRequest>,
) -> AppResult<Json<AppResponse<ToggleResponse>>> {
    let product_id = parse_record_id("product", &req.product)?;
    state
        .products
        .find_by_id(&req.product)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", req.product)))?;

    let mut user = load_user(&state, &current).await?;
    let id = user
        .id
        .clone()
        .ok_or_else(|| AppError::internal("User record missing id"))?;

    let in_wishlist = if user.wishlist.contains(&product_id) {
        user.wishlist.retain(|p| p != &product_id);
        false
    } else {
        user.wishlist.push(product_id);
        true
    };

    let wishlist: Vec<String> = user.wishlist.iter().map(|p| p.to_string()).collect();
    state.users.set_wishlist(&id, wishlist).await?;
    Ok(ok(ToggleResponse { in_wishlist }))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(product_id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let product_id = parse_record_id("product", &product_id)?;

    let mut user = load_user(&state, &current).await?;
    let id = user
        .id
        .clone()
        .ok_or_else(|| AppError::internal("User record missing id"))?;

    let before = user.wishlist.len();
    user.wishlist.retain(|p| p != &product_id);
    if user.wishlist.len() == before {
        return Err(AppError::not_found("Wishlist entry"));
    }

    let wishlist: Vec<String> = user.wishlist.iter().map(|p| p.to_string()).collect();
    state.users.set_wishlist(&id, wishlist).await?;
    Ok(ok_with_message((), "Removed from wishlist"))
}
