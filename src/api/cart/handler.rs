//! Cart handlers
//!
//! Adding the same (product, color, size) twice merges quantities.
//! The cart view resolves live product data; lines whose product has
//! been deleted are hidden (checkout drops them for good).

use axum::Json;
use axum::extract::{Extension, State};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CartItem, Product};
use crate::utils::{AppError, AppResponse, AppResult, ok};

#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub product: Product,
    pub color: String,
    pub size: String,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
}

pub async fn get_cart(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<CartView>>> {
    let user_id = current.record_id()?;
    let cart = state.carts.find_or_create(&user_id).await?;

    let mut items = Vec::with_capacity(cart.items.len());
    for line in &cart.items {
        // Deleted products drop out of the view
        if let Some(product) = state.products.find_by_id(&line.product.to_string()).await? {
            items.push(CartItemView {
                product,
                color: line.color.clone(),
                size: line.size.clone(),
                quantity: line.quantity,
            });
        }
    }
    Ok(ok(CartView { items }))
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product: String,
    pub color: String,
    pub size: String,
    pub quantity: u32,
}

pub async fn add_item(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<AddItemRequest>,
) -> AppResult<Json<AppResponse<CartView>>> {
    if req.quantity == 0 {
        return Err(AppError::validation("quantity must be at least 1"));
    }

    let product = state
        .products
        .find_by_id(&req.product)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", req.product)))?;

    // The chosen color/size must exist on the product right now;
    // stock itself is only checked at checkout
    let variant = product
        .variants
        .iter()
        .find(|v| v.color == req.color)
        .ok_or_else(|| AppError::VariantNotFound(req.color.clone()))?;
    if !variant.sizes.iter().any(|s| s.size == req.size) {
        return Err(AppError::SizeNotFound(format!(
            "{} in {}",
            req.size, req.color
        )));
    }

    let product_id: RecordId = product
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Product record missing id"))?;

    let user_id = current.record_id()?;
    let mut cart = state.carts.find_or_create(&user_id).await?;

    match cart.items.iter_mut().find(|item| {
        item.product == product_id && item.color == req.color && item.size == req.size
    }) {
        Some(line) => line.quantity += req.quantity,
        None => cart.items.push(CartItem {
            product: product_id,
            color: req.color,
            size: req.size,
            quantity: req.quantity,
        }),
    }

    let cart_id = cart
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Cart record missing id"))?;
    state.carts.save_items(&cart_id, &cart.items).await?;

    get_cart(State(state), Extension(current)).await
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub product: String,
    pub color: String,
    pub size: String,
}

pub async fn remove_item(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<RemoveItemRequest>,
) -> AppResult<Json<AppResponse<CartView>>> {
    let product_id = crate::db::repository::parse_record_id("product", &req.product)?;

    let user_id = current.record_id()?;
    let mut cart = state.carts.find_or_create(&user_id).await?;

    let before = cart.items.len();
    cart.items.retain(|item| {
        !(item.product == product_id && item.color == req.color && item.size == req.size)
    });
    if cart.items.len() == before {
        return Err(AppError::not_found("Cart item"));
    }

    let cart_id = cart
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Cart record missing id"))?;
    state.carts.save_items(&cart_id, &cart.items).await?;

    get_cart(State(state), Extension(current)).await
}
