//! Order handlers
//!
//! All stock movement happens inside `OrderService`; handlers only
//! parse input and enforce ownership via the current user.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus, PaymentMethod, ShippingAddress};
use crate::db::repository::parse_record_id;
use crate::utils::validation::{MAX_ADDRESS_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

fn validate_shipping_address(address: &ShippingAddress) -> Result<(), AppError> {
    validate_required_text(&address.name, "name", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&address.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&address.street, "street", MAX_ADDRESS_LEN)?;
    validate_required_text(&address.city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&address.pincode, "pincode", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

pub async fn place_order(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    validate_shipping_address(&req.shipping_address)?;

    let user_id = current.record_id()?;
    let order = state
        .order_service
        .place_order(&user_id, req.shipping_address, req.payment_method)
        .await?;
    Ok(ok(order))
}

pub async fn my_orders(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let user_id = current.record_id()?;
    Ok(ok(state.order_service.my_orders(&user_id).await?))
}

pub async fn all_orders(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    Ok(ok(state.order_service.all_orders().await?))
}

pub async fn get_order(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let user_id = current.record_id()?;
    Ok(ok(state.order_service.get_order(&id, &user_id).await?))
}

pub async fn cancel_order(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let user_id = current.record_id()?;
    Ok(ok(state.order_service.cancel_order(&id, &user_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ReturnRequest {
    pub product: String,
    pub quantity: u32,
}

pub async fn request_return(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<ReturnRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let user_id = current.record_id()?;
    let product_id = parse_record_id("product", &req.product)?;
    let order = state
        .order_service
        .request_return(&id, &user_id, &product_id, req.quantity)
        .await?;
    Ok(ok(order))
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let status =
        OrderStatus::from_str(&req.status).map_err(|_| AppError::InvalidStatus(req.status.clone()))?;
    Ok(ok(state.order_service.set_status(&id, status).await?))
}
