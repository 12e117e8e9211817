//! Product handlers

use axum::Json;
use axum::extract::{Path, State};
use rust_decimal::Decimal;

use crate::core::ServerState;
use crate::db::models::{ColorVariant, Product, ProductCreate, ProductUpdate};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

fn validate_variants(variants: &[ColorVariant]) -> Result<(), AppError> {
    if variants.is_empty() {
        return Err(AppError::validation("variants cannot be empty"));
    }
    for variant in variants {
        validate_required_text(&variant.color, "color", MAX_SHORT_TEXT_LEN)?;
        for size in &variant.sizes {
            validate_required_text(&size.size, "size", MAX_SHORT_TEXT_LEN)?;
        }
    }
    Ok(())
}

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    Ok(ok(state.products.find_all().await?))
}

pub async fn list_by_subcategory(
    State(state): State<ServerState>,
    Path(subcategory_id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    Ok(ok(state.products.find_by_subcategory(&subcategory_id).await?))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;
    Ok(ok(product))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<ProductCreate>,
) -> AppResult<Json<AppResponse<Product>>> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    if data.price < Decimal::ZERO {
        return Err(AppError::validation("price must not be negative"));
    }
    validate_variants(&data.variants)?;

    // Subcategory must exist
    let sub = data.subcategory.to_string();
    state
        .subcategories
        .find_by_id(&sub)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subcategory {sub}")))?;

    Ok(ok(state.products.create(data).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<ProductUpdate>,
) -> AppResult<Json<AppResponse<Product>>> {
    validate_optional_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    if let Some(price) = data.price
        && price < Decimal::ZERO
    {
        return Err(AppError::validation("price must not be negative"));
    }
    if let Some(variants) = &data.variants {
        validate_variants(variants)?;
    }
    if let Some(subcategory) = &data.subcategory {
        let sub = subcategory.to_string();
        state
            .subcategories
            .find_by_id(&sub)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Subcategory {sub}")))?;
    }

    Ok(ok(state.products.update(&id, data).await?))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state.products.delete(&id).await?;
    Ok(ok_with_message((), "Product deleted"))
}
