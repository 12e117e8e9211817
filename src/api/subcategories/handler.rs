//! Subcategory handlers

use axum::Json;
use axum::extract::{Path, State};

use crate::core::ServerState;
use crate::db::models::{Subcategory, SubcategoryCreate, SubcategoryUpdate};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Subcategory>>>> {
    Ok(ok(state.subcategories.find_all().await?))
}

pub async fn list_by_category(
    State(state): State<ServerState>,
    Path(category_id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<Subcategory>>>> {
    Ok(ok(state.subcategories.find_by_category(&category_id).await?))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Subcategory>>> {
    let subcategory = state
        .subcategories
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subcategory {id}")))?;
    Ok(ok(subcategory))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<SubcategoryCreate>,
) -> AppResult<Json<AppResponse<Subcategory>>> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.image, "image", MAX_URL_LEN)?;

    // Parent must exist
    let parent = data.category.to_string();
    state
        .categories
        .find_by_id(&parent)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {parent}")))?;

    Ok(ok(state.subcategories.create(data).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<SubcategoryUpdate>,
) -> AppResult<Json<AppResponse<Subcategory>>> {
    validate_optional_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.image, "image", MAX_URL_LEN)?;

    if let Some(category) = &data.category {
        let parent = category.to_string();
        state
            .categories
            .find_by_id(&parent)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {parent}")))?;
    }

    Ok(ok(state.subcategories.update(&id, data).await?))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state.subcategories.delete(&id).await?;
    Ok(ok_with_message((), "Subcategory deleted"))
}
