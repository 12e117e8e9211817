//! Category handlers

use axum::Json;
use axum::extract::{Path, State};

use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Category>>>> {
    Ok(ok(state.categories.find_all().await?))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Category>>> {
    let category = state
        .categories
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {id}")))?;
    Ok(ok(category))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<CategoryCreate>,
) -> AppResult<Json<AppResponse<Category>>> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.image, "image", MAX_URL_LEN)?;
    Ok(ok(state.categories.create(data).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<CategoryUpdate>,
) -> AppResult<Json<AppResponse<Category>>> {
    validate_optional_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.image, "image", MAX_URL_LEN)?;
    Ok(ok(state.categories.update(&id, data).await?))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state.categories.delete(&id).await?;
    Ok(ok_with_message((), "Category deleted"))
}
