//! Advertisement handlers
//!
//! `/active` is the public storefront feed; the rest require auth.

use axum::Json;
use axum::extract::{Path, State};

use crate::core::ServerState;
use crate::db::models::{Advertisement, AdvertisementCreate, AdvertisementUpdate};
use crate::utils::validation::{MAX_NAME_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Advertisement>>>> {
    Ok(ok(state.advertisements.find_all().await?))
}

pub async fn list_active(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Advertisement>>>> {
    Ok(ok(state.advertisements.find_active().await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<AdvertisementCreate>,
) -> AppResult<Json<AppResponse<Advertisement>>> {
    validate_required_text(&data.title, "title", MAX_NAME_LEN)?;
    Ok(ok(state.advertisements.create(data).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<AdvertisementUpdate>,
) -> AppResult<Json<AppResponse<Advertisement>>> {
    validate_optional_text(&data.title, "title", MAX_NAME_LEN)?;
    Ok(ok(state.advertisements.update(&id, data).await?))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state.advertisements.delete(&id).await?;
    Ok(ok_with_message((), "Advertisement deleted"))
}
