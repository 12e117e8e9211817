//! Address handlers
//!
//! Addresses belong to the current user; marking one default clears
//! the flag on the others (enforced in the repository).

use axum::Json;
use axum::extract::{Extension, Path, State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Address, AddressCreate, AddressUpdate};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

fn validate_create(data: &AddressCreate) -> Result<(), AppError> {
    validate_required_text(&data.full_name, "full_name", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&data.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&data.line1, "line1", MAX_ADDRESS_LEN)?;
    validate_optional_text(&data.line2, "line2", MAX_ADDRESS_LEN)?;
    validate_required_text(&data.city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&data.state, "state", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&data.pincode, "pincode", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

fn validate_update(data: &AddressUpdate) -> Result<(), AppError> {
    validate_optional_text(&data.full_name, "full_name", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.line1, "line1", MAX_ADDRESS_LEN)?;
    validate_optional_text(&data.line2, "line2", MAX_ADDRESS_LEN)?;
    validate_optional_text(&data.city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.state, "state", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.pincode, "pincode", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

async fn owned_address(
    state: &ServerState,
    current: &CurrentUser,
    id: &str,
) -> AppResult<Address> {
    let address = state
        .addresses
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Address {id}")))?;
    if address.user != current.record_id()? {
        return Err(AppError::forbidden("Address belongs to another account"));
    }
    Ok(address)
}

pub async fn list(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<Vec<Address>>>> {
    let user_id = current.record_id()?;
    Ok(ok(state.addresses.find_by_user(&user_id).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(data): Json<AddressCreate>,
) -> AppResult<Json<AppResponse<Address>>> {
    validate_create(&data)?;
    let user_id = current.record_id()?;
    Ok(ok(state.addresses.create(&user_id, data).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(data): Json<AddressUpdate>,
) -> AppResult<Json<AppResponse<Address>>> {
    validate_update(&data)?;
    owned_address(&state, &current, &id).await?;
    let user_id = current.record_id()?;
    Ok(ok(state.addresses.update(&user_id, &id, data).await?))
}

pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    owned_address(&state, &current, &id).await?;
    state.addresses.delete(&id).await?;
    Ok(ok_with_message((), "Address deleted"))
}
