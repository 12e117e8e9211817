//! Upload handlers
//!
//! Uploads are multipart; every image is re-encoded to JPEG and keyed
//! by content hash, so uploading the same bytes twice is idempotent.

use axum::Json;
use axum::extract::{Extension, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::assets::{MAX_FILE_SIZE, StoredImage};
use crate::security_log;
use crate::utils::{AppError, AppResponse, AppResult, ok};

pub async fn upload(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Json<AppResponse<Vec<StoredImage>>>> {
    let mut stored = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(original_name) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let data = field.bytes().await?;
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::validation(format!(
                "File too large, maximum is {} bytes",
                MAX_FILE_SIZE
            )));
        }
        let image = state.assets.store_image(data.to_vec(), original_name).await?;
        security_log!(
            "INFO",
            "image_uploaded",
            user = current.id.as_str(),
            filename = image.filename.as_str()
        );
        stored.push(image);
    }

    if stored.is_empty() {
        return Err(AppError::validation("No files provided"));
    }
    Ok(ok(stored))
}

pub async fn serve(
    State(state): State<ServerState>,
    axum::extract::Path(filename): axum::extract::Path<String>,
) -> AppResult<impl IntoResponse> {
    let bytes = state.assets.read_image(&filename).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        bytes,
    ))
}
