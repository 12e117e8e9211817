//! Review handlers
//!
//! Reviews are purchase-gated: a user may review a product only after
//! owning a DELIVERED order containing it. Posting again overwrites
//! the earlier review instead of stacking duplicates.

use axum::Json;
use axum::extract::{Extension, Path, State};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Review;
use crate::db::repository::parse_record_id;
use crate::utils::validation::{MAX_DESCRIPTION_LEN, validate_optional_text, validate_rating};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Review>>>> {
    Ok(ok(state.reviews.find_all().await?))
}

pub async fn list_by_product(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<Review>>>> {
    Ok(ok(state.reviews.find_by_product(&product_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpsertReviewRequest {
    pub product: String,
    pub rating: u8,
    pub comment: Option<String>,
}

pub async fn upsert(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpsertReviewRequest>,
) -> AppResult<Json<AppResponse<Review>>> {
    validate_rating(req.rating)?;
    validate_optional_text(&req.comment, "comment", MAX_DESCRIPTION_LEN)?;

    let product_id = parse_record_id("product", &req.product)?;
    state
        .products
        .find_by_id(&req.product)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", req.product)))?;

    let user_id = current.record_id()?;
    if !state
        .orders
        .has_delivered_product(&user_id, &product_id)
        .await?
    {
        return Err(AppError::forbidden(
            "You can only review products from delivered orders",
        ));
    }

    let review = match state
        .reviews
        .find_by_user_and_product(&user_id, &product_id)
        .await?
    {
        Some(existing) => {
            let id = existing
                .id
                .ok_or_else(|| AppError::internal("Review record missing id"))?;
            state
                .reviews
                .update_content(&id, req.rating, req.comment)
                .await?
        }
        None => {
            state
                .reviews
                .create(Review {
                    id: None,
                    user: user_id,
                    product: product_id,
                    user_name: current.name.clone(),
                    rating: req.rating,
                    comment: req.comment,
                    created_at: Some(chrono::Utc::now()),
                })
                .await?
        }
    };
    Ok(ok(review))
}

pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let review_id = parse_record_id("review", &id)?;
    let user_id = current.record_id()?;

    let review = state
        .reviews
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Review {id}")))?;
    if review.user != user_id {
        return Err(AppError::forbidden("You can only delete your own reviews"));
    }

    state.reviews.delete(&review_id).await?;
    Ok(ok_with_message((), "Review deleted"))
}
