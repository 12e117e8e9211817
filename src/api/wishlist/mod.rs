//! Wishlist API module

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/wishlist", wishlist_routes())
}

fn wishlist_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/toggle", post(handler::toggle))
        .route("/{product_id}", delete(handler::remove))
}
