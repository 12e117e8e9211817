//! Orders API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::my_orders).post(handler::place_order))
        .route("/all", get(handler::all_orders))
        .route("/{id}", get(handler::get_order))
        .route("/{id}/cancel", post(handler::cancel_order))
        .route("/{id}/return", post(handler::request_return))
        .route("/{id}/status", put(handler::set_status))
}
