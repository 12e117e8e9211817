//! Auth API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", auth_routes())
}

fn auth_routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/verify-otp", post(handler::verify_otp))
        .route("/login", post(handler::login))
        .route("/google", post(handler::google))
        .route("/logout", post(handler::logout))
        .route("/me", get(handler::me))
}
