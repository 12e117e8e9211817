//! Unified error handling
//!
//! Application error enum and the response envelope every handler returns:
//! - [`AppError`] - typed application error with a stable wire code
//! - [`AppResponse`] - `{ code, message, data }` JSON envelope
//!
//! # Error code ranges
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx  | General  | E0003 not found |
//! | E2xxx  | Permission | E2001 forbidden |
//! | E3xxx  | Authentication | E3003 token expired |
//! | E4xxx  | Orders   | E4001 empty cart |
//! | E6xxx  | Stock    | E6003 insufficient stock |
//! | E9xxx  | System   | E9002 database error |

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Uniform API response envelope
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Wire code (E0000 on success)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication (401/403) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== General (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    // ========== Orders (4xx) ==========
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Order cannot be changed when status is {0}")]
    InvalidTransition(String),

    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    #[error("Order item not found: {0}")]
    ItemNotFound(String),

    #[error("Invalid return quantity: {0}")]
    InvalidReturnQuantity(String),

    // ========== Stock (4xx) ==========
    #[error("Color variant not found: {0}")]
    VariantNotFound(String),

    #[error("Size not found: {0}")]
    SizeNotFound(String),

    #[error("Insufficient stock, only {available} left")]
    InsufficientStock { available: u32 },

    // ========== System (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "E3001", "Please login first".to_string())
            }
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", self.to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E3002", self.to_string()),

            // Authorization errors (403)
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "E2001", self.to_string()),

            // Not found (404)
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "E0003", self.to_string()),

            // Conflict (409)
            AppError::Conflict(_) => (StatusCode::CONFLICT, "E0004", self.to_string()),

            // Validation / invalid request (400)
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "E0002", self.to_string()),
            AppError::Invalid(_) => (StatusCode::BAD_REQUEST, "E0006", self.to_string()),

            // Order domain (4xx)
            AppError::EmptyCart => (StatusCode::BAD_REQUEST, "E4001", self.to_string()),
            AppError::InvalidTransition(_) => (StatusCode::BAD_REQUEST, "E4002", self.to_string()),
            AppError::InvalidStatus(_) => (StatusCode::BAD_REQUEST, "E4003", self.to_string()),
            AppError::ItemNotFound(_) => (StatusCode::NOT_FOUND, "E4004", self.to_string()),
            AppError::InvalidReturnQuantity(_) => {
                (StatusCode::BAD_REQUEST, "E4005", self.to_string())
            }

            // Stock domain (4xx)
            AppError::VariantNotFound(_) => (StatusCode::NOT_FOUND, "E6001", self.to_string()),
            AppError::SizeNotFound(_) => (StatusCode::NOT_FOUND, "E6002", self.to_string()),
            AppError::InsufficientStock { .. } => {
                (StatusCode::BAD_REQUEST, "E6003", self.to_string())
            }

            // Database errors (500) - message not leaked to the client
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Multipart error: {}", e))
    }
}

// ========== Helper constructors ==========

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn conflict(resource: impl Into<String>) -> Self {
        Self::Conflict(resource.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Unified message to prevent email enumeration during login
    pub fn invalid_credentials() -> Self {
        Self::Invalid("Invalid email or password".to_string())
    }
}

/// Result type for handlers and services
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}
