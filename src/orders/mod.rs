//! Order domain
//!
//! Everything that moves stock lives here: the stock ledger (per-size
//! reserve/release on product variants), the order status transition
//! table, and the checkout service that assembles orders from carts.

pub mod checkout;
pub mod stock;
pub mod transitions;

pub use checkout::OrderService;
pub use stock::{StockLedger, ZeroStockPolicy};
pub use transitions::{OrderAction, StockEffect};

use crate::db::models::OrderStatus;
use crate::db::repository::RepoError;
use crate::utils::AppError;
use thiserror::Error;

/// Errors raised by order placement and lifecycle actions
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Cart is empty")]
    EmptyCart,

    /// Product document vanished; checkout drops the line, other
    /// callers surface it
    #[error("Product no longer exists: {0}")]
    ProductGone(String),

    #[error("Color variant not found: {0}")]
    VariantNotFound(String),

    #[error("Size {size} not found for color {color}")]
    SizeNotFound { color: String, size: String },

    #[error("Insufficient stock, only {available} left")]
    InsufficientStock { available: u32 },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Not your order")]
    Forbidden,

    #[error("Order cannot be changed when status is {current}")]
    InvalidTransition { current: OrderStatus },

    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    #[error("Order item not found: {0}")]
    ItemNotFound(String),

    #[error("Invalid return quantity: {0}")]
    InvalidReturnQuantity(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => AppError::EmptyCart,
            OrderError::ProductGone(id) => AppError::NotFound(format!("Product {id}")),
            OrderError::VariantNotFound(color) => AppError::VariantNotFound(color),
            OrderError::SizeNotFound { color, size } => {
                AppError::SizeNotFound(format!("{size} in {color}"))
            }
            OrderError::InsufficientStock { available } => {
                AppError::InsufficientStock { available }
            }
            OrderError::OrderNotFound(id) => AppError::NotFound(format!("Order {id}")),
            OrderError::Forbidden => AppError::forbidden("Not your order"),
            OrderError::InvalidTransition { current } => {
                AppError::InvalidTransition(current.to_string())
            }
            OrderError::InvalidStatus(s) => AppError::InvalidStatus(s),
            OrderError::ItemNotFound(id) => AppError::ItemNotFound(id),
            OrderError::InvalidReturnQuantity(msg) => AppError::InvalidReturnQuantity(msg),
            OrderError::Repo(e) => e.into(),
        }
    }
}

/// Result type for order operations
pub type OrderResult<T> = Result<T, OrderError>;
