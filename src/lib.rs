//! Drape - clothing store backend
//!
//! # Architecture
//!
//! - **API** (`api`): RESTful routes, one module per resource
//! - **Auth** (`auth`): JWT + Argon2, email OTP, Google sign-in
//! - **Database** (`db`): embedded SurrealDB models and repositories
//! - **Orders** (`orders`): stock ledger, checkout, status machine
//! - **Services** (`services`): email delivery, image storage
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, middleware, OTP, passwords, Google
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models and repositories
//! ├── orders/        # stock reservation and order lifecycle
//! ├── services/      # email, asset store
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderService, StockLedger, ZeroStockPolicy};
pub use utils::{AppError, AppResponse, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - keeps auth/upload events on one target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____
   / __ \_________ _____  ___
  / / / / ___/ __ `/ __ \/ _ \
 / /_/ / /  / /_/ / /_/ /  __/
/_____/_/   \__,_/ .___/\___/
                /_/
    "#
    );
}
