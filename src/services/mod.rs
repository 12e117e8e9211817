//! Application services

pub mod assets;
pub mod email;

pub use assets::{AssetStore, StoredImage};
pub use email::{EmailService, SmtpConfig};
