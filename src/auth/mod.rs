//! Authentication
//!
//! JWT issuing/validation, the auth middleware, password hashing,
//! one-time email codes, and Google ID-token verification.

pub mod google;
pub mod jwt;
pub mod middleware;
pub mod otp;
pub mod password;

pub use google::{GoogleProfile, GoogleVerifier};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use password::{hash_password, verify_password};
