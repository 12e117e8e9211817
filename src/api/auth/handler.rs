//! Auth handlers
//!
//! Registration issues a 6-digit email code; accounts stay unverified
//! until the code is confirmed. Login answers with a fixed delay on
//! every failure path so timing does not reveal whether the email
//! exists.

use axum::Json;
use axum::extract::{Extension, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{CurrentUser, otp, password};
use crate::core::ServerState;
use crate::db::models::{Address, AuthProvider, User, UserResponse};
use crate::utils::validation::{validate_email, validate_password, validate_required_text};
use crate::utils::validation::MAX_NAME_LEN;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// Fixed response delay for failed logins (anti-timing)
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub email: String,
    /// Echoed back in development only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<AppResponse<RegisterResponse>>> {
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let email = req.email.trim().to_lowercase();
    let code = otp::generate_otp();
    let expires = otp::expiry_from_now();

    let user = match state.users.find_by_email(&email).await? {
        Some(existing) if existing.is_verified => {
            return Err(AppError::conflict(format!("Account {email}")));
        }
        // Unverified account: refresh the code and resend
        Some(existing) => {
            if let Some(id) = &existing.id {
                state.users.set_otp(id, &code, expires).await?;
            }
            existing
        }
        None => {
            let hash = password::hash_password(&req.password)?;
            state
                .users
                .create(User {
                    id: None,
                    name: req.name.trim().to_string(),
                    email: email.clone(),
                    password_hash: Some(hash),
                    provider: AuthProvider::Local,
                    is_verified: false,
                    otp_code: Some(code.clone()),
                    otp_expires_at: Some(expires),
                    wishlist: Vec::new(),
                    created_at: Some(Utc::now()),
                })
                .await?
        }
    };

    state.email.send_otp(&email, &user.name, &code).await?;
    info!(email = %email, "Registration code issued");

    let otp_echo = if state.config.is_development() {
        Some(code)
    } else {
        None
    };
    Ok(ok_with_message(
        RegisterResponse {
            email,
            otp: otp_echo,
        },
        "Verification code sent",
    ))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

pub async fn verify_otp(
    State(state): State<ServerState>,
    Json(req): Json<VerifyOtpRequest>,
) -> AppResult<Json<AppResponse<UserResponse>>> {
    let email = req.email.trim().to_lowercase();
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Account {email}")))?;

    if user.is_verified {
        return Ok(ok_with_message((&user).into(), "Already verified"));
    }

    if !otp::verify(user.otp_code.as_deref(), user.otp_expires_at, &req.otp) {
        return Err(AppError::invalid("Invalid or expired verification code"));
    }

    let id = user
        .id
        .clone()
        .ok_or_else(|| AppError::internal("User record missing id"))?;
    state.users.mark_verified(&id).await?;
    info!(email = %email, "Email verified");

    let mut verified = user;
    verified.is_verified = true;
    Ok(ok_with_message((&verified).into(), "Email verified"))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
    /// Default address if set, otherwise the most recent
    pub address: Option<Address>,
}

async fn fail_slow() -> AppError {
    tokio::time::sleep(std::time::Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;
    AppError::invalid_credentials()
}

pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    let email = req.email.trim().to_lowercase();

    let Some(user) = state.users.find_by_email(&email).await? else {
        return Err(fail_slow().await);
    };
    let Some(hash) = &user.password_hash else {
        // Google-provisioned account without a password
        return Err(fail_slow().await);
    };
    if !password::verify_password(&req.password, hash) {
        return Err(fail_slow().await);
    }
    if !user.is_verified {
        return Err(AppError::forbidden("Please verify your email first"));
    }

    let id = user
        .id
        .as_ref()
        .ok_or_else(|| AppError::internal("User record missing id"))?;
    let token = state
        .jwt_service()
        .generate_token(&id.to_string(), &user.name, &user.email)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;
    let address = state.addresses.find_default_or_latest(id).await?;

    info!(email = %email, "Login");
    Ok(ok(LoginResponse {
        token,
        user: (&user).into(),
        address,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GoogleRequest {
    pub id_token: String,
}

pub async fn google(
    State(state): State<ServerState>,
    Json(req): Json<GoogleRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    let profile = state.google.verify(&req.id_token).await?;
    let email = profile.email.to_lowercase();

    let user = match state.users.find_by_email(&email).await? {
        Some(mut user) => {
            // A Google-verified email counts as verified for us too
            if !user.is_verified {
                user.is_verified = true;
                user.otp_code = None;
                user.otp_expires_at = None;
                user = state.users.save(user).await?;
            }
            user
        }
        None => {
            state
                .users
                .create(User {
                    id: None,
                    name: profile.name,
                    email: email.clone(),
                    password_hash: None,
                    provider: AuthProvider::Google,
                    is_verified: true,
                    otp_code: None,
                    otp_expires_at: None,
                    wishlist: Vec::new(),
                    created_at: Some(Utc::now()),
                })
                .await?
        }
    };

    let id = user
        .id
        .as_ref()
        .ok_or_else(|| AppError::internal("User record missing id"))?;
    let token = state
        .jwt_service()
        .generate_token(&id.to_string(), &user.name, &user.email)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;
    let address = state.addresses.find_default_or_latest(id).await?;

    info!(email = %email, "Google sign-in");
    Ok(ok(LoginResponse {
        token,
        user: (&user).into(),
        address,
    }))
}

pub async fn logout(
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<()>>> {
    // Tokens are stateless; the client discards its copy
    info!(user = %user.id, "Logout");
    Ok(ok_with_message((), "Logged out"))
}

pub async fn me(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<UserResponse>>> {
    let user = state
        .users
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::not_found("Account"))?;
    Ok(ok((&user).into()))
}
