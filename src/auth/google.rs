//! Google sign-in
//!
//! Verifies Google ID tokens against the tokeninfo endpoint and checks
//! the audience matches our OAuth client id.

use serde::Deserialize;

use crate::utils::AppError;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Profile fields extracted from a verified ID token
#[derive(Debug, Clone)]
pub struct GoogleProfile {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    email: String,
    #[serde(default)]
    email_verified: String,
    #[serde(default)]
    name: String,
}

#[derive(Clone)]
pub struct GoogleVerifier {
    client: reqwest::Client,
    client_id: String,
}

impl GoogleVerifier {
    pub fn new(client_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
        }
    }

    /// Verify an ID token and return the holder's profile
    pub async fn verify(&self, id_token: &str) -> Result<GoogleProfile, AppError> {
        if self.client_id.is_empty() {
            return Err(AppError::internal("Google sign-in is not configured"));
        }

        let response = self
            .client
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Google tokeninfo request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::invalid("Google token verification failed"));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Google tokeninfo parse failed: {e}")))?;

        if info.aud != self.client_id {
            return Err(AppError::invalid("Google token audience mismatch"));
        }
        if info.email_verified != "true" {
            return Err(AppError::invalid("Google account email is not verified"));
        }

        let name = if info.name.is_empty() {
            info.email
                .split('@')
                .next()
                .unwrap_or("Google user")
                .to_string()
        } else {
            info.name
        };

        Ok(GoogleProfile {
            email: info.email,
            name,
        })
    }
}
