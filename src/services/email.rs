//! Email delivery (SMTP via lettre)
//!
//! Sends verification codes. When SMTP is not configured the service
//! logs the code instead, which is how development environments run.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, warn};

use crate::utils::AppError;

/// SMTP connection settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

#[derive(Clone)]
pub struct EmailService {
    config: Option<SmtpConfig>,
}

impl EmailService {
    /// `config: None` puts the service in log-only mode
    pub fn new(config: Option<SmtpConfig>) -> Self {
        Self { config }
    }

    fn build_transport(config: &SmtpConfig) -> Result<SmtpTransport, AppError> {
        Ok(SmtpTransport::relay(&config.server)
            .map_err(|e| AppError::internal(format!("SMTP relay error: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build())
    }

    /// Send the registration verification code
    pub async fn send_otp(&self, to: &str, name: &str, code: &str) -> Result<(), AppError> {
        let Some(config) = &self.config else {
            warn!(to, code, "SMTP not configured, logging verification code");
            return Ok(());
        };

        let html_body = format!(
            r#"
<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><title>Verify your email</title></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2>Hi {name},</h2>
        <p>Your verification code is:</p>
        <p style="font-size: 32px; font-weight: bold; letter-spacing: 6px;">{code}</p>
        <p>The code expires in 10 minutes.</p>
        <p style="color: #666; font-size: 14px;">
            If you didn't create an account, you can safely ignore this email.
        </p>
    </div>
</body>
</html>
            "#
        );

        let email = Message::builder()
            .from(
                format!("{} <{}>", config.from_name, config.from_email)
                    .parse()
                    .map_err(|e| AppError::internal(format!("Invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::validation(format!("Invalid to address: {e}")))?)
            .subject("Verify your email")
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(|e| AppError::internal(format!("Failed to build email: {e}")))?;

        let mailer = Self::build_transport(config)?;

        // lettre's SmtpTransport is blocking
        tokio::task::spawn_blocking(move || {
            mailer
                .send(&email)
                .map_err(|e| AppError::internal(format!("Failed to send email: {e}")))
        })
        .await
        .map_err(|e| AppError::internal(format!("Email task failed: {e}")))??;

        info!(to, "Verification code emailed");
        Ok(())
    }
}
