use crate::auth::JwtConfig;
use crate::orders::ZeroStockPolicy;
use crate::services::SmtpConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/drape | Working directory (db, uploads, logs) |
/// | HTTP_PORT | 3000 | HTTP service port |
/// | DB_PATH | {WORK_DIR}/db | RocksDB storage path |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout |
/// | ZERO_STOCK_POLICY | REMOVE | REMOVE \| RETAIN sold-out size rows |
/// | GOOGLE_CLIENT_ID | (empty) | OAuth client id for Google sign-in |
/// | SMTP_SERVER / SMTP_PORT / SMTP_USERNAME / SMTP_PASSWORD | (unset) | OTP email delivery |
/// | SMTP_FROM_EMAIL / SMTP_FROM_NAME | noreply@drape.shop / Drape | Sender identity |
///
/// JWT settings come from `JWT_SECRET`, `JWT_EXPIRATION_MINUTES`,
/// `JWT_ISSUER` and `JWT_AUDIENCE`.
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub db_path: String,
    pub environment: String,
    pub jwt: JwtConfig,
    pub request_timeout_ms: u64,
    pub zero_stock_policy: ZeroStockPolicy,
    pub google_client_id: String,
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/drape".into());
        let db_path = std::env::var("DB_PATH").unwrap_or_else(|_| format!("{work_dir}/db"));

        let smtp = match (
            std::env::var("SMTP_SERVER"),
            std::env::var("SMTP_USERNAME"),
            std::env::var("SMTP_PASSWORD"),
        ) {
            (Ok(server), Ok(username), Ok(password)) => Some(SmtpConfig {
                server,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587),
                username,
                password,
                from_email: std::env::var("SMTP_FROM_EMAIL")
                    .unwrap_or_else(|_| "noreply@drape.shop".into()),
                from_name: std::env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Drape".into()),
            }),
            _ => None,
        };

        Self {
            work_dir,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            db_path,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt: JwtConfig::default(),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            zero_stock_policy: match std::env::var("ZERO_STOCK_POLICY").as_deref() {
                Ok("RETAIN") => ZeroStockPolicy::Retain,
                _ => ZeroStockPolicy::Remove,
            },
            google_client_id: std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            smtp,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
