//! Application configuration loaded from environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

const DEFAULT_GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Minimum JWT secret length below which startup logs a warning.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// How much of a downstream failure the login endpoint reveals to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorDetail {
    /// Raw diagnostic in the `error` field.
    #[default]
    Full,
    /// Downstream diagnostics replaced with a fixed string; parse errors kept.
    Redacted,
}

impl FromStr for ErrorDetail {
    type Err = ConfigLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(ErrorDetail::Full),
            "redacted" => Ok(ErrorDetail::Redacted),
            other => Err(ConfigLoadError::InvalidErrorDetail(other.to_string())),
        }
    }
}

/// Google sign-in settings. Present only when `GOOGLE_CLIENT_ID` is set.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub authorize_url: Url,
}

/// Application configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g. `0.0.0.0:3000`).
    pub server_addr: SocketAddr,
    /// PostgreSQL connection URL. `None` runs on the in-memory user store.
    pub database_url: Option<String>,
    /// JWT signing secret. Login fails with a diagnostic while unset.
    pub jwt_secret: Option<String>,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    pub login_error_detail: ErrorDetail,
    /// Externally visible base URL, used to build OAuth redirect URIs.
    pub public_url: Url,
    pub google: Option<GoogleConfig>,
    /// Directory holding `login.html`.
    pub static_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_addr = var("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let server_addr: SocketAddr = server_addr
            .parse()
            .map_err(|_| ConfigLoadError::InvalidServerAddr)?;

        let database_url = var("DATABASE_URL");
        let jwt_secret = var("JWT_SECRET");
        let log_level = var("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let login_error_detail = match var("LOGIN_ERROR_DETAIL") {
            Some(v) => v.parse()?,
            None => ErrorDetail::default(),
        };

        let public_url = var("PUBLIC_URL").unwrap_or_else(|| "http://localhost:3000".to_string());
        let public_url =
            Url::parse(&public_url).map_err(|_| ConfigLoadError::InvalidUrl("PUBLIC_URL"))?;

        let google = match var("GOOGLE_CLIENT_ID") {
            Some(client_id) => {
                let authorize_url = var("GOOGLE_AUTHORIZE_URL")
                    .unwrap_or_else(|| DEFAULT_GOOGLE_AUTHORIZE_URL.to_string());
                let authorize_url = Url::parse(&authorize_url)
                    .map_err(|_| ConfigLoadError::InvalidUrl("GOOGLE_AUTHORIZE_URL"))?;
                Some(GoogleConfig {
                    client_id,
                    authorize_url,
                })
            }
            None => None,
        };

        let static_dir = PathBuf::from(var("STATIC_DIR").unwrap_or_else(|| "static".to_string()));

        Ok(Self {
            server_addr,
            database_url,
            jwt_secret,
            log_level,
            login_error_detail,
            public_url,
            google,
            static_dir,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Invalid SERVER_ADDR")]
    InvalidServerAddr,
    #[error("Invalid LOGIN_ERROR_DETAIL `{0}` (expected `full` or `redacted`)")]
    InvalidErrorDetail(String),
    #[error("Invalid {0}")]
    InvalidUrl(&'static str),
}
