//! Application state and health endpoint.

use std::sync::Arc;

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::auth::{CredentialVerifier, JwtSecret, PasswordService, ProviderRegistry, StateSigner};
use crate::config::{Config, ErrorDetail};
use crate::db::UserStore;
use crate::error::AppResult;

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    verifier: CredentialVerifier,
    providers: ProviderRegistry,
    state_signer: StateSigner,
    login_error_detail: ErrorDetail,
}

impl AppState {
    /// Wire services from `config` on top of `users`.
    pub fn new(config: &Config, users: Arc<dyn UserStore>) -> AppResult<Self> {
        let jwt_secret = JwtSecret::new(config.jwt_secret.clone());
        Ok(Self {
            verifier: CredentialVerifier::new(users, PasswordService::new()?, jwt_secret.clone()),
            providers: ProviderRegistry::from_config(config),
            state_signer: StateSigner::new(jwt_secret),
            login_error_detail: config.login_error_detail,
        })
    }

    pub fn verifier(&self) -> &CredentialVerifier {
        &self.verifier
    }
    pub fn jwt_secret(&self) -> &JwtSecret {
        self.verifier.tokens()
    }
    pub fn users(&self) -> &Arc<dyn UserStore> {
        self.verifier.users()
    }
    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }
    pub fn state_signer(&self) -> &StateSigner {
        &self.state_signer
    }
    pub fn login_error_detail(&self) -> ErrorDetail {
        self.login_error_detail
    }
}

/// GET /health: liveness check.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "authgate" })),
    )
}
