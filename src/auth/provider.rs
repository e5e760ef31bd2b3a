//! External identity providers: authorization redirect construction.
//!
//! Only the outbound leg is handled here. The browser is sent to the
//! provider with a signed `state`; exchanging the returned code is left to
//! the provider callback.

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use super::{CallbackUrl, StateSigner};
use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct OAuthProvider {
    pub id: String,
    pub client_id: String,
    pub authorize_url: Url,
    pub scopes: Vec<String>,
}

/// Configured providers, keyed by id (`google`).
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: Arc<HashMap<String, OAuthProvider>>,
    public_url: Url,
}

impl ProviderRegistry {
    pub fn new(public_url: Url, providers: Vec<OAuthProvider>) -> Self {
        let providers = providers.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            providers: Arc::new(providers),
            public_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let google = config.google.as_ref().map(|g| OAuthProvider {
            id: "google".to_string(),
            client_id: g.client_id.clone(),
            authorize_url: g.authorize_url.clone(),
            scopes: vec!["openid".into(), "email".into(), "profile".into()],
        });
        Self::new(config.public_url.clone(), google.into_iter().collect())
    }

    pub fn get(&self, id: &str) -> Option<&OAuthProvider> {
        self.providers.get(id)
    }

    /// Where the provider sends the browser back to, under any path prefix
    /// of the public URL.
    pub fn redirect_uri(&self, id: &str) -> AppResult<Url> {
        let mut base = self.public_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(&format!("api/auth/callback/{}", id))
            .map_err(|e| AppError::Config(format!("redirect uri: {}", e)))
    }

    /// Build the authorization URL for `id`, binding `callback` into `state`.
    pub fn authorization_url(
        &self,
        id: &str,
        callback: &CallbackUrl,
        signer: &StateSigner,
    ) -> AppResult<Url> {
        let provider = self
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("unknown provider: {}", id)))?;
        let redirect_uri = self.redirect_uri(id)?;
        let state = signer.sign(callback)?;

        let mut url = provider.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &provider.client_id)
            .append_pair("redirect_uri", redirect_uri.as_str())
            .append_pair("response_type", "code")
            .append_pair("scope", &provider.scopes.join(" "))
            .append_pair("state", &state);
        Ok(url)
    }
}
