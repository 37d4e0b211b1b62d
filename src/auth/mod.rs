//! Bearer token acquisition and caching
//!
//! [`TokenManager`] performs the OAuth2 client-credentials grant against the
//! gateway's token endpoint and keeps the resulting bearer token in memory for
//! the lifetime of the manager. The token is never refreshed proactively.
//!
//! # Concurrency
//!
//! The cache is a single shared cell and no lock is held while a token is
//! being fetched. Tasks that call [`TokenManager::get_token`] concurrently
//! before any token is cached may each issue their own token request; the last
//! one to finish wins the cache slot.

use crate::retry::{with_retry, RetryPolicy};
use crate::transport::{HttpResponse, RequestOptions, Transport};
use crate::types::{AuthStyle, FibConfig};
use crate::{FibError, Result};
use http::Method;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;


/// Subset of the token endpoint response the SDK relies on
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Bearer token
    pub access_token: String,
    /// Lifetime in seconds as reported by the gateway (informational)
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Token type, normally `Bearer`
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Fetches and caches the bearer token
pub struct TokenManager {
    config: Arc<FibConfig>,
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    token: RwLock<Option<String>>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("auth_url", &self.config.auth_url())
            .field("retry", &self.retry)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TokenManager {
    /// Create a token manager with an empty cache
    pub fn new(config: Arc<FibConfig>, transport: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self {
            config,
            transport,
            retry,
            token: RwLock::new(None),
        }
    }

    /// Return the cached token, fetching one first if none is cached
    pub async fn get_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }

        let token = self.fetch_token().await?;
        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token so the next call fetches a fresh one
    pub async fn invalidate(&self) {
        tracing::debug!("Invalidating cached access token");
        *self.token.write().await = None;
    }

    /// Whether a token is currently cached
    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    async fn fetch_token(&self) -> Result<String> {
        let auth_url = self.config.auth_url();
        tracing::debug!("Requesting access token from: {}", auth_url);

        let response = with_retry(&self.retry, || {
            self.transport
                .request(Method::POST, &auth_url, self.token_request())
        })
        .await
        .map_err(|e| {
            tracing::error!("Error occurred while retrieving access token: {}", e);
            e
        })?;

        extract_token(&response)
    }

    fn token_request(&self) -> RequestOptions {
        let mut form = vec![("grant_type".to_string(), self.config.grant_type.clone())];
        let options = RequestOptions::new();

        let options = match self.config.auth_style {
            AuthStyle::FormFields => {
                form.push(("client_id".to_string(), self.config.client_id.clone()));
                form.push((
                    "client_secret".to_string(),
                    self.config.client_secret.clone(),
                ));
                options
            }
            AuthStyle::BasicAuth => options
                .with_basic_auth(&self.config.client_id, &self.config.client_secret),
        };

        options.with_form(form)
    }
}

/// Accept only a 200 response whose JSON body carries `access_token`
fn extract_token(response: &HttpResponse) -> Result<String> {
    if response.status != 200 {
        tracing::error!(
            "Failed to retrieve access token. Status: {}. Response body: {}",
            response.status,
            response.text
        );
        return Err(FibError::authentication(
            Some(response.status),
            format!(
                "Failed to retrieve access token. Status: {}",
                response.status
            ),
        ));
    }

    let parsed = response
        .json_body()
        .ok()
        .and_then(|body| serde_json::from_value::<TokenResponse>(body).ok());

    match parsed {
        Some(token) if !token.access_token.is_empty() => {
            tracing::debug!(
                "Access token acquired (expires_in: {:?})",
                token.expires_in
            );
            Ok(token.access_token)
        }
        _ => {
            tracing::error!("Token response did not contain an access_token");
            Err(FibError::authentication(
                Some(response.status),
                "Failed to retrieve access token. Status: 200, response has no access_token",
            ))
        }
    }
}
