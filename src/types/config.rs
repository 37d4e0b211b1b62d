//! Client configuration

use super::constants::{defaults, env_vars, API_PATH, AUTH_PATH, DEFAULT_USER_AGENT};
use crate::{FibError, Result};
use std::env;
use std::time::Duration;

/// How client credentials are presented to the token endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStyle {
    /// `client_id` and `client_secret` sent as form fields
    #[default]
    FormFields,
    /// Credentials sent as an HTTP basic `Authorization` header
    BasicAuth,
}

/// Configuration for the FIB payments client
#[derive(Clone)]
pub struct FibConfig {
    /// Gateway base URL, e.g. `https://fib.stage.fib.iq`
    pub base_url: String,
    /// OAuth2 client id
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Default status callback URL for new payments
    pub callback_url: String,
    /// Default ISO-8601 refund window for new payments
    pub refundable_for: String,
    /// Default currency for new payments
    pub currency: String,
    /// Grant type sent to the token endpoint
    pub grant_type: String,
    /// How credentials are sent to the token endpoint
    pub auth_style: AuthStyle,
    /// Per-request HTTP timeout
    pub timeout: Option<Duration>,
    /// `User-Agent` sent with every API call
    pub user_agent: String,
    /// Drop the cached token and replay once when an API call answers 401
    pub reauthenticate_on_unauthorized: bool,
    /// Unparseable `FIB_TIMEOUT_SECS` value, reported by `validate`
    invalid_timeout: Option<String>,
}

impl std::fmt::Debug for FibConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FibConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("callback_url", &self.callback_url)
            .field("refundable_for", &self.refundable_for)
            .field("currency", &self.currency)
            .field("grant_type", &self.grant_type)
            .field("auth_style", &self.auth_style)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field(
                "reauthenticate_on_unauthorized",
                &self.reauthenticate_on_unauthorized,
            )
            .finish()
    }
}

impl FibConfig {
    /// Create a new config with the mandatory fields and default optionals
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            ..Self::default()
        }
    }

    /// Load the configuration from `FIB_*` environment variables.
    ///
    /// Intended to be called once at startup. Missing mandatory values are
    /// left empty and reported by [`FibConfig::validate`].
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).unwrap_or_default();
        let or_default = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let mut timeout = None;
        let mut invalid_timeout = None;
        if let Some(raw) = lookup(env_vars::TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => timeout = Some(Duration::from_secs(secs)),
                Err(_) => invalid_timeout = Some(raw),
            }
        }

        Self {
            base_url: var(env_vars::BASE_URL),
            client_id: var(env_vars::CLIENT_ID),
            client_secret: var(env_vars::CLIENT_SECRET),
            callback_url: var(env_vars::CALLBACK_URL),
            refundable_for: or_default(env_vars::REFUNDABLE_FOR, defaults::REFUNDABLE_FOR),
            currency: or_default(env_vars::CURRENCY, defaults::CURRENCY),
            grant_type: or_default(env_vars::GRANT_TYPE, defaults::GRANT_TYPE),
            timeout,
            invalid_timeout,
            ..Self::default()
        }
    }

    /// Validate the configuration, naming every missing mandatory field
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("base_url", &self.base_url),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if let Some(raw) = &self.invalid_timeout {
            return Err(FibError::config(format!(
                "Invalid {}: '{}' is not a whole number of seconds",
                env_vars::TIMEOUT_SECS,
                raw
            )));
        }

        if !missing.is_empty() {
            return Err(FibError::config(format!(
                "Missing required configuration: {}",
                missing.join(", ")
            )));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(FibError::config(
                "base_url must start with http:// or https://",
            ));
        }

        url::Url::parse(&self.base_url)
            .map_err(|e| FibError::config(format!("Invalid base_url: {}", e)))?;

        Ok(())
    }

    /// Token endpoint URL
    pub fn auth_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), AUTH_PATH)
    }

    /// Root of the protected payments API
    pub fn api_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), API_PATH)
    }

    /// Set the default status callback URL
    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = callback_url.into();
        self
    }

    /// Set the default refund window (ISO-8601 duration)
    pub fn with_refundable_for(mut self, refundable_for: impl Into<String>) -> Self {
        self.refundable_for = refundable_for.into();
        self
    }

    /// Set the default currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set the grant type sent to the token endpoint
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = grant_type.into();
        self
    }

    /// Set how credentials are sent to the token endpoint
    pub fn with_auth_style(mut self, auth_style: AuthStyle) -> Self {
        self.auth_style = auth_style;
        self
    }

    /// Set the per-request HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self.invalid_timeout = None;
        self
    }

    /// Set the `User-Agent` header sent with API calls
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Re-fetch the token and replay once when an API call answers 401
    pub fn with_reauthenticate_on_unauthorized(mut self, enabled: bool) -> Self {
        self.reauthenticate_on_unauthorized = enabled;
        self
    }
}

impl Default for FibConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            callback_url: String::new(),
            refundable_for: defaults::REFUNDABLE_FOR.to_string(),
            currency: defaults::CURRENCY.to_string(),
            grant_type: defaults::GRANT_TYPE.to_string(),
            auth_style: AuthStyle::default(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            reauthenticate_on_unauthorized: false,
            invalid_timeout: None,
        }
    }
}
