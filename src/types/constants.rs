//! Gateway paths, defaults and environment variable names

/// Token endpoint path relative to the base URL
pub const AUTH_PATH: &str = "/auth/realms/fib-online-shop/protocol/openid-connect/token";

/// Protected API root relative to the base URL
pub const API_PATH: &str = "/protected/v1";

/// Client identifier sent as `User-Agent`
pub const DEFAULT_USER_AGENT: &str = "FIBPaymentsSDK";

/// Default values for optional configuration
pub mod defaults {
    /// Default payment currency
    pub const CURRENCY: &str = "IQD";
    /// Default refund window (ISO-8601 duration)
    pub const REFUNDABLE_FOR: &str = "P7D";
    /// Default OAuth2 grant type
    pub const GRANT_TYPE: &str = "client_credentials";
}

/// Environment variables read by [`FibConfig::from_env`](super::FibConfig::from_env)
pub mod env_vars {
    pub const BASE_URL: &str = "FIB_BASE_URL";
    pub const CLIENT_ID: &str = "FIB_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "FIB_CLIENT_SECRET";
    pub const CALLBACK_URL: &str = "FIB_CALLBACK_URL";
    pub const REFUNDABLE_FOR: &str = "FIB_REFUNDABLE_FOR";
    pub const CURRENCY: &str = "FIB_CURRENCY";
    pub const GRANT_TYPE: &str = "FIB_GRANT_TYPE";
    pub const TIMEOUT_SECS: &str = "FIB_TIMEOUT_SECS";
}

/// Gateway payment states as reported by the status endpoint.
///
/// Informational only; statuses are passed through as opaque strings.
pub mod statuses {
    pub const PAID: &str = "PAID";
    pub const UNPAID: &str = "UNPAID";
    pub const DECLINED: &str = "DECLINED";
    pub const REFUND_REQUESTED: &str = "REFUND_REQUESTED";
    pub const REFUNDED: &str = "REFUNDED";
}
