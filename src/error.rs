//! Error types for the FIB payments SDK

use std::fmt;
use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, FibError>;

/// Classification of a transport-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// The connection could not be established, or was reset or closed
    /// before a response arrived
    Connect,
    /// The request or connection timed out
    Timeout,
    /// Any other transport failure (body read, redirect loop, ...)
    Other,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkErrorKind::Connect => write!(f, "connect"),
            NetworkErrorKind::Timeout => write!(f, "timeout"),
            NetworkErrorKind::Other => write!(f, "other"),
        }
    }
}

/// Errors produced by the SDK
#[derive(Debug, Error)]
pub enum FibError {
    /// Missing or invalid configuration, raised before any network call
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The token endpoint rejected the credentials or answered without a token
    #[error("Authentication error: {message}")]
    Authentication {
        /// HTTP status returned by the token endpoint, if a response was received
        status: Option<u16>,
        /// Human readable description
        message: String,
    },

    /// A payment endpoint returned a status outside {200, 201}
    #[error("API request failed. Status: {status}, Body: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Transport failure
    #[error("Network error ({kind}): {message}")]
    Network {
        /// Failure classification used by the retry policy
        kind: NetworkErrorKind,
        /// Underlying error message
        message: String,
    },

    /// Every attempt of a retried operation failed
    #[error("Operation failed after {attempts} attempts: {source}")]
    RetryExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Failure of the last attempt
        #[source]
        source: Box<FibError>,
    },

    /// A success response could not be decoded into the expected shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A registered callback handler failed
    #[error("Callback handler error: {0}")]
    Callback(String),
}

impl FibError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an authentication error
    pub fn authentication(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Authentication {
            status,
            message: message.into(),
        }
    }

    /// Create an API error from a status code and raw body
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a network error of the given kind
    pub fn network(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self::Network {
            kind,
            message: message.into(),
        }
    }

    /// Create a callback handler error
    pub fn callback(message: impl Into<String>) -> Self {
        Self::Callback(message.into())
    }

    /// Whether this failure is a transient transport failure worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FibError::Network {
                kind: NetworkErrorKind::Connect | NetworkErrorKind::Timeout,
                ..
            }
        )
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            FibError::Api { status, .. } => Some(*status),
            FibError::Authentication { status, .. } => *status,
            FibError::RetryExhausted { source, .. } => source.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FibError {
    fn from(err: reqwest::Error) -> Self {
        // Send-phase failures (refused, reset, closed before a status line)
        // are connection errors; body and redirect failures are not
        let kind = if err.is_timeout() {
            NetworkErrorKind::Timeout
        } else if err.is_connect() || err.is_request() {
            NetworkErrorKind::Connect
        } else {
            NetworkErrorKind::Other
        };

        let mut causes = Vec::new();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        // Strip the URL so query strings never leak into logs
        let mut message = err.without_url().to_string();
        for cause in causes {
            message.push_str(": ");
            message.push_str(&cause);
        }
        FibError::network(kind, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(FibError::network(NetworkErrorKind::Connect, "refused").is_transient());
        assert!(FibError::network(NetworkErrorKind::Timeout, "slow").is_transient());
        assert!(!FibError::network(NetworkErrorKind::Other, "bad body").is_transient());
        assert!(!FibError::api(503, "unavailable").is_transient());
        assert!(!FibError::authentication(Some(401), "denied").is_transient());
        assert!(!FibError::config("missing").is_transient());
    }

    #[test]
    fn test_api_error_display() {
        let err = FibError::api(404, "not found");
        assert_eq!(
            err.to_string(),
            "API request failed. Status: 404, Body: not found"
        );
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_retry_exhausted_wraps_source() {
        let err = FibError::RetryExhausted {
            attempts: 3,
            source: Box::new(FibError::network(NetworkErrorKind::Timeout, "timed out")),
        };
        let message = err.to_string();
        assert!(message.contains("after 3 attempts"));
        assert!(message.contains("timed out"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
