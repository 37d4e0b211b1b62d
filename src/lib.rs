//! # FIB Payments SDK
//!
//! An async Rust client for the FIB online payment gateway.
//!
//! ## Features
//!
//! - **Client-credentials authentication** with an in-memory bearer token cache
//! - **Payments API**: create, query status, refund and cancel
//! - **Retry with exponential backoff** on transient transport failures only
//! - **Typed errors** separating configuration, authentication, API and network failures
//! - **Callback hook** for forwarding the gateway's status notifications to application code
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fib_payments::{FibConfig, FibPaymentsClient, PaymentRequest};
//!
//! #[tokio::main]
//! async fn main() -> fib_payments::Result<()> {
//!     // Reads FIB_BASE_URL, FIB_CLIENT_ID, FIB_CLIENT_SECRET, ...
//!     let config = FibConfig::from_env();
//!     let client = FibPaymentsClient::new(config)?;
//!
//!     let payment = client
//!         .create_payment(&PaymentRequest::new(1000).with_description("Order #42"))
//!         .await?;
//!     println!("Payment {} created, code {}", payment.payment_id, payment.readable_code);
//!
//!     let status = client.get_payment_status(&payment.payment_id).await?;
//!     println!("Status: {}", status);
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`types`**: Configuration, payment payloads and constants
//! - **`transport`**: Single-shot HTTP executor over a pooled connection
//! - **`retry`**: Bounded exponential-backoff combinator
//! - **`auth`**: Client-credentials token acquisition and caching
//! - **`payments`**: The public payments client and callback hook
//! - **`error`**: Error taxonomy
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! use fib_payments::{FibError, FibPaymentsClient};
//!
//! # async fn example(client: FibPaymentsClient) {
//! match client.get_payment_status("payment-id").await {
//!     Ok(status) => println!("Status: {}", status),
//!     Err(FibError::Api { status, body }) => eprintln!("Gateway said {}: {}", status, body),
//!     Err(FibError::RetryExhausted { attempts, source }) => {
//!         eprintln!("Gave up after {} attempts: {}", attempts, source)
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod payments;
pub mod retry;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use auth::TokenManager;
pub use error::{FibError, NetworkErrorKind, Result};
pub use payments::{CallbackHandler, FibPaymentsClient, PaymentService};
pub use retry::{with_retry, RetryPolicy};
pub use transport::{HttpResponse, HttpTransport, RequestOptions, Transport};
pub use types::*;

/// Current version of the SDK
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_reexports() {
        let config = FibConfig::new("https://fib.example.com", "id", "secret");
        assert_eq!(config.currency, defaults::CURRENCY);
        assert_eq!(RetryPolicy::default().max_attempts, 3);
        let request = PaymentRequest::new(1000);
        assert!(request.currency.is_none());
    }
}
