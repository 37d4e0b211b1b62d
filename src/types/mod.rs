//! Core types for the FIB payments SDK
//!
//! # Architecture
//!
//! - [`config`] - Client configuration and validation
//! - [`payment`] - Payment request, response and callback structures
//! - [`constants`] - Gateway paths, defaults and environment variable names
//!
//! # Examples
//!
//! ```
//! use fib_payments::types::{FibConfig, PaymentRequest};
//!
//! # fn example() -> fib_payments::Result<()> {
//! let config = FibConfig::new("https://fib.stage.fib.iq", "client-id", "client-secret")
//!     .with_callback_url("https://shop.example.com/fib/callback");
//! config.validate()?;
//!
//! let request = PaymentRequest::new(1000)
//!     .with_currency("USD")
//!     .with_description("Order #42");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod payment;

pub use config::{AuthStyle, FibConfig};
pub use constants::{defaults, env_vars, statuses};
pub use payment::{
    CreatePaymentBody, CreatedPayment, MonetaryValue, PaymentCallback, PaymentRequest,
    PaymentStatus,
};
