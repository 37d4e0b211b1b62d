//! FIB payments client
//!
//! [`FibPaymentsClient`] is the public surface of the SDK. Every operation
//! obtains a bearer token from the [`TokenManager`], sends one authenticated
//! request through the [`Transport`] under the client's [`RetryPolicy`], and
//! maps any status outside {200, 201} to [`FibError::Api`].
//!
//! # Examples
//!
//! ```no_run
//! use fib_payments::payments::FibPaymentsClient;
//! use fib_payments::types::{FibConfig, PaymentRequest};
//!
//! # async fn example() -> fib_payments::Result<()> {
//! let config = FibConfig::new("https://fib.stage.fib.iq", "client-id", "client-secret")
//!     .with_callback_url("https://shop.example.com/fib/callback");
//! let client = FibPaymentsClient::new(config)?;
//!
//! let payment = client
//!     .create_payment(&PaymentRequest::new(1000).with_description("Order #42"))
//!     .await?;
//! println!("Pay with code {}", payment.readable_code);
//!
//! let status = client.get_payment_status(&payment.payment_id).await?;
//! println!("Status: {}", status);
//!
//! client.close();
//! # Ok(())
//! # }
//! ```

use crate::auth::TokenManager;
use crate::retry::{with_retry, RetryPolicy};
use crate::transport::{HttpResponse, HttpTransport, RequestOptions, Transport};
use crate::types::{
    CreatePaymentBody, CreatedPayment, FibConfig, MonetaryValue, PaymentCallback,
    PaymentRequest, PaymentStatus,
};
use crate::{FibError, Result};
use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;
use std::sync::Arc;

pub mod callback;
pub mod service;

pub use callback::{CallbackHandler, LoggingCallbackHandler};
pub use service::PaymentService;


/// Characters escaped when a payment id is placed in a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Client for the FIB payments API
pub struct FibPaymentsClient {
    config: Arc<FibConfig>,
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    tokens: TokenManager,
    callback_handler: Option<Arc<dyn CallbackHandler>>,
}

impl std::fmt::Debug for FibPaymentsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FibPaymentsClient")
            .field("config", &self.config)
            .field("retry", &self.retry)
            .field("callback_handler", &self.callback_handler.is_some())
            .finish()
    }
}

impl FibPaymentsClient {
    /// Create a client with a pooled HTTP transport and the default retry policy
    pub fn new(config: FibConfig) -> Result<Self> {
        // Fail before building the connection pool
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport), RetryPolicy::default())
    }

    /// Create a client over a caller-supplied transport and retry policy
    pub fn with_transport(
        config: FibConfig,
        transport: Arc<dyn Transport>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let tokens = TokenManager::new(config.clone(), transport.clone(), retry.clone());

        Ok(Self {
            config,
            transport,
            retry,
            tokens,
            callback_handler: None,
        })
    }

    /// Register the handler invoked by [`FibPaymentsClient::handle_callback`]
    pub fn with_callback_handler(mut self, handler: Arc<dyn CallbackHandler>) -> Self {
        self.callback_handler = Some(handler);
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &FibConfig {
        &self.config
    }

    /// Token manager backing this client
    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }

    /// Create a new payment
    pub async fn create_payment(&self, request: &PaymentRequest) -> Result<CreatedPayment> {
        let body = serde_json::to_value(self.payment_body(request))?;
        tracing::debug!(
            "Create payment request body: {}",
            serde_json::to_string(&body).unwrap_or_default()
        );

        let response = self.request(Method::POST, "/payments", Some(body)).await?;
        let payment: CreatedPayment = serde_json::from_value(response)?;

        tracing::info!(payment_id = %payment.payment_id, "payment created");
        Ok(payment)
    }

    /// Current status of a payment, e.g. `PAID`
    pub async fn get_payment_status(&self, payment_id: &str) -> Result<String> {
        Ok(self.get_payment_details(payment_id).await?.status)
    }

    /// Full status response of a payment
    pub async fn get_payment_details(&self, payment_id: &str) -> Result<PaymentStatus> {
        let endpoint = format!("/payments/{}/status", encode_id(payment_id));
        let response = self.request(Method::GET, &endpoint, None).await?;
        Ok(serde_json::from_value(response)?)
    }

    /// Refund a paid payment, returning the gateway's response body
    pub async fn refund_payment(&self, payment_id: &str) -> Result<Value> {
        let endpoint = format!("/payments/{}/refund", encode_id(payment_id));
        self.request(Method::POST, &endpoint, None).await
    }

    /// Cancel an unpaid payment, returning the gateway's response body
    pub async fn cancel_payment(&self, payment_id: &str) -> Result<Value> {
        let endpoint = format!("/payments/{}/cancel", encode_id(payment_id));
        self.request(Method::POST, &endpoint, None).await
    }

    /// Forward a status callback received by the application.
    ///
    /// No verification happens here; the caller is expected to have
    /// authenticated the inbound request already.
    pub async fn handle_callback(&self, payment_id: &str, status: &str) -> Result<()> {
        let callback = PaymentCallback::new(payment_id, status);
        match &self.callback_handler {
            Some(handler) => handler.on_status_change(callback).await,
            None => {
                tracing::debug!(
                    "No callback handler registered, ignoring status {} for payment {}",
                    callback.status,
                    callback.payment_id
                );
                Ok(())
            }
        }
    }

    /// Release the underlying connection pool
    pub fn close(self) {
        tracing::debug!("Closing FIB payments client");
    }

    /// Wire body for a new payment, applying configured defaults
    pub fn payment_body(&self, request: &PaymentRequest) -> CreatePaymentBody {
        let config = &self.config;
        CreatePaymentBody {
            monetary_value: MonetaryValue {
                amount: request.amount,
                currency: or_default(&request.currency, &config.currency),
            },
            status_callback_url: or_default(&request.callback_url, &config.callback_url),
            description: or_default(&request.description, ""),
            refundable_for: or_default(&request.refundable_for, &config.refundable_for),
        }
    }

    /// Authenticated request against the API root, returning the JSON body
    async fn request(&self, method: Method, endpoint: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.config.api_url(), endpoint);

        let mut response = self.send_authenticated(&method, &url, body.as_ref()).await?;

        if response.status == 401 && self.config.reauthenticate_on_unauthorized {
            tracing::warn!("Access token rejected by {}, re-authenticating", url);
            self.tokens.invalidate().await;
            response = self.send_authenticated(&method, &url, body.as_ref()).await?;
        }

        if !response.is_success() {
            tracing::error!(
                "{} request to {} failed with status: {}. Response body: {}",
                method,
                url,
                response.status,
                response.text
            );
            return Err(FibError::api(response.status, response.text));
        }

        response.json_body()
    }

    async fn send_authenticated(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        let token = self.tokens.get_token().await?;

        let mut options = RequestOptions::new()
            .with_header("Authorization", format!("Bearer {}", token))
            .with_header("Content-Type", "application/json")
            .with_header("User-Agent", self.config.user_agent.as_str());
        if let Some(body) = body {
            options = options.with_json(body.clone());
        }

        with_retry(&self.retry, || {
            self.transport.request(method.clone(), url, options.clone())
        })
        .await
    }
}

/// Use `value` unless it is absent or empty
fn or_default(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn encode_id(payment_id: &str) -> String {
    utf8_percent_encode(payment_id, PATH_SEGMENT).to_string()
}
