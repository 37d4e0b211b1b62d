//! Abstract payment operations
//!
//! Applications that want to swap the gateway out in their own tests can
//! depend on [`PaymentService`] instead of the concrete client.

use super::FibPaymentsClient;
use crate::types::{CreatedPayment, PaymentRequest};
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Operations offered by a payment gateway client
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Create a new payment
    async fn create_payment(&self, request: &PaymentRequest) -> Result<CreatedPayment>;

    /// Current status of a payment
    async fn check_payment_status(&self, payment_id: &str) -> Result<String>;

    /// Forward an inbound status callback
    async fn handle_callback(&self, payment_id: &str, status: &str) -> Result<()>;

    /// Refund a payment
    async fn refund(&self, payment_id: &str) -> Result<Value>;

    /// Cancel a payment
    async fn cancel(&self, payment_id: &str) -> Result<Value>;
}

#[async_trait]
impl PaymentService for FibPaymentsClient {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<CreatedPayment> {
        FibPaymentsClient::create_payment(self, request).await
    }

    async fn check_payment_status(&self, payment_id: &str) -> Result<String> {
        self.get_payment_status(payment_id).await
    }

    async fn handle_callback(&self, payment_id: &str, status: &str) -> Result<()> {
        FibPaymentsClient::handle_callback(self, payment_id, status).await
    }

    async fn refund(&self, payment_id: &str) -> Result<Value> {
        self.refund_payment(payment_id).await
    }

    async fn cancel(&self, payment_id: &str) -> Result<Value> {
        self.cancel_payment(payment_id).await
    }
}
