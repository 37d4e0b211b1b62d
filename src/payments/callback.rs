//! Extension point for the gateway's asynchronous status callbacks
//!
//! The gateway POSTs `{ "id": ..., "status": ... }` to the merchant's
//! `statusCallbackUrl`. Receiving that request, and deciding whether to trust
//! it, is the integrating application's job; once it has done so it forwards
//! the data to [`FibPaymentsClient::handle_callback`](super::FibPaymentsClient::handle_callback),
//! which dispatches to the registered [`CallbackHandler`].

use crate::types::PaymentCallback;
use crate::Result;
use async_trait::async_trait;

/// Receives payment status changes forwarded by the application
#[async_trait]
pub trait CallbackHandler: Send + Sync {
    /// Called once per forwarded status change
    async fn on_status_change(&self, callback: PaymentCallback) -> Result<()>;
}

/// Handler that only logs the notification
#[derive(Debug, Clone, Default)]
pub struct LoggingCallbackHandler;

#[async_trait]
impl CallbackHandler for LoggingCallbackHandler {
    async fn on_status_change(&self, callback: PaymentCallback) -> Result<()> {
        tracing::info!(
            payment_id = %callback.payment_id,
            status = %callback.status,
            "payment status changed"
        );
        Ok(())
    }
}
