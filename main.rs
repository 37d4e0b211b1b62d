//! FIB payments command-line tool
//!
//! Runs a single payment operation against the gateway configured through the
//! `FIB_*` environment variables (a `.env` file in the working directory is
//! loaded first).
//!
//! ```text
//! fib-payments create <amount> [description]
//! fib-payments status <payment-id>
//! fib-payments refund <payment-id>
//! fib-payments cancel <payment-id>
//! ```
//!
//! Set `RUST_LOG=fib_payments=debug` to trace requests.

use fib_payments::{FibConfig, FibError, FibPaymentsClient, PaymentRequest};
use rust_decimal::Decimal;
use serde_json::json;
use std::env;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: fib-payments <create <amount> [description] | status <id> | refund <id> | cancel <id>>";

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be populated
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    match run(&args).await {
        Ok(output) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_default()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> fib_payments::Result<serde_json::Value> {
    let (command, rest) = args
        .split_first()
        .ok_or_else(|| FibError::config(USAGE))?;

    let client = FibPaymentsClient::new(FibConfig::from_env())?;

    let output = match (command.as_str(), rest) {
        ("create", [amount, description @ ..]) => {
            let amount = Decimal::from_str(amount)
                .map_err(|e| FibError::config(format!("Invalid amount '{}': {}", amount, e)))?;
            let mut request = PaymentRequest::new(amount);
            if !description.is_empty() {
                request = request.with_description(description.join(" "));
            }
            serde_json::to_value(client.create_payment(&request).await?)?
        }
        ("status", [payment_id]) => {
            let status = client.get_payment_status(payment_id).await?;
            json!({ "paymentId": payment_id, "status": status })
        }
        ("refund", [payment_id]) => client.refund_payment(payment_id).await?,
        ("cancel", [payment_id]) => client.cancel_payment(payment_id).await?,
        _ => return Err(FibError::config(USAGE)),
    };

    client.close();
    Ok(output)
}
