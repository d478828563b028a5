//! Command-line front-end for the YooKassa payment gateway.
//!
//! # Usage
//!
//! ```bash
//! # Create a payment
//! yookassa create-payment --payload '{"amount":{"value":"2.00","currency":"RUB"},
//!   "payment_method_data":{"type":"bank_card"},
//!   "confirmation":{"type":"redirect","return_url":"https://example.com"}}'
//!
//! # Capture it for the full amount, then refund half
//! yookassa capture-payment 215d8da0-000f-50be-b000-0003308c89be
//! yookassa create-refund 215d8da0-000f-50be-b000-0003308c89be --amount 1.00 --currency RUB
//! ```
//!
//! # Environment Variables
//!
//! A `.env` file in the working directory is loaded first.
//!
//! - `YOOKASSA_SHOP_ID` — shop identifier (`--shop-id`)
//! - `YOOKASSA_SECRET_KEY` — secret key (`--secret-key`)
//! - `YOOKASSA_BASE_URL` — API root (`--base-url`)
//! - `YOOKASSA_TIMEOUT_MS` — per-attempt timeout (`--timeout-ms`)
//! - `YOOKASSA_DEBUG` — log every request line (`--debug`)
//! - `YOOKASSA_PENDING_MAX_ATTEMPTS` — pending retry bound (`--pending-max-attempts`)
//! - `YOOKASSA_PENDING_MAX_WAIT_MS` — pending wait bound (`--pending-max-wait-ms`)
//! - `RUST_LOG` — log level filter (default: `info`)

mod cli;

use clap::Parser;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;
use yookassa::Client;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() {
    // Missing .env is fine; explicit flags and the process env still apply.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Request failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.client_config()?;
    tracing::debug!(base_url = %config.base_url(), "Loaded configuration");

    let client = Client::from_config(config);
    let key = cli.idempotence_key();

    let data = match &cli.command {
        Command::CreatePayment {
            payload,
            payload_file,
        } => {
            let raw = match (payload, payload_file) {
                (Some(inline), _) => inline.clone(),
                (None, Some(path)) => std::fs::read_to_string(path)
                    .map_err(|e| format!("Cannot read {}: {e}", path.display()))?,
                (None, None) => return Err("A payment payload is required".into()),
            };
            let payload: Value = serde_json::from_str(&raw)
                .map_err(|e| format!("Payment payload is not valid JSON: {e}"))?;
            client.create_payment(&payload, key).await?.into_data()
        }
        Command::GetPayment { payment_id } => {
            client.get_payment(payment_id, key).await?.into_data()
        }
        Command::CapturePayment { payment_id, amount } => client
            .capture_payment(payment_id, amount.to_amount().as_ref(), key)
            .await?
            .into_data(),
        Command::CancelPayment { payment_id } => {
            client.cancel_payment(payment_id, key).await?.into_data()
        }
        Command::CreateRefund { payment_id, amount } => client
            .create_refund(payment_id, amount.to_amount().as_ref(), key)
            .await?
            .into_data(),
        Command::GetRefund { refund_id } => client.get_refund(refund_id, key).await?.into_data(),
    };

    print_json(data)?;
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_json(data: Map<String, Value>) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(&Value::Object(data))?);
    Ok(())
}
