//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use yookassa::constants::{
    ENV_BASE_URL, ENV_DEBUG, ENV_PENDING_MAX_ATTEMPTS, ENV_PENDING_MAX_WAIT_MS, ENV_SECRET_KEY,
    ENV_SHOP_ID, ENV_TIMEOUT_MS,
};
use yookassa::{Amount, ClientConfig, ConfigError, IdempotenceKey};

/// YooKassa payment gateway client.
#[derive(Debug, Parser)]
#[command(name = "yookassa", version, about, long_about = None)]
pub struct Cli {
    /// Shop identifier used as the Basic auth user name.
    #[arg(long, env = ENV_SHOP_ID, global = true, hide_env_values = true)]
    pub shop_id: Option<String>,

    /// Secret key used as the Basic auth password.
    #[arg(long, env = ENV_SECRET_KEY, global = true, hide_env_values = true)]
    pub secret_key: Option<String>,

    /// API base URL, e.g. `https://api.yookassa.ru/v3/`.
    #[arg(long, env = ENV_BASE_URL, global = true)]
    pub base_url: Option<String>,

    /// Per-attempt timeout in milliseconds.
    #[arg(long, env = ENV_TIMEOUT_MS, global = true)]
    pub timeout_ms: Option<u64>,

    /// Maximum attempts while the gateway answers `202 Accepted`.
    #[arg(long, env = ENV_PENDING_MAX_ATTEMPTS, global = true)]
    pub pending_max_attempts: Option<u32>,

    /// Maximum cumulative wait in milliseconds while the gateway answers `202 Accepted`.
    #[arg(long, env = ENV_PENDING_MAX_WAIT_MS, global = true)]
    pub pending_max_wait_ms: Option<u64>,

    /// Idempotence key for the call; a fresh one is generated when omitted.
    #[arg(long, global = true)]
    pub idempotence_key: Option<String>,

    /// Log every request line at `info` level.
    #[arg(long, env = ENV_DEBUG, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Gateway operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a payment from a JSON payload.
    CreatePayment {
        /// Inline JSON payload.
        #[arg(long, conflicts_with = "payload_file", required_unless_present = "payload_file")]
        payload: Option<String>,

        /// File containing the JSON payload.
        #[arg(long, value_name = "PATH")]
        payload_file: Option<PathBuf>,
    },

    /// Retrieve a payment.
    GetPayment {
        /// Payment identifier.
        payment_id: String,
    },

    /// Capture a payment awaiting capture.
    CapturePayment {
        /// Payment identifier.
        payment_id: String,

        #[command(flatten)]
        amount: AmountArgs,
    },

    /// Cancel a payment.
    CancelPayment {
        /// Payment identifier.
        payment_id: String,
    },

    /// Refund a payment.
    CreateRefund {
        /// Identifier of the payment to refund.
        payment_id: String,

        #[command(flatten)]
        amount: AmountArgs,
    },

    /// Retrieve a refund.
    GetRefund {
        /// Refund identifier.
        refund_id: String,
    },
}

/// Optional amount; both parts are required together.
#[derive(Debug, Args)]
pub struct AmountArgs {
    /// Decimal amount, e.g. `2.00`.
    #[arg(long, requires = "currency")]
    pub amount: Option<String>,

    /// ISO-4217 currency code, e.g. `RUB`.
    #[arg(long, requires = "amount")]
    pub currency: Option<String>,
}

impl AmountArgs {
    #[must_use]
    pub fn to_amount(&self) -> Option<Amount> {
        match (&self.amount, &self.currency) {
            (Some(value), Some(currency)) => Some(Amount::new(value, currency)),
            _ => None,
        }
    }
}

impl Cli {
    /// Builds the client configuration from flags and their environment fallbacks.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when credentials are missing or the base URL
    /// is invalid.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let shop_id = self
            .shop_id
            .clone()
            .ok_or(ConfigError::MissingEnv(ENV_SHOP_ID))?;
        let secret_key = self
            .secret_key
            .clone()
            .ok_or(ConfigError::MissingEnv(ENV_SECRET_KEY))?;

        let mut config = ClientConfig::new(shop_id, secret_key).with_debug_logging(self.debug);
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url)?;
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }

        let mut pending = *config.pending();
        if let Some(attempts) = self.pending_max_attempts {
            pending = pending.with_max_attempts(attempts);
        }
        if let Some(ms) = self.pending_max_wait_ms {
            pending = pending.with_max_wait(Duration::from_millis(ms));
        }
        Ok(config.with_pending_policy(pending))
    }

    #[must_use]
    pub fn idempotence_key(&self) -> Option<IdempotenceKey> {
        self.idempotence_key.as_deref().map(IdempotenceKey::from)
    }
}
