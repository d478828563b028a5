//! HTTP-level constants for the YooKassa API.

use std::time::Duration;

/// Header carrying the idempotence key of a logical call.
pub const IDEMPOTENCE_KEY_HEADER: &str = "Idempotence-Key";

/// Production API host.
pub const DEFAULT_BASE_HOST: &str = "https://api.yookassa.ru";

/// Versioned path prefix appended to the host.
pub const DEFAULT_BASE_PATH: &str = "/v3/";

/// Default timeout for a single HTTP attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Field of a `202 Accepted` body holding the retry delay in milliseconds.
pub const RETRY_AFTER_FIELD: &str = "retry_after";

/// Environment variable holding the shop identifier.
pub const ENV_SHOP_ID: &str = "YOOKASSA_SHOP_ID";

/// Environment variable holding the secret key.
pub const ENV_SECRET_KEY: &str = "YOOKASSA_SECRET_KEY";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "YOOKASSA_BASE_URL";

/// Environment variable overriding the per-attempt timeout, in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "YOOKASSA_TIMEOUT_MS";

/// Environment variable toggling request logging.
pub const ENV_DEBUG: &str = "YOOKASSA_DEBUG";

/// Environment variable overriding [`PendingPolicy::max_attempts`](crate::config::PendingPolicy::max_attempts).
pub const ENV_PENDING_MAX_ATTEMPTS: &str = "YOOKASSA_PENDING_MAX_ATTEMPTS";

/// Environment variable overriding [`PendingPolicy::max_wait`](crate::config::PendingPolicy::max_wait), in milliseconds.
pub const ENV_PENDING_MAX_WAIT_MS: &str = "YOOKASSA_PENDING_MAX_WAIT_MS";
