//! Listing API endpoint and timing constants used by the monitor.
use std::time::Duration;

/// PancakeSwap v2 token listing endpoint.
pub const DEFAULT_API_URL: &str = "https://api.pancakeswap.info/api/v2/tokens";
/// Telegram Bot API base URL.
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// How often the listing server refreshes its data.
pub const API_UPDATE_INTERVAL: Duration = Duration::from_secs(300);
/// Pause between failed fetches in the steady-state loop.
pub const FETCH_RETRY_DELAY: Duration = Duration::from_secs(1);
/// Pause between failed fetches while rebuilding the local database.
pub const REFRESH_RETRY_DELAY: Duration = Duration::from_secs(10);
/// Nap used when the computed wait comes out negative (clock skew).
pub const MIN_NAP: Duration = Duration::from_secs(1);
/// Maximum age of the local database, in milliseconds (24 hours).
pub const STALE_THRESHOLD_MS: i64 = 86_400_000;
/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
