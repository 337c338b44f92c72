//! Human-readable texts sent through the notification channel and written to logs.
//!
//! Server timestamps are milliseconds since the Unix epoch; they are rendered in
//! UTC so the admin sees the same time regardless of where the monitor runs.

use chrono::DateTime;

use crate::snapshot::TokenInfo;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MISSING: &str = "?";

/// Render a millisecond server timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Out-of-range values fall back to the raw number.
pub fn timestamp_to_string(timestamp_ms: i64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(time) => format!("{} UTC", time.format(TIME_FORMAT)),
        None => format!("{} ms", timestamp_ms),
    }
}

/// Message announcing a newly listed token to users.
pub fn new_token_message(address: &str, token: &TokenInfo) -> String {
    format!(
        "New token found: {} ({})\nAddress: {}\nPrice: ${}\nPrice (BNB): {}",
        token.name.as_deref().unwrap_or(MISSING),
        token.symbol.as_deref().unwrap_or(MISSING),
        address,
        token.price.as_deref().unwrap_or(MISSING),
        token.price_bnb.as_deref().unwrap_or(MISSING),
    )
}

/// Message confirming to the admin that the local database was written.
pub fn database_updated_message(saved_time: i64) -> String {
    format!(
        "Local database has been updated successfully. Server time: {}.",
        timestamp_to_string(saved_time)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_timestamp_in_utc() {
        assert_eq!(timestamp_to_string(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(timestamp_to_string(1_634_567_890_123), "2021-10-18 14:38:10 UTC");
    }

    #[test]
    fn out_of_range_timestamp_falls_back_to_raw_value() {
        assert_eq!(timestamp_to_string(i64::MAX), format!("{} ms", i64::MAX));
    }

    #[test]
    fn token_message_fills_missing_fields() {
        let token = TokenInfo {
            name: Some("PancakeSwap Token".into()),
            symbol: Some("Cake".into()),
            price: Some("19.8".into()),
            price_bnb: None,
        };
        assert_eq!(
            new_token_message("0xabc", &token),
            "New token found: PancakeSwap Token (Cake)\nAddress: 0xabc\nPrice: $19.8\nPrice (BNB): ?"
        );
    }

    #[test]
    fn admin_message_contains_server_time() {
        assert_eq!(
            database_updated_message(0),
            "Local database has been updated successfully. Server time: 1970-01-01 00:00:00 UTC."
        );
    }
}
