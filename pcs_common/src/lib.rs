//!
//! Common types and utilities shared by the PancakeSwap token monitor.
//!
//! This crate aggregates:
//! - `error` — unified error type `MonitorError` used across the workspace.
//! - `result` — handy `Result<T, MonitorError>` alias.
//! - `api` — listing API endpoint and polling cadence constants.
//! - `snapshot` — the listing snapshot and token metadata returned by the API.
//! - `format` — human-readable timestamps and notification texts.
//! - `notify` — the notification channel (Telegram or log-only).
#![warn(missing_docs)]
pub mod api;
pub mod error;
pub mod format;
pub mod notify;
pub mod result;
pub mod snapshot;

pub use error::MonitorError;
pub use notify::Notifier;
pub use result::Result;
pub use snapshot::{Snapshot, TokenInfo};
