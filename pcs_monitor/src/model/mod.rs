//! Domain models for the monitor.
//!
//! - `local_state` — known-token set, staleness check and its JSON file store.

pub mod local_state;
