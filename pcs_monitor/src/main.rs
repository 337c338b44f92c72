//! PancakeSwap new-token monitor.
//!
//! This binary polls the PancakeSwap token listing, diffs it against a locally persisted
//! set of known token addresses and announces newly listed tokens over Telegram.
//! It wires together:
//!
//! - `PancakeSwapApi` — blocking HTTP adapter that fetches one listing snapshot per call.
//! - `StateStore` — the `<cache-dir>/pcs_token.json` file holding the known tokens.
//! - `TelegramNotifier` (or `LogNotifier` when no bot token is given) — user broadcasts
//!   and admin confirmations.
//! - `SystemClock` — wall clock whose sleeps are interrupted by Ctrl+C.
//!
//! Everything runs on the main thread; the only other thread is the Ctrl+C handler,
//! which just signals the shutdown channel.
#![warn(missing_docs)]
use crate::args::Args;
use crate::clock::SystemClock;
use crate::fetcher::PancakeSwapApi;
use crate::model::local_state::StateStore;
use crate::monitor::PcsMonitor;
use clap::Parser;
use crossbeam_channel::{Receiver, bounded};
use log::{error, info, warn};
use pcs_common::notify::{LogNotifier, TelegramNotifier};
use pcs_common::{MonitorError, Notifier, Result};
use std::time::Duration;

mod args;
mod clock;
mod fetcher;
pub mod model;
mod monitor;

fn main() -> Result<(), MonitorError> {
    init_logger();
    let args = Args::parse();

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down monitor...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| MonitorError::Io(std::io::Error::other(e)))?;

    let timeout = Duration::from_secs(args.request_timeout);
    let result = match args.bot_token.clone() {
        Some(token) => {
            let notifier = TelegramNotifier::new(
                token,
                args.user_chats.clone(),
                args.admin_chat.clone(),
                timeout,
            )?;
            info!(
                "Telegram notifications enabled for {} user chat(s).",
                args.user_chats.len()
            );
            run_monitor(&args, notifier, shutdown_rx)
        }
        None => {
            warn!("No Telegram bot token configured, notifications will only be logged.");
            run_monitor(&args, LogNotifier, shutdown_rx)
        }
    };

    if let Err(e) = &result {
        error!("PancakeSwap Monitor stopped: {}", e);
    }
    result
}

fn run_monitor<N: Notifier>(args: &Args, notifier: N, shutdown_rx: Receiver<()>) -> Result<()> {
    let source = PancakeSwapApi::new(&args.api_url, Duration::from_secs(args.request_timeout))?;
    let store = StateStore::new(&args.cache_dir);
    info!(
        "Watching {} with local database {}",
        args.api_url,
        store.path().display()
    );

    let mut monitor = PcsMonitor::new(source, notifier, SystemClock::new(shutdown_rx), store);
    monitor.run()?;
    info!(
        "PancakeSwap Monitor stopped in phase {} with {} known token(s).",
        monitor.phase(),
        monitor.state().known_tokens.len()
    );
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
