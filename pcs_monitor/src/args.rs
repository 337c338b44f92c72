//! Command-line arguments for the PancakeSwap monitor.
//!
//! Every flag can also be supplied through the environment variable named next to it.
use clap::Parser;
use pcs_common::api::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Token listing endpoint.
    #[clap(long, env = "PCS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory holding the local token database (`pcs_token.json`).
    #[clap(long, env = "PCS_CACHE_DIR", default_value = ".cache")]
    pub cache_dir: PathBuf,

    /// HTTP request timeout in seconds.
    #[clap(long, env = "PCS_REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,

    /// Telegram bot token. Without it notifications are only logged.
    #[clap(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Telegram chat ids that receive new-token messages.
    #[clap(long = "user-chat", env = "TELEGRAM_USER_CHATS", value_delimiter = ',')]
    pub user_chats: Vec<String>,

    /// Telegram chat id that receives database update confirmations.
    #[clap(long, env = "TELEGRAM_ADMIN_CHAT")]
    pub admin_chat: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_pancakeswap() {
        let args = Args::try_parse_from(["pcs_monitor"]).unwrap();
        assert_eq!(args.api_url, DEFAULT_API_URL);
        assert_eq!(args.request_timeout, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn user_chats_accept_lists_and_repeats() {
        let args = Args::try_parse_from([
            "pcs_monitor",
            "--user-chat",
            "1,2",
            "--user-chat",
            "3",
            "--admin-chat",
            "42",
            "--cache-dir",
            "/tmp/pcs",
        ])
        .unwrap();
        assert_eq!(args.user_chats, vec!["1", "2", "3"]);
        assert_eq!(args.admin_chat.as_deref(), Some("42"));
        assert_eq!(args.cache_dir, PathBuf::from("/tmp/pcs"));
    }
}
