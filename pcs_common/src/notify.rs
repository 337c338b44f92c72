//! Notification channel used to announce new tokens.
//!
//! The monitor talks to a `Notifier` with two operations: a broadcast to every
//! subscribed user and a message to the administrator. `TelegramNotifier`
//! delivers through the Telegram Bot API; `LogNotifier` only writes to the log
//! and is used when no bot token is configured.
use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::Client;
use serde::Serialize;

use crate::api::TELEGRAM_API_URL;
use crate::error::MonitorError;

/// Outbound messaging channel.
pub trait Notifier {
    /// Send `text` to every subscribed user.
    fn notify_users(&self, text: &str) -> Result<(), MonitorError>;

    /// Send `text` to the administrator.
    fn notify_admin(&self, text: &str) -> Result<(), MonitorError>;
}

/// `sendMessage` request body.
#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Telegram Bot API notifier.
pub struct TelegramNotifier {
    client: Client,
    bot_token: String,
    user_chats: Vec<String>,
    admin_chat: Option<String>,
}

impl TelegramNotifier {
    /// Build a notifier for `bot_token` that broadcasts to `user_chats` and
    /// reports to `admin_chat` when one is given.
    pub fn new(
        bot_token: String,
        user_chats: Vec<String>,
        admin_chat: Option<String>,
        timeout: Duration,
    ) -> Result<Self, MonitorError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            bot_token,
            user_chats,
            admin_chat,
        })
    }

    fn send_message(&self, chat_id: &str, text: &str) -> Result<(), MonitorError> {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_URL, self.bot_token);
        let response = self
            .client
            .post(&url)
            .json(&SendMessage { chat_id, text })
            .send()
            .map_err(|e| MonitorError::Notify(format!("chat {}: {}", chat_id, e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MonitorError::Notify(format!(
                "chat {}: HTTP {}: {}",
                chat_id, status, body
            )));
        }
        debug!("Telegram message delivered to chat {}", chat_id);
        Ok(())
    }
}

impl Notifier for TelegramNotifier {
    fn notify_users(&self, text: &str) -> Result<(), MonitorError> {
        let failures: Vec<String> = self
            .user_chats
            .iter()
            .filter_map(|chat| self.send_message(chat, text).err())
            .map(|e| e.to_string())
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(MonitorError::Notify(failures.join("; ")))
        }
    }

    fn notify_admin(&self, text: &str) -> Result<(), MonitorError> {
        match &self.admin_chat {
            Some(chat) => self.send_message(chat, text),
            None => {
                debug!("No admin chat configured, skipping admin message");
                Ok(())
            }
        }
    }
}

/// Notifier that only writes messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_users(&self, text: &str) -> Result<(), MonitorError> {
        info!("[users] {}", text);
        Ok(())
    }

    fn notify_admin(&self, text: &str) -> Result<(), MonitorError> {
        info!("[admin] {}", text);
        Ok(())
    }
}
