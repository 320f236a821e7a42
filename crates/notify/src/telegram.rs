//! Telegram Bot API notifier with HTML formatting.
//!
//! Delivers messages via the Telegram Bot API `sendMessage` endpoint.
//! Supports forum topics (`message_thread_id`) and rate limit handling.

use std::time::Duration;

use crate::traits::{Notifier, NotifyError};

/// Request timeout so a stuck Telegram call can never stall the poll loop.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Escapes `&`, `<`, and `>` for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Sends messages via the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    thread_id: Option<i64>,
    client: reqwest::Client,
}

impl TelegramNotifier {
    /// Creates a new `TelegramNotifier`.
    ///
    /// Returns [`NotifyError::Config`] if the bot token or chat id is empty.
    pub fn new(
        bot_token: String,
        chat_id: String,
        thread_id: Option<i64>,
    ) -> Result<Self, NotifyError> {
        if bot_token.is_empty() {
            return Err(NotifyError::Config(
                "Telegram bot token must not be empty (set BOT_TOKEN)".to_string(),
            ));
        }
        if chat_id.is_empty() {
            return Err(NotifyError::Config(
                "Telegram chat id must not be empty (set TELEGRAM_CHAT_ID)".to_string(),
            ));
        }

        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;

        Ok(Self {
            bot_token,
            chat_id,
            thread_id,
            client,
        })
    }

    /// JSON payload for `sendMessage`. Messages are pre-rendered HTML.
    fn request_body(&self, text: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(thread_id) = self.thread_id {
            body["message_thread_id"] = serde_json::Value::from(thread_id);
        }
        body
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    /// Sends a message via the Telegram `sendMessage` API.
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.bot_token
        );

        tracing::debug!(
            chat_id = %self.chat_id,
            thread_id = ?self.thread_id,
            "Sending Telegram message"
        );

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(text))
            .send()
            .await?;

        let status = response.status();
        let resp_body: serde_json::Value = response.json().await?;

        if resp_body.get("ok") == Some(&serde_json::Value::Bool(true)) {
            tracing::info!(chat_id = %self.chat_id, "Telegram message sent");
            return Ok(());
        }

        // Handle rate limiting (HTTP 429).
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp_body
                .get("parameters")
                .and_then(|p| p.get("retry_after"))
                .and_then(|v| v.as_u64())
                .unwrap_or(30);
            return Err(NotifyError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let description = resp_body
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown Telegram API error");

        Err(NotifyError::Api(description.to_string()))
    }

    /// Returns the channel name for this notifier.
    fn channel_name(&self) -> &str {
        "telegram"
    }
}
