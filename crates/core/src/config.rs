use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_i32(key: &str, default: i32) -> i32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub poll: PollConfig,
    pub source: SourceConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            telegram: TelegramConfig::from_env(),
            poll: PollConfig::from_env(),
            source: SourceConfig::from_env(),
            server: ServerConfig::from_env(),
        }
    }
}

// ── Sections ──────────────────────────────────────────────────

/// Telegram delivery settings. Token and chat id have no defaults; an
/// empty token is rejected when the notifier is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Optional forum topic to post into.
    pub thread_id: Option<i64>,
}

impl TelegramConfig {
    pub fn from_env() -> Self {
        Self {
            bot_token: env_or("BOT_TOKEN", ""),
            chat_id: env_or("TELEGRAM_CHAT_ID", ""),
            thread_id: env_opt("MESSAGE_THREAD_ID").and_then(|v| v.parse().ok()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between poll cycles.
    pub interval_secs: u64,
    /// Local hour (0-23) at which the daily digest fires.
    pub digest_hour: u32,
}

impl PollConfig {
    pub fn from_env() -> Self {
        Self {
            interval_secs: env_u64("CHECK_INTERVAL", 60),
            digest_hour: env_u32("DAILY_ALERT_HOUR", 8).min(23),
        }
    }
}

pub const DEFAULT_CALENDAR_URL: &str = "https://www.investing.com/economic-calendar/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub calendar_url: String,
    /// Fixed offset from UTC in which event times are interpreted.
    pub utc_offset_hours: i32,
}

impl SourceConfig {
    pub fn from_env() -> Self {
        Self {
            calendar_url: env_or("CALENDAR_URL", DEFAULT_CALENDAR_URL),
            utc_offset_hours: env_i32("UTC_OFFSET_HOURS", 3).clamp(-12, 14),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Liveness endpoint port.
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_u16("PORT", 10_000),
        }
    }
}
