//! Outbound notification delivery.
//!
//! This crate provides:
//! - `Notifier` trait for the single outbound message boundary
//! - Telegram Bot API implementation with HTML formatting

pub mod telegram;
pub mod traits;

pub use telegram::{escape_html, TelegramNotifier};
pub use traits::{Notifier, NotifyError};
