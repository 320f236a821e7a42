//! EventSource trait definition and shared error types.

use calwatch_core::Event;
use chrono::{DateTime, FixedOffset};

/// Errors that can occur while retrieving or parsing the calendar page.
///
/// These never cross the [`EventSource::fetch`] boundary; implementations
/// absorb them into an empty batch and log at their own edge.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("calendar page returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Trait for calendar snapshot providers.
#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    /// Snapshot of candidate events as observed at `now`.
    ///
    /// Returns zero or more well-formed events. Transport and parse
    /// failures must not raise; the implementation degrades to an empty
    /// batch so a transient outage costs one cycle, nothing more.
    async fn fetch(&self, now: DateTime<FixedOffset>) -> Vec<Event>;
}
