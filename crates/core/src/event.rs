//! Calendar event model.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

/// A single high-impact calendar entry, produced fresh on every poll.
///
/// Events are not owned across polls; dedup state references them only
/// through [`Event::key`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Stable dedup identity. Identical across polls for the same
    /// real-world event; distinct whenever currency, title, or the
    /// scheduled instant differ.
    pub key: String,
    /// Display text of the release.
    pub title: String,
    /// Short code for the affected currency (e.g. "USD").
    pub currency: String,
    /// Scheduled wall-clock instant at the configured fixed UTC offset.
    pub scheduled_at: DateTime<FixedOffset>,
}

impl Event {
    /// Build an event, deriving the key from currency, title, and instant.
    pub fn new(
        currency: impl Into<String>,
        title: impl Into<String>,
        scheduled_at: DateTime<FixedOffset>,
    ) -> Self {
        let currency = currency.into();
        let title = title.into();
        let key = format!(
            "{}_{}_{}",
            currency,
            title,
            scheduled_at.to_rfc3339_opts(SecondsFormat::Secs, false)
        );
        Self {
            key,
            title,
            currency,
            scheduled_at,
        }
    }
}
