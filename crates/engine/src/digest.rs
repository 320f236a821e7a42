//! Daily digest planning.

use chrono::{DateTime, FixedOffset, Timelike};

use calwatch_core::Event;

use crate::notification::Notification;
use crate::tracker::TrackerState;

impl TrackerState {
    /// Decide whether the daily digest is due at `now`.
    ///
    /// Fires at most once per calendar date, only while the local hour
    /// equals `digest_hour`. The date guard is committed on every fire,
    /// so a day with no matching events still consumes that day's single
    /// attempt and no empty message is produced. Reminder state is never
    /// touched here.
    pub fn plan_digest(
        &mut self,
        events: &[Event],
        now: DateTime<FixedOffset>,
        digest_hour: u32,
    ) -> Option<Notification> {
        let today = now.date_naive();
        if now.hour() != digest_hour || self.last_digest_date == Some(today) {
            return None;
        }
        self.last_digest_date = Some(today);

        let mut todays: Vec<Event> = events
            .iter()
            .filter(|e| e.scheduled_at.date_naive() == today)
            .cloned()
            .collect();

        if todays.is_empty() {
            tracing::debug!(date = %today, "no events for today, digest skipped");
            return None;
        }

        // Vec::sort_by_key is stable, so ties keep snapshot order.
        todays.sort_by_key(|e| e.scheduled_at);

        tracing::info!(date = %today, count = todays.len(), "daily digest due");
        Some(Notification::Digest {
            date: today,
            events: todays,
        })
    }
}
