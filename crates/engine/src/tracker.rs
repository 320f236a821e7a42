//! Event lifecycle tracking and reminder classification.
//!
//! Per-key lifecycle: `Unseen -> Reminded -> Elapsed`, or `Unseen ->
//! Elapsed` when the reminder window was already missed at first sight.
//! `Elapsed` is terminal. Both key sets grow monotonically and are never
//! evicted; membership lasts for the process lifetime.

use std::collections::HashSet;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

use calwatch_core::Event;

use crate::notification::Notification;

/// Advance-reminder lead time. Fixed, not configuration.
pub fn reminder_lead() -> Duration {
    Duration::minutes(10)
}

/// Process-wide dedup state, created once at startup and never persisted.
/// A restart deliberately resets all of it.
#[derive(Debug, Default)]
pub struct TrackerState {
    /// Keys whose advance reminder has been sent.
    pub(crate) reminded: HashSet<String>,
    /// Keys whose scheduled instant has passed. Terminal.
    pub(crate) elapsed: HashSet<String>,
    /// Calendar date of the last digest attempt.
    pub(crate) last_digest_date: Option<NaiveDate>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide which reminders are newly due at `now` and commit the
    /// lifecycle transitions for this batch.
    ///
    /// Elapsed keys are skipped outright. A reminder fires at most once
    /// per key, only while the remaining time is in `(0, lead]`. An event
    /// whose instant has passed is marked elapsed whether or not it was
    /// ever reminded. Never touches the digest date.
    pub fn classify(
        &mut self,
        events: &[Event],
        now: DateTime<FixedOffset>,
    ) -> Vec<Notification> {
        let mut due = Vec::new();

        for event in events {
            if self.elapsed.contains(&event.key) {
                continue;
            }

            let remaining = event.scheduled_at.signed_duration_since(now);

            if !self.reminded.contains(&event.key)
                && remaining > Duration::zero()
                && remaining <= reminder_lead()
            {
                self.reminded.insert(event.key.clone());
                tracing::info!(key = %event.key, "reminder due");
                due.push(Notification::Reminder {
                    event: event.clone(),
                });
            } else if remaining <= Duration::zero() {
                self.elapsed.insert(event.key.clone());
                tracing::debug!(key = %event.key, "event elapsed");
            }
        }

        due
    }

    pub fn is_reminded(&self, key: &str) -> bool {
        self.reminded.contains(key)
    }

    pub fn is_elapsed(&self, key: &str) -> bool {
        self.elapsed.contains(key)
    }

    pub fn last_digest_date(&self) -> Option<NaiveDate> {
        self.last_digest_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    fn instant(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        offset().with_ymd_and_hms(2026, 8, 7, h, m, s).unwrap()
    }

    fn make_event(title: &str, scheduled_at: DateTime<FixedOffset>) -> Event {
        Event::new("USD", title, scheduled_at)
    }

    fn reminders(batch: &[Notification]) -> usize {
        batch
            .iter()
            .filter(|n| matches!(n, Notification::Reminder { .. }))
            .count()
    }

    #[test]
    fn reminder_fires_once_for_same_batch_and_instant() {
        let mut state = TrackerState::new();
        let now = instant(10, 0, 0);
        let events = vec![make_event("CPI", instant(10, 5, 0))];

        assert_eq!(reminders(&state.classify(&events, now)), 1);
        assert_eq!(reminders(&state.classify(&events, now)), 0);
    }

    #[test]
    fn reminder_boundary_is_half_open_at_ten_minutes() {
        let mut state = TrackerState::new();
        let scheduled = instant(10, 10, 0);
        let event = vec![make_event("CPI", scheduled)];

        // 601 seconds remaining: not yet in the window.
        let mut early = TrackerState::new();
        assert!(early.classify(&event, instant(9, 59, 59)).is_empty());
        assert!(!early.is_reminded(&event[0].key));

        // Exactly 600 seconds remaining: fires.
        assert_eq!(reminders(&state.classify(&event, instant(10, 0, 0))), 1);
    }

    #[test]
    fn no_reminder_at_zero_or_negative_remaining() {
        let mut state = TrackerState::new();
        let scheduled = instant(10, 0, 0);
        let events = vec![make_event("CPI", scheduled)];

        let batch = state.classify(&events, instant(10, 0, 0));
        assert!(batch.is_empty());
        assert!(state.is_elapsed(&events[0].key));
        assert!(!state.is_reminded(&events[0].key));
    }

    #[test]
    fn elapsed_key_never_produces_anything_again() {
        let mut state = TrackerState::new();
        let events = vec![make_event("NFP", instant(9, 0, 0))];

        state.classify(&events, instant(9, 30, 0));
        assert!(state.is_elapsed(&events[0].key));

        // Even a `now` back inside the reminder window changes nothing.
        let batch = state.classify(&events, instant(8, 55, 0));
        assert!(batch.is_empty());
        assert!(!state.is_reminded(&events[0].key));
    }

    #[test]
    fn reminded_then_elapsed_across_two_calls() {
        let mut state = TrackerState::new();
        let events = vec![make_event("Rate Decision", instant(12, 0, 0))];

        assert_eq!(reminders(&state.classify(&events, instant(11, 55, 0))), 1);
        assert!(state.is_reminded(&events[0].key));
        assert!(!state.is_elapsed(&events[0].key));

        let batch = state.classify(&events, instant(12, 0, 1));
        assert!(batch.is_empty());
        assert!(state.is_elapsed(&events[0].key));
    }

    #[test]
    fn missed_window_goes_straight_to_elapsed() {
        let mut state = TrackerState::new();
        let events = vec![make_event("GDP", instant(8, 0, 0))];

        let batch = state.classify(&events, instant(9, 0, 0));
        assert!(batch.is_empty());
        assert!(state.is_elapsed(&events[0].key));
        assert!(!state.is_reminded(&events[0].key));
    }

    #[test]
    fn far_future_event_is_untouched() {
        let mut state = TrackerState::new();
        let events = vec![make_event("CPI", instant(18, 0, 0))];

        let batch = state.classify(&events, instant(9, 0, 0));
        assert!(batch.is_empty());
        assert!(!state.is_reminded(&events[0].key));
        assert!(!state.is_elapsed(&events[0].key));
    }

    #[test]
    fn empty_batch_mutates_nothing() {
        let mut state = TrackerState::new();
        let batch = state.classify(&[], instant(9, 0, 0));
        assert!(batch.is_empty());
        assert!(!state.is_reminded("anything"));
        assert_eq!(state.last_digest_date(), None);
    }

    #[test]
    fn independent_events_are_classified_independently() {
        let mut state = TrackerState::new();
        let events = vec![
            make_event("Soon", instant(10, 5, 0)),
            make_event("Past", instant(9, 0, 0)),
            make_event("Later", instant(15, 0, 0)),
        ];

        let batch = state.classify(&events, instant(10, 0, 0));
        assert_eq!(reminders(&batch), 1);
        assert!(state.is_reminded(&events[0].key));
        assert!(state.is_elapsed(&events[1].key));
        assert!(!state.is_reminded(&events[2].key) && !state.is_elapsed(&events[2].key));
    }
}
