//! Fixed-interval poll loop.
//!
//! One strictly sequential scheduling stream: fetch a snapshot, plan the
//! digest, classify reminders, dispatch, sleep. Tracker mutations commit
//! before dispatch, so a delivery failure drops that one message instead
//! of retrying or corrupting state. No cycle-local failure stops the loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::Notify;
use tracing::info;

use calwatch_notify::Notifier;
use calwatch_source::EventSource;

use crate::tracker::TrackerState;

/// Poll cadence and digest settings for the loop.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub poll_interval: Duration,
    /// Local hour (0-23) at which the daily digest fires.
    pub digest_hour: u32,
    /// Offset in which `now` is observed; must match the source's offset.
    pub utc_offset: FixedOffset,
}

/// Drives the poll loop against an event source and a notifier.
pub struct Scheduler<S, N> {
    state: TrackerState,
    source: S,
    notifier: N,
    config: SchedulerConfig,
}

impl<S: EventSource, N: Notifier> Scheduler<S, N> {
    pub fn new(source: S, notifier: N, config: SchedulerConfig) -> Self {
        Self {
            state: TrackerState::new(),
            source,
            notifier,
            config,
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    fn local_now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.config.utc_offset)
    }

    /// One poll cycle at `now`: fetch, plan digest, classify, dispatch.
    ///
    /// A source failure has already degraded to an empty batch at the
    /// `EventSource` boundary and resets no state here.
    pub async fn tick(&mut self, now: DateTime<FixedOffset>) {
        let events = self.source.fetch(now).await;
        tracing::debug!(count = events.len(), "poll cycle snapshot");

        if let Some(digest) = self.state.plan_digest(&events, now, self.config.digest_hour) {
            self.dispatch(&digest.render()).await;
        }

        // Each reminder goes out as its own message, never batched.
        for reminder in self.state.classify(&events, now) {
            self.dispatch(&reminder.render()).await;
        }
    }

    /// Delivery failures are logged and dropped; the state transition
    /// that produced the message has already committed.
    async fn dispatch(&self, text: &str) {
        if let Err(e) = self.notifier.send(text).await {
            tracing::warn!(
                channel = self.notifier.channel_name(),
                error = %e,
                "notification delivery failed"
            );
        }
    }

    /// Run the poll loop until `shutdown` is notified.
    ///
    /// Signal with `notify_one` so a shutdown arriving mid-tick is held
    /// as a permit and observed at the next select.
    pub async fn run(mut self, shutdown: Arc<Notify>) {
        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            digest_hour = self.config.digest_hour,
            "scheduler started"
        );

        loop {
            let now = self.local_now();
            self.tick(now).await;

            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval) => {}
                _ = shutdown.notified() => {
                    info!("scheduler shutting down");
                    break;
                }
            }
        }
    }
}
