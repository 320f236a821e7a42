//! Event lifecycle and notification-scheduling engine.
//!
//! This crate is the core of calwatch:
//! - `TrackerState` holds the process-lifetime dedup memory
//! - `classify` decides which advance reminders are newly due
//! - `plan_digest` decides the once-per-day summary
//! - `Scheduler` drives the sequential poll loop
//!
//! All decisions are deterministic given `now`; wall-clock access lives
//! only in the loop driver, so tests drive cycles with fabricated instants.

pub mod digest;
pub mod notification;
pub mod scheduler;
pub mod tracker;

pub use notification::Notification;
pub use scheduler::{Scheduler, SchedulerConfig};
pub use tracker::TrackerState;
