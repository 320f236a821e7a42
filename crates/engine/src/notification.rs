//! Notification values produced by the engine, and their message text.

use calwatch_core::Event;
use calwatch_notify::escape_html;
use chrono::NaiveDate;

/// A message the engine has decided is due.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// One-time advance reminder shortly before an event.
    Reminder { event: Event },
    /// Daily summary of the day's events, sorted by scheduled time.
    Digest {
        date: NaiveDate,
        events: Vec<Event>,
    },
}

impl Notification {
    /// Render to Telegram HTML. Titles and currencies are escaped; times
    /// are wall-clock in the event's own offset.
    pub fn render(&self) -> String {
        match self {
            Notification::Reminder { event } => format!(
                "⏰ <b>In 10 minutes:</b> {} ({}) at {}",
                escape_html(&event.title),
                escape_html(&event.currency),
                event.scheduled_at.format("%H:%M"),
            ),
            Notification::Digest { date, events } => {
                let mut lines = Vec::with_capacity(events.len() + 1);
                lines.push(format!(
                    "📅 <b>High-impact events today ({}):</b>",
                    date.format("%d.%m.%Y")
                ));
                for event in events {
                    lines.push(format!(
                        "🕒 {} — <b>{}</b> ({})",
                        event.scheduled_at.format("%H:%M"),
                        escape_html(&event.title),
                        escape_html(&event.currency),
                    ));
                }
                lines.join("\n")
            }
        }
    }
}
