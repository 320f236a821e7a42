//! Investing.com economic-calendar scraper.
//!
//! Fetches the public calendar page and extracts high-impact rows
//! (`tr.js-event-item` with a three-bull sentiment marker). Rows missing
//! any of the identity attributes are skipped, so the engine only ever
//! sees well-formed events.

use std::time::Duration;

use chrono::{FixedOffset, TimeZone, Utc};
use scraper::{ElementRef, Html, Selector};

use calwatch_core::Event;

use crate::traits::{EventSource, SourceError};

/// Browser-like headers; the page serves a stub to unknown agents.
const USER_AGENT: &str = "Mozilla/5.0";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Scrapes high-impact events from the Investing.com economic calendar.
pub struct InvestingSource {
    client: reqwest::Client,
    url: String,
    offset: FixedOffset,
}

impl InvestingSource {
    /// Creates a source for `url`, interpreting event times at the given
    /// fixed UTC offset.
    pub fn new(url: String, utc_offset_hours: i32) -> Result<Self, SourceError> {
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600).ok_or_else(|| {
            SourceError::Config(format!("invalid UTC offset: {utc_offset_hours}h"))
        })?;
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            url,
            offset,
        })
    }

    /// The fixed offset in which this source reports event times.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    async fn fetch_page(&self) -> Result<String, SourceError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }

        Ok(response.text().await?)
    }

    async fn fetch_events(&self) -> Result<Vec<Event>, SourceError> {
        let html = self.fetch_page().await?;
        parse_events(&html, self.offset)
    }
}

#[async_trait::async_trait]
impl EventSource for InvestingSource {
    async fn fetch(&self, _now: chrono::DateTime<FixedOffset>) -> Vec<Event> {
        match self.fetch_events().await {
            Ok(events) => {
                tracing::debug!(count = events.len(), "fetched calendar snapshot");
                events
            }
            Err(e) => {
                tracing::warn!(error = %e, "calendar fetch failed, treating as empty batch");
                Vec::new()
            }
        }
    }
}

// ── Row extraction ──────────────────────────────────────────────────

/// Extract high-impact events from a calendar page.
pub fn parse_events(html: &str, offset: FixedOffset) -> Result<Vec<Event>, SourceError> {
    let row_selector = selector("tr.js-event-item")?;
    let impact_selector = selector(".sentiment .grayFullBullish")?;
    let bull_selector = selector("i")?;

    let document = Html::parse_document(html);
    let mut events = Vec::new();

    for row in document.select(&row_selector) {
        if !is_high_impact(row, &impact_selector, &bull_selector) {
            continue;
        }
        // Rows without full identity attributes are malformed; skip them.
        let Some(event) = row_event(row, offset) else {
            continue;
        };
        events.push(event);
    }

    Ok(events)
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(e.to_string()))
}

/// High impact = sentiment cell with at least three filled bull icons.
fn is_high_impact(row: ElementRef<'_>, impact: &Selector, bull: &Selector) -> bool {
    row.select(impact)
        .next()
        .map(|cell| cell.select(bull).count() >= 3)
        .unwrap_or(false)
}

fn row_event(row: ElementRef<'_>, offset: FixedOffset) -> Option<Event> {
    let currency = row.value().attr("data-event-currency")?;
    let title = row.value().attr("data-event-title")?;
    let timestamp = row.value().attr("data-event-datetime")?;

    let epoch: i64 = timestamp.trim().parse().ok()?;
    let scheduled_at = Utc.timestamp_opt(epoch, 0).single()?.with_timezone(&offset);

    Some(Event::new(currency, title, scheduled_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn kyiv() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    fn bulls(n: usize) -> String {
        format!(
            r#"<td class="sentiment"><span class="grayFullBullish">{}</span></td>"#,
            "<i></i>".repeat(n)
        )
    }

    fn row(currency: &str, title: &str, epoch: i64, bull_count: usize) -> String {
        format!(
            r#"<tr class="js-event-item" data-event-currency="{currency}" data-event-datetime="{epoch}" data-event-title="{title}">{}</tr>"#,
            bulls(bull_count)
        )
    }

    fn page(rows: &[String]) -> String {
        format!("<table><tbody>{}</tbody></table>", rows.join("\n"))
    }

    #[test]
    fn extracts_high_impact_rows() {
        let epoch = Utc
            .with_ymd_and_hms(2026, 8, 7, 12, 30, 0)
            .unwrap()
            .timestamp();
        let html = page(&[row("USD", "Nonfarm Payrolls", epoch, 3)]);

        let events = parse_events(&html, kyiv()).unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.currency, "USD");
        assert_eq!(event.title, "Nonfarm Payrolls");
        // 12:30 UTC renders as 15:30 at UTC+3.
        assert_eq!(event.scheduled_at.hour(), 15);
        assert_eq!(event.scheduled_at.minute(), 30);
    }

    #[test]
    fn filters_low_impact_rows() {
        let html = page(&[
            row("EUR", "German Factory Orders", 1_900_000_000, 2),
            row("USD", "Fed Chair Speaks", 1_900_000_060, 3),
        ]);

        let events = parse_events(&html, kyiv()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Fed Chair Speaks");
    }

    #[test]
    fn skips_rows_missing_identity_attributes() {
        let no_title = format!(
            r#"<tr class="js-event-item" data-event-currency="USD" data-event-datetime="1900000000">{}</tr>"#,
            bulls(3)
        );
        let bad_timestamp = format!(
            r#"<tr class="js-event-item" data-event-currency="USD" data-event-datetime="not-a-number" data-event-title="CPI">{}</tr>"#,
            bulls(3)
        );
        let html = page(&[no_title, bad_timestamp, row("GBP", "BoE Rate Decision", 1_900_000_000, 3)]);

        let events = parse_events(&html, kyiv()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].currency, "GBP");
    }

    #[test]
    fn rows_without_sentiment_cell_are_ignored() {
        let html = page(&[
            r#"<tr class="js-event-item" data-event-currency="JPY" data-event-datetime="1900000000" data-event-title="Holiday"><td></td></tr>"#.to_string(),
        ]);

        let events = parse_events(&html, kyiv()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn empty_page_yields_empty_batch() {
        let events = parse_events("<html><body></body></html>", kyiv()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn rejects_invalid_offset() {
        let result = InvestingSource::new("http://example.invalid/".to_string(), 99);
        assert!(matches!(result, Err(SourceError::Config(_))));
    }
}
