//! Economic-calendar event sources.
//!
//! This crate provides:
//! - `EventSource` trait for the inbound snapshot boundary
//! - Investing.com scraper that extracts high-impact calendar rows

pub mod investing;
pub mod traits;

pub use investing::InvestingSource;
pub use traits::{EventSource, SourceError};
