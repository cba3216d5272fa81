use chrono::{DateTime, FixedOffset};

fn parse(published_at: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(published_at.trim()).ok()
}

/// Compact date for article cards, e.g. `Mar 1, 2024`.
///
/// Unparsable timestamps are shown as received.
pub fn format_short_date(published_at: &str) -> String {
    parse(published_at)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| published_at.to_string())
}

/// Long date for the detail view, e.g. `Friday, March 1, 2024 12:00`.
pub fn format_long_date(published_at: &str) -> String {
    parse(published_at)
        .map(|dt| dt.format("%A, %B %-d, %Y %H:%M").to_string())
        .unwrap_or_else(|| published_at.to_string())
}
