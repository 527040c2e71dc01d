//! Timestamp parsing and display formatting.
//!
//! The store returns `created_at` in a few shapes depending on column type:
//! - RFC 3339 with offset: `2026-01-12T18:30:00.123456+00:00`
//! - naive timestamp (no offset, taken as UTC): `2026-01-12T18:30:00`
//! - space separated naive timestamp: `2026-01-12 18:30:00`

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Display format for cards and bubbles, e.g. `12 Jan 18:30`.
const DISPLAY_FORMAT: &str = "%-d %b %H:%M";

/// Parses a store timestamp into UTC. Returns `None` for empty or
/// unrecognized input.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    try_parse_rfc3339(input).or_else(|| try_parse_naive(input))
}

fn try_parse_rfc3339(input: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn try_parse_naive(input: &str) -> Option<DateTime<Utc>> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Formats a store timestamp in local time. Empty string if it cannot be
/// parsed; a bad date never breaks a card.
pub fn format_date(input: &str) -> String {
    format_date_in(input, &Local)
}

/// Same as [`format_date`] with an explicit time zone.
pub fn format_date_in<Tz: TimeZone>(input: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    parse_timestamp(input)
        .map(|dt| dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}
