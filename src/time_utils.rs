// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and slot-time parsing.

use chrono::{DateTime, NaiveTime, SecondsFormat, Timelike, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current UTC timestamp as RFC3339 (the storage format for audit fields).
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Parse an "HH:MM" schedule slot time into minutes since midnight.
///
/// Returns `None` for anything that is not a valid 24-hour time.
pub fn parse_slot_minutes(value: &str) -> Option<u32> {
    let time = NaiveTime::parse_from_str(value, "%H:%M").ok()?;
    Some(time.hour() * 60 + time.minute())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot_minutes() {
        assert_eq!(parse_slot_minutes("00:00"), Some(0));
        assert_eq!(parse_slot_minutes("09:30"), Some(570));
        assert_eq!(parse_slot_minutes("23:59"), Some(1439));
    }

    #[test]
    fn test_parse_slot_minutes_rejects_garbage() {
        assert_eq!(parse_slot_minutes("24:00"), None);
        assert_eq!(parse_slot_minutes("9am"), None);
        assert_eq!(parse_slot_minutes(""), None);
    }
}
