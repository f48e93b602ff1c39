/// Date formatting for display.
///
/// Timestamps are stored as UTC and only converted to the local zone at
/// the formatting boundary.
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

/// Format a timestamp as a US-style short date, e.g. `Jan 5, 2024`.
pub fn format_date<Tz>(when: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    when.format("%b %-d, %Y").to_string()
}

/// Format a UTC timestamp as a short date in the local time zone.
pub fn format_local_date(when: &DateTime<Utc>) -> String {
    format_date(&when.with_timezone(&Local))
}

/// Describe how long ago `modified` was, relative to `now`.
///
/// Timestamps in the future (clock skew, files copied from another
/// machine) count as today.
pub fn format_age(modified: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let days = now.signed_duration_since(*modified).num_days().max(0);
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 365 => format!("{d} days ago"),
        d => format!("{:.1} years ago", d as f64 / 365.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_date_short_month() {
        assert_eq!(format_date(&at(2024, 1, 5)), "Jan 5, 2024");
        assert_eq!(format_date(&at(2023, 12, 31)), "Dec 31, 2023");
    }

    #[test]
    fn test_format_age_today_and_yesterday() {
        let now = at(2024, 6, 1);
        assert_eq!(format_age(&now, &now), "Today");
        assert_eq!(format_age(&(now - Duration::hours(23)), &now), "Today");
        assert_eq!(format_age(&(now - Duration::days(1)), &now), "Yesterday");
    }

    #[test]
    fn test_format_age_days_and_years() {
        let now = at(2024, 6, 1);
        assert_eq!(format_age(&(now - Duration::days(40)), &now), "40 days ago");
        assert_eq!(format_age(&(now - Duration::days(364)), &now), "364 days ago");
        assert_eq!(format_age(&(now - Duration::days(365)), &now), "1.0 years ago");
        assert_eq!(format_age(&(now - Duration::days(730)), &now), "2.0 years ago");
    }

    /// A modification time after `now` must not produce a negative age.
    #[test]
    fn test_format_age_future_is_today() {
        let now = at(2024, 6, 1);
        assert_eq!(format_age(&(now + Duration::days(3)), &now), "Today");
    }
}
