//! Conversions between `DateTime<Utc>` and the continuous minute axis that
//! [`crate::interval`] operates on.
//!
//! The axis origin (`base_midnight`) is arbitrary as long as it is held fixed
//! across a single availability search or reservation attempt; callers
//! typically pick the UTC midnight that precedes the request window.

use chrono::{DateTime, Duration, Utc};

use crate::interval::Interval;

/// Minutes from `base_midnight` to `at`. Negative if `at` precedes the origin.
pub fn to_minute(base_midnight: DateTime<Utc>, at: DateTime<Utc>) -> i64 {
    (at - base_midnight).num_minutes()
}

/// Inverse of [`to_minute`].
pub fn from_minute(base_midnight: DateTime<Utc>, minute: i64) -> DateTime<Utc> {
    base_midnight + Duration::minutes(minute)
}

/// Convert a `[start, end)` wall-clock range into a minute-axis [`Interval`].
pub fn to_minute_range(
    base_midnight: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Interval {
    Interval::new(to_minute(base_midnight, start), to_minute(base_midnight, end))
}

/// The UTC midnight that begins the calendar day containing `at`.
pub fn midnight_of(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_to_minute_and_back_roundtrip() {
        let base = midnight_of(dt(2026, 7, 31, 0, 0));
        let at = dt(2026, 7, 31, 14, 30);
        let minute = to_minute(base, at);
        assert_eq!(minute, 870);
        assert_eq!(from_minute(base, minute), at);
    }

    #[test]
    fn test_to_minute_range_spans_midnight() {
        let base = midnight_of(dt(2026, 7, 31, 0, 0));
        let start = dt(2026, 7, 31, 22, 0);
        let end = dt(2026, 8, 1, 6, 0);
        let range = to_minute_range(base, start, end);
        assert_eq!(range.start, 22 * 60);
        assert_eq!(range.end, 30 * 60);
    }

    #[test]
    fn test_midnight_of_truncates_time_of_day() {
        let at = dt(2026, 7, 31, 23, 59);
        assert_eq!(midnight_of(at), dt(2026, 7, 31, 0, 0));
    }
}
