//! Europe/Paris calendar utilities.
//!
//! All "today" decisions run against a single fixed reference zone so the
//! server's own locale never leaks into eligibility. DST is handled by the
//! IANA data behind chrono-tz; the seasonal offset is derived per call.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Europe::Paris;

/// Calendar day of `t` in Europe/Paris.
pub fn paris_day(t: DateTime<Utc>) -> NaiveDate {
    t.with_timezone(&Paris).date_naive()
}

/// Last instant (23:59:59.999 wall clock) of `t`'s Paris calendar day,
/// converted back to UTC. Used as the store-side cutoff for due dates.
pub fn end_of_paris_day(t: DateTime<Utc>) -> DateTime<Utc> {
    let day = paris_day(t);
    // 23:59:59 is never inside a DST gap or fold in Paris; transitions
    // happen at 02:00/03:00 local. Should tzdata ever move one there, a
    // fold resolves to the later instant and a gap degrades the cutoff
    // to `t` itself rather than panicking.
    day.and_hms_milli_opt(23, 59, 59, 999)
        .and_then(|naive| Paris.from_local_datetime(&naive).latest())
        .map(|end| end.with_timezone(&Utc))
        .unwrap_or(t)
}

/// Whether `a` and `b` fall on the same Paris calendar day.
pub fn same_paris_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    paris_day(a) == paris_day(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn winter_day_ends_at_2259_utc() {
        // CET = UTC+1
        let end = end_of_paris_day(utc("2025-01-15T10:00:00Z"));
        assert_eq!(end, utc("2025-01-15T22:59:59.999Z"));
    }

    #[test]
    fn summer_day_ends_at_2159_utc() {
        // CEST = UTC+2
        let end = end_of_paris_day(utc("2025-07-15T10:00:00Z"));
        assert_eq!(end, utc("2025-07-15T21:59:59.999Z"));
    }

    #[test]
    fn spring_forward_day_uses_summer_offset() {
        // 2025-03-30: clocks jump 02:00 -> 03:00, day ends in CEST.
        let end = end_of_paris_day(utc("2025-03-30T12:00:00Z"));
        assert_eq!(end, utc("2025-03-30T21:59:59.999Z"));
        // The day before still ends in CET.
        let before = end_of_paris_day(utc("2025-03-29T12:00:00Z"));
        assert_eq!(before, utc("2025-03-29T22:59:59.999Z"));
    }

    #[test]
    fn fall_back_day_uses_winter_offset() {
        // 2025-10-26: clocks fall back 03:00 -> 02:00, day ends in CET.
        let end = end_of_paris_day(utc("2025-10-26T12:00:00Z"));
        assert_eq!(end, utc("2025-10-26T22:59:59.999Z"));
        let before = end_of_paris_day(utc("2025-10-25T12:00:00Z"));
        assert_eq!(before, utc("2025-10-25T21:59:59.999Z"));
    }

    #[test]
    fn late_utc_evening_is_next_paris_day() {
        // 23:30 UTC in summer is 01:30 Paris the next day.
        let day = paris_day(utc("2025-07-15T23:30:00Z"));
        assert_eq!(day, NaiveDate::from_ymd_opt(2025, 7, 16).unwrap());
    }

    #[test]
    fn same_paris_day_spans_utc_midnight() {
        // Both instants are 2025-07-16 in Paris even though they straddle
        // UTC midnight.
        assert!(same_paris_day(
            utc("2025-07-15T22:30:00Z"),
            utc("2025-07-16T10:00:00Z"),
        ));
        assert!(!same_paris_day(
            utc("2025-07-15T21:30:00Z"),
            utc("2025-07-16T10:00:00Z"),
        ));
    }
}
