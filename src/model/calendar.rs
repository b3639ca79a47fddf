//! Calendar arithmetic on plain local dates.
//!
//! A *working day* is any day that is not Saturday or Sunday. All functions
//! take and return [`NaiveDate`], so nothing here can be shifted by a time
//! zone: a date read as `2024-01-08` stays the 8th.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::{GanttError, Result};

/// Text encoding used for every date that crosses the store boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// True for Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Number of working days in the closed interval `[start, end]`.
///
/// Returns 0 when `start > end`. A single day counts as 1 unless it falls on
/// a weekend.
pub fn calculate_working_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !is_weekend(*day))
        .count() as u32
}

/// Step forward from `start` until `n` working days have been passed.
///
/// `start` itself is never counted, even on a weekday, so keeping a task's
/// length of `d` working days means calling this with `d - 1`. `n == 0`
/// returns `start` unchanged.
pub fn add_working_days(start: NaiveDate, n: u32) -> NaiveDate {
    let mut current = start;
    let mut added = 0;
    while added < n {
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
        if !is_weekend(current) {
            added += 1;
        }
    }
    current
}

/// Parse a `YYYY-MM-DD` string as a calendar date.
///
/// Only the zero-padded four-digit-year form is accepted. Surrounding
/// whitespace is ignored.
pub fn parse_local_date(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    let bytes = trimmed.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(GanttError::InvalidDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| GanttError::InvalidDate(trimmed.to_string()))
}

/// Serde adapter that reads and writes dates through [`parse_local_date`]
/// and [`format_date`].
pub mod local_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_local_date(&text).map_err(de::Error::custom)
    }
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// First day of the week containing `date`, for weeks beginning on `week_start`.
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_monday() + 7
        - week_start.num_days_from_monday())
        % 7;
    date - Duration::days(offset as i64)
}

/// Last day of the week containing `date`.
pub fn end_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    start_of_week(date, week_start) + Duration::days(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekend_detection() {
        assert!(!is_weekend(d(2024, 1, 8))); // Monday
        assert!(!is_weekend(d(2024, 1, 12))); // Friday
        assert!(is_weekend(d(2024, 1, 13)));
        assert!(is_weekend(d(2024, 1, 14)));
    }

    #[test]
    fn working_days_single_day() {
        assert_eq!(calculate_working_days(d(2024, 1, 10), d(2024, 1, 10)), 1);
        assert_eq!(calculate_working_days(d(2024, 1, 13), d(2024, 1, 13)), 0);
    }

    #[test]
    fn working_days_inverted_range_is_zero() {
        assert_eq!(calculate_working_days(d(2024, 1, 10), d(2024, 1, 8)), 0);
    }

    #[test]
    fn working_days_across_weekend() {
        // Thu 11 .. Tue 16 => Thu, Fri, Mon, Tue
        assert_eq!(calculate_working_days(d(2024, 1, 11), d(2024, 1, 16)), 4);
        assert_eq!(calculate_working_days(d(2024, 1, 8), d(2024, 1, 10)), 3);
    }

    #[test]
    fn add_working_days_does_not_count_start() {
        let monday = d(2024, 1, 8);
        assert_eq!(add_working_days(monday, 0), monday);
        assert_eq!(add_working_days(monday, 1), d(2024, 1, 9));
        assert_eq!(add_working_days(monday, 2), d(2024, 1, 10));
    }

    #[test]
    fn add_working_days_skips_weekend() {
        let friday = d(2024, 1, 12);
        assert_eq!(add_working_days(friday, 1), d(2024, 1, 15));
        let saturday = d(2024, 1, 13);
        assert_eq!(add_working_days(saturday, 1), d(2024, 1, 15));
        assert_eq!(add_working_days(saturday, 2), d(2024, 1, 16));
    }

    #[test]
    fn parse_local_date_keeps_calendar_day() {
        assert_eq!(parse_local_date("2024-01-08").unwrap(), d(2024, 1, 8));
        assert_eq!(parse_local_date(" 2024-12-31 ").unwrap(), d(2024, 12, 31));
    }

    #[test]
    fn parse_local_date_rejects_garbage() {
        assert!(matches!(
            parse_local_date("08/01/2024"),
            Err(GanttError::InvalidDate(_))
        ));
        assert!(parse_local_date("2024-02-30").is_err());
        assert!(parse_local_date("").is_err());
    }

    #[test]
    fn parse_local_date_requires_padded_form() {
        for text in ["2024-1-8", "+2024-01-08", "2024-01-8", "20240108", "2024/01/08"] {
            assert!(
                matches!(parse_local_date(text), Err(GanttError::InvalidDate(_))),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn format_round_trips() {
        assert_eq!(format_date(d(2024, 3, 5)), "2024-03-05");
    }

    #[test]
    fn week_boundaries() {
        let wednesday = d(2024, 1, 10);
        assert_eq!(start_of_week(wednesday, Weekday::Sun), d(2024, 1, 7));
        assert_eq!(end_of_week(wednesday, Weekday::Sun), d(2024, 1, 13));
        assert_eq!(start_of_week(wednesday, Weekday::Mon), d(2024, 1, 8));
        assert_eq!(end_of_week(wednesday, Weekday::Mon), d(2024, 1, 14));
        // Already at the boundary.
        assert_eq!(start_of_week(d(2024, 1, 7), Weekday::Sun), d(2024, 1, 7));
    }
}
