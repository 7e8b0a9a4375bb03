//! Calendar arithmetic.
//!
//! This module provides the inclusive day counting shared by leave and
//! reporting calculations, weekend detection, and the month/year windows
//! reports are built over. Dates are pure calendar dates; there is no
//! timezone handling.

use chrono::{Datelike, Month, NaiveDate, Weekday};

use crate::error::{EngineError, EngineResult};

/// Counts the days in `[start, end]`, counting both ends.
///
/// Callers guarantee `end >= start`; leave records enforce this at
/// creation. An inverted range yields a non-positive count.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::days_between_inclusive;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// assert_eq!(days_between_inclusive(start, end), 3);
/// assert_eq!(days_between_inclusive(start, start), 1);
/// ```
pub fn days_between_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Checks that `end` is not before `start`.
///
/// Returns `InvalidRecord` naming `end_field` otherwise.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate, end_field: &str) -> EngineResult<()> {
    if end < start {
        return Err(EngineError::invalid_record(
            end_field,
            format!("{} must not be before {}", end, start),
        ));
    }
    Ok(())
}

/// Returns true for Saturdays and Sundays.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::is_weekend;
/// use chrono::NaiveDate;
///
/// // 2026-01-17 is a Saturday
/// assert!(is_weekend(NaiveDate::from_ymd_opt(2026, 1, 17).unwrap()));
/// // 2026-01-12 is a Monday
/// assert!(!is_weekend(NaiveDate::from_ymd_opt(2026, 1, 12).unwrap()));
/// ```
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Returns the first and last day of `year`.
pub fn year_bounds(year: i32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1);
    let end = NaiveDate::from_ymd_opt(year, 12, 31);
    start
        .zip(end)
        .ok_or_else(|| EngineError::invalid_record("year", format!("{} is out of range", year)))
}

/// Returns the first and last day of the given month.
///
/// Returns `InvalidRecord` if `month` is outside `1..=12` or the year is
/// out of range.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::month_bounds;
/// use chrono::NaiveDate;
///
/// let (start, end) = month_bounds(2024, 2).unwrap();
/// assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert!(month_bounds(2024, 13).is_err());
/// ```
pub fn month_bounds(year: i32, month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        EngineError::invalid_record("month", format!("{}-{} is not a valid month", year, month))
    })?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .ok_or_else(|| {
            EngineError::invalid_record("month", format!("{}-{} is out of range", year, month))
        })?;
    Ok((start, end))
}

/// Returns the upper-case English name of a month number (e.g. "JANUARY").
pub fn month_name(month: u32) -> EngineResult<String> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_uppercase())
        .ok_or_else(|| EngineError::invalid_record("month", format!("{} is not a valid month", month)))
}

/// Iterates every date in `[start, end]` in order.
pub fn dates_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |date| *date <= end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_same_day_counts_one() {
        let day = make_date("2024-06-10");
        assert_eq!(days_between_inclusive(day, day), 1);
    }

    #[test]
    fn test_span_across_month_boundary() {
        assert_eq!(
            days_between_inclusive(make_date("2024-01-30"), make_date("2024-02-02")),
            4
        );
    }

    #[test]
    fn test_span_across_year_boundary() {
        assert_eq!(
            days_between_inclusive(make_date("2023-12-20"), make_date("2024-01-05")),
            17
        );
    }

    #[test]
    fn test_validate_date_range_rejects_inverted_range() {
        let result = validate_date_range(make_date("2024-05-02"), make_date("2024-05-01"), "end_date");
        match result {
            Err(EngineError::InvalidRecord { field, .. }) => assert_eq!(field, "end_date"),
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
        assert!(validate_date_range(make_date("2024-05-01"), make_date("2024-05-01"), "end_date").is_ok());
    }

    #[test]
    fn test_weekend_detection_for_full_week() {
        // 2026-01-12 is a Monday
        let monday = make_date("2026-01-12");
        let flags: Vec<bool> = dates_in_range(monday, make_date("2026-01-18"))
            .map(is_weekend)
            .collect();
        assert_eq!(flags, vec![false, false, false, false, false, true, true]);
    }

    #[test]
    fn test_month_bounds_december_rolls_into_next_year() {
        let (start, end) = month_bounds(2023, 12).unwrap();
        assert_eq!(start, make_date("2023-12-01"));
        assert_eq!(end, make_date("2023-12-31"));
    }

    #[test]
    fn test_month_bounds_non_leap_february() {
        let (_, end) = month_bounds(2023, 2).unwrap();
        assert_eq!(end, make_date("2023-02-28"));
    }

    #[test]
    fn test_month_bounds_rejects_month_zero() {
        assert!(matches!(
            month_bounds(2024, 0),
            Err(EngineError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_year_bounds() {
        let (start, end) = year_bounds(2024).unwrap();
        assert_eq!(start, make_date("2024-01-01"));
        assert_eq!(end, make_date("2024-12-31"));
    }

    #[test]
    fn test_month_name_is_upper_case() {
        assert_eq!(month_name(1).unwrap(), "JANUARY");
        assert_eq!(month_name(9).unwrap(), "SEPTEMBER");
        assert!(month_name(13).is_err());
    }

    #[test]
    fn test_dates_in_range_is_inclusive() {
        let dates: Vec<NaiveDate> =
            dates_in_range(make_date("2024-02-28"), make_date("2024-03-01")).collect();
        assert_eq!(
            dates,
            vec![
                make_date("2024-02-28"),
                make_date("2024-02-29"),
                make_date("2024-03-01")
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_inclusive_count_matches_day_difference(
            offset in 0i64..20_000,
            span in 0i64..2_000,
        ) {
            let start = make_date("1990-01-01") + chrono::Duration::days(offset);
            let end = start + chrono::Duration::days(span);
            prop_assert_eq!(days_between_inclusive(start, end), (end - start).num_days() + 1);
            prop_assert_eq!(dates_in_range(start, end).count() as i64, days_between_inclusive(start, end));
        }
    }
}
