//! Attendance aggregation.
//!
//! This module turns attendance records into status counts, an attendance
//! rate and a naive worked-hours estimate, and lays records out on a
//! month calendar.
//!
//! Check-in and check-out values are free text. [`parse_clock_time`]
//! reports malformed input as an error, but the aggregates built on it
//! ([`hours_worked`] and everything above) treat any failure as zero hours.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus};

use super::calendar::{dates_in_range, is_weekend, month_bounds, month_name};

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

fn clock_minutes(input: &str) -> EngineResult<Decimal> {
    let parse_failure = |message: &str| EngineError::ParseFailure {
        input: input.to_string(),
        message: message.to_string(),
    };

    let mut parts = input.trim().split(':');
    let hours = parts
        .next()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| parse_failure("missing hour field"))?;
    let minutes = parts
        .next()
        .ok_or_else(|| parse_failure("missing minute field"))?;

    let hours = Decimal::from_str(hours.trim())
        .map_err(|_| parse_failure("hour field is not a number"))?;
    let minutes = Decimal::from_str(minutes.trim())
        .map_err(|_| parse_failure("minute field is not a number"))?;

    hours
        .checked_mul(MINUTES_PER_HOUR)
        .and_then(|m| m.checked_add(minutes))
        .ok_or_else(|| parse_failure("clock value out of range"))
}

/// Parses a clock string such as `"9:05"`, `"17:30"` or `"08:15:42"` into
/// fractional hours.
///
/// Only the first two colon-separated fields are read; seconds and
/// anything after them are ignored. Each field is a decimal number, so
/// `"9:30.5"` is nine hours and thirty and a half minutes.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::parse_clock_time;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_clock_time("17:30").unwrap(), Decimal::new(175, 1));
/// assert_eq!(parse_clock_time("08:15:42").unwrap(), Decimal::new(825, 2));
/// assert!(parse_clock_time("noon").is_err());
/// ```
pub fn parse_clock_time(input: &str) -> EngineResult<Decimal> {
    Ok(clock_minutes(input)? / MINUTES_PER_HOUR)
}

/// Hours between check-in and check-out, never negative.
///
/// Returns zero when either value is missing or cannot be parsed.
pub fn hours_worked(check_in: Option<&str>, check_out: Option<&str>) -> Decimal {
    let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
        return Decimal::ZERO;
    };
    match (clock_minutes(check_in), clock_minutes(check_out)) {
        (Ok(start), Ok(end)) => end
            .checked_sub(start)
            .map_or(Decimal::ZERO, |minutes| minutes.max(Decimal::ZERO) / MINUTES_PER_HOUR),
        _ => Decimal::ZERO,
    }
}

/// Hours worked for a single record.
pub fn record_hours(record: &AttendanceRecord) -> Decimal {
    hours_worked(record.check_in.as_deref(), record.check_out.as_deref())
}

/// `present * 100 / total`, or zero when there are no records.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::attendance_rate;
/// use rust_decimal::Decimal;
///
/// assert_eq!(attendance_rate(7, 10), Decimal::new(70, 0));
/// assert_eq!(attendance_rate(0, 0), Decimal::ZERO);
/// ```
pub fn attendance_rate(present: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(present as u64) * Decimal::ONE_HUNDRED / Decimal::from(total as u64)
}

/// Returns true if the record's date, written as `YYYY-MM-DD`, starts with
/// `prefix` (e.g. `"2024-03"`).
pub fn in_month(record: &AttendanceRecord, prefix: &str) -> bool {
    record.date.to_string().starts_with(prefix)
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count as u64)
    }
}

/// Status counts, attendance rate and hours over a set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    /// Number of records considered.
    pub total_days: usize,
    /// Records marked `Present`.
    pub present_days: usize,
    /// Records marked `Absent`.
    pub absent_days: usize,
    /// Records marked `Late`.
    pub late_days: usize,
    /// Records marked `Half-day`.
    pub half_days: usize,
    /// `present_days * 100 / total_days`.
    pub attendance_rate: Decimal,
    /// Sum of check-in to check-out hours.
    pub total_hours: Decimal,
    /// `total_hours / total_days`.
    pub average_hours_per_day: Decimal,
    /// Sum of recorded overtime hours.
    pub total_overtime_hours: Decimal,
    /// `total_overtime_hours / total_days`.
    pub average_overtime_hours: Decimal,
}

fn add_hours(total: Decimal, hours: Decimal, field: &str) -> EngineResult<Decimal> {
    total
        .checked_add(hours)
        .ok_or_else(|| EngineError::invalid_record(field, "hour total out of range"))
}

/// Folds attendance records into an [`AttendanceSummary`].
///
/// Returns `InvalidRecord` if the hour or overtime totals overflow.
pub fn summarize_attendance<'a, I>(records: I) -> EngineResult<AttendanceSummary>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut summary = AttendanceSummary::default();
    for record in records {
        summary.total_days += 1;
        match record.status {
            Some(AttendanceStatus::Present) => summary.present_days += 1,
            Some(AttendanceStatus::Absent) => summary.absent_days += 1,
            Some(AttendanceStatus::Late) => summary.late_days += 1,
            Some(AttendanceStatus::HalfDay) => summary.half_days += 1,
            _ => {}
        }
        summary.total_hours = add_hours(summary.total_hours, record_hours(record), "total_hours")?;
        summary.total_overtime_hours = add_hours(
            summary.total_overtime_hours,
            record.overtime_or_zero(),
            "total_overtime_hours",
        )?;
    }

    summary.attendance_rate = attendance_rate(summary.present_days, summary.total_days);
    summary.average_hours_per_day = average(summary.total_hours, summary.total_days);
    summary.average_overtime_hours = average(summary.total_overtime_hours, summary.total_days);
    Ok(summary)
}

/// Per-day status counts shown on the attendance calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceDayTally {
    /// Records marked `Present`.
    pub present: usize,
    /// Records marked `Absent`.
    pub absent: usize,
    /// Records marked `Late`.
    pub late: usize,
    /// Records marked `Half-day`.
    pub half_day: usize,
}

/// One calendar day and the attendance recorded on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceCalendarDay {
    /// The date.
    pub date: NaiveDate,
    /// Upper-case weekday name (e.g. "MONDAY").
    pub day_of_week: String,
    /// True on Saturdays and Sundays.
    pub is_weekend: bool,
    /// Records dated on this day.
    pub attendances: Vec<AttendanceRecord>,
    /// Status counts for this day.
    pub tally: AttendanceDayTally,
}

/// A month of attendance laid out day by day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceCalendar {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1-12.
    pub month: u32,
    /// Upper-case month name.
    pub month_name: String,
    /// First day of the month.
    pub start_date: NaiveDate,
    /// Last day of the month.
    pub end_date: NaiveDate,
    /// Records falling inside the month.
    pub total_attendances: usize,
    /// One entry per day of the month.
    pub days: Vec<AttendanceCalendarDay>,
}

pub(crate) fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

/// Builds the attendance calendar for a month.
///
/// When `employee_id` is given only that employee's records are placed.
/// Returns `InvalidRecord` if `month` is outside `1..=12`.
pub fn build_attendance_calendar(
    year: i32,
    month: u32,
    records: &[AttendanceRecord],
    employee_id: Option<u64>,
) -> EngineResult<AttendanceCalendar> {
    let (start_date, end_date) = month_bounds(year, month)?;
    let selected: Vec<&AttendanceRecord> = records
        .iter()
        .filter(|r| r.date >= start_date && r.date <= end_date)
        .filter(|r| employee_id.is_none_or(|id| r.employee_id == id))
        .collect();

    let days = dates_in_range(start_date, end_date)
        .map(|date| {
            let attendances: Vec<AttendanceRecord> = selected
                .iter()
                .filter(|r| r.date == date)
                .map(|r| (*r).clone())
                .collect();
            let tally = AttendanceDayTally {
                present: count_status(&attendances, AttendanceStatus::Present),
                absent: count_status(&attendances, AttendanceStatus::Absent),
                late: count_status(&attendances, AttendanceStatus::Late),
                half_day: count_status(&attendances, AttendanceStatus::HalfDay),
            };
            AttendanceCalendarDay {
                date,
                day_of_week: weekday_name(date.weekday()).to_string(),
                is_weekend: is_weekend(date),
                attendances,
                tally,
            }
        })
        .collect();

    Ok(AttendanceCalendar {
        year,
        month,
        month_name: month_name(month)?,
        start_date,
        end_date,
        total_attendances: selected.len(),
        days,
    })
}

fn count_status(records: &[AttendanceRecord], status: AttendanceStatus) -> usize {
    records.iter().filter(|r| r.has_status(status)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn attendance(
        id: u64,
        employee_id: u64,
        date: &str,
        status: Option<AttendanceStatus>,
    ) -> AttendanceRecord {
        let now = Utc::now();
        AttendanceRecord {
            id,
            employee_id,
            date: make_date(date),
            check_in: Some("09:00".to_string()),
            check_out: Some("17:30".to_string()),
            break_duration: None,
            status,
            overtime_hours: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_parse_clock_time_formats() {
        assert_eq!(parse_clock_time("9:00").unwrap(), dec("9"));
        assert_eq!(parse_clock_time("09:45").unwrap(), dec("9.75"));
        assert_eq!(parse_clock_time("17:30:59.123").unwrap(), dec("17.5"));
    }

    #[test]
    fn test_parse_clock_time_accepts_fractional_minutes() {
        assert_eq!(parse_clock_time("9:30.5").unwrap(), dec("570.5") / dec("60"));
        assert_eq!(parse_clock_time("7.5:00").unwrap(), dec("7.5"));
    }

    #[test]
    fn test_parse_clock_time_rejects_out_of_range_values() {
        let input = "79228162514264337593543950335:00";
        match parse_clock_time(input) {
            Err(EngineError::ParseFailure { input: reported, .. }) => assert_eq!(reported, input),
            other => panic!("Expected ParseFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_clock_time_reports_failures() {
        for input in ["", "9", "nine:00", "9:xx", ":30"] {
            match parse_clock_time(input) {
                Err(EngineError::ParseFailure { input: reported, .. }) => {
                    assert_eq!(reported, input)
                }
                other => panic!("Expected ParseFailure for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_hours_worked_full_day() {
        assert_eq!(hours_worked(Some("09:00"), Some("17:30")), dec("8.5"));
    }

    #[test]
    fn test_hours_worked_clamps_negative_to_zero() {
        assert_eq!(hours_worked(Some("18:00"), Some("09:00")), Decimal::ZERO);
    }

    #[test]
    fn test_hours_worked_is_zero_for_missing_or_malformed_input() {
        assert_eq!(hours_worked(None, Some("17:00")), Decimal::ZERO);
        assert_eq!(hours_worked(Some("09:00"), None), Decimal::ZERO);
        assert_eq!(hours_worked(Some("9am"), Some("17:00")), Decimal::ZERO);
        assert_eq!(hours_worked(Some("09:00"), Some("")), Decimal::ZERO);
    }

    #[test]
    fn test_hours_worked_is_zero_for_huge_clock_values() {
        assert_eq!(
            hours_worked(Some("9223372036854775807:00"), Some("10:00")),
            Decimal::ZERO
        );
        assert_eq!(
            hours_worked(Some("10:00"), Some("79228162514264337593543950335:00")),
            Decimal::ZERO
        );
        assert_eq!(
            hours_worked(
                Some("-1000000000000000000000000000:00"),
                Some("1000000000000000000000000000:00")
            ),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_attendance_rate_seventy_percent() {
        let mut records: Vec<AttendanceRecord> = (1..=7)
            .map(|i| attendance(i, 1, "2024-03-01", Some(AttendanceStatus::Present)))
            .collect();
        records.push(attendance(8, 1, "2024-03-02", Some(AttendanceStatus::Absent)));
        records.push(attendance(9, 1, "2024-03-03", Some(AttendanceStatus::Late)));
        records.push(attendance(10, 1, "2024-03-04", None));

        let summary = summarize_attendance(&records).unwrap();

        assert_eq!(summary.total_days, 10);
        assert_eq!(summary.present_days, 7);
        assert_eq!(summary.absent_days, 1);
        assert_eq!(summary.late_days, 1);
        assert_eq!(summary.attendance_rate, dec("70"));
    }

    #[test]
    fn test_empty_summary_is_all_zero() {
        let summary = summarize_attendance(&[]).unwrap();
        assert_eq!(summary, AttendanceSummary::default());
        assert_eq!(summary.attendance_rate, Decimal::ZERO);
    }

    #[test]
    fn test_summary_hours_and_overtime() {
        let mut first = attendance(1, 1, "2024-03-01", Some(AttendanceStatus::Present));
        first.overtime_hours = Some(dec("1.5"));
        let mut second = attendance(2, 1, "2024-03-02", Some(AttendanceStatus::HalfDay));
        second.check_out = Some("13:00".to_string());
        second.overtime_hours = Some(dec("0.5"));
        let mut third = attendance(3, 1, "2024-03-03", Some(AttendanceStatus::Present));
        third.check_in = Some("garbage".to_string());

        let summary = summarize_attendance(&[first, second, third]).unwrap();

        assert_eq!(summary.half_days, 1);
        assert_eq!(summary.total_hours, dec("12.5"));
        assert_eq!(summary.total_overtime_hours, dec("2"));
        assert_eq!(summary.average_overtime_hours.round_dp(4), dec("0.6667"));
    }

    #[test]
    fn test_summary_rejects_overtime_overflow() {
        let mut first = attendance(1, 1, "2024-03-01", Some(AttendanceStatus::Present));
        first.overtime_hours = Some(Decimal::MAX);
        let mut second = attendance(2, 1, "2024-03-02", Some(AttendanceStatus::Present));
        second.overtime_hours = Some(Decimal::MAX);

        match summarize_attendance(&[first, second]) {
            Err(EngineError::InvalidRecord { field, .. }) => {
                assert_eq!(field, "total_overtime_hours")
            }
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_in_month_prefix_match() {
        let record = attendance(1, 1, "2024-03-09", None);
        assert!(in_month(&record, "2024-03"));
        assert!(!in_month(&record, "2024-04"));
    }

    #[test]
    fn test_attendance_calendar_places_records_on_days() {
        let records = vec![
            attendance(1, 1, "2026-02-02", Some(AttendanceStatus::Present)),
            attendance(2, 2, "2026-02-02", Some(AttendanceStatus::Late)),
            attendance(3, 1, "2026-02-07", Some(AttendanceStatus::HalfDay)),
            attendance(4, 1, "2026-03-01", Some(AttendanceStatus::Present)),
        ];

        let calendar = build_attendance_calendar(2026, 2, &records, None).unwrap();

        assert_eq!(calendar.month_name, "FEBRUARY");
        assert_eq!(calendar.days.len(), 28);
        assert_eq!(calendar.total_attendances, 3);

        let monday = &calendar.days[1];
        assert_eq!(monday.date, make_date("2026-02-02"));
        assert_eq!(monday.day_of_week, "MONDAY");
        assert!(!monday.is_weekend);
        assert_eq!(monday.attendances.len(), 2);
        assert_eq!(monday.tally.present, 1);
        assert_eq!(monday.tally.late, 1);

        let saturday = &calendar.days[6];
        assert!(saturday.is_weekend);
        assert_eq!(saturday.tally.half_day, 1);
    }

    #[test]
    fn test_attendance_calendar_employee_filter() {
        let records = vec![
            attendance(1, 1, "2026-02-02", Some(AttendanceStatus::Present)),
            attendance(2, 2, "2026-02-02", Some(AttendanceStatus::Absent)),
        ];

        let calendar = build_attendance_calendar(2026, 2, &records, Some(2)).unwrap();

        assert_eq!(calendar.total_attendances, 1);
        assert_eq!(calendar.days[1].tally.absent, 1);
        assert_eq!(calendar.days[1].tally.present, 0);
    }

    #[test]
    fn test_attendance_calendar_rejects_bad_month() {
        assert!(build_attendance_calendar(2026, 13, &[], None).is_err());
    }
}
