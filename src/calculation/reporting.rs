//! Reporting aggregation.
//!
//! Composes per-employee breakdowns over a date range for leave and
//! attendance, the per-employee monthly attendance summary, and the
//! month-shaped leave calendar.
//!
//! Report functions take the records already fetched from the store plus a
//! map of employee id to display name. An id with no name in the map is
//! reported with `employee_name: null` rather than failing the report.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, LeaveRecord, LeaveStatus, LeaveType};

use super::attendance::{in_month, summarize_attendance, weekday_name, AttendanceSummary};
use super::calendar::{dates_in_range, is_weekend, month_bounds, month_name, validate_date_range};

/// Employee id to display name.
pub type EmployeeNames = HashMap<u64, String>;

/// Request counts per leave status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeaveStatusTally {
    /// All requests counted.
    pub total_requests: usize,
    /// Approved requests.
    pub approved: usize,
    /// Pending requests.
    pub pending: usize,
    /// Rejected requests.
    pub rejected: usize,
}

impl LeaveStatusTally {
    fn add(&mut self, status: LeaveStatus) {
        self.total_requests += 1;
        match status {
            LeaveStatus::Approved => self.approved += 1,
            LeaveStatus::Pending => self.pending += 1,
            LeaveStatus::Rejected => self.rejected += 1,
        }
    }
}

/// One employee's line in a [`LeaveReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeLeaveSummary {
    /// The employee.
    pub employee_id: u64,
    /// "first last", if the employee is known.
    pub employee_name: Option<String>,
    /// Request counts per status.
    #[serde(flatten)]
    pub tally: LeaveStatusTally,
    /// Sum of inclusive day spans of approved requests.
    pub total_days: i64,
}

/// Leave requests over a date range, in total and per employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveReport {
    /// Start of the reporting window.
    pub start_date: NaiveDate,
    /// End of the reporting window.
    pub end_date: NaiveDate,
    /// Counts across every selected request.
    #[serde(flatten)]
    pub tally: LeaveStatusTally,
    /// Per-employee lines, ordered by employee id.
    pub employee_breakdown: Vec<EmployeeLeaveSummary>,
}

/// Builds the leave report for `[start_date, end_date]`.
///
/// Requests starting inside the window are selected, optionally narrowed to
/// one employee. Approved day totals use the full, unclipped span of each
/// request.
pub fn generate_leave_report(
    start_date: NaiveDate,
    end_date: NaiveDate,
    records: &[LeaveRecord],
    employee_id: Option<u64>,
    names: &EmployeeNames,
) -> EngineResult<LeaveReport> {
    validate_date_range(start_date, end_date, "end_date")?;

    let mut tally = LeaveStatusTally::default();
    let mut per_employee: BTreeMap<u64, (LeaveStatusTally, i64)> = BTreeMap::new();

    for record in records
        .iter()
        .filter(|r| r.starts_within(start_date, end_date))
        .filter(|r| employee_id.is_none_or(|id| r.employee_id == id))
    {
        tally.add(record.status);
        let entry = per_employee.entry(record.employee_id).or_default();
        entry.0.add(record.status);
        if record.is_approved() {
            entry.1 += record.days();
        }
    }

    let employee_breakdown = per_employee
        .into_iter()
        .map(|(id, (tally, total_days))| EmployeeLeaveSummary {
            employee_id: id,
            employee_name: names.get(&id).cloned(),
            tally,
            total_days,
        })
        .collect();

    Ok(LeaveReport {
        start_date,
        end_date,
        tally,
        employee_breakdown,
    })
}

/// Approved leave counts per leave type; every type is always present.
pub type LeaveTypeTally = BTreeMap<LeaveType, usize>;

fn empty_type_tally() -> LeaveTypeTally {
    LeaveType::ALL.iter().map(|t| (*t, 0)).collect()
}

/// One calendar day and the approved leave covering it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveCalendarDay {
    /// The date.
    pub date: NaiveDate,
    /// Upper-case weekday name.
    pub day_of_week: String,
    /// True on Saturdays and Sundays.
    pub is_weekend: bool,
    /// Approved requests whose span covers this date.
    pub leaves: Vec<LeaveRecord>,
    /// Count of `leaves` per leave type.
    pub tally: LeaveTypeTally,
}

/// A month of leave laid out day by day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveCalendar {
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
    /// Requests touching the month, whatever their status.
    pub total_leaves: usize,
    /// One entry per day of the month.
    pub days: Vec<LeaveCalendarDay>,
}

/// Builds the leave calendar for a month.
///
/// Requests spanning several months are walked day by day, so a request
/// from Jan 30 to Feb 2 appears on Feb 1 and Feb 2 of the February
/// calendar.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::build_leave_calendar;
///
/// let calendar = build_leave_calendar(2024, 2, &[], None).unwrap();
/// assert_eq!(calendar.month_name, "FEBRUARY");
/// assert_eq!(calendar.days.len(), 29);
/// ```
pub fn build_leave_calendar(
    year: i32,
    month: u32,
    records: &[LeaveRecord],
    employee_id: Option<u64>,
) -> EngineResult<LeaveCalendar> {
    let (start_date, end_date) = month_bounds(year, month)?;
    let selected: Vec<&LeaveRecord> = records
        .iter()
        .filter(|r| r.overlaps(start_date, end_date))
        .filter(|r| employee_id.is_none_or(|id| r.employee_id == id))
        .collect();

    let days = dates_in_range(start_date, end_date)
        .map(|date| {
            let leaves: Vec<LeaveRecord> = selected
                .iter()
                .filter(|r| r.is_approved() && r.covers(date))
                .map(|r| (*r).clone())
                .collect();
            let mut tally = empty_type_tally();
            for leave in &leaves {
                *tally.entry(leave.leave_type).or_default() += 1;
            }
            LeaveCalendarDay {
                date,
                day_of_week: weekday_name(date.weekday()).to_string(),
                is_weekend: is_weekend(date),
                leaves,
                tally,
            }
        })
        .collect();

    Ok(LeaveCalendar {
        year,
        month,
        month_name: month_name(month)?,
        start_date,
        end_date,
        total_leaves: selected.len(),
        days,
    })
}

/// One employee's line in an [`AttendanceReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeAttendanceSummary {
    /// The employee.
    pub employee_id: u64,
    /// "first last", if the employee is known.
    pub employee_name: Option<String>,
    /// Counts, rate and hours for this employee.
    #[serde(flatten)]
    pub summary: AttendanceSummary,
}

/// Attendance over a date range, in total and per employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceReport {
    /// Start of the reporting window.
    pub start_date: NaiveDate,
    /// End of the reporting window.
    pub end_date: NaiveDate,
    /// Distinct employees with at least one record in the window.
    pub total_employees: usize,
    /// Counts, rate and hours across every selected record.
    #[serde(flatten)]
    pub summary: AttendanceSummary,
    /// Per-employee lines, ordered by employee id.
    pub employee_breakdown: Vec<EmployeeAttendanceSummary>,
}

fn group_by_employee<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
) -> BTreeMap<u64, Vec<&'a AttendanceRecord>> {
    let mut grouped: BTreeMap<u64, Vec<&AttendanceRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.employee_id).or_default().push(record);
    }
    grouped
}

/// Builds the attendance report for `[start_date, end_date]`.
pub fn generate_attendance_report(
    start_date: NaiveDate,
    end_date: NaiveDate,
    records: &[AttendanceRecord],
    employee_id: Option<u64>,
    names: &EmployeeNames,
) -> EngineResult<AttendanceReport> {
    validate_date_range(start_date, end_date, "end_date")?;

    let selected: Vec<&AttendanceRecord> = records
        .iter()
        .filter(|r| r.date >= start_date && r.date <= end_date)
        .filter(|r| employee_id.is_none_or(|id| r.employee_id == id))
        .collect();

    let employee_breakdown = group_by_employee(selected.iter().copied())
        .into_iter()
        .map(|(id, rows)| {
            Ok(EmployeeAttendanceSummary {
                employee_id: id,
                employee_name: names.get(&id).cloned(),
                summary: summarize_attendance(rows)?,
            })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    Ok(AttendanceReport {
        start_date,
        end_date,
        total_employees: employee_breakdown.len(),
        summary: summarize_attendance(selected)?,
        employee_breakdown,
    })
}

/// One employee's attendance for a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAttendanceSummary {
    /// The employee.
    pub employee_id: u64,
    /// "first last", if the employee is known.
    pub employee_name: Option<String>,
    /// The `YYYY-MM` month the summary covers.
    pub month: String,
    /// Counts, rate and hours for the month.
    #[serde(flatten)]
    pub summary: AttendanceSummary,
}

/// Summarizes each employee's attendance for the month `month` (`YYYY-MM`).
///
/// A record belongs to the month when its date text starts with `month`.
pub fn monthly_attendance_summaries(
    month: &str,
    records: &[AttendanceRecord],
    names: &EmployeeNames,
) -> EngineResult<Vec<MonthlyAttendanceSummary>> {
    group_by_employee(records.iter().filter(|r| in_month(r, month)))
        .into_iter()
        .map(|(id, rows)| {
            Ok(MonthlyAttendanceSummary {
                employee_id: id,
                employee_name: names.get(&id).cloned(),
                month: month.to_string(),
                summary: summarize_attendance(rows)?,
            })
        })
        .collect()
}

/// Sums overtime hours across a set of attendance records.
///
/// Returns `InvalidRecord` if the sum overflows.
pub fn total_overtime_hours(records: &[AttendanceRecord]) -> EngineResult<Decimal> {
    records
        .iter()
        .try_fold(Decimal::ZERO, |total, r| total.checked_add(r.overtime_or_zero()))
        .ok_or_else(|| EngineError::invalid_record("overtime_hours", "hour total out of range"))
}
