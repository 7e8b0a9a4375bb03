//! Attendance operations: records, check-in/out, summaries, reports and
//! calendars.

use chrono::{Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculation::{
    build_attendance_calendar, generate_attendance_report, in_month, monthly_attendance_summaries,
    record_hours, summarize_attendance, validate_date_range, AttendanceCalendar, AttendanceReport,
    AttendanceSummary, MonthlyAttendanceSummary,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus};
use crate::store::{MemoryStore, Tables};

use super::{assign, assign_opt, require_employee, today};

const CLOCK_FORMAT: &str = "%H:%M:%S";

/// Fields accepted when creating an attendance record.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceInput {
    /// The employee; must exist.
    pub employee_id: u64,
    /// The date attended; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Check-in time text.
    #[serde(default)]
    pub check_in: Option<String>,
    /// Check-out time text.
    #[serde(default)]
    pub check_out: Option<String>,
    /// Break length in minutes.
    #[serde(default)]
    pub break_duration: Option<u32>,
    /// Attendance status.
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
    /// Overtime hours.
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    /// Notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fields accepted when updating an attendance record; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceUpdate {
    /// Re-point the record at another employee; must exist.
    pub employee_id: Option<u64>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New check-in time text.
    pub check_in: Option<String>,
    /// New check-out time text.
    pub check_out: Option<String>,
    /// New break length.
    pub break_duration: Option<u32>,
    /// New status.
    pub status: Option<AttendanceStatus>,
    /// New overtime hours.
    pub overtime_hours: Option<Decimal>,
    /// New notes.
    pub notes: Option<String>,
}

/// Body of a check-in request.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckInInput {
    /// The employee checking in.
    pub employee_id: u64,
}

/// An attendance record with the employee's name and hours worked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceView {
    /// The stored record.
    #[serde(flatten)]
    pub attendance: AttendanceRecord,
    /// "first last" of the employee.
    pub employee_name: Option<String>,
    /// Check-in to check-out hours; zero when unparseable.
    pub hours_worked: Decimal,
}

/// One employee's attendance summary, optionally restricted to a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeAttendanceOverview {
    /// The employee.
    pub employee_id: u64,
    /// "first last" of the employee.
    pub employee_name: Option<String>,
    /// The `YYYY-MM` filter, if one was applied.
    pub month: Option<String>,
    /// Counts, rate and hours.
    #[serde(flatten)]
    pub summary: AttendanceSummary,
}

fn view(tables: &Tables, attendance: AttendanceRecord) -> AttendanceView {
    AttendanceView {
        employee_name: tables.employee_name(attendance.employee_id),
        hours_worked: record_hours(&attendance),
        attendance,
    }
}

fn views(tables: &Tables, records: Vec<AttendanceRecord>) -> Vec<AttendanceView> {
    records.into_iter().map(|r| view(tables, r)).collect()
}

fn attendance_not_found(id: u64) -> EngineError {
    EngineError::not_found("Attendance record", id)
}

/// Checks a `YYYY-MM` month filter.
///
/// The month must be zero-padded, since records are matched on their date
/// text prefix.
fn validate_month(month: &str) -> EngineResult<()> {
    let invalid = || EngineError::invalid_record("month", format!("'{}' is not YYYY-MM", month));
    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|_| invalid())?;
    if first.format("%Y-%m").to_string() != month {
        return Err(invalid());
    }
    Ok(())
}

fn clock_now() -> String {
    Local::now().format(CLOCK_FORMAT).to_string()
}

/// Creates an attendance record; the date defaults to today.
pub async fn create_attendance(
    store: &MemoryStore,
    input: AttendanceInput,
) -> EngineResult<AttendanceView> {
    let mut tables = store.write().await;
    require_employee(&tables, input.employee_id)?;

    let now = Utc::now();
    let record = tables.attendance.insert(AttendanceRecord {
        id: 0,
        employee_id: input.employee_id,
        date: input.date.unwrap_or_else(today),
        check_in: input.check_in,
        check_out: input.check_out,
        break_duration: input.break_duration,
        status: input.status,
        overtime_hours: input.overtime_hours,
        notes: input.notes,
        created_at: now,
        updated_at: now,
    });

    info!(
        attendance_id = record.id,
        employee_id = record.employee_id,
        date = %record.date,
        "Attendance recorded"
    );
    Ok(view(&tables, record))
}

/// Lists every attendance record.
pub async fn list_attendance(store: &MemoryStore) -> Vec<AttendanceView> {
    let tables = store.read().await;
    views(&tables, tables.attendance.all())
}

/// Fetches one attendance record.
pub async fn get_attendance(store: &MemoryStore, id: u64) -> EngineResult<AttendanceView> {
    let tables = store.read().await;
    let record = tables
        .attendance
        .get(id)
        .cloned()
        .ok_or_else(|| attendance_not_found(id))?;
    Ok(view(&tables, record))
}

/// Lists an employee's attendance records.
pub async fn attendance_by_employee(
    store: &MemoryStore,
    employee_id: u64,
) -> EngineResult<Vec<AttendanceView>> {
    let tables = store.read().await;
    require_employee(&tables, employee_id)?;
    let records = tables.attendance.filter(|r| r.employee_id == employee_id);
    Ok(views(&tables, records))
}

/// Lists records dated within `[start_date, end_date]`.
pub async fn attendance_in_range(
    store: &MemoryStore,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> EngineResult<Vec<AttendanceView>> {
    validate_date_range(start_date, end_date, "end_date")?;
    let tables = store.read().await;
    let records = tables
        .attendance
        .filter(|r| r.date >= start_date && r.date <= end_date);
    Ok(views(&tables, records))
}

/// Applies a partial update to an attendance record.
pub async fn update_attendance(
    store: &MemoryStore,
    id: u64,
    update: AttendanceUpdate,
) -> EngineResult<AttendanceView> {
    let mut tables = store.write().await;
    if let Some(employee_id) = update.employee_id {
        require_employee(&tables, employee_id)?;
    }

    let record = tables
        .attendance
        .get_mut(id)
        .ok_or_else(|| attendance_not_found(id))?;
    assign(&mut record.employee_id, update.employee_id);
    assign(&mut record.date, update.date);
    assign_opt(&mut record.check_in, update.check_in);
    assign_opt(&mut record.check_out, update.check_out);
    assign_opt(&mut record.break_duration, update.break_duration);
    assign_opt(&mut record.status, update.status);
    assign_opt(&mut record.overtime_hours, update.overtime_hours);
    assign_opt(&mut record.notes, update.notes);
    record.updated_at = Utc::now();
    let record = record.clone();

    info!(attendance_id = id, "Attendance updated");
    Ok(view(&tables, record))
}

/// Deletes an attendance record.
pub async fn delete_attendance(store: &MemoryStore, id: u64) -> EngineResult<()> {
    let mut tables = store.write().await;
    tables
        .attendance
        .remove(id)
        .ok_or_else(|| attendance_not_found(id))?;
    info!(attendance_id = id, "Attendance deleted");
    Ok(())
}

/// Creates a `Present` record for today stamped with the current time.
pub async fn check_in(store: &MemoryStore, employee_id: u64) -> EngineResult<AttendanceView> {
    let mut tables = store.write().await;
    require_employee(&tables, employee_id)?;

    let now = Utc::now();
    let record = tables.attendance.insert(AttendanceRecord {
        id: 0,
        employee_id,
        date: today(),
        check_in: Some(clock_now()),
        check_out: None,
        break_duration: None,
        status: Some(AttendanceStatus::Present),
        overtime_hours: None,
        notes: None,
        created_at: now,
        updated_at: now,
    });

    info!(attendance_id = record.id, employee_id, "Checked in");
    Ok(view(&tables, record))
}

/// Stamps the current time as check-out on an existing record.
pub async fn check_out(store: &MemoryStore, id: u64) -> EngineResult<AttendanceView> {
    let mut tables = store.write().await;
    let record = tables
        .attendance
        .get_mut(id)
        .ok_or_else(|| attendance_not_found(id))?;
    if record.check_out.is_some() {
        warn!(attendance_id = id, "Overwriting existing check-out");
    }
    record.check_out = Some(clock_now());
    record.updated_at = Utc::now();
    let record = record.clone();

    info!(attendance_id = id, employee_id = record.employee_id, "Checked out");
    Ok(view(&tables, record))
}

/// Summarizes one employee's attendance, optionally for a `YYYY-MM` month.
pub async fn attendance_summary(
    store: &MemoryStore,
    employee_id: u64,
    month: Option<String>,
) -> EngineResult<EmployeeAttendanceOverview> {
    if let Some(month) = month.as_deref() {
        validate_month(month)?;
    }

    let tables = store.read().await;
    let employee = require_employee(&tables, employee_id)?;
    let summary = summarize_attendance(tables.attendance.values().filter(|r| {
        r.employee_id == employee_id && month.as_deref().is_none_or(|m| in_month(r, m))
    }))?;

    Ok(EmployeeAttendanceOverview {
        employee_id,
        employee_name: Some(employee.full_name()),
        month,
        summary,
    })
}

/// Summarizes every employee's attendance for a `YYYY-MM` month.
pub async fn monthly_summary(
    store: &MemoryStore,
    month: &str,
) -> EngineResult<Vec<MonthlyAttendanceSummary>> {
    validate_month(month)?;
    let tables = store.read().await;
    monthly_attendance_summaries(month, &tables.attendance.all(), &tables.employee_names())
}

/// Builds the attendance report for `[start_date, end_date]`.
pub async fn attendance_report(
    store: &MemoryStore,
    start_date: NaiveDate,
    end_date: NaiveDate,
    employee_id: Option<u64>,
) -> EngineResult<AttendanceReport> {
    let tables = store.read().await;
    if let Some(id) = employee_id {
        require_employee(&tables, id)?;
    }

    let report = generate_attendance_report(
        start_date,
        end_date,
        &tables.attendance.all(),
        employee_id,
        &tables.employee_names(),
    )?;
    info!(
        %start_date,
        %end_date,
        total_employees = report.total_employees,
        "Attendance report generated"
    );
    Ok(report)
}

/// Builds the attendance calendar for a month.
pub async fn attendance_calendar(
    store: &MemoryStore,
    year: i32,
    month: u32,
    employee_id: Option<u64>,
) -> EngineResult<AttendanceCalendar> {
    let tables = store.read().await;
    if let Some(id) = employee_id {
        require_employee(&tables, id)?;
    }
    build_attendance_calendar(year, month, &tables.attendance.all(), employee_id)
}
