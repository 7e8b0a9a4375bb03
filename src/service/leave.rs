//! Leave operations: requests, approval, balances, reports and calendars.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculation::{
    build_leave_calendar, calculate_leave_balance, generate_leave_report, validate_date_range,
    LeaveBalance, LeaveCalendar, LeaveReport,
};
use crate::config::LeaveAllowances;
use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveRecord, LeaveStatus, LeaveType};
use crate::store::{MemoryStore, Tables};

use super::{current_year, require_employee};

/// Fields accepted when requesting leave.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveInput {
    /// The employee taking leave; must exist.
    pub employee_id: u64,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave; not before `start_date`.
    pub end_date: NaiveDate,
    /// Reason given by the employee.
    #[serde(default)]
    pub reason: Option<String>,
}

/// A leave request with the names and day count clients display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveView {
    /// The stored request.
    #[serde(flatten)]
    pub leave: LeaveRecord,
    /// "first last" of the employee taking leave.
    pub employee_name: Option<String>,
    /// "first last" of the approver.
    pub approved_by_name: Option<String>,
    /// Inclusive day count.
    pub days: i64,
}

fn view(tables: &Tables, leave: LeaveRecord) -> LeaveView {
    LeaveView {
        employee_name: tables.employee_name(leave.employee_id),
        approved_by_name: leave.approved_by.and_then(|id| tables.employee_name(id)),
        days: leave.days(),
        leave,
    }
}

fn views(tables: &Tables, leaves: Vec<LeaveRecord>) -> Vec<LeaveView> {
    leaves.into_iter().map(|l| view(tables, l)).collect()
}

fn leave_not_found(id: u64) -> EngineError {
    EngineError::not_found("Leave request", id)
}

/// Records a new leave request in the `pending` state.
pub async fn create_leave(store: &MemoryStore, input: LeaveInput) -> EngineResult<LeaveView> {
    validate_date_range(input.start_date, input.end_date, "end_date")?;

    let mut tables = store.write().await;
    require_employee(&tables, input.employee_id)?;

    let now = Utc::now();
    let leave = tables.leave.insert(LeaveRecord {
        id: 0,
        employee_id: input.employee_id,
        leave_type: input.leave_type,
        start_date: input.start_date,
        end_date: input.end_date,
        reason: input.reason,
        status: LeaveStatus::Pending,
        approved_by: None,
        approved_at: None,
        rejection_reason: None,
        created_at: now,
        updated_at: now,
    });

    info!(
        leave_id = leave.id,
        employee_id = leave.employee_id,
        leave_type = %leave.leave_type,
        days = leave.days(),
        "Leave requested"
    );
    Ok(view(&tables, leave))
}

/// Lists every leave request.
pub async fn list_leave(store: &MemoryStore) -> Vec<LeaveView> {
    let tables = store.read().await;
    views(&tables, tables.leave.all())
}

/// Fetches one leave request.
pub async fn get_leave(store: &MemoryStore, id: u64) -> EngineResult<LeaveView> {
    let tables = store.read().await;
    let leave = tables.leave.get(id).cloned().ok_or_else(|| leave_not_found(id))?;
    Ok(view(&tables, leave))
}

/// Lists an employee's leave requests.
pub async fn leave_by_employee(store: &MemoryStore, employee_id: u64) -> EngineResult<Vec<LeaveView>> {
    let tables = store.read().await;
    require_employee(&tables, employee_id)?;
    let leaves = tables.leave.filter(|l| l.employee_id == employee_id);
    Ok(views(&tables, leaves))
}

/// Lists leave requests in a given state.
pub async fn leave_by_status(store: &MemoryStore, status: LeaveStatus) -> Vec<LeaveView> {
    let tables = store.read().await;
    let leaves = tables.leave.filter(|l| l.status == status);
    views(&tables, leaves)
}

/// Lists requests awaiting a decision.
pub async fn pending_leave(store: &MemoryStore) -> Vec<LeaveView> {
    leave_by_status(store, LeaveStatus::Pending).await
}

/// Approves a pending request on behalf of `approver_id`.
pub async fn approve_leave(store: &MemoryStore, id: u64, approver_id: u64) -> EngineResult<LeaveView> {
    let mut tables = store.write().await;
    if !tables.employees.contains(approver_id) {
        return Err(EngineError::not_found("Approving employee", approver_id));
    }

    let leave = tables.leave.get_mut(id).ok_or_else(|| leave_not_found(id))?;
    if let Err(error) = leave.approve(approver_id, Utc::now()) {
        warn!(leave_id = id, status = %leave.status, "Leave approval rejected");
        return Err(error);
    }
    let leave = leave.clone();

    info!(leave_id = id, approved_by = approver_id, "Leave approved");
    Ok(view(&tables, leave))
}

/// Rejects a pending request, recording optional comments.
pub async fn reject_leave(
    store: &MemoryStore,
    id: u64,
    comments: Option<String>,
) -> EngineResult<LeaveView> {
    let mut tables = store.write().await;
    let leave = tables.leave.get_mut(id).ok_or_else(|| leave_not_found(id))?;
    if let Err(error) = leave.reject(comments, Utc::now()) {
        warn!(leave_id = id, status = %leave.status, "Leave rejection refused");
        return Err(error);
    }
    let leave = leave.clone();

    info!(leave_id = id, "Leave rejected");
    Ok(view(&tables, leave))
}

/// Deletes a leave request.
pub async fn delete_leave(store: &MemoryStore, id: u64) -> EngineResult<()> {
    let mut tables = store.write().await;
    tables.leave.remove(id).ok_or_else(|| leave_not_found(id))?;
    info!(leave_id = id, "Leave deleted");
    Ok(())
}

/// Computes an employee's leave balance for `year` (default: current year).
pub async fn leave_balance(
    store: &MemoryStore,
    employee_id: u64,
    year: Option<i32>,
    allowances: &LeaveAllowances,
) -> EngineResult<LeaveBalance> {
    let tables = store.read().await;
    require_employee(&tables, employee_id)?;

    let year = year.unwrap_or_else(current_year);
    let records = tables.leave.filter(|l| l.employee_id == employee_id);
    calculate_leave_balance(employee_id, year, &records, allowances)
}

/// Builds the leave report for `[start_date, end_date]`.
pub async fn leave_report(
    store: &MemoryStore,
    start_date: NaiveDate,
    end_date: NaiveDate,
    employee_id: Option<u64>,
) -> EngineResult<LeaveReport> {
    let tables = store.read().await;
    if let Some(id) = employee_id {
        require_employee(&tables, id)?;
    }

    let report = generate_leave_report(
        start_date,
        end_date,
        &tables.leave.all(),
        employee_id,
        &tables.employee_names(),
    )?;
    info!(
        %start_date,
        %end_date,
        total_requests = report.tally.total_requests,
        "Leave report generated"
    );
    Ok(report)
}

/// Builds the leave calendar for a month.
pub async fn leave_calendar(
    store: &MemoryStore,
    year: i32,
    month: u32,
    employee_id: Option<u64>,
) -> EngineResult<LeaveCalendar> {
    let tables = store.read().await;
    if let Some(id) = employee_id {
        require_employee(&tables, id)?;
    }
    build_leave_calendar(year, month, &tables.leave.all(), employee_id)
}
