//! Leave ledger calculation.
//!
//! This module computes, for one employee and one year, how many days of
//! each leave type have been used against the yearly allowance.
//!
//! A record belongs to the year its start date falls in and contributes its
//! full span there. Spans are NOT clipped: a Dec 20 - Jan 5 record counts
//! 17 days against the first year and nothing against the second.
//! Remaining balances are not clamped and go negative when usage exceeds
//! the allowance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::LeaveAllowances;
use crate::error::EngineResult;
use crate::models::{LeaveRecord, LeaveType};

use super::calendar::year_bounds;

/// Allowance and usage for one leave type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeBalance {
    /// Yearly allowance in days.
    pub total: u32,
    /// Days used by approved leave.
    pub used: i64,
    /// `total - used`; may be negative.
    pub remaining: i64,
}

impl LeaveTypeBalance {
    fn new(total: u32, used: i64) -> Self {
        Self {
            total,
            used,
            remaining: i64::from(total) - used,
        }
    }
}

/// Per-type leave balances for one employee and one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The employee the balance belongs to.
    pub employee_id: u64,
    /// The calendar year the balance covers.
    pub year: i32,
    /// Annual leave balance.
    pub annual_leave: LeaveTypeBalance,
    /// Sick leave balance.
    pub sick_leave: LeaveTypeBalance,
    /// Personal leave balance.
    pub personal_leave: LeaveTypeBalance,
    /// Maternity leave balance.
    pub maternity_leave: LeaveTypeBalance,
    /// Paternity leave balance.
    pub paternity_leave: LeaveTypeBalance,
}

impl LeaveBalance {
    /// Returns the balance for a leave type, or `None` for unpaid leave.
    pub fn for_type(&self, leave_type: LeaveType) -> Option<&LeaveTypeBalance> {
        match leave_type {
            LeaveType::Annual => Some(&self.annual_leave),
            LeaveType::Sick => Some(&self.sick_leave),
            LeaveType::Personal => Some(&self.personal_leave),
            LeaveType::Maternity => Some(&self.maternity_leave),
            LeaveType::Paternity => Some(&self.paternity_leave),
            LeaveType::Unpaid => None,
        }
    }
}

/// Sums approved leave days per type for the records starting in a window.
///
/// Only approved records whose start date lies in
/// `[window_start, window_end]` are counted; each contributes its full
/// inclusive span.
pub fn used_days_by_type(
    records: &[LeaveRecord],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> [(LeaveType, i64); 6] {
    let mut used = LeaveType::ALL.map(|leave_type| (leave_type, 0i64));
    for record in records
        .iter()
        .filter(|r| r.is_approved() && r.starts_within(window_start, window_end))
    {
        if let Some(entry) = used.iter_mut().find(|(t, _)| *t == record.leave_type) {
            entry.1 += record.days();
        }
    }
    used
}

/// Calculates an employee's leave balance for a calendar year.
///
/// # Arguments
///
/// * `employee_id` - The employee the records belong to
/// * `year` - The calendar year to report on
/// * `records` - The employee's leave records; records starting outside
///   the year and non-approved records are ignored
/// * `allowances` - The yearly allowance per leave type
///
/// # Errors
///
/// Returns `InvalidRecord` if `year` is outside the supported date range.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::calculate_leave_balance;
/// use hr_engine::config::LeaveAllowances;
///
/// let balance = calculate_leave_balance(1, 2024, &[], &LeaveAllowances::default()).unwrap();
/// assert_eq!(balance.annual_leave.total, 21);
/// assert_eq!(balance.annual_leave.used, 0);
/// ```
pub fn calculate_leave_balance(
    employee_id: u64,
    year: i32,
    records: &[LeaveRecord],
    allowances: &LeaveAllowances,
) -> EngineResult<LeaveBalance> {
    let (start, end) = year_bounds(year)?;
    let used = used_days_by_type(records, start, end);
    let used_for = |leave_type: LeaveType| {
        used.iter()
            .find(|(t, _)| *t == leave_type)
            .map(|(_, days)| *days)
            .unwrap_or(0)
    };

    Ok(LeaveBalance {
        employee_id,
        year,
        annual_leave: LeaveTypeBalance::new(allowances.annual, used_for(LeaveType::Annual)),
        sick_leave: LeaveTypeBalance::new(allowances.sick, used_for(LeaveType::Sick)),
        personal_leave: LeaveTypeBalance::new(allowances.personal, used_for(LeaveType::Personal)),
        maternity_leave: LeaveTypeBalance::new(
            allowances.maternity,
            used_for(LeaveType::Maternity),
        ),
        paternity_leave: LeaveTypeBalance::new(
            allowances.paternity,
            used_for(LeaveType::Paternity),
        ),
    })
}
