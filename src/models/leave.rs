//! Leave request models.
//!
//! This module contains the [`LeaveRecord`] type together with the
//! [`LeaveType`] and [`LeaveStatus`] enums. A leave record covers an
//! inclusive span of calendar dates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calculation::days_between_inclusive;
use crate::error::{EngineError, EngineResult};

/// The kind of leave being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Annual (vacation) leave.
    Annual,
    /// Sick leave.
    Sick,
    /// Personal leave.
    Personal,
    /// Maternity leave.
    Maternity,
    /// Paternity leave.
    Paternity,
    /// Unpaid leave; carries no allowance.
    Unpaid,
}

impl LeaveType {
    /// Every leave type, in declaration order.
    pub const ALL: [LeaveType; 6] = [
        LeaveType::Annual,
        LeaveType::Sick,
        LeaveType::Personal,
        LeaveType::Maternity,
        LeaveType::Paternity,
        LeaveType::Unpaid,
    ];
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveType::Annual => write!(f, "annual"),
            LeaveType::Sick => write!(f, "sick"),
            LeaveType::Personal => write!(f, "personal"),
            LeaveType::Maternity => write!(f, "maternity"),
            LeaveType::Paternity => write!(f, "paternity"),
            LeaveType::Unpaid => write!(f, "unpaid"),
        }
    }
}

/// Approval state of a leave request.
///
/// Requests start as `Pending` and move once, to either `Approved` or
/// `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; counts against the employee's balance.
    Approved,
    /// Rejected.
    Rejected,
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "pending"),
            LeaveStatus::Approved => write!(f, "approved"),
            LeaveStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for LeaveStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(LeaveStatus::Pending),
            "approved" => Ok(LeaveStatus::Approved),
            "rejected" => Ok(LeaveStatus::Rejected),
            _ => Err(EngineError::invalid_record(
                "status",
                format!("unknown leave status '{}'", s),
            )),
        }
    }
}

/// A leave request for an inclusive range of dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// Store-assigned identifier.
    pub id: u64,
    /// The employee taking leave.
    pub employee_id: u64,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive); never before `start_date`.
    pub end_date: NaiveDate,
    /// Optional reason given by the employee.
    #[serde(default)]
    pub reason: Option<String>,
    /// Current approval state.
    pub status: LeaveStatus,
    /// The employee who approved the request.
    #[serde(default)]
    pub approved_by: Option<u64>,
    /// When the request was approved.
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    /// Comments recorded when the request was rejected.
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

impl LeaveRecord {
    /// Returns the number of days covered, counting both ends.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_engine::models::{LeaveRecord, LeaveStatus, LeaveType};
    /// use chrono::{NaiveDate, Utc};
    ///
    /// let leave = LeaveRecord {
    ///     id: 1,
    ///     employee_id: 1,
    ///     leave_type: LeaveType::Annual,
    ///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
    ///     reason: None,
    ///     status: LeaveStatus::Approved,
    ///     approved_by: None,
    ///     approved_at: None,
    ///     rejection_reason: None,
    ///     created_at: Utc::now(),
    ///     updated_at: Utc::now(),
    /// };
    /// assert_eq!(leave.days(), 3);
    /// ```
    pub fn days(&self) -> i64 {
        days_between_inclusive(self.start_date, self.end_date)
    }

    /// Returns true if the record has been approved.
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    /// Returns true if `date` falls inside the inclusive leave span.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if the leave span shares at least one day with the
    /// inclusive window `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }

    /// Returns true if the leave starts inside the inclusive window
    /// `[start, end]`, wherever it ends.
    pub fn starts_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date >= start && self.start_date <= end
    }

    /// Approves a pending request, recording the approver and time.
    ///
    /// Returns `InvalidState` if the request has already been decided.
    pub fn approve(&mut self, approver_id: u64, at: DateTime<Utc>) -> EngineResult<()> {
        self.ensure_pending()?;
        self.status = LeaveStatus::Approved;
        self.approved_by = Some(approver_id);
        self.approved_at = Some(at);
        self.updated_at = at;
        Ok(())
    }

    /// Rejects a pending request, recording the reviewer's comments.
    ///
    /// Returns `InvalidState` if the request has already been decided.
    pub fn reject(&mut self, comments: Option<String>, at: DateTime<Utc>) -> EngineResult<()> {
        self.ensure_pending()?;
        self.status = LeaveStatus::Rejected;
        self.rejection_reason = comments;
        self.updated_at = at;
        Ok(())
    }

    fn ensure_pending(&self) -> EngineResult<()> {
        if self.status != LeaveStatus::Pending {
            return Err(EngineError::invalid_state(format!(
                "Leave request is already {}",
                self.status
            )));
        }
        Ok(())
    }
}
