//! Attendance models.
//!
//! Check-in and check-out times are stored as free text exactly as they
//! were submitted; they are only interpreted when hours are aggregated.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Attendance status for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Worked a normal day.
    #[serde(alias = "present")]
    Present,
    /// Did not attend.
    #[serde(alias = "absent")]
    Absent,
    /// Arrived late.
    #[serde(alias = "late")]
    Late,
    /// Worked half a day.
    #[serde(rename = "Half-day", alias = "half_day", alias = "half-day")]
    HalfDay,
    /// On approved leave.
    #[serde(alias = "leave")]
    Leave,
    /// Worked overtime.
    #[serde(alias = "overtime")]
    Overtime,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "Present"),
            AttendanceStatus::Absent => write!(f, "Absent"),
            AttendanceStatus::Late => write!(f, "Late"),
            AttendanceStatus::HalfDay => write!(f, "Half-day"),
            AttendanceStatus::Leave => write!(f, "Leave"),
            AttendanceStatus::Overtime => write!(f, "Overtime"),
        }
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "late" => Ok(AttendanceStatus::Late),
            "half-day" | "half_day" => Ok(AttendanceStatus::HalfDay),
            "leave" => Ok(AttendanceStatus::Leave),
            "overtime" => Ok(AttendanceStatus::Overtime),
            _ => Err(EngineError::invalid_record(
                "status",
                format!("unknown attendance status '{}'", s),
            )),
        }
    }
}

/// One employee's attendance on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Store-assigned identifier.
    pub id: u64,
    /// The employee this record belongs to.
    pub employee_id: u64,
    /// The calendar date attended.
    pub date: NaiveDate,
    /// Check-in time as submitted (e.g. "09:00").
    #[serde(default)]
    pub check_in: Option<String>,
    /// Check-out time as submitted (e.g. "17:30").
    #[serde(default)]
    pub check_out: Option<String>,
    /// Break length in minutes.
    #[serde(default)]
    pub break_duration: Option<u32>,
    /// Attendance status, if one was recorded.
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
    /// Overtime hours worked on this date.
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// Returns true if the record carries the given status.
    pub fn has_status(&self, status: AttendanceStatus) -> bool {
        self.status == Some(status)
    }

    /// Overtime hours, treating an absent value as zero.
    pub fn overtime_or_zero(&self) -> Decimal {
        self.overtime_hours.unwrap_or(Decimal::ZERO)
    }
}
