//! Payroll models.
//!
//! A [`PayrollRecord`] stores the pay components for one employee and one
//! pay period, together with the derived gross and net figures and the
//! record's position in the `pending -> processed -> paid` lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::PayComponents;
use crate::error::EngineError;

/// Lifecycle state of a payroll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Created, not yet processed.
    Pending,
    /// Processed and ready for payment.
    Processed,
    /// Paid out; terminal.
    Paid,
}

impl std::fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayrollStatus::Pending => write!(f, "pending"),
            PayrollStatus::Processed => write!(f, "processed"),
            PayrollStatus::Paid => write!(f, "paid"),
        }
    }
}

impl std::str::FromStr for PayrollStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(PayrollStatus::Pending),
            "processed" => Ok(PayrollStatus::Processed),
            "paid" => Ok(PayrollStatus::Paid),
            _ => Err(EngineError::invalid_record(
                "status",
                format!("unknown payroll status '{}'", s),
            )),
        }
    }
}

/// Pay for one employee over one pay period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Store-assigned identifier.
    pub id: u64,
    /// The employee being paid.
    pub employee_id: u64,
    /// First day of the pay period.
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period.
    pub pay_period_end: NaiveDate,
    /// Base salary for the period.
    pub base_salary: Decimal,
    /// Overtime hours worked.
    pub overtime_hours: Decimal,
    /// Overtime hourly rate.
    pub overtime_rate: Decimal,
    /// Overtime pay, as supplied.
    pub overtime_pay: Decimal,
    /// Bonuses.
    pub bonuses: Decimal,
    /// General deductions.
    pub deductions: Decimal,
    /// Taxes withheld.
    pub taxes: Decimal,
    /// Insurance withheld.
    pub insurance: Decimal,
    /// Retirement contribution withheld.
    pub retirement: Decimal,
    /// `base_salary + overtime_pay + bonuses`.
    pub gross_pay: Decimal,
    /// `gross_pay - deductions - taxes - insurance - retirement`.
    pub net_pay: Decimal,
    /// Lifecycle state.
    pub status: PayrollStatus,
    /// Set when the record is marked as paid.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

impl PayrollRecord {
    /// Returns the monetary inputs gross and net pay are derived from.
    pub fn components(&self) -> PayComponents {
        PayComponents {
            base_salary: self.base_salary,
            overtime_pay: self.overtime_pay,
            bonuses: self.bonuses,
            deductions: self.deductions,
            taxes: self.taxes,
            insurance: self.insurance,
            retirement: self.retirement,
        }
    }

    /// Returns true if either end of the pay period falls on `date`.
    pub fn period_touches(&self, date: NaiveDate) -> bool {
        self.pay_period_start == date || self.pay_period_end == date
    }
}
