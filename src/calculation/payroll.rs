//! Payroll calculation functionality.
//!
//! This module derives gross and net pay from a record's monetary
//! components and drives the payroll lifecycle:
//!
//! ```text
//! pending --process--> processed --mark paid--> paid
//! ```
//!
//! All arithmetic is fixed-point [`Decimal`]; nothing is rounded.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollRecord, PayrollStatus};

/// The monetary inputs gross and net pay are derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayComponents {
    /// Base salary for the period.
    pub base_salary: Decimal,
    /// Overtime pay, taken as supplied.
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
}

/// Derived gross and net pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayTotals {
    /// `base_salary + overtime_pay + bonuses`.
    pub gross_pay: Decimal,
    /// `gross_pay - deductions - taxes - insurance - retirement`.
    pub net_pay: Decimal,
}

fn out_of_range(field: &str) -> EngineError {
    EngineError::invalid_record(field, "amount out of range")
}

/// Computes gross pay: base salary plus overtime pay plus bonuses.
///
/// Returns `InvalidRecord` if the sum does not fit in a [`Decimal`].
pub fn compute_gross_pay(components: &PayComponents) -> EngineResult<Decimal> {
    components
        .base_salary
        .checked_add(components.overtime_pay)
        .and_then(|sum| sum.checked_add(components.bonuses))
        .ok_or_else(|| out_of_range("gross_pay"))
}

/// Computes net pay from a gross figure by subtracting every withholding.
///
/// Net pay is not clamped; withholdings larger than gross give a negative
/// result.
pub fn compute_net_pay(gross_pay: Decimal, components: &PayComponents) -> EngineResult<Decimal> {
    [
        components.deductions,
        components.taxes,
        components.insurance,
        components.retirement,
    ]
    .into_iter()
    .try_fold(gross_pay, |net, withheld| net.checked_sub(withheld))
    .ok_or_else(|| out_of_range("net_pay"))
}

/// Computes gross and net pay together.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::{calculate_pay_totals, PayComponents};
/// use rust_decimal::Decimal;
///
/// let components = PayComponents {
///     base_salary: Decimal::new(5000, 0),
///     overtime_pay: Decimal::new(200, 0),
///     bonuses: Decimal::new(100, 0),
///     deductions: Decimal::new(50, 0),
///     taxes: Decimal::new(300, 0),
///     insurance: Decimal::new(100, 0),
///     retirement: Decimal::new(150, 0),
/// };
///
/// let totals = calculate_pay_totals(&components).unwrap();
/// assert_eq!(totals.gross_pay, Decimal::new(5300, 0));
/// assert_eq!(totals.net_pay, Decimal::new(4700, 0));
/// ```
pub fn calculate_pay_totals(components: &PayComponents) -> EngineResult<PayTotals> {
    let gross_pay = compute_gross_pay(components)?;
    Ok(PayTotals {
        gross_pay,
        net_pay: compute_net_pay(gross_pay, components)?,
    })
}

/// Recomputes a record's gross and net pay from its components.
///
/// On error the record is left untouched.
pub fn apply_pay_totals(record: &mut PayrollRecord) -> EngineResult<()> {
    let totals = calculate_pay_totals(&record.components())?;
    record.gross_pay = totals.gross_pay;
    record.net_pay = totals.net_pay;
    Ok(())
}

/// Moves a payroll record to `processed`.
///
/// Processing a record that is already processed is allowed and leaves it
/// processed. A paid record cannot go back.
pub fn process_payroll(record: &mut PayrollRecord, now: DateTime<Utc>) -> EngineResult<()> {
    if record.status == PayrollStatus::Paid {
        return Err(EngineError::invalid_state(
            "Payroll has already been paid",
        ));
    }
    record.status = PayrollStatus::Processed;
    record.updated_at = now;
    Ok(())
}

/// Marks a processed payroll record as paid on `payment_date`.
///
/// Returns `InvalidState` unless the record is currently `processed`.
pub fn mark_payroll_paid(
    record: &mut PayrollRecord,
    payment_date: NaiveDate,
    now: DateTime<Utc>,
) -> EngineResult<()> {
    if record.status != PayrollStatus::Processed {
        return Err(EngineError::invalid_state(
            "Payroll must be processed before marking as paid",
        ));
    }
    record.status = PayrollStatus::Paid;
    record.payment_date = Some(payment_date);
    record.updated_at = now;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_components() -> PayComponents {
        PayComponents {
            base_salary: dec("5000"),
            overtime_pay: dec("200"),
            bonuses: dec("100"),
            deductions: dec("50"),
            taxes: dec("300"),
            insurance: dec("100"),
            retirement: dec("150"),
        }
    }

    fn create_payroll(status: PayrollStatus) -> PayrollRecord {
        let now = Utc::now();
        let components = sample_components();
        let mut record = PayrollRecord {
            id: 1,
            employee_id: 1,
            pay_period_start: make_date("2024-01-01"),
            pay_period_end: make_date("2024-01-31"),
            base_salary: components.base_salary,
            overtime_hours: dec("10"),
            overtime_rate: dec("20"),
            overtime_pay: components.overtime_pay,
            bonuses: components.bonuses,
            deductions: components.deductions,
            taxes: components.taxes,
            insurance: components.insurance,
            retirement: components.retirement,
            gross_pay: Decimal::ZERO,
            net_pay: Decimal::ZERO,
            status,
            payment_date: None,
            created_at: now,
            updated_at: now,
        };
        apply_pay_totals(&mut record).unwrap();
        record
    }

    #[test]
    fn test_gross_and_net_for_sample_components() {
        let totals = calculate_pay_totals(&sample_components()).unwrap();
        assert_eq!(totals.gross_pay, dec("5300"));
        assert_eq!(totals.net_pay, dec("4700"));
    }

    #[test]
    fn test_zero_components_give_zero_pay() {
        let totals = calculate_pay_totals(&PayComponents::default()).unwrap();
        assert_eq!(totals.gross_pay, Decimal::ZERO);
        assert_eq!(totals.net_pay, Decimal::ZERO);
    }

    #[test]
    fn test_fractional_amounts_are_exact() {
        let components = PayComponents {
            base_salary: dec("1234.56"),
            overtime_pay: dec("0.10"),
            bonuses: dec("0.20"),
            taxes: dec("0.30"),
            ..PayComponents::default()
        };
        let totals = calculate_pay_totals(&components).unwrap();
        assert_eq!(totals.gross_pay, dec("1234.86"));
        assert_eq!(totals.net_pay, dec("1234.56"));
    }

    #[test]
    fn test_net_pay_is_not_clamped() {
        let components = PayComponents {
            base_salary: dec("100"),
            taxes: dec("150"),
            ..PayComponents::default()
        };
        assert_eq!(calculate_pay_totals(&components).unwrap().net_pay, dec("-50"));
    }

    #[test]
    fn test_overtime_pay_is_not_derived_from_hours_and_rate() {
        // 10 hours at 20 would be 200; the supplied overtime pay wins.
        let mut record = create_payroll(PayrollStatus::Pending);
        record.overtime_pay = dec("75");
        apply_pay_totals(&mut record).unwrap();
        assert_eq!(record.gross_pay, dec("5175"));
    }

    #[test]
    fn test_gross_overflow_is_an_invalid_record() {
        let components = PayComponents {
            base_salary: Decimal::MAX,
            bonuses: dec("1"),
            ..PayComponents::default()
        };
        match calculate_pay_totals(&components) {
            Err(EngineError::InvalidRecord { field, .. }) => assert_eq!(field, "gross_pay"),
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_net_overflow_is_an_invalid_record() {
        let components = PayComponents {
            base_salary: Decimal::MIN,
            taxes: dec("1"),
            ..PayComponents::default()
        };
        match calculate_pay_totals(&components) {
            Err(EngineError::InvalidRecord { field, .. }) => assert_eq!(field, "net_pay"),
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_totals_leave_record_untouched() {
        let mut record = create_payroll(PayrollStatus::Pending);
        record.base_salary = Decimal::MAX;

        assert!(apply_pay_totals(&mut record).is_err());

        assert_eq!(record.gross_pay, dec("5300"));
        assert_eq!(record.net_pay, dec("4700"));
    }

    #[test]
    fn test_process_then_mark_paid() {
        let mut record = create_payroll(PayrollStatus::Pending);
        let now = Utc::now();

        process_payroll(&mut record, now).unwrap();
        assert_eq!(record.status, PayrollStatus::Processed);

        mark_payroll_paid(&mut record, make_date("2024-02-01"), now).unwrap();
        assert_eq!(record.status, PayrollStatus::Paid);
        assert_eq!(record.payment_date, Some(make_date("2024-02-01")));
    }

    #[test]
    fn test_mark_paid_requires_processed() {
        let mut record = create_payroll(PayrollStatus::Pending);

        let result = mark_payroll_paid(&mut record, make_date("2024-02-01"), Utc::now());

        match result {
            Err(EngineError::InvalidState { message }) => {
                assert_eq!(message, "Payroll must be processed before marking as paid");
            }
            other => panic!("Expected InvalidState, got {:?}", other),
        }
        assert_eq!(record.status, PayrollStatus::Pending);
        assert!(record.payment_date.is_none());
    }

    #[test]
    fn test_second_mark_paid_fails() {
        let mut record = create_payroll(PayrollStatus::Processed);
        let now = Utc::now();
        mark_payroll_paid(&mut record, make_date("2024-02-01"), now).unwrap();

        let result = mark_payroll_paid(&mut record, make_date("2024-02-02"), now);

        assert!(matches!(result, Err(EngineError::InvalidState { .. })));
        assert_eq!(record.payment_date, Some(make_date("2024-02-01")));
    }

    #[test]
    fn test_reprocessing_a_processed_record_is_allowed() {
        let mut record = create_payroll(PayrollStatus::Processed);
        assert!(process_payroll(&mut record, Utc::now()).is_ok());
        assert_eq!(record.status, PayrollStatus::Processed);
    }

    #[test]
    fn test_paid_record_cannot_be_processed() {
        let mut record = create_payroll(PayrollStatus::Paid);
        assert!(matches!(
            process_payroll(&mut record, Utc::now()),
            Err(EngineError::InvalidState { .. })
        ));
        assert_eq!(record.status, PayrollStatus::Paid);
    }

    fn amount() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #[test]
        fn prop_gross_and_net_identities_hold(
            base_salary in amount(),
            overtime_pay in amount(),
            bonuses in amount(),
            deductions in amount(),
            taxes in amount(),
            insurance in amount(),
            retirement in amount(),
        ) {
            let components = PayComponents {
                base_salary,
                overtime_pay,
                bonuses,
                deductions,
                taxes,
                insurance,
                retirement,
            };
            let totals = calculate_pay_totals(&components).unwrap();
            prop_assert_eq!(totals.gross_pay, base_salary + overtime_pay + bonuses);
            prop_assert_eq!(
                totals.net_pay + deductions + taxes + insurance + retirement,
                totals.gross_pay
            );
        }
    }
}
