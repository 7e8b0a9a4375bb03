//! Payroll operations.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculation::{
    apply_pay_totals, mark_payroll_paid, process_payroll, validate_date_range,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollRecord, PayrollStatus};
use crate::store::{MemoryStore, Tables};

use super::{assign, require_employee};

/// Fields accepted when creating a payroll record.
///
/// Every monetary component is optional and defaults to zero.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollInput {
    /// The employee being paid; must exist.
    pub employee_id: u64,
    /// First day of the pay period.
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period.
    pub pay_period_end: NaiveDate,
    /// Base salary.
    #[serde(default)]
    pub base_salary: Option<Decimal>,
    /// Overtime hours.
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    /// Overtime hourly rate.
    #[serde(default)]
    pub overtime_rate: Option<Decimal>,
    /// Overtime pay.
    #[serde(default)]
    pub overtime_pay: Option<Decimal>,
    /// Bonuses.
    #[serde(default)]
    pub bonuses: Option<Decimal>,
    /// Deductions.
    #[serde(default)]
    pub deductions: Option<Decimal>,
    /// Taxes.
    #[serde(default)]
    pub taxes: Option<Decimal>,
    /// Insurance.
    #[serde(default)]
    pub insurance: Option<Decimal>,
    /// Retirement contribution.
    #[serde(default)]
    pub retirement: Option<Decimal>,
}

/// Fields accepted when updating a payroll record; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayrollUpdate {
    /// Re-point the record at another employee; must exist.
    pub employee_id: Option<u64>,
    /// New pay period start.
    pub pay_period_start: Option<NaiveDate>,
    /// New pay period end.
    pub pay_period_end: Option<NaiveDate>,
    /// New base salary.
    pub base_salary: Option<Decimal>,
    /// New overtime hours.
    pub overtime_hours: Option<Decimal>,
    /// New overtime rate.
    pub overtime_rate: Option<Decimal>,
    /// New overtime pay.
    pub overtime_pay: Option<Decimal>,
    /// New bonuses.
    pub bonuses: Option<Decimal>,
    /// New deductions.
    pub deductions: Option<Decimal>,
    /// New taxes.
    pub taxes: Option<Decimal>,
    /// New insurance.
    pub insurance: Option<Decimal>,
    /// New retirement contribution.
    pub retirement: Option<Decimal>,
}

/// A payroll record with the employee's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollView {
    /// The stored record.
    #[serde(flatten)]
    pub payroll: PayrollRecord,
    /// "first last" of the employee.
    pub employee_name: Option<String>,
}

fn view(tables: &Tables, payroll: PayrollRecord) -> PayrollView {
    PayrollView {
        employee_name: tables.employee_name(payroll.employee_id),
        payroll,
    }
}

fn views(tables: &Tables, records: Vec<PayrollRecord>) -> Vec<PayrollView> {
    records.into_iter().map(|r| view(tables, r)).collect()
}

fn payroll_not_found(id: u64) -> EngineError {
    EngineError::not_found("Payroll record", id)
}

/// Creates a `pending` payroll record with derived gross and net pay.
pub async fn create_payroll(store: &MemoryStore, input: PayrollInput) -> EngineResult<PayrollView> {
    validate_date_range(input.pay_period_start, input.pay_period_end, "pay_period_end")?;

    let mut tables = store.write().await;
    require_employee(&tables, input.employee_id)?;

    let now = Utc::now();
    let mut record = PayrollRecord {
        id: 0,
        employee_id: input.employee_id,
        pay_period_start: input.pay_period_start,
        pay_period_end: input.pay_period_end,
        base_salary: input.base_salary.unwrap_or_default(),
        overtime_hours: input.overtime_hours.unwrap_or_default(),
        overtime_rate: input.overtime_rate.unwrap_or_default(),
        overtime_pay: input.overtime_pay.unwrap_or_default(),
        bonuses: input.bonuses.unwrap_or_default(),
        deductions: input.deductions.unwrap_or_default(),
        taxes: input.taxes.unwrap_or_default(),
        insurance: input.insurance.unwrap_or_default(),
        retirement: input.retirement.unwrap_or_default(),
        gross_pay: Decimal::ZERO,
        net_pay: Decimal::ZERO,
        status: PayrollStatus::Pending,
        payment_date: None,
        created_at: now,
        updated_at: now,
    };
    apply_pay_totals(&mut record).inspect_err(|e| {
        warn!(employee_id = record.employee_id, error = %e, "Payroll totals rejected");
    })?;
    let record = tables.payroll.insert(record);

    info!(
        payroll_id = record.id,
        employee_id = record.employee_id,
        gross_pay = %record.gross_pay,
        net_pay = %record.net_pay,
        "Payroll created"
    );
    Ok(view(&tables, record))
}

/// Lists every payroll record.
pub async fn list_payroll(store: &MemoryStore) -> Vec<PayrollView> {
    let tables = store.read().await;
    views(&tables, tables.payroll.all())
}

/// Fetches one payroll record.
pub async fn get_payroll(store: &MemoryStore, id: u64) -> EngineResult<PayrollView> {
    let tables = store.read().await;
    let record = tables
        .payroll
        .get(id)
        .cloned()
        .ok_or_else(|| payroll_not_found(id))?;
    Ok(view(&tables, record))
}

/// Lists an employee's payroll records.
pub async fn payroll_by_employee(
    store: &MemoryStore,
    employee_id: u64,
) -> EngineResult<Vec<PayrollView>> {
    let tables = store.read().await;
    require_employee(&tables, employee_id)?;
    let records = tables.payroll.filter(|r| r.employee_id == employee_id);
    Ok(views(&tables, records))
}

/// Lists payroll records in a given state.
pub async fn payroll_by_status(store: &MemoryStore, status: PayrollStatus) -> Vec<PayrollView> {
    let tables = store.read().await;
    let records = tables.payroll.filter(|r| r.status == status);
    views(&tables, records)
}

/// Lists records whose pay period starts or ends on `period`.
pub async fn payroll_by_period(store: &MemoryStore, period: NaiveDate) -> Vec<PayrollView> {
    let tables = store.read().await;
    let records = tables.payroll.filter(|r| r.period_touches(period));
    views(&tables, records)
}

/// Applies a partial update and recomputes gross and net pay.
pub async fn update_payroll(
    store: &MemoryStore,
    id: u64,
    update: PayrollUpdate,
) -> EngineResult<PayrollView> {
    let mut tables = store.write().await;
    if let Some(employee_id) = update.employee_id {
        require_employee(&tables, employee_id)?;
    }

    let mut record = tables
        .payroll
        .get(id)
        .cloned()
        .ok_or_else(|| payroll_not_found(id))?;

    let start = update.pay_period_start.unwrap_or(record.pay_period_start);
    let end = update.pay_period_end.unwrap_or(record.pay_period_end);
    validate_date_range(start, end, "pay_period_end")?;

    assign(&mut record.employee_id, update.employee_id);
    record.pay_period_start = start;
    record.pay_period_end = end;
    assign(&mut record.base_salary, update.base_salary);
    assign(&mut record.overtime_hours, update.overtime_hours);
    assign(&mut record.overtime_rate, update.overtime_rate);
    assign(&mut record.overtime_pay, update.overtime_pay);
    assign(&mut record.bonuses, update.bonuses);
    assign(&mut record.deductions, update.deductions);
    assign(&mut record.taxes, update.taxes);
    assign(&mut record.insurance, update.insurance);
    assign(&mut record.retirement, update.retirement);
    apply_pay_totals(&mut record).inspect_err(|e| {
        warn!(payroll_id = id, error = %e, "Payroll totals rejected");
    })?;
    record.updated_at = Utc::now();

    if let Some(stored) = tables.payroll.get_mut(id) {
        *stored = record.clone();
    }

    info!(payroll_id = id, net_pay = %record.net_pay, "Payroll updated");
    Ok(view(&tables, record))
}

/// Moves a record to `processed`.
pub async fn process(store: &MemoryStore, id: u64) -> EngineResult<PayrollView> {
    let mut tables = store.write().await;
    let record = tables
        .payroll
        .get_mut(id)
        .ok_or_else(|| payroll_not_found(id))?;
    if record.status == PayrollStatus::Processed {
        warn!(payroll_id = id, "Payroll processed again");
    }
    if let Err(error) = process_payroll(record, Utc::now()) {
        warn!(payroll_id = id, status = %record.status, "Payroll processing refused");
        return Err(error);
    }
    let record = record.clone();

    info!(payroll_id = id, "Payroll processed");
    Ok(view(&tables, record))
}

/// Marks a processed record as paid on `payment_date`.
pub async fn mark_as_paid(
    store: &MemoryStore,
    id: u64,
    payment_date: NaiveDate,
) -> EngineResult<PayrollView> {
    let mut tables = store.write().await;
    let record = tables
        .payroll
        .get_mut(id)
        .ok_or_else(|| payroll_not_found(id))?;
    if let Err(error) = mark_payroll_paid(record, payment_date, Utc::now()) {
        warn!(payroll_id = id, status = %record.status, "Payroll payment refused");
        return Err(error);
    }
    let record = record.clone();

    info!(payroll_id = id, %payment_date, "Payroll marked as paid");
    Ok(view(&tables, record))
}

/// Deletes a payroll record.
pub async fn delete_payroll(store: &MemoryStore, id: u64) -> EngineResult<()> {
    let mut tables = store.write().await;
    tables
        .payroll
        .remove(id)
        .ok_or_else(|| payroll_not_found(id))?;
    info!(payroll_id = id, "Payroll deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::employee::{create_employee, EmployeeInput};
    use std::str::FromStr;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn store_with_employee() -> MemoryStore {
        let store = MemoryStore::new();
        create_employee(
            &store,
            EmployeeInput {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: None,
                position: None,
                department_id: None,
                salary: None,
                status: Some("active".to_string()),
                start_date: None,
            },
        )
        .await
        .unwrap();
        store
    }

    fn sample_input() -> PayrollInput {
        PayrollInput {
            employee_id: 1,
            pay_period_start: make_date("2024-01-01"),
            pay_period_end: make_date("2024-01-31"),
            base_salary: Some(dec("5000")),
            overtime_hours: None,
            overtime_rate: None,
            overtime_pay: Some(dec("200")),
            bonuses: Some(dec("100")),
            deductions: Some(dec("50")),
            taxes: Some(dec("300")),
            insurance: Some(dec("100")),
            retirement: Some(dec("150")),
        }
    }

    #[tokio::test]
    async fn test_create_derives_gross_and_net() {
        let store = store_with_employee().await;

        let created = create_payroll(&store, sample_input()).await.unwrap();

        assert_eq!(created.payroll.gross_pay, dec("5300"));
        assert_eq!(created.payroll.net_pay, dec("4700"));
        assert_eq!(created.payroll.status, PayrollStatus::Pending);
        assert_eq!(created.payroll.overtime_hours, Decimal::ZERO);
        assert_eq!(created.employee_name.as_deref(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_update_recomputes_totals() {
        let store = store_with_employee().await;
        create_payroll(&store, sample_input()).await.unwrap();

        let updated = update_payroll(
            &store,
            1,
            PayrollUpdate {
                bonuses: Some(dec("600")),
                taxes: Some(dec("400")),
                ..PayrollUpdate::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.payroll.gross_pay, dec("5800"));
        assert_eq!(updated.payroll.net_pay, dec("5100"));
    }

    #[tokio::test]
    async fn test_update_rejects_inverted_period() {
        let store = store_with_employee().await;
        create_payroll(&store, sample_input()).await.unwrap();

        let result = update_payroll(
            &store,
            1,
            PayrollUpdate {
                pay_period_end: Some(make_date("2023-12-01")),
                ..PayrollUpdate::default()
            },
        )
        .await;

        assert!(matches!(result, Err(EngineError::InvalidRecord { .. })));
        let stored = get_payroll(&store, 1).await.unwrap();
        assert_eq!(stored.payroll.pay_period_end, make_date("2024-01-31"));
    }

    #[tokio::test]
    async fn test_update_overflow_keeps_stored_record() {
        let store = store_with_employee().await;
        create_payroll(&store, sample_input()).await.unwrap();

        let result = update_payroll(
            &store,
            1,
            PayrollUpdate {
                base_salary: Some(Decimal::MAX),
                ..PayrollUpdate::default()
            },
        )
        .await;

        assert!(matches!(result, Err(EngineError::InvalidRecord { .. })));
        let stored = get_payroll(&store, 1).await.unwrap();
        assert_eq!(stored.payroll.base_salary, dec("5000"));
        assert_eq!(stored.payroll.gross_pay, dec("5300"));
        assert_eq!(stored.payroll.net_pay, dec("4700"));
    }

    #[tokio::test]
    async fn test_create_overflow_is_rejected() {
        let store = store_with_employee().await;
        let mut input = sample_input();
        input.base_salary = Some(Decimal::MAX);

        let result = create_payroll(&store, input).await;

        assert!(matches!(result, Err(EngineError::InvalidRecord { .. })));
        assert!(list_payroll(&store).await.is_empty());
    }

    #[tokio::test]
    async fn test_lifecycle_process_then_pay_then_refuse_second_payment() {
        let store = store_with_employee().await;
        create_payroll(&store, sample_input()).await.unwrap();

        let early = mark_as_paid(&store, 1, make_date("2024-02-01")).await;
        assert!(matches!(early, Err(EngineError::InvalidState { .. })));

        process(&store, 1).await.unwrap();
        let paid = mark_as_paid(&store, 1, make_date("2024-02-01"))
            .await
            .unwrap();
        assert_eq!(paid.payroll.status, PayrollStatus::Paid);
        assert_eq!(paid.payroll.payment_date, Some(make_date("2024-02-01")));

        let again = mark_as_paid(&store, 1, make_date("2024-02-02")).await;
        assert!(matches!(again, Err(EngineError::InvalidState { .. })));
    }

    #[tokio::test]
    async fn test_queries_by_employee_status_and_period() {
        let store = store_with_employee().await;
        create_payroll(&store, sample_input()).await.unwrap();
        let mut february = sample_input();
        february.pay_period_start = make_date("2024-02-01");
        february.pay_period_end = make_date("2024-02-29");
        create_payroll(&store, february).await.unwrap();
        process(&store, 2).await.unwrap();

        assert_eq!(payroll_by_employee(&store, 1).await.unwrap().len(), 2);
        assert_eq!(payroll_by_status(&store, PayrollStatus::Processed).await.len(), 1);
        assert_eq!(payroll_by_period(&store, make_date("2024-01-31")).await.len(), 1);
        assert_eq!(payroll_by_period(&store, make_date("2024-02-01")).await.len(), 1);
        assert!(payroll_by_period(&store, make_date("2024-01-15")).await.is_empty());

        delete_payroll(&store, 1).await.unwrap();
        assert_eq!(list_payroll(&store).await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_record_is_not_found() {
        let store = store_with_employee().await;
        let error = process(&store, 5).await.unwrap_err();
        assert_eq!(error.to_string(), "Payroll record not found");
    }
}
