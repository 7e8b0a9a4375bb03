//! Request types for the HR engine API.
//!
//! JSON bodies reuse the service input types; this module defines the
//! query-string parameters the endpoints accept.

use chrono::NaiveDate;
use serde::Deserialize;

/// `?q=` for employee search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Substring to look for.
    pub q: String,
}

/// `?year=` for leave balances; defaults to the current year.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YearQuery {
    /// Calendar year.
    pub year: Option<i32>,
}

/// `?start_date=&end_date=` date window.
#[derive(Debug, Clone, Deserialize)]
pub struct DateRangeQuery {
    /// First day of the window.
    pub start_date: NaiveDate,
    /// Last day of the window.
    pub end_date: NaiveDate,
}

/// `?start_date=&end_date=&employee_id=` report window.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportQuery {
    /// First day of the window.
    pub start_date: NaiveDate,
    /// Last day of the window.
    pub end_date: NaiveDate,
    /// Restrict the report to one employee.
    pub employee_id: Option<u64>,
}

/// `?employee_id=` filter for calendars.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeFilterQuery {
    /// Restrict the calendar to one employee.
    pub employee_id: Option<u64>,
}

/// `?approved_by=` for leave approval.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveQuery {
    /// The approving employee.
    pub approved_by: u64,
}

/// `?comments=` for leave rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectQuery {
    /// Reviewer comments.
    pub comments: Option<String>,
}

/// `?month=YYYY-MM`, optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionalMonthQuery {
    /// Month filter.
    pub month: Option<String>,
}

/// `?month=YYYY-MM`, required.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthQuery {
    /// Month to summarize.
    pub month: String,
}

/// `?period=` for payroll period lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct PeriodQuery {
    /// A pay period start or end date.
    pub period: NaiveDate,
}

/// `?payment_date=` for marking payroll as paid.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentQuery {
    /// The date the payment was made.
    pub payment_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_query_employee_is_optional() {
        let query: ReportQuery =
            serde_json::from_str(r#"{"start_date":"2024-03-01","end_date":"2024-03-31"}"#).unwrap();
        assert_eq!(query.employee_id, None);
        assert_eq!(query.end_date, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    }
}
