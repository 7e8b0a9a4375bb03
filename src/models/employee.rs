//! Employee and department models.
//!
//! Employees are the identity every leave, attendance and payroll record
//! points at. They own no computation themselves.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents an employee on the books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Store-assigned identifier.
    pub id: u64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email; unique across employees.
    pub email: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Job title.
    #[serde(default)]
    pub position: Option<String>,
    /// The department the employee belongs to, if any.
    #[serde(default)]
    pub department_id: Option<u64>,
    /// Annual salary.
    #[serde(default)]
    pub salary: Option<Decimal>,
    /// Free-text employment status (e.g. "active", "on_leave").
    #[serde(default)]
    pub status: Option<String>,
    /// First day of employment.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Returns "first last", the display name used in reports.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_engine::models::Employee;
    /// use chrono::Utc;
    ///
    /// let employee = Employee {
    ///     id: 1,
    ///     first_name: "Ada".to_string(),
    ///     last_name: "Lovelace".to_string(),
    ///     email: "ada@example.com".to_string(),
    ///     phone: None,
    ///     position: None,
    ///     department_id: None,
    ///     salary: None,
    ///     status: None,
    ///     start_date: None,
    ///     created_at: Utc::now(),
    ///     updated_at: Utc::now(),
    /// };
    /// assert_eq!(employee.full_name(), "Ada Lovelace");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if the employee's status is "active" (case-insensitive).
    pub fn is_active(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("active"))
    }
}

/// An organizational unit employees can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    /// Store-assigned identifier.
    pub id: u64,
    /// Department name; unique across departments.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional budget.
    #[serde(default)]
    pub budget: Option<Decimal>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_employee(status: Option<&str>) -> Employee {
        let now = Utc::now();
        Employee {
            id: 1,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: None,
            position: Some("Engineer".to_string()),
            department_id: Some(3),
            salary: Some(Decimal::new(95000, 0)),
            status: status.map(str::to_string),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 6),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_full_name_joins_first_and_last() {
        let employee = create_test_employee(None);
        assert_eq!(employee.full_name(), "Grace Hopper");
    }

    #[test]
    fn test_is_active_is_case_insensitive() {
        assert!(create_test_employee(Some("active")).is_active());
        assert!(create_test_employee(Some("Active")).is_active());
        assert!(!create_test_employee(Some("terminated")).is_active());
        assert!(!create_test_employee(None).is_active());
    }

    #[test]
    fn test_salary_serializes_as_string() {
        let employee = create_test_employee(Some("active"));
        let json = serde_json::to_string(&employee).unwrap();
        assert!(json.contains("\"salary\":\"95000\""));
        assert!(json.contains("\"start_date\":\"2020-01-06\""));
    }
}
