//! Employee operations.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::Employee;
use crate::store::{MemoryStore, Tables};

use super::{assign, assign_opt, require_employee};

/// Fields accepted when creating an employee.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeInput {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email; must be unused.
    pub email: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Job title.
    #[serde(default)]
    pub position: Option<String>,
    /// Department to assign; must exist.
    #[serde(default)]
    pub department_id: Option<u64>,
    /// Annual salary.
    #[serde(default)]
    pub salary: Option<Decimal>,
    /// Employment status, e.g. "active".
    #[serde(default)]
    pub status: Option<String>,
    /// First day of employment.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// Fields accepted when updating an employee; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeUpdate {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email; must be unused by another employee.
    pub email: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New job title.
    pub position: Option<String>,
    /// New department; must exist.
    pub department_id: Option<u64>,
    /// New salary.
    pub salary: Option<Decimal>,
    /// New status.
    pub status: Option<String>,
    /// New start date.
    pub start_date: Option<NaiveDate>,
}

/// An employee together with its department's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeView {
    /// The stored employee.
    #[serde(flatten)]
    pub employee: Employee,
    /// Name of the employee's department, if it exists.
    pub department_name: Option<String>,
}

fn view(tables: &Tables, employee: Employee) -> EmployeeView {
    let department_name = employee
        .department_id
        .and_then(|id| tables.departments.get(id))
        .map(|d| d.name.clone());
    EmployeeView {
        employee,
        department_name,
    }
}

fn views(tables: &Tables, employees: Vec<Employee>) -> Vec<EmployeeView> {
    employees.into_iter().map(|e| view(tables, e)).collect()
}

fn require_department(tables: &Tables, department_id: Option<u64>) -> EngineResult<()> {
    match department_id {
        Some(id) if !tables.departments.contains(id) => {
            Err(EngineError::not_found("Department", id))
        }
        _ => Ok(()),
    }
}

fn ensure_email_free(tables: &Tables, email: &str, except: Option<u64>) -> EngineResult<()> {
    let taken = tables
        .employees
        .values()
        .any(|e| Some(e.id) != except && e.email.eq_ignore_ascii_case(email));
    if taken {
        return Err(EngineError::duplicate("Employee", "email", email));
    }
    Ok(())
}

fn require_non_blank(field: &str, value: &str) -> EngineResult<()> {
    if value.trim().is_empty() {
        return Err(EngineError::invalid_record(field, "must not be blank"));
    }
    Ok(())
}

/// Creates an employee.
pub async fn create_employee(store: &MemoryStore, input: EmployeeInput) -> EngineResult<EmployeeView> {
    require_non_blank("first_name", &input.first_name)?;
    require_non_blank("last_name", &input.last_name)?;
    require_non_blank("email", &input.email)?;

    let mut tables = store.write().await;
    require_department(&tables, input.department_id)?;
    ensure_email_free(&tables, &input.email, None)?;

    let now = Utc::now();
    let employee = tables.employees.insert(Employee {
        id: 0,
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        phone: input.phone,
        position: input.position,
        department_id: input.department_id,
        salary: input.salary,
        status: input.status,
        start_date: input.start_date,
        created_at: now,
        updated_at: now,
    });

    info!(employee_id = employee.id, "Employee created");
    Ok(view(&tables, employee))
}

/// Lists every employee.
pub async fn list_employees(store: &MemoryStore) -> Vec<EmployeeView> {
    let tables = store.read().await;
    views(&tables, tables.employees.all())
}

/// Fetches one employee.
pub async fn get_employee(store: &MemoryStore, id: u64) -> EngineResult<EmployeeView> {
    let tables = store.read().await;
    let employee = require_employee(&tables, id)?.clone();
    Ok(view(&tables, employee))
}

/// Case-insensitive substring search over first name, last name and email.
pub async fn search_employees(store: &MemoryStore, query: &str) -> Vec<EmployeeView> {
    let needle = query.to_lowercase();
    let tables = store.read().await;
    let matches = tables.employees.filter(|e| {
        e.first_name.to_lowercase().contains(&needle)
            || e.last_name.to_lowercase().contains(&needle)
            || e.email.to_lowercase().contains(&needle)
    });
    views(&tables, matches)
}

/// Employees whose status equals `status`, ignoring case.
pub async fn employees_by_status(store: &MemoryStore, status: &str) -> Vec<EmployeeView> {
    let tables = store.read().await;
    let matches = tables.employees.filter(|e| {
        e.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(status))
    });
    views(&tables, matches)
}

/// Employees assigned to a department.
pub async fn employees_by_department(store: &MemoryStore, department_id: u64) -> Vec<EmployeeView> {
    let tables = store.read().await;
    let matches = tables
        .employees
        .filter(|e| e.department_id == Some(department_id));
    views(&tables, matches)
}

/// Applies a partial update to an employee.
pub async fn update_employee(
    store: &MemoryStore,
    id: u64,
    update: EmployeeUpdate,
) -> EngineResult<EmployeeView> {
    let mut tables = store.write().await;
    require_employee(&tables, id)?;
    require_department(&tables, update.department_id)?;
    if let Some(email) = update.email.as_deref() {
        require_non_blank("email", email)?;
        ensure_email_free(&tables, email, Some(id))?;
    }

    let employee = tables
        .employees
        .get_mut(id)
        .ok_or_else(|| EngineError::not_found("Employee", id))?;
    assign(&mut employee.first_name, update.first_name);
    assign(&mut employee.last_name, update.last_name);
    assign(&mut employee.email, update.email);
    assign_opt(&mut employee.phone, update.phone);
    assign_opt(&mut employee.position, update.position);
    assign_opt(&mut employee.department_id, update.department_id);
    assign_opt(&mut employee.salary, update.salary);
    assign_opt(&mut employee.status, update.status);
    assign_opt(&mut employee.start_date, update.start_date);
    employee.updated_at = Utc::now();
    let employee = employee.clone();

    info!(employee_id = id, "Employee updated");
    Ok(view(&tables, employee))
}

/// Deletes an employee.
pub async fn delete_employee(store: &MemoryStore, id: u64) -> EngineResult<()> {
    let mut tables = store.write().await;
    if tables.employees.remove(id).is_none() {
        warn!(employee_id = id, "Delete requested for unknown employee");
        return Err(EngineError::not_found("Employee", id));
    }
    info!(employee_id = id, "Employee deleted");
    Ok(())
}
