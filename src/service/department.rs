//! Department operations.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::Department;
use crate::store::{MemoryStore, Tables};

use super::{assign, assign_opt};

/// Fields accepted when creating a department.
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentInput {
    /// Unique department name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Budget.
    #[serde(default)]
    pub budget: Option<Decimal>,
}

/// Fields accepted when updating a department; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartmentUpdate {
    /// New name; must not collide with another department.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New budget.
    pub budget: Option<Decimal>,
}

/// A department together with how many employees reference it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentView {
    /// The stored department.
    #[serde(flatten)]
    pub department: Department,
    /// Employees assigned to the department.
    pub employee_count: usize,
}

/// Department-wide counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentStats {
    /// Number of departments.
    pub total: usize,
    /// Employees whose status is "active".
    pub active_employees: usize,
}

fn employee_count(tables: &Tables, department_id: u64) -> usize {
    tables
        .employees
        .values()
        .filter(|e| e.department_id == Some(department_id))
        .count()
}

fn view(tables: &Tables, department: Department) -> DepartmentView {
    DepartmentView {
        employee_count: employee_count(tables, department.id),
        department,
    }
}

fn require_department(tables: &Tables, id: u64) -> EngineResult<&Department> {
    tables
        .departments
        .get(id)
        .ok_or_else(|| EngineError::not_found("Department", id))
}

fn ensure_name_free(tables: &Tables, name: &str, except: Option<u64>) -> EngineResult<()> {
    if tables
        .departments
        .values()
        .any(|d| Some(d.id) != except && d.name == name)
    {
        warn!(department_name = name, "Department name already in use");
        return Err(EngineError::duplicate("Department", "name", name));
    }
    Ok(())
}

/// Creates a department; the name must be unused.
pub async fn create_department(
    store: &MemoryStore,
    input: DepartmentInput,
) -> EngineResult<DepartmentView> {
    if input.name.trim().is_empty() {
        return Err(EngineError::invalid_record("name", "must not be blank"));
    }

    let mut tables = store.write().await;
    ensure_name_free(&tables, &input.name, None)?;

    let now = Utc::now();
    let department = tables.departments.insert(Department {
        id: 0,
        name: input.name,
        description: input.description,
        budget: input.budget,
        created_at: now,
        updated_at: now,
    });

    info!(department_id = department.id, "Department created");
    Ok(view(&tables, department))
}

/// Lists every department with its employee count.
pub async fn list_departments(store: &MemoryStore) -> Vec<DepartmentView> {
    let tables = store.read().await;
    tables
        .departments
        .all()
        .into_iter()
        .map(|d| view(&tables, d))
        .collect()
}

/// Fetches one department.
pub async fn get_department(store: &MemoryStore, id: u64) -> EngineResult<DepartmentView> {
    let tables = store.read().await;
    let department = require_department(&tables, id)?.clone();
    Ok(view(&tables, department))
}

/// Applies a partial update to a department.
pub async fn update_department(
    store: &MemoryStore,
    id: u64,
    update: DepartmentUpdate,
) -> EngineResult<DepartmentView> {
    let mut tables = store.write().await;
    let current = require_department(&tables, id)?;
    if let Some(name) = update.name.as_deref() {
        if name != current.name {
            ensure_name_free(&tables, name, Some(id))?;
        }
    }

    let department = tables
        .departments
        .get_mut(id)
        .ok_or_else(|| EngineError::not_found("Department", id))?;
    assign(&mut department.name, update.name);
    assign_opt(&mut department.description, update.description);
    assign_opt(&mut department.budget, update.budget);
    department.updated_at = Utc::now();
    let department = department.clone();

    info!(department_id = id, "Department updated");
    Ok(view(&tables, department))
}

/// Deletes a department that no employee references.
pub async fn delete_department(store: &MemoryStore, id: u64) -> EngineResult<()> {
    let mut tables = store.write().await;
    require_department(&tables, id)?;

    let count = employee_count(&tables, id);
    if count > 0 {
        warn!(department_id = id, employees = count, "Refusing to delete department in use");
        return Err(EngineError::invalid_state(format!(
            "Cannot delete department with {} employees",
            count
        )));
    }

    tables.departments.remove(id);
    info!(department_id = id, "Department deleted");
    Ok(())
}

/// Counts departments and active employees.
pub async fn department_stats(store: &MemoryStore) -> DepartmentStats {
    let tables = store.read().await;
    DepartmentStats {
        total: tables.departments.len(),
        active_employees: tables.employees.values().filter(|e| e.is_active()).count(),
    }
}
