//! Service operations over the store.
//!
//! Each function takes the [`MemoryStore`](crate::store::MemoryStore),
//! acquires the lock once, applies light validation and field defaulting,
//! and returns plain data for the HTTP layer to serialize. The arithmetic
//! itself lives in [`crate::calculation`].

pub mod attendance;
pub mod department;
pub mod employee;
pub mod leave;
pub mod payroll;

use chrono::{Datelike, Local, NaiveDate};

use crate::error::{EngineError, EngineResult};
use crate::models::Employee;
use crate::store::Tables;

/// Looks up an employee, failing with `NotFound` if absent.
pub(crate) fn require_employee(tables: &Tables, id: u64) -> EngineResult<&Employee> {
    tables
        .employees
        .get(id)
        .ok_or_else(|| EngineError::not_found("Employee", id))
}

/// Today's date on the server's local clock.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The current calendar year on the server's local clock.
pub(crate) fn current_year() -> i32 {
    today().year()
}

/// Overwrites `target` when `value` is supplied.
pub(crate) fn assign<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Overwrites an optional field when `value` is supplied.
pub(crate) fn assign_opt<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}
