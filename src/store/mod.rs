//! In-memory record store.
//!
//! [`MemoryStore`] holds every table behind a single `tokio` [`RwLock`].
//! A service call takes the lock once, so it reads a consistent snapshot
//! and applies its mutations atomically. Concurrent updates to the same
//! record are last-write-wins.

use std::collections::BTreeMap;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{AttendanceRecord, Department, Employee, LeaveRecord, PayrollRecord};

/// A record with a store-assigned numeric id.
pub trait Record: Clone {
    /// Returns the record's id.
    fn id(&self) -> u64;

    /// Overwrites the record's id; called once by [`Table::insert`].
    fn set_id(&mut self, id: u64);
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> u64 {
                    self.id
                }

                fn set_id(&mut self, id: u64) {
                    self.id = id;
                }
            }
        )*
    };
}

impl_record!(Employee, Department, LeaveRecord, AttendanceRecord, PayrollRecord);

/// An id-ordered table with monotonically increasing ids starting at 1.
///
/// Ids are never reused, even after a delete.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Record> Table<T> {
    /// Assigns the next id to `record`, stores it, and returns the stored copy.
    pub fn insert(&mut self, mut record: T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        record.set_id(id);
        self.rows.insert(id, record.clone());
        record
    }

    /// Looks up a record by id.
    pub fn get(&self, id: u64) -> Option<&T> {
        self.rows.get(&id)
    }

    /// Looks up a record by id for in-place mutation.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    /// Removes a record, returning it if it existed.
    pub fn remove(&mut self, id: u64) -> Option<T> {
        self.rows.remove(&id)
    }

    /// Returns true if a record with `id` exists.
    pub fn contains(&self, id: u64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Iterates all records in id order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    /// Clones the records matching `predicate`, in id order.
    pub fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.rows.values().filter(|r| predicate(r)).cloned().collect()
    }

    /// Clones every record, in id order.
    pub fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Every table the engine persists.
#[derive(Debug, Default)]
pub struct Tables {
    /// Employees.
    pub employees: Table<Employee>,
    /// Departments.
    pub departments: Table<Department>,
    /// Leave requests.
    pub leave: Table<LeaveRecord>,
    /// Attendance records.
    pub attendance: Table<AttendanceRecord>,
    /// Payroll records.
    pub payroll: Table<PayrollRecord>,
}

impl Tables {
    /// Returns the display name of an employee, if the employee exists.
    pub fn employee_name(&self, id: u64) -> Option<String> {
        self.employees.get(id).map(Employee::full_name)
    }

    /// Maps every employee id to its display name.
    pub fn employee_names(&self) -> crate::calculation::EmployeeNames {
        self.employees
            .values()
            .map(|e| (e.id, e.full_name()))
            .collect()
    }
}

/// Shared, lock-guarded store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires a shared snapshot of every table.
    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    /// Acquires exclusive access to every table.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn department(name: &str) -> Department {
        let now = Utc::now();
        Department {
            id: 0,
            name: name.to_string(),
            description: None,
            budget: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut table = Table::default();
        let first = table.insert(department("Engineering"));
        let second = table.insert(department("Finance"));
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_ids_are_not_reused_after_remove() {
        let mut table = Table::default();
        let first = table.insert(department("Engineering"));
        assert!(table.remove(first.id).is_some());
        let second = table.insert(department("Finance"));
        assert_eq!(second.id, 2);
        assert!(!table.contains(1));
    }

    #[test]
    fn test_filter_returns_matches_in_id_order() {
        let mut table = Table::default();
        table.insert(department("Sales"));
        table.insert(department("Support"));
        table.insert(department("Engineering"));

        let matches = table.filter(|d| d.name.starts_with('S'));

        let names: Vec<&str> = matches.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Sales", "Support"]);
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut table = Table::default();
        let stored = table.insert(department("Ops"));
        table.get_mut(stored.id).unwrap().name = "Operations".to_string();
        assert_eq!(table.get(stored.id).unwrap().name, "Operations");
    }

    #[tokio::test]
    async fn test_store_write_then_read() {
        let store = MemoryStore::new();
        {
            let mut tables = store.write().await;
            tables.departments.insert(department("HR"));
        }
        let tables = store.read().await;
        assert_eq!(tables.departments.len(), 1);
        assert!(tables.employees.is_empty());
    }
}
