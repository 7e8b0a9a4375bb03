//! Core data models for the HR engine.
//!
//! This module contains all the domain records the engine stores and
//! aggregates.

mod attendance;
mod employee;
mod leave;
mod payroll;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use employee::{Department, Employee};
pub use leave::{LeaveRecord, LeaveStatus, LeaveType};
pub use payroll::{PayrollRecord, PayrollStatus};
