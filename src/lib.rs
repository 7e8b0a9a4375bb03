//! Employee management engine.
//!
//! This crate keeps employee, department, leave, attendance and payroll
//! records and derives the figures an HR backend reports on: yearly leave
//! balances, gross and net pay, hours worked, attendance rates, and the
//! leave and attendance reports and month calendars.
//!
//! The pure arithmetic lives in [`calculation`]; [`service`] applies it to
//! the records held in [`store`], and [`api`] exposes everything over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
