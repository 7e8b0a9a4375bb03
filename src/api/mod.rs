//! HTTP API module for the HR engine.
//!
//! This module provides the REST endpoints for employees, departments,
//! leave, attendance and payroll, all mounted under `/api`.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ApproveQuery, DateRangeQuery, EmployeeFilterQuery, MonthQuery, OptionalMonthQuery,
    PaymentQuery, PeriodQuery, RejectQuery, ReportQuery, SearchQuery, YearQuery,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
