//! Calculation logic for the HR engine.
//!
//! This module contains the pure domain math: inclusive calendar
//! arithmetic, the yearly leave ledger, payroll gross/net derivation and
//! lifecycle, attendance aggregation, and the leave and attendance reports
//! and calendars built on top of them. Nothing here touches the store.

mod attendance;
mod calendar;
mod leave_ledger;
mod payroll;
mod reporting;

pub use attendance::{
    attendance_rate, build_attendance_calendar, hours_worked, in_month, parse_clock_time,
    record_hours, summarize_attendance, AttendanceCalendar, AttendanceCalendarDay,
    AttendanceDayTally, AttendanceSummary,
};
pub use calendar::{
    dates_in_range, days_between_inclusive, is_weekend, month_bounds, month_name,
    validate_date_range, year_bounds,
};
pub use leave_ledger::{calculate_leave_balance, used_days_by_type, LeaveBalance, LeaveTypeBalance};
pub use payroll::{
    apply_pay_totals, calculate_pay_totals, compute_gross_pay, compute_net_pay, mark_payroll_paid,
    process_payroll, PayComponents, PayTotals,
};
pub use reporting::{
    build_leave_calendar, generate_attendance_report, generate_leave_report,
    monthly_attendance_summaries, total_overtime_hours, AttendanceReport, EmployeeAttendanceSummary,
    EmployeeLeaveSummary, EmployeeNames, LeaveCalendar, LeaveCalendarDay, LeaveReport,
    LeaveStatusTally, LeaveTypeTally, MonthlyAttendanceSummary,
};
