//! `guardpost-payroll` — salary adjustments and expense claims.
//!
//! Both record kinds exist only as approval outcomes: the payroll module has
//! no direct write path for non-privileged roles.

pub mod payroll;

pub use payroll::{
    ExpenseClaim, NewExpenseClaim, NewSalaryAdjustment, PayrollRecordId, PayrollRepository,
    SalaryAdjustment,
};
