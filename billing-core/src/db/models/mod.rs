//! Database models

pub mod cost_centre;
pub mod employee;
pub mod user;

pub use cost_centre::{CostCentre, CostCentreCreate};
pub use employee::{Employee, EmployeeCreate, EmployeeStatus, EmployeeUpdate};
pub use user::{User, UserRole};
