//! billing-core: access-scoped data layer for employee billing administration
//!
//! Role-gated employee queries, dashboard/billing aggregation, mutation with
//! a recorded changes summary, and CSV bulk import/export over an embedded
//! SQLite store. The HTTP layer, authentication and UI live outside this
//! crate; callers pass an already-authenticated user id where scoping
//! applies.

pub mod access;
pub mod audit;
pub mod db;
pub mod reports;
pub mod transfer;
pub mod utils;

pub use db::DbService;
pub use db::models::{
    CostCentre, CostCentreCreate, Employee, EmployeeCreate, EmployeeStatus, EmployeeUpdate, User,
    UserRole,
};
pub use db::repository::{
    CostCentreRepository, EmployeeFilter, EmployeePage, EmployeeRepository, EmployeeSort, Page,
    RepoError, RepoResult, SortOrder, UserRepository, page_count,
};
