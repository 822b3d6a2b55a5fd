//! Repository Module
//!
//! CRUD and query operations over the SQLite store. One repository per
//! aggregate; all of them share the [`RepoError`] taxonomy.

pub mod cost_centre;
pub mod employee;
pub mod user;

pub use cost_centre::CostCentreRepository;
pub use employee::{EmployeeFilter, EmployeePage, EmployeeRepository, EmployeeSort, SortOrder};
pub use user::UserRepository;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Offset/limit pagination. Default page size is 50.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self { offset: 0, limit: 50 }
    }
}

/// Page count for a pre-pagination total (caller-side page arithmetic)
pub fn page_count(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
