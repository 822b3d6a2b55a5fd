//! Employee Model

use serde::{Deserialize, Serialize};

/// Lifecycle state of an employee record.
///
/// `Deleted` is a soft-delete marker: the row stays in place for the audit
/// trail and is only hidden from default listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Deleted,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::Deleted => "deleted",
        }
    }
}

/// Employee row
///
/// `rate` and `monthly_billing` are canonical two-fraction-digit decimal
/// strings; `start_date`/`end_date` are free-text DD-MM-YYYY display strings,
/// not native dates. Timestamps are UTC milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub role: Option<String>,
    pub team: Option<String>,
    pub cost_centre: Option<String>,
    /// External employee id ("C-ID" on spreadsheets)
    pub external_id: Option<String>,
    pub rate: String,
    pub status: EmployeeStatus,
    pub band: Option<String>,
    pub sow_id: Option<String>,
    pub monthly_billing: String,
    pub shift: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub comments: Option<String>,
    /// Human-readable diff recorded on every mutation, overwritten each time
    pub changes_summary: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create employee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub name: String,
    pub role: Option<String>,
    pub team: Option<String>,
    pub cost_centre: Option<String>,
    pub external_id: Option<String>,
    pub rate: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub band: Option<String>,
    pub sow_id: Option<String>,
    pub monthly_billing: Option<String>,
    pub shift: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub comments: Option<String>,
}

/// Update employee payload; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_centre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sow_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_billing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}
