//! Changes-summary generation
//!
//! Every employee mutation records a human-readable diff in the row's
//! `changes_summary` column, consumed by the change-reports view. The diff
//! is driven by a declarative field table so the comparison set stays in
//! sync with the schema instead of hand-written per-field checks.

use crate::db::models::{Employee, EmployeeUpdate};

/// Summary recorded on create
pub const NEW_EMPLOYEE_SUMMARY: &str = "New employee added";

/// Summary recorded when an update touched nothing in the comparison set
pub const MINOR_UPDATE_SUMMARY: &str = "Minor update";

/// Tracked fields: display label, stored value, proposed value (if present
/// in the patch). Comments and timestamps are deliberately untracked.
fn tracked_fields(current: &Employee, patch: &EmployeeUpdate) -> Vec<(&'static str, String, Option<String>)> {
    fn opt(value: &Option<String>) -> String {
        value.clone().unwrap_or_default()
    }

    vec![
        ("Name", current.name.clone(), patch.name.clone()),
        ("Role", opt(&current.role), patch.role.clone()),
        ("Team", opt(&current.team), patch.team.clone()),
        (
            "Status",
            current.status.as_str().to_string(),
            patch.status.map(|s| s.as_str().to_string()),
        ),
        ("Rate", current.rate.clone(), patch.rate.clone()),
        ("Cost Centre", opt(&current.cost_centre), patch.cost_centre.clone()),
        ("C-ID", opt(&current.external_id), patch.external_id.clone()),
        ("Band", opt(&current.band), patch.band.clone()),
        ("Shift", opt(&current.shift), patch.shift.clone()),
        ("Start Date", opt(&current.start_date), patch.start_date.clone()),
        ("End Date", opt(&current.end_date), patch.end_date.clone()),
        (
            "Monthly Billing",
            current.monthly_billing.clone(),
            patch.monthly_billing.clone(),
        ),
    ]
}

/// Build the changes summary for an update.
///
/// Fields absent from the patch are ignored; fields whose proposed value
/// equals the stored value produce no entry. Monetary fields in the patch
/// must already be normalized so equal amounts compare equal.
pub fn changes_summary(current: &Employee, patch: &EmployeeUpdate) -> String {
    let entries: Vec<String> = tracked_fields(current, patch)
        .into_iter()
        .filter_map(|(label, old, proposed)| {
            let new = proposed?;
            if new == old {
                return None;
            }
            Some(format!("{label}: {old} → {new}"))
        })
        .collect();

    if entries.is_empty() {
        MINOR_UPDATE_SUMMARY.to_string()
    } else {
        entries.join("; ")
    }
}

/// Summary recorded on soft delete
pub fn delete_summary(employee: &Employee) -> String {
    format!(
        "Employee deleted: {} ({})",
        employee.name,
        employee.role.as_deref().unwrap_or("")
    )
}
