//! Bulk Import/Export (CSV)
//!
//! Import maps loosely-typed spreadsheet rows onto employee records with
//! tolerant header matching and field coercion; row-level failures are
//! collected and reported, never raised, so one bad row can't abort the
//! batch. Export is the inverse mapping over whatever rows the caller
//! queried, so the file matches the on-screen filter/sort context.
//!
//! Import/export is an admin-only operation and is not access-scoped.

use std::collections::HashMap;

use serde::Serialize;

use crate::db::models::{Employee, EmployeeCreate, EmployeeStatus};
use crate::db::repository::{EmployeeRepository, RepoError, RepoResult};
use crate::utils::money;

/// Historical header set, kept compatible with existing spreadsheet files
pub const EXPORT_HEADERS: [&str; 15] = [
    "SLNO",
    "Name",
    "Rate",
    "Role",
    "Team",
    "Cost-Centre",
    "C-ID",
    "Start-Date",
    "End-Date",
    "Status",
    "Band",
    "SOW-ID",
    "Appx Billing",
    "Shift",
    "Comments",
];

/// Import outcome: partial success is expected
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<String>,
}

/// Normalize a header for tolerant matching: lowercase, alphanumerics only.
/// `"Cost-Centre"`, `"cost centre"` and `"CostCentre"` all collapse to
/// `"costcentre"`.
fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Map a normalized header to its schema field, accepting known variants
fn header_field(normalized: &str) -> Option<&'static str> {
    match normalized {
        "name" => Some("name"),
        "rate" => Some("rate"),
        "role" => Some("role"),
        "team" => Some("team"),
        "costcentre" | "costcenter" => Some("cost_centre"),
        "cid" | "employeeid" => Some("external_id"),
        "startdate" => Some("start_date"),
        "enddate" => Some("end_date"),
        "status" => Some("status"),
        "band" => Some("band"),
        "sowid" => Some("sow_id"),
        "appxbilling" | "approxbilling" | "approximatemonthlybilling" => Some("monthly_billing"),
        "shift" => Some("shift"),
        "comments" => Some("comments"),
        _ => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Import employees from CSV bytes.
///
/// Rows with an empty name are skipped and reported with their (1-based,
/// header-inclusive) row number. Monetary fields are stripped of currency
/// symbols and separators, then coerced to two fraction digits; anything
/// unparseable becomes `"0.00"`. Team defaults to the `"NA"` sentinel;
/// status matches `"active"` case-insensitively and anything else imports
/// as inactive.
pub async fn import_csv(repo: &EmployeeRepository, bytes: &[u8]) -> RepoResult<ImportReport> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| RepoError::Validation(format!("Invalid CSV header: {e}")))?
        .clone();

    let mut columns: HashMap<&'static str, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        if let Some(field) = header_field(&normalize_header(header)) {
            columns.entry(field).or_insert(idx);
        }
    }

    let mut imported = 0usize;
    let mut errors = Vec::new();

    for (i, record) in reader.records().enumerate() {
        // +2: 1-based rows, plus the header row
        let row = i + 2;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                errors.push(format!("Row {row}: unreadable record ({e})"));
                continue;
            }
        };

        let field = |name: &str| -> Option<&str> {
            columns.get(name).and_then(|&idx| record.get(idx))
        };

        let Some(name) = non_empty(field("name")) else {
            errors.push(format!("Row {row}: missing required field 'name'"));
            continue;
        };

        let status = if field("status")
            .map(str::trim)
            .is_some_and(|s| s.eq_ignore_ascii_case("active"))
        {
            EmployeeStatus::Active
        } else {
            EmployeeStatus::Inactive
        };

        let data = EmployeeCreate {
            name,
            role: non_empty(field("role")),
            team: Some(non_empty(field("team")).unwrap_or_else(|| "NA".to_string())),
            cost_centre: non_empty(field("cost_centre")),
            external_id: non_empty(field("external_id")),
            rate: Some(money::normalize_or_zero(field("rate").unwrap_or(""))),
            status: Some(status),
            band: non_empty(field("band")),
            sow_id: non_empty(field("sow_id")),
            monthly_billing: Some(money::normalize_or_zero(field("monthly_billing").unwrap_or(""))),
            shift: non_empty(field("shift")),
            start_date: non_empty(field("start_date")),
            end_date: non_empty(field("end_date")),
            comments: non_empty(field("comments")),
        };

        match repo.create(data).await {
            Ok(_) => imported += 1,
            Err(e) => errors.push(format!("Row {row}: {e}")),
        }
    }

    tracing::info!(imported, errors = errors.len(), "CSV import finished");
    Ok(ImportReport { imported, errors })
}

/// Serialize employee rows to CSV bytes with the historical header set.
///
/// `SLNO` is the 1-based position within the supplied rows.
pub fn export_csv(rows: &[Employee]) -> RepoResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| RepoError::Serialization(format!("CSV write failed: {e}")))?;

    for (i, employee) in rows.iter().enumerate() {
        let opt = |value: &Option<String>| value.clone().unwrap_or_default();
        writer
            .write_record([
                (i + 1).to_string(),
                employee.name.clone(),
                employee.rate.clone(),
                opt(&employee.role),
                opt(&employee.team),
                opt(&employee.cost_centre),
                opt(&employee.external_id),
                opt(&employee.start_date),
                opt(&employee.end_date),
                employee.status.as_str().to_string(),
                opt(&employee.band),
                opt(&employee.sow_id),
                employee.monthly_billing.clone(),
                opt(&employee.shift),
                opt(&employee.comments),
            ])
            .map_err(|e| RepoError::Serialization(format!("CSV write failed: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| RepoError::Serialization(format!("CSV write failed: {e}")))
}
