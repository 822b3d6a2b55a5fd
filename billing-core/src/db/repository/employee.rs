//! Employee Repository
//!
//! Filtered, sorted, paginated listings plus the mutation path that records
//! a changes summary on every write. Deletion is a status transition, never
//! a row removal; [`EmployeeRepository::clear_all`] is the one intentional
//! hard delete (demo/test reset).
//!
//! Concurrent updates to the same row are last-write-wins: there is no
//! optimistic locking, and two concurrent edits may overwrite each other's
//! changes summary. Known gap, carried deliberately.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{Page, RepoError, RepoResult};
use crate::access::{self, ScopeFilter};
use crate::audit;
use crate::db::models::{Employee, EmployeeCreate, EmployeeStatus, EmployeeUpdate};
use crate::utils::{money, time};

/// Listing filters. All optional; `None` means no restriction except for
/// `status`, where the default hides soft-deleted rows.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Case-insensitive prefix match on name (prefix, not substring, for
    /// predictable ordering)
    pub search: Option<String>,
    /// Exact team; `"all"` sentinel lifts the restriction
    pub team: Option<String>,
    /// Exact status; `"all"` sentinel lifts the restriction. Absent or
    /// `"all"` excludes `deleted` rows
    pub status: Option<String>,
    /// Exact role
    pub role: Option<String>,
    /// Exact cost centre; `"none"` sentinel matches unassigned rows
    pub cost_centre: Option<String>,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Listing sort. Unknown keys fall back to name ascending.
#[derive(Debug, Clone)]
pub struct EmployeeSort {
    pub key: String,
    pub order: SortOrder,
}

impl Default for EmployeeSort {
    fn default() -> Self {
        Self {
            key: "name".to_string(),
            order: SortOrder::Asc,
        }
    }
}

/// One page of results plus the pre-pagination total
#[derive(Debug, Clone, serde::Serialize)]
pub struct EmployeePage {
    pub rows: Vec<Employee>,
    pub total: i64,
}

impl EmployeePage {
    pub fn empty() -> Self {
        Self { rows: Vec::new(), total: 0 }
    }
}

/// Sortable column allow-list; anything else falls back to name
fn sort_column(key: &str) -> &'static str {
    match key {
        "name" => "name",
        "role" => "role",
        "team" => "team",
        "cost_centre" => "cost_centre",
        "external_id" => "external_id",
        "status" => "status",
        "rate" => "CAST(rate AS REAL)",
        "start_date" => "start_date",
        "monthly_billing" => "CAST(monthly_billing AS REAL)",
        _ => "name",
    }
}

/// Escape LIKE wildcards in user-supplied search text
pub(crate) fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Append the filter and scope conditions. Callers open with `WHERE 1 = 1`.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &EmployeeFilter, scope: &ScopeFilter) {
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        qb.push(" AND LOWER(name) LIKE ");
        qb.push_bind(format!("{}%", escape_like(&search.to_lowercase())));
        qb.push(" ESCAPE '\\'");
    }

    if let Some(team) = filter.team.as_deref().filter(|t| *t != "all") {
        qb.push(" AND team = ");
        qb.push_bind(team.to_string());
    }

    match filter.status.as_deref() {
        None | Some("all") => {
            qb.push(" AND status != 'deleted'");
        }
        Some(status) => {
            qb.push(" AND status = ");
            qb.push_bind(status.to_string());
        }
    }

    if let Some(role) = filter.role.as_deref() {
        qb.push(" AND role = ");
        qb.push_bind(role.to_string());
    }

    match filter.cost_centre.as_deref() {
        Some("none") => {
            qb.push(" AND (cost_centre IS NULL OR cost_centre = '')");
        }
        Some(code) => {
            qb.push(" AND cost_centre = ");
            qb.push_bind(code.to_string());
        }
        None => {}
    }

    if let ScopeFilter::Codes(codes) = scope {
        qb.push(" AND cost_centre IN (");
        let mut separated = qb.separated(", ");
        for code in codes {
            separated.push_bind(code.clone());
        }
        qb.push(")");
    }
}

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// List employees honoring filters, access scope, sort and pagination.
    ///
    /// A non-admin caller with an empty accessible set short-circuits to an
    /// empty page without touching the employees table.
    pub async fn list(
        &self,
        filter: &EmployeeFilter,
        page: Page,
        sort: &EmployeeSort,
        caller_user_id: Option<i64>,
    ) -> RepoResult<EmployeePage> {
        let scope = access::scope_filter(&self.pool, caller_user_id).await?;
        if scope.is_empty() {
            return Ok(EmployeePage::empty());
        }

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM employees WHERE 1 = 1");
        push_filters(&mut count_qb, filter, &scope);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM employees WHERE 1 = 1");
        push_filters(&mut qb, filter, &scope);
        qb.push(" ORDER BY ");
        qb.push(sort_column(&sort.key));
        qb.push(" ");
        qb.push(sort.order.as_sql());
        qb.push(", id ASC LIMIT ");
        qb.push_bind(page.limit);
        qb.push(" OFFSET ");
        qb.push_bind(page.offset);

        let rows: Vec<Employee> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(EmployeePage { rows, total })
    }

    /// Find employee by id. Returns soft-deleted rows too.
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Employee>> {
        let employee: Option<Employee> = sqlx::query_as("SELECT * FROM employees WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    /// Create a new employee with `changes_summary = "New employee added"`
    pub async fn create(&self, data: EmployeeCreate) -> RepoResult<Employee> {
        let name = data.name.trim();
        if name.is_empty() {
            return Err(RepoError::Validation("Employee name is required".to_string()));
        }

        let rate = money::normalize_or_zero(data.rate.as_deref().unwrap_or(""));
        let monthly_billing = money::normalize_or_zero(data.monthly_billing.as_deref().unwrap_or(""));
        let status = data.status.unwrap_or(EmployeeStatus::Active);
        let now = time::now_millis();

        let created: Employee = sqlx::query_as(
            r#"
            INSERT INTO employees (
                name, role, team, cost_centre, external_id, rate, status,
                band, sow_id, monthly_billing, shift, start_date, end_date,
                comments, changes_summary, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(&data.role)
        .bind(&data.team)
        .bind(&data.cost_centre)
        .bind(&data.external_id)
        .bind(&rate)
        .bind(status)
        .bind(&data.band)
        .bind(&data.sow_id)
        .bind(&monthly_billing)
        .bind(&data.shift)
        .bind(&data.start_date)
        .bind(&data.end_date)
        .bind(&data.comments)
        .bind(audit::NEW_EMPLOYEE_SUMMARY)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(employee_id = created.id, "Employee created");
        Ok(created)
    }

    /// Update an employee, recording a field-by-field changes summary.
    ///
    /// Fails with `NotFound` if the row is absent. Fields missing from the
    /// patch are left untouched; monetary fields are normalized before the
    /// diff so equal amounts never produce noise entries.
    pub async fn update(&self, id: i64, patch: EmployeeUpdate) -> RepoResult<Employee> {
        let mut patch = patch;
        if let Some(name) = patch.name.as_deref() {
            if name.trim().is_empty() {
                return Err(RepoError::Validation("Employee name is required".to_string()));
            }
        }
        if let Some(rate) = patch.rate.as_deref() {
            patch.rate = Some(money::normalize_or_zero(rate));
        }
        if let Some(billing) = patch.monthly_billing.as_deref() {
            patch.monthly_billing = Some(money::normalize_or_zero(billing));
        }

        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))?;

        let summary = audit::changes_summary(&current, &patch);
        // Strictly increasing even when two mutations land in one millisecond
        let updated_at = time::now_millis().max(current.updated_at + 1);

        let updated: Employee = sqlx::query_as(
            r#"
            UPDATE employees SET
                name = COALESCE(?, name),
                role = COALESCE(?, role),
                team = COALESCE(?, team),
                cost_centre = COALESCE(?, cost_centre),
                external_id = COALESCE(?, external_id),
                rate = COALESCE(?, rate),
                status = COALESCE(?, status),
                band = COALESCE(?, band),
                sow_id = COALESCE(?, sow_id),
                monthly_billing = COALESCE(?, monthly_billing),
                shift = COALESCE(?, shift),
                start_date = COALESCE(?, start_date),
                end_date = COALESCE(?, end_date),
                comments = COALESCE(?, comments),
                changes_summary = ?,
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&patch.name)
        .bind(&patch.role)
        .bind(&patch.team)
        .bind(&patch.cost_centre)
        .bind(&patch.external_id)
        .bind(&patch.rate)
        .bind(patch.status)
        .bind(&patch.band)
        .bind(&patch.sow_id)
        .bind(&patch.monthly_billing)
        .bind(&patch.shift)
        .bind(&patch.start_date)
        .bind(&patch.end_date)
        .bind(&patch.comments)
        .bind(&summary)
        .bind(updated_at)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(employee_id = id, summary = %summary, "Employee updated");
        Ok(updated)
    }

    /// Soft-delete an employee. Missing rows are a tolerated no-op.
    pub async fn delete(&self, id: i64) -> RepoResult<()> {
        let Some(current) = self.find_by_id(id).await? else {
            return Ok(());
        };

        let summary = audit::delete_summary(&current);
        let updated_at = time::now_millis().max(current.updated_at + 1);

        sqlx::query(
            "UPDATE employees SET status = 'deleted', changes_summary = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&summary)
        .bind(updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        tracing::info!(employee_id = id, "Employee soft-deleted");
        Ok(())
    }

    /// Bulk wipe: physically removes every employee row.
    ///
    /// The one intentional hard delete, used to reset demo/test data. Not to
    /// be confused with [`Self::delete`].
    pub async fn clear_all(&self) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM employees").execute(&self.pool).await?;
        tracing::info!(removed = result.rows_affected(), "All employee rows cleared");
        Ok(result.rows_affected())
    }
}
