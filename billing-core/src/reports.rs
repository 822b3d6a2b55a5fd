//! Aggregation Engine
//!
//! Dashboard statistics, team distribution, cost-centre billing reports and
//! change reports. Every operation takes an optional caller and applies the
//! same access-scope intersection as the listing engine: an empty scope
//! yields a zero-valued/empty result, never an error.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::access::{self, ScopeFilter};
use crate::db::models::Employee;
use crate::db::repository::{EmployeePage, Page, RepoResult, SortOrder};
use crate::utils::time::{self, ReportWindow};

/// Dashboard headline numbers. Deleted rows are always excluded; the rate
/// average only counts active rows with a positive rate.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct EmployeeStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub monthly_billing: f64,
    pub average_rate: f64,
}

/// Active employee count for one team
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TeamCount {
    pub team: String,
    pub count: i64,
}

/// One cost-centre group in the billing report
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CostCentreBillingRow {
    pub cost_centre: String,
    pub total_billing: f64,
    pub active_count: i64,
    pub average_rate: f64,
}

/// Paginated billing report plus grand totals over every group
#[derive(Debug, Clone, Serialize)]
pub struct CostCentreBillingReport {
    pub rows: Vec<CostCentreBillingRow>,
    /// Number of groups pre-pagination
    pub total: i64,
    pub grand_total_billing: f64,
    pub grand_active_count: i64,
    pub grand_average_rate: f64,
}

/// Billing report filters
#[derive(Debug, Clone, Default)]
pub struct BillingReportFilter {
    /// Case-insensitive substring match on cost-centre code
    pub search: Option<String>,
}

/// Sort for report queries
#[derive(Debug, Clone)]
pub struct ReportSort {
    pub key: String,
    pub order: SortOrder,
}

impl Default for ReportSort {
    fn default() -> Self {
        Self {
            key: "cost_centre".to_string(),
            order: SortOrder::Asc,
        }
    }
}

/// One month of the simulated performance series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformancePoint {
    pub month: String,
    pub billing: f64,
}

/// Simulated six-month trailing series for one cost centre
#[derive(Debug, Clone, Serialize)]
pub struct CostCentrePerformance {
    pub cost_centre: String,
    pub series: Vec<PerformancePoint>,
}

/// Change report filters
#[derive(Debug, Clone, Default)]
pub struct ChangeReportFilter {
    pub window: ReportWindow,
    /// Case-insensitive prefix match on name
    pub search: Option<String>,
    /// Exact team; `"all"` sentinel lifts the restriction
    pub team: Option<String>,
    /// Exact status; absent or `"all"` places no restriction (delete entries
    /// are part of the audit trail and stay visible by default)
    pub status: Option<String>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn push_scope(qb: &mut QueryBuilder<'_, Sqlite>, scope: &ScopeFilter) {
    if let ScopeFilter::Codes(codes) = scope {
        qb.push(" AND cost_centre IN (");
        let mut separated = qb.separated(", ");
        for code in codes {
            separated.push_bind(code.clone());
        }
        qb.push(")");
    }
}

/// Headline statistics for the dashboard.
pub async fn employee_stats(
    pool: &SqlitePool,
    caller_user_id: Option<i64>,
) -> RepoResult<EmployeeStats> {
    let scope = access::scope_filter(pool, caller_user_id).await?;
    if scope.is_empty() {
        return Ok(EmployeeStats {
            total: 0,
            active: 0,
            inactive: 0,
            monthly_billing: 0.0,
            average_rate: 0.0,
        });
    }

    let mut qb = QueryBuilder::new(
        r#"
        SELECT COUNT(*) AS total,
               COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0) AS active,
               COALESCE(SUM(CASE WHEN status = 'inactive' THEN 1 ELSE 0 END), 0) AS inactive,
               COALESCE(SUM(CASE WHEN status = 'active' THEN CAST(monthly_billing AS REAL) ELSE 0.0 END), 0.0) AS monthly_billing,
               COALESCE(AVG(CASE WHEN status = 'active' AND CAST(rate AS REAL) > 0.0 THEN CAST(rate AS REAL) END), 0.0) AS average_rate
        FROM employees
        WHERE status != 'deleted'
        "#,
    );
    push_scope(&mut qb, &scope);

    let mut stats: EmployeeStats = qb.build_query_as().fetch_one(pool).await?;
    stats.monthly_billing = round2(stats.monthly_billing);
    stats.average_rate = round2(stats.average_rate);
    Ok(stats)
}

/// Active employees per team, unassigned sentinel excluded, largest first.
pub async fn team_distribution(
    pool: &SqlitePool,
    caller_user_id: Option<i64>,
) -> RepoResult<Vec<TeamCount>> {
    let scope = access::scope_filter(pool, caller_user_id).await?;
    if scope.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::new(
        r#"
        SELECT team, COUNT(*) AS count
        FROM employees
        WHERE status = 'active' AND team IS NOT NULL AND team != '' AND team != 'NA'
        "#,
    );
    push_scope(&mut qb, &scope);
    qb.push(" GROUP BY team ORDER BY count DESC, team ASC");

    let rows: Vec<TeamCount> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows)
}

fn billing_sort_column(key: &str) -> &'static str {
    match key {
        "cost_centre" => "cost_centre",
        "billing" => "total_billing",
        "count" => "active_count",
        "rate" => "average_rate",
        _ => "cost_centre",
    }
}

/// Shared WHERE clause for the billing report queries
fn push_billing_conditions(
    qb: &mut QueryBuilder<'_, Sqlite>,
    filter: &BillingReportFilter,
    scope: &ScopeFilter,
) {
    qb.push(
        "WHERE status = 'active' AND cost_centre IS NOT NULL AND cost_centre != ''",
    );
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        qb.push(" AND LOWER(cost_centre) LIKE ");
        qb.push_bind(format!(
            "%{}%",
            crate::db::repository::employee::escape_like(&search.to_lowercase())
        ));
        qb.push(" ESCAPE '\\'");
    }
    push_scope(qb, scope);
}

/// Billing and headcount per cost centre, with grand totals over all groups
/// regardless of pagination.
pub async fn cost_centre_billing_report(
    pool: &SqlitePool,
    filter: &BillingReportFilter,
    page: Page,
    sort: &ReportSort,
    caller_user_id: Option<i64>,
) -> RepoResult<CostCentreBillingReport> {
    let scope = access::scope_filter(pool, caller_user_id).await?;
    if scope.is_empty() {
        return Ok(CostCentreBillingReport {
            rows: Vec::new(),
            total: 0,
            grand_total_billing: 0.0,
            grand_active_count: 0,
            grand_average_rate: 0.0,
        });
    }

    let mut count_qb = QueryBuilder::new("SELECT COUNT(DISTINCT cost_centre) FROM employees ");
    push_billing_conditions(&mut count_qb, filter, &scope);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut totals_qb = QueryBuilder::new(
        r#"
        SELECT COALESCE(SUM(CAST(monthly_billing AS REAL)), 0.0),
               COUNT(*),
               COALESCE(AVG(CASE WHEN CAST(rate AS REAL) > 0.0 THEN CAST(rate AS REAL) END), 0.0)
        FROM employees
        "#,
    );
    push_billing_conditions(&mut totals_qb, filter, &scope);
    let (grand_billing, grand_count, grand_rate): (f64, i64, f64) =
        totals_qb.build_query_as().fetch_one(pool).await?;

    let mut qb = QueryBuilder::new(
        r#"
        SELECT cost_centre,
               COALESCE(SUM(CAST(monthly_billing AS REAL)), 0.0) AS total_billing,
               COUNT(*) AS active_count,
               COALESCE(AVG(CASE WHEN CAST(rate AS REAL) > 0.0 THEN CAST(rate AS REAL) END), 0.0) AS average_rate
        FROM employees
        "#,
    );
    push_billing_conditions(&mut qb, filter, &scope);
    qb.push(" GROUP BY cost_centre ORDER BY ");
    qb.push(billing_sort_column(&sort.key));
    qb.push(" ");
    qb.push(sort.order.as_sql());
    qb.push(", cost_centre ASC LIMIT ");
    qb.push_bind(page.limit);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset);

    let mut rows: Vec<CostCentreBillingRow> = qb.build_query_as().fetch_all(pool).await?;
    for row in &mut rows {
        row.total_billing = round2(row.total_billing);
        row.average_rate = round2(row.average_rate);
    }

    Ok(CostCentreBillingReport {
        rows,
        total,
        grand_total_billing: round2(grand_billing),
        grand_active_count: grand_count,
        grand_average_rate: round2(grand_rate),
    })
}

/// Simulated six-month trailing billing series per cost centre.
///
/// This is a demo projection, not history: there is no time-series data in
/// the model, so the series is derived from the current snapshot on every
/// call with a deterministic seeded variation: the same snapshot always
/// produces the same series, and the current month equals the snapshot.
pub async fn cost_centre_performance(
    pool: &SqlitePool,
    caller_user_id: Option<i64>,
) -> RepoResult<Vec<CostCentrePerformance>> {
    let scope = access::scope_filter(pool, caller_user_id).await?;
    if scope.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::new(
        r#"
        SELECT cost_centre, COALESCE(SUM(CAST(monthly_billing AS REAL)), 0.0) AS total_billing
        FROM employees
        WHERE status = 'active' AND cost_centre IS NOT NULL AND cost_centre != ''
        "#,
    );
    push_scope(&mut qb, &scope);
    qb.push(" GROUP BY cost_centre ORDER BY cost_centre ASC");

    let snapshot: Vec<(String, f64)> = qb.build_query_as().fetch_all(pool).await?;
    let now = time::now_millis();

    let result = snapshot
        .into_iter()
        .map(|(code, current)| {
            let series = (0..6)
                .map(|idx| {
                    let month = time::month_label(now, 5 - idx as u32);
                    let billing = if idx == 5 {
                        round2(current)
                    } else {
                        let mut hasher = DefaultHasher::new();
                        code.hash(&mut hasher);
                        idx.hash(&mut hasher);
                        let mut rng = StdRng::seed_from_u64(hasher.finish());
                        let ramp = 0.80 + 0.04 * idx as f64;
                        let jitter: f64 = rng.gen_range(-0.05..0.05);
                        round2((current * (ramp + jitter)).max(0.0))
                    };
                    PerformancePoint { month, billing }
                })
                .collect();
            CostCentrePerformance { cost_centre: code, series }
        })
        .collect();

    Ok(result)
}

fn change_sort_column(key: &str) -> &'static str {
    match key {
        "name" => "name",
        _ => "updated_at",
    }
}

/// Default change-report sort: most recently updated first
pub fn default_change_sort() -> ReportSort {
    ReportSort {
        key: "updated_at".to_string(),
        order: SortOrder::Desc,
    }
}

fn push_change_conditions(
    qb: &mut QueryBuilder<'_, Sqlite>,
    filter: &ChangeReportFilter,
    scope: &ScopeFilter,
    now: i64,
) {
    let (start, end) = filter.window.bounds(now);
    qb.push("WHERE changes_summary IS NOT NULL AND changes_summary != ''");
    qb.push(" AND updated_at >= ");
    qb.push_bind(start);
    qb.push(" AND updated_at <= ");
    qb.push_bind(end);

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        qb.push(" AND LOWER(name) LIKE ");
        qb.push_bind(format!(
            "{}%",
            crate::db::repository::employee::escape_like(&search.to_lowercase())
        ));
        qb.push(" ESCAPE '\\'");
    }
    if let Some(team) = filter.team.as_deref().filter(|t| *t != "all") {
        qb.push(" AND team = ");
        qb.push_bind(team.to_string());
    }
    if let Some(status) = filter.status.as_deref().filter(|s| *s != "all") {
        qb.push(" AND status = ");
        qb.push_bind(status.to_string());
    }
    push_scope(qb, scope);
}

/// Employees with a recorded changes summary inside the update-time window.
pub async fn change_reports(
    pool: &SqlitePool,
    filter: &ChangeReportFilter,
    page: Page,
    sort: &ReportSort,
    caller_user_id: Option<i64>,
) -> RepoResult<EmployeePage> {
    let scope = access::scope_filter(pool, caller_user_id).await?;
    if scope.is_empty() {
        return Ok(EmployeePage::empty());
    }

    let now = time::now_millis();

    let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM employees ");
    push_change_conditions(&mut count_qb, filter, &scope, now);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::new("SELECT * FROM employees ");
    push_change_conditions(&mut qb, filter, &scope, now);
    qb.push(" ORDER BY ");
    qb.push(change_sort_column(&sort.key));
    qb.push(" ");
    qb.push(sort.order.as_sql());
    qb.push(", id ASC LIMIT ");
    qb.push_bind(page.limit);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset);

    let rows: Vec<Employee> = qb.build_query_as().fetch_all(pool).await?;
    Ok(EmployeePage { rows, total })
}
