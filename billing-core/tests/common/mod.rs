//! Shared test fixtures: scratch SQLite database and seed helpers

use billing_core::{
    CostCentreCreate, CostCentreRepository, DbService, EmployeeCreate, EmployeeRepository,
    EmployeeStatus, UserRepository, UserRole,
};

/// Open a fresh migrated database in a tempdir. Keep the `TempDir` alive for
/// the duration of the test.
pub async fn setup() -> (DbService, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("billing.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    (db, tmp)
}

pub fn employees(db: &DbService) -> EmployeeRepository {
    EmployeeRepository::new(db.pool.clone())
}

pub fn cost_centres(db: &DbService) -> CostCentreRepository {
    CostCentreRepository::new(db.pool.clone())
}

pub fn users(db: &DbService) -> UserRepository {
    UserRepository::new(db.pool.clone())
}

/// Minimal employee payload builder
pub fn employee(name: &str) -> EmployeeCreate {
    EmployeeCreate {
        name: name.to_string(),
        ..Default::default()
    }
}

/// Fully-populated employee payload builder
pub fn billed_employee(
    name: &str,
    team: &str,
    cost_centre: Option<&str>,
    rate: &str,
    monthly_billing: &str,
    status: EmployeeStatus,
) -> EmployeeCreate {
    EmployeeCreate {
        name: name.to_string(),
        role: Some("Developer".to_string()),
        team: Some(team.to_string()),
        cost_centre: cost_centre.map(str::to_string),
        rate: Some(rate.to_string()),
        monthly_billing: Some(monthly_billing.to_string()),
        status: Some(status),
        ..Default::default()
    }
}

/// Define a cost centre code
pub async fn define_cost_centre(db: &DbService, code: &str) {
    cost_centres(db)
        .create(CostCentreCreate {
            code: code.to_string(),
            description: None,
        })
        .await
        .unwrap();
}

/// Create a finance user assigned to the given codes (codes must exist)
pub async fn finance_user(db: &DbService, username: &str, codes: &[&str]) -> i64 {
    let repo = users(db);
    let user = repo.create(username, UserRole::Finance).await.unwrap();
    for code in codes {
        repo.assign_cost_centre(user.id, code).await.unwrap();
    }
    user.id
}

/// Create an admin user
pub async fn admin_user(db: &DbService, username: &str) -> i64 {
    users(db).create(username, UserRole::Admin).await.unwrap().id
}
