//! Cost Centre Repository

use super::{RepoError, RepoResult};
use crate::db::models::{CostCentre, CostCentreCreate};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct CostCentreRepository {
    pool: SqlitePool,
}

impl CostCentreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all cost centres ordered by code
    pub async fn list(&self) -> RepoResult<Vec<CostCentre>> {
        let rows: Vec<CostCentre> =
            sqlx::query_as("SELECT id, code, description FROM cost_centres ORDER BY code")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    /// List every defined cost-centre code
    pub async fn codes(&self) -> RepoResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT code FROM cost_centres ORDER BY code")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Find a cost centre by its code
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<CostCentre>> {
        let row: Option<CostCentre> =
            sqlx::query_as("SELECT id, code, description FROM cost_centres WHERE code = ?")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    /// Create a new cost centre
    pub async fn create(&self, data: CostCentreCreate) -> RepoResult<CostCentre> {
        let code = data.code.trim();
        if code.is_empty() {
            return Err(RepoError::Validation("Cost centre code is required".to_string()));
        }
        if self.find_by_code(code).await?.is_some() {
            return Err(RepoError::Duplicate(format!("Cost centre '{code}' already exists")));
        }

        let created: CostCentre = sqlx::query_as(
            "INSERT INTO cost_centres (code, description) VALUES (?, ?) RETURNING id, code, description",
        )
        .bind(code)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }
}
