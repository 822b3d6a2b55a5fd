//! User Repository
//!
//! Users and their cost-centre assignments. Only explicit assignments are
//! stored; the admin all-access rule is evaluated in the access module.

use super::{RepoError, RepoResult};
use crate::db::models::{User, UserRole};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let user: Option<User> =
            sqlx::query_as("SELECT id, username, role FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    /// Create a new user
    pub async fn create(&self, username: &str, role: UserRole) -> RepoResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RepoError::Validation("Username is required".to_string()));
        }

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(RepoError::Duplicate(format!("Username '{username}' already exists")));
        }

        let created: User = sqlx::query_as(
            "INSERT INTO users (username, role) VALUES (?, ?) RETURNING id, username, role",
        )
        .bind(username)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Assign a cost centre to a user (idempotent)
    pub async fn assign_cost_centre(&self, user_id: i64, code: &str) -> RepoResult<()> {
        let centre: Option<(i64,)> = sqlx::query_as("SELECT id FROM cost_centres WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        let Some((cost_centre_id,)) = centre else {
            return Err(RepoError::NotFound(format!("Cost centre '{code}' not found")));
        };

        sqlx::query(
            "INSERT OR IGNORE INTO user_cost_centres (user_id, cost_centre_id) VALUES (?, ?)",
        )
        .bind(user_id)
        .bind(cost_centre_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Remove a cost-centre assignment from a user
    pub async fn unassign_cost_centre(&self, user_id: i64, code: &str) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM user_cost_centres
            WHERE user_id = ?
              AND cost_centre_id IN (SELECT id FROM cost_centres WHERE code = ?)
            "#,
        )
        .bind(user_id)
        .bind(code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Cost-centre codes explicitly assigned to a user
    pub async fn assigned_codes(&self, user_id: i64) -> RepoResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT cc.code
            FROM user_cost_centres ucc
            JOIN cost_centres cc ON cc.id = ucc.cost_centre_id
            WHERE ucc.user_id = ?
            ORDER BY cc.code
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
