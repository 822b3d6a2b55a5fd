//! User Model
//!
//! Authentication itself lives outside this crate; callers pass an already
//! authenticated user id into the query layer.

use serde::{Deserialize, Serialize};

/// Principal role. Admins see every cost centre by rule (never persisted as
/// assignments); finance users see only their explicitly assigned set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Finance,
}

/// Authenticated principal
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
}
