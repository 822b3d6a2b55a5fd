//! Access Scope Resolution
//!
//! A user's access scope is the set of cost-centre codes they may see.
//! Admins see every code currently defined, recomputed on each call so a
//! newly added cost centre is visible immediately, without a stored
//! assignment. Everyone else sees exactly their explicitly assigned set.
//!
//! An unknown user id resolves to an empty scope, not an error, so listing
//! and report endpoints stay resilient to stale sessions.

use std::collections::HashSet;

use sqlx::SqlitePool;

use crate::db::models::UserRole;
use crate::db::repository::{CostCentreRepository, RepoResult, UserRepository};

/// Resolve the set of cost-centre codes a user may act on.
pub async fn resolve_accessible_cost_centres(
    pool: &SqlitePool,
    user_id: i64,
) -> RepoResult<HashSet<String>> {
    let users = UserRepository::new(pool.clone());
    let Some(user) = users.find_by_id(user_id).await? else {
        return Ok(HashSet::new());
    };

    match user.role {
        UserRole::Admin => {
            let centres = CostCentreRepository::new(pool.clone());
            Ok(centres.codes().await?.into_iter().collect())
        }
        UserRole::Finance => {
            Ok(users.assigned_codes(user_id).await?.into_iter().collect())
        }
    }
}

/// Membership test against the resolved scope, with the admin short-circuit.
pub async fn user_can_access_cost_centre(
    pool: &SqlitePool,
    user_id: i64,
    code: &str,
) -> RepoResult<bool> {
    let users = UserRepository::new(pool.clone());
    let Some(user) = users.find_by_id(user_id).await? else {
        return Ok(false);
    };
    if user.role == UserRole::Admin {
        return Ok(true);
    }
    Ok(users.assigned_codes(user_id).await?.iter().any(|c| c == code))
}

/// Scope restriction applied by the query and aggregation engines.
#[derive(Debug, Clone)]
pub(crate) enum ScopeFilter {
    /// No caller supplied, or the caller is an admin
    Unrestricted,
    /// Restrict to these codes; an empty set short-circuits to empty results
    Codes(HashSet<String>),
}

impl ScopeFilter {
    /// True when no row can possibly match (no query should be issued)
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, ScopeFilter::Codes(codes) if codes.is_empty())
    }
}

/// Resolve the scope restriction for an optional caller.
///
/// Admins are unrestricted rather than expanded into the full code list, so
/// rows referencing codes that were never defined as cost centres still show
/// up for them.
pub(crate) async fn scope_filter(
    pool: &SqlitePool,
    caller_user_id: Option<i64>,
) -> RepoResult<ScopeFilter> {
    let Some(user_id) = caller_user_id else {
        return Ok(ScopeFilter::Unrestricted);
    };

    let users = UserRepository::new(pool.clone());
    let Some(user) = users.find_by_id(user_id).await? else {
        // Stale session: hide everything rather than erroring
        return Ok(ScopeFilter::Codes(HashSet::new()));
    };

    match user.role {
        UserRole::Admin => Ok(ScopeFilter::Unrestricted),
        UserRole::Finance => Ok(ScopeFilter::Codes(
            users.assigned_codes(user_id).await?.into_iter().collect(),
        )),
    }
}
