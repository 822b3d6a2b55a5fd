//! Access scope resolution: admin rule freshness, finance assignments,
//! stale-session tolerance

mod common;

use billing_core::access::{resolve_accessible_cost_centres, user_can_access_cost_centre};

#[tokio::test]
async fn admin_scope_covers_every_defined_code() {
    let (db, _tmp) = common::setup().await;
    common::define_cost_centre(&db, "CC-100").await;
    common::define_cost_centre(&db, "CC-200").await;
    let admin = common::admin_user(&db, "root").await;

    let scope = resolve_accessible_cost_centres(&db.pool, admin).await.unwrap();
    assert_eq!(scope.len(), 2);
    assert!(scope.contains("CC-100"));
    assert!(scope.contains("CC-200"));
}

#[tokio::test]
async fn admin_scope_is_recomputed_not_cached() {
    let (db, _tmp) = common::setup().await;
    common::define_cost_centre(&db, "CC-100").await;
    let admin = common::admin_user(&db, "root").await;

    let before = resolve_accessible_cost_centres(&db.pool, admin).await.unwrap();
    assert_eq!(before.len(), 1);

    // A code added after the admin user existed must be visible immediately
    common::define_cost_centre(&db, "CC-300").await;
    let after = resolve_accessible_cost_centres(&db.pool, admin).await.unwrap();
    assert_eq!(after.len(), 2);
    assert!(after.contains("CC-300"));
}

#[tokio::test]
async fn finance_scope_is_exactly_the_assigned_set() {
    let (db, _tmp) = common::setup().await;
    common::define_cost_centre(&db, "CC-100").await;
    common::define_cost_centre(&db, "CC-200").await;
    let finance = common::finance_user(&db, "fin", &["CC-100"]).await;

    let scope = resolve_accessible_cost_centres(&db.pool, finance).await.unwrap();
    assert_eq!(scope.len(), 1);
    assert!(scope.contains("CC-100"));
    assert!(!scope.contains("CC-200"));
}

#[tokio::test]
async fn finance_user_with_no_assignments_has_empty_scope() {
    let (db, _tmp) = common::setup().await;
    common::define_cost_centre(&db, "CC-100").await;
    let finance = common::finance_user(&db, "fin", &[]).await;

    let scope = resolve_accessible_cost_centres(&db.pool, finance).await.unwrap();
    assert!(scope.is_empty());
}

#[tokio::test]
async fn unknown_user_resolves_to_empty_scope_not_an_error() {
    let (db, _tmp) = common::setup().await;
    common::define_cost_centre(&db, "CC-100").await;

    let scope = resolve_accessible_cost_centres(&db.pool, 9999).await.unwrap();
    assert!(scope.is_empty());
    assert!(!user_can_access_cost_centre(&db.pool, 9999, "CC-100").await.unwrap());
}

#[tokio::test]
async fn membership_test_honours_role() {
    let (db, _tmp) = common::setup().await;
    common::define_cost_centre(&db, "CC-100").await;
    common::define_cost_centre(&db, "CC-200").await;
    let admin = common::admin_user(&db, "root").await;
    let finance = common::finance_user(&db, "fin", &["CC-100"]).await;

    assert!(user_can_access_cost_centre(&db.pool, admin, "CC-100").await.unwrap());
    assert!(user_can_access_cost_centre(&db.pool, admin, "CC-200").await.unwrap());
    assert!(user_can_access_cost_centre(&db.pool, finance, "CC-100").await.unwrap());
    assert!(!user_can_access_cost_centre(&db.pool, finance, "CC-200").await.unwrap());
}

#[tokio::test]
async fn unassigning_removes_access() {
    let (db, _tmp) = common::setup().await;
    common::define_cost_centre(&db, "CC-100").await;
    let finance = common::finance_user(&db, "fin", &["CC-100"]).await;

    common::users(&db).unassign_cost_centre(finance, "CC-100").await.unwrap();
    let scope = resolve_accessible_cost_centres(&db.pool, finance).await.unwrap();
    assert!(scope.is_empty());
}
