//! Tests for the catalog synchronization subsystem
//!
//! Covers the source loader error split, reconciler idempotence and
//! additivity, within-source dedup, batch atomicity, and the startup
//! trigger policies.

use redline_common::config::SyncPolicy;
use redline_common::db::wireframes::{self, IdentityKey};
use redline_common::db::init_database;
use redline_common::sync::{self, load_source, reconcile, SourceRecord};
use redline_common::Error;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;

async fn setup_db(dir: &TempDir) -> SqlitePool {
    init_database(&dir.path().join("review.db"))
        .await
        .expect("database init should succeed")
}

fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write csv");
    path
}

fn rec(project: &str, device: &str, page_name: &str, page_path: &str) -> SourceRecord {
    SourceRecord {
        project: project.to_string(),
        device: device.to_string(),
        page_name: page_name.to_string(),
        page_path: page_path.to_string(),
    }
}

fn key(project: &str, device: &str, page_name: &str, page_path: &str) -> IdentityKey {
    IdentityKey {
        project: project.to_string(),
        device: device.to_string(),
        page_name: page_name.to_string(),
        page_path: page_path.to_string(),
    }
}

// ============================================================================
// Source loader
// ============================================================================

#[test]
fn test_load_source_preserves_row_order() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        &dir,
        "source.csv",
        "project,device,page_name,page_path\n\
         Acme,desktop,Home,/home\n\
         Acme,desktop,Pricing,/pricing\n",
    );

    let records = load_source(&csv).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].page_name, "Home");
    assert_eq!(records[1].page_name, "Pricing");
}

#[test]
fn test_load_source_column_order_irrelevant_extra_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        &dir,
        "source.csv",
        "page_path,owner,device,page_name,project\n\
         /home,alice,desktop,Home,Acme\n",
    );

    let records = load_source(&csv).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].project, "Acme");
    assert_eq!(records[0].device, "desktop");
    assert_eq!(records[0].page_name, "Home");
    assert_eq!(records[0].page_path, "/home");
}

#[test]
fn test_load_source_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such.csv");

    let err = load_source(&missing).unwrap_err();
    assert!(matches!(err, Error::SourceNotFound(_)), "got {:?}", err);
}

#[test]
fn test_load_source_missing_required_column() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        &dir,
        "source.csv",
        "project,device,page_name\nAcme,desktop,Home\n",
    );

    let err = load_source(&csv).unwrap_err();
    match err {
        Error::SourceMalformed(msg) => assert!(msg.contains("page_path"), "got {}", msg),
        other => panic!("expected SourceMalformed, got {:?}", other),
    }
}

#[test]
fn test_load_source_header_only_is_empty_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir, "source.csv", "project,device,page_name,page_path\n");

    let records = load_source(&csv).unwrap();
    assert!(records.is_empty());
}

// ============================================================================
// Reconciler
// ============================================================================

#[tokio::test]
async fn test_scenario_a_empty_store_single_row() {
    let dir = tempfile::tempdir().unwrap();
    let pool = setup_db(&dir).await;

    let inserted = reconcile(&pool, &[rec("Acme", "desktop", "Home", "/home")])
        .await
        .unwrap();

    assert_eq!(inserted, 1);
    assert_eq!(wireframes::count(&pool).await.unwrap(), 1);

    let entry = wireframes::find_by_identity(&pool, &key("Acme", "desktop", "Home", "/home"))
        .await
        .unwrap();
    assert!(entry.is_some());
}

#[tokio::test]
async fn test_scenario_b_existing_row_not_duplicated() {
    let dir = tempfile::tempdir().unwrap();
    let pool = setup_db(&dir).await;

    reconcile(&pool, &[rec("Acme", "desktop", "Home", "/home")])
        .await
        .unwrap();
    let before = wireframes::find_by_identity(&pool, &key("Acme", "desktop", "Home", "/home"))
        .await
        .unwrap()
        .unwrap();

    let inserted = reconcile(&pool, &[rec("Acme", "desktop", "Home", "/home")])
        .await
        .unwrap();

    assert_eq!(inserted, 0, "re-run must report zero insertions");
    assert_eq!(wireframes::count(&pool).await.unwrap(), 1);

    // The existing row keeps its identifier
    let after = wireframes::find_by_identity(&pool, &key("Acme", "desktop", "Home", "/home"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.guid, before.guid);
}

#[tokio::test]
async fn test_idempotence_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let pool = setup_db(&dir).await;
    let csv = write_csv(
        &dir,
        "source.csv",
        "project,device,page_name,page_path\n\
         Acme,desktop,Home,/home\n\
         Acme,desktop,Pricing,/pricing\n\
         Aurora,tablet,Dashboard,/dashboard\n",
    );

    let first = sync::run_sync(&pool, &csv).await.unwrap();
    let second = sync::run_sync(&pool, &csv).await.unwrap();

    assert_eq!(first, 3);
    assert_eq!(second, 0);
    assert_eq!(wireframes::count(&pool).await.unwrap(), 3);
}

#[tokio::test]
async fn test_within_source_dedup() {
    let dir = tempfile::tempdir().unwrap();
    let pool = setup_db(&dir).await;

    // Hand-maintained exports repeat rows; they must collapse to one entry
    let inserted = reconcile(
        &pool,
        &[
            rec("Acme", "desktop", "Home", "/home"),
            rec("Acme", "desktop", "Home", "/home"),
        ],
    )
    .await
    .unwrap();

    assert_eq!(inserted, 1);
    assert_eq!(wireframes::count(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_additivity_preexisting_rows_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let pool = setup_db(&dir).await;

    // Pre-existing entry that the source does not mention
    reconcile(&pool, &[rec("Legacy", "desktop", "Archive", "/archive")])
        .await
        .unwrap();
    let legacy = wireframes::find_by_identity(&pool, &key("Legacy", "desktop", "Archive", "/archive"))
        .await
        .unwrap()
        .unwrap();

    reconcile(&pool, &[rec("Acme", "mobile", "Home", "/home")])
        .await
        .unwrap();

    let still_there =
        wireframes::find_by_identity(&pool, &key("Legacy", "desktop", "Archive", "/archive"))
            .await
            .unwrap()
            .unwrap();
    assert_eq!(still_there.guid, legacy.guid);
    assert_eq!(still_there.page_path, "/archive");
    assert_eq!(wireframes::count(&pool).await.unwrap(), 2);
}

#[tokio::test]
async fn test_empty_source_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let pool = setup_db(&dir).await;

    let inserted = reconcile(&pool, &[]).await.unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(wireframes::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_string_fields_are_valid() {
    let dir = tempfile::tempdir().unwrap();
    let pool = setup_db(&dir).await;

    let inserted = reconcile(&pool, &[rec("", "desktop", "", "/home")])
        .await
        .unwrap();

    assert_eq!(inserted, 1);
    let entry = wireframes::find_by_identity(&pool, &key("", "desktop", "", "/home"))
        .await
        .unwrap();
    assert!(entry.is_some(), "empty strings are values, not nulls");
}

#[tokio::test]
async fn test_atomicity_failed_batch_rolls_back_entirely() {
    let dir = tempfile::tempdir().unwrap();
    let pool = setup_db(&dir).await;

    // Force the third insertion to fail mid-batch
    sqlx::query(
        "CREATE TRIGGER reject_sentinel BEFORE INSERT ON wireframes \
         WHEN NEW.page_name = 'sentinel' \
         BEGIN SELECT RAISE(ABORT, 'forced failure'); END",
    )
    .execute(&pool)
    .await
    .unwrap();

    let result = reconcile(
        &pool,
        &[
            rec("Acme", "desktop", "Home", "/home"),
            rec("Acme", "desktop", "Pricing", "/pricing"),
            rec("Acme", "desktop", "sentinel", "/boom"),
        ],
    )
    .await;

    match result {
        Err(Error::StorageTransactionFailed(_)) => {}
        other => panic!("expected StorageTransactionFailed, got {:?}", other),
    }

    // None of the batch may be visible
    assert_eq!(wireframes::count(&pool).await.unwrap(), 0);
}

// ============================================================================
// Startup trigger
// ============================================================================

#[tokio::test]
async fn test_scenario_c_missing_source_does_not_prevent_startup() {
    let dir = tempfile::tempdir().unwrap();
    let pool = setup_db(&dir).await;
    let missing = dir.path().join("no-such.csv");

    // Must not panic or propagate; the store stays unchanged
    sync::sync_at_startup(&pool, &missing, SyncPolicy::WhenEmpty).await;

    assert_eq!(wireframes::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_when_empty_policy_imports_into_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let pool = setup_db(&dir).await;
    let csv = write_csv(
        &dir,
        "source.csv",
        "project,device,page_name,page_path\nAcme,desktop,Home,/home\n",
    );

    sync::sync_at_startup(&pool, &csv, SyncPolicy::WhenEmpty).await;

    assert_eq!(wireframes::count(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_when_empty_policy_skips_populated_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let pool = setup_db(&dir).await;

    reconcile(&pool, &[rec("Legacy", "desktop", "Archive", "/archive")])
        .await
        .unwrap();

    let csv = write_csv(
        &dir,
        "source.csv",
        "project,device,page_name,page_path\nAcme,desktop,Home,/home\n",
    );

    sync::sync_at_startup(&pool, &csv, SyncPolicy::WhenEmpty).await;

    // Non-empty catalog: the pipeline must not have run at all
    assert_eq!(wireframes::count(&pool).await.unwrap(), 1);
    let imported = wireframes::find_by_identity(&pool, &key("Acme", "desktop", "Home", "/home"))
        .await
        .unwrap();
    assert!(imported.is_none());
}

#[tokio::test]
async fn test_always_policy_resyncs_populated_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let pool = setup_db(&dir).await;

    reconcile(&pool, &[rec("Legacy", "desktop", "Archive", "/archive")])
        .await
        .unwrap();

    let csv = write_csv(
        &dir,
        "source.csv",
        "project,device,page_name,page_path\n\
         Legacy,desktop,Archive,/archive\n\
         Acme,desktop,Home,/home\n",
    );

    sync::sync_at_startup(&pool, &csv, SyncPolicy::Always).await;

    // Still additive-only: the pre-existing row is kept, the new one added
    assert_eq!(wireframes::count(&pool).await.unwrap(), 2);
}
