use folio_database::*;

const NOTES_V1: Migration = Migration::new(
    "notes",
    "0001",
    "DEFINE TABLE IF NOT EXISTS note SCHEMAFULL; DEFINE FIELD IF NOT EXISTS body ON note TYPE string;",
);
const NOTES_V2: Migration =
    Migration::new("notes", "0002", "DEFINE FIELD IF NOT EXISTS pinned ON note TYPE bool DEFAULT false;");

async fn memory_db() -> Database {
    Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .init()
        .await
        .expect("connect to mem://")
}

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = memory_db().await;

    db.health().await.expect("health check");
    assert_eq!(db.namespace(), "test_ns");
    assert_eq!(db.database(), "test_db");
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn builder_applies_queued_migrations() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .migrations(&[NOTES_V1])
        .migrations(&[NOTES_V2])
        .init()
        .await
        .expect("init with migrations");

    let report = db.migrate(&[NOTES_V1, NOTES_V2]).await.expect("second run");
    assert!(report.applied.is_empty());
    assert_eq!(report.skipped, vec!["notes:0001".to_owned(), "notes:0002".to_owned()]);
}

#[tokio::test]
async fn migrations_are_applied_once() {
    let db = memory_db().await;

    let first = db.migrate(&[NOTES_V1]).await.expect("first run");
    assert_eq!(first.applied, vec!["notes:0001".to_owned()]);

    let second = db.migrate(&[NOTES_V1, NOTES_V2]).await.expect("second run");
    assert_eq!(second.skipped, vec!["notes:0001".to_owned()]);
    assert_eq!(second.applied, vec!["notes:0002".to_owned()]);
}

#[tokio::test]
async fn edited_migration_is_rejected() {
    let db = memory_db().await;
    db.migrate(&[NOTES_V1]).await.expect("first run");

    let edited = Migration::new("notes", "0001", "DEFINE TABLE IF NOT EXISTS note SCHEMALESS;");
    let err = db.migrate(&[edited]).await.unwrap_err();
    assert_eq!(err.kind(), "Migration");
}

#[tokio::test]
async fn failing_script_is_reported_as_migration_error() {
    let db = memory_db().await;

    let broken = Migration::new("notes", "0001", "THROW 'boom';");
    let err = db.migrate(&[broken]).await.unwrap_err();
    assert_eq!(err.kind(), "Migration");

    let report = db.migrate(&[NOTES_V1]).await.expect("recorded nothing for the broken script");
    assert_eq!(report.applied, vec!["notes:0001".to_owned()]);
}
