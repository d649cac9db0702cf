use std::time::Duration;

use sqlite_ingest_core::Value;
use sqlite_ingest_db::*;

fn seeded() -> Database {
    let db = Database::memory();
    db.connection()
        .unwrap()
        .execute_batch(
            "CREATE TABLE people (name TEXT, age INT64);
             INSERT INTO people VALUES ('Alice', 31), ('bob', 27);",
        )
        .unwrap();
    db
}

#[test]
fn memory_marker_parses() {
    assert_eq!(Location::parse(":memory:"), Location::Memory);
    assert_eq!(Location::parse(":MEMORY:"), Location::Memory);
    assert!(matches!(Location::parse("data.sqlite"), Location::File(_)));
    assert_eq!(Location::Memory.to_string(), MEMORY_MARKER);
}

#[test]
fn open_is_idempotent_and_lazy() {
    let db = Database::memory();
    assert!(!db.is_open());
    db.open().unwrap();
    db.open().unwrap();
    assert!(db.is_open());

    let lazy = Database::memory();
    lazy.query("SELECT 1").unwrap();
    assert!(lazy.is_open());
}

#[test]
fn closing_memory_store_discards_everything() {
    let mut db = seeded();
    assert_eq!(db.tables().unwrap().len(), 1);

    db.close().unwrap();
    assert!(!db.is_open());
    db.open().unwrap();
    assert!(db.tables().unwrap().is_empty());
}

#[test]
fn query_returns_named_columns() {
    let db = seeded();
    let rows = db.query("SELECT name, age FROM people ORDER BY age").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("name"), Some(&Value::from("bob")));
    assert_eq!(rows[1].get("AGE"), Some(&Value::Integer(31)));
    assert_eq!(rows[0].names().collect::<Vec<_>>(), vec!["name", "age"]);
}

#[test]
fn query_with_binds_parameters() {
    let db = seeded();
    let rows = db
        .query_with("SELECT age FROM people WHERE name = ?1", ["Alice"])
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("age"), Some(&Value::Integer(31)));
}

#[test]
fn case_insensitive_query_appends_collation() {
    let db = seeded();
    assert!(db.query("SELECT * FROM people WHERE name = 'ALICE'").unwrap().is_empty());
    let rows = db
        .query_case_insensitive("SELECT * FROM people WHERE name = 'ALICE';")
        .unwrap();
    assert_eq!(rows.len(), 1);

    assert_eq!(
        with_nocase("SELECT 1 WHERE 'a' = 'A' COLLATE NOCASE"),
        "SELECT 1 WHERE 'a' = 'A' COLLATE NOCASE"
    );
}

#[test]
fn execute_reports_changes() {
    let db = seeded();
    let changed = db.execute("UPDATE people SET age = age + 1").unwrap();
    assert_eq!(changed, 2);
}

#[test]
fn rollback_discards_transaction() {
    let db = seeded();
    db.begin().unwrap();
    assert!(db.in_transaction().unwrap());
    db.execute("DELETE FROM people").unwrap();
    db.rollback().unwrap();
    assert!(!db.in_transaction().unwrap());
    assert_eq!(db.query("SELECT * FROM people").unwrap().len(), 2);
}

#[test]
fn file_store_is_created_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.sqlite");
    let db = Database::new(path.as_path(), DatabaseOptions::default()).unwrap();
    assert!(!path.exists());
    db.open().unwrap();
    assert!(path.exists());
}

#[test]
fn invalid_paths_are_rejected() {
    let dir = tempfile::tempdir().unwrap();

    let missing_parent = dir.path().join("nope").join("store.db");
    let err = Database::new(missing_parent.as_path(), DatabaseOptions::default()).unwrap_err();
    assert!(matches!(err, DbError::InvalidPath { .. }), "got {:?}", err);

    let err = Database::new(dir.path(), DatabaseOptions::default()).unwrap_err();
    assert!(matches!(err, DbError::InvalidPath { .. }), "got {:?}", err);

    let err = Database::new(Location::File("".into()), DatabaseOptions::default()).unwrap_err();
    assert!(matches!(err, DbError::InvalidPath { .. }), "got {:?}", err);
}

#[test]
fn unusual_extension_is_only_advisory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.data");
    let db = Database::new(path.as_path(), DatabaseOptions::default()).unwrap();
    db.open().unwrap();
}

#[test]
fn connection_error_names_the_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.db");
    std::fs::write(&path, vec![b'x'; 4096]).unwrap();

    let db = Database::new(path.as_path(), DatabaseOptions::default()).unwrap();
    let err = db.open().unwrap_err();
    assert!(matches!(err, DbError::Connection { .. }), "got {:?}", err);
    assert!(err.to_string().contains("garbage.db"));
    assert!(!db.is_open());
}

#[test]
fn query_timeout_is_configurable() {
    let mut db = Database::new(
        Location::Memory,
        DatabaseOptions::new().query_timeout(Duration::from_secs(5)),
    )
    .unwrap();
    assert_eq!(db.query_timeout(), Duration::from_secs(5));
    db.open().unwrap();
    db.set_query_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(db.query_timeout(), Duration::from_secs(1));
}

#[test]
fn performance_mode_applies_and_restores() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perf.sqlite");
    let db = Database::new(path.as_path(), DatabaseOptions::default()).unwrap();

    let before = db.pragma_snapshot().unwrap();
    assert_eq!(before.mode(), PerformanceMode::default());

    let previous = db
        .apply_performance_mode(PerformanceMode {
            unsafe_writes: true,
            exclusive_lock: true,
        })
        .unwrap();
    assert_eq!(previous, before);
    let mode = db.performance_mode().unwrap();
    assert!(mode.unsafe_writes);
    assert!(mode.exclusive_lock);

    db.restore_pragmas(&previous).unwrap();
    assert_eq!(db.pragma_snapshot().unwrap(), before);
}

#[test]
fn restoring_locking_mode_releases_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite");
    let db = Database::new(path.as_path(), DatabaseOptions::default()).unwrap();
    db.execute("CREATE TABLE t (x TEXT)").unwrap();

    let previous = db
        .apply_performance_mode(PerformanceMode {
            unsafe_writes: false,
            exclusive_lock: true,
        })
        .unwrap();
    db.execute("INSERT INTO t VALUES ('a')").unwrap();
    db.restore_pragmas(&previous).unwrap();

    let other = Database::new(
        path.as_path(),
        DatabaseOptions::new().query_timeout(Duration::from_millis(500)),
    )
    .unwrap();
    let rows = other.query("SELECT COUNT(*) AS n FROM t").unwrap();
    assert_eq!(rows[0].get("n"), Some(&Value::Integer(1)));
}

#[test]
fn size_grows_with_content() {
    let db = Database::memory();
    let empty = db.size_bytes().unwrap();
    db.execute("CREATE TABLE t (x TEXT)").unwrap();
    assert!(db.size_bytes().unwrap() > empty);
}

#[test]
fn backup_copies_memory_store_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("copy.sqlite");

    let db = seeded();
    db.backup(&target).unwrap();

    let copy = Database::new(target.as_path(), DatabaseOptions::default()).unwrap();
    let rows = copy.query("SELECT COUNT(*) AS n FROM people").unwrap();
    assert_eq!(rows[0].get("n"), Some(&Value::Integer(2)));
}
