use sqlite_ingest_db::*;

fn people() -> Database {
    let db = Database::memory();
    db.connection()
        .unwrap()
        .execute_batch(
            "CREATE TABLE people (name TEXT, city TEXT, code TEXT UNIQUE);
             INSERT INTO people VALUES ('ann', 'Oslo', 'a'), ('bo', 'Oslo', 'b'), ('cy', 'Rome', 'c');",
        )
        .unwrap();
    db
}

#[test]
fn add_index_creates_and_returns_it() {
    let db = people();
    let index = add_index(&db, "idx_people_name", "PEOPLE", "Name", true).unwrap();
    assert_eq!(index.name, "idx_people_name");
    assert_eq!(index.table, "people");
    assert!(index.unique);
    assert_eq!(index.fields.len(), 1);
    assert_eq!(index.fields[0].name, "name");
}

#[test]
fn second_index_on_same_column_is_rejected() {
    let db = people();
    add_index(&db, "idx_a", "people", "name", false).unwrap();
    let err = add_index(&db, "idx_b", "people", "name", false).unwrap_err();
    match err {
        DbError::DuplicateIndex { existing, column, .. } => {
            assert_eq!(existing, "idx_a");
            assert_eq!(column, "name");
        }
        other => panic!("expected DuplicateIndex, got {:?}", other),
    }
}

#[test]
fn constraint_index_counts_as_existing() {
    let db = people();
    let err = add_index(&db, "idx_code", "people", "code", false).unwrap_err();
    assert!(matches!(err, DbError::DuplicateIndex { .. }), "got {:?}", err);
}

#[test]
fn unique_index_over_duplicates_fails_cleanly() {
    let db = people();
    let err = add_index(&db, "idx_city", "people", "city", true).unwrap_err();
    assert!(matches!(err, DbError::UniqueConstraint { .. }), "got {:?}", err);
    assert!(err.to_string().contains("duplicate values"));

    let table = db.table("people").unwrap().unwrap();
    assert!(!table.indexes(&db).unwrap().iter().any(|i| i.name == "idx_city"));
}

#[test]
fn unknown_table_or_field() {
    let db = people();
    assert!(matches!(
        add_index(&db, "i", "nobody", "name", false),
        Err(DbError::TableNotFound(_))
    ));
    assert!(matches!(
        add_index(&db, "i", "people", "age", false),
        Err(DbError::FieldNotFound { .. })
    ));
}

#[test]
fn drop_index_is_idempotent() {
    let db = people();
    let index = add_index(&db, "idx_city", "people", "city", false).unwrap();
    let field = index.fields[0].clone();

    assert_eq!(drop_index(&db, &field).unwrap(), 1);
    assert_eq!(drop_index(&db, &field).unwrap(), 0);

    let table = db.table("people").unwrap().unwrap();
    assert!(!table.indexes(&db).unwrap().iter().any(|i| i.covers("city")));
}

#[test]
fn drop_index_skips_constraint_indexes() {
    let db = people();
    let table = db.table("people").unwrap().unwrap();
    let code = table.field(&db, "code").unwrap().unwrap();
    assert_eq!(drop_index(&db, &code).unwrap(), 0);
    assert_eq!(table.indexes(&db).unwrap().len(), 1);
}

#[test]
fn removing_a_vanished_index_is_not_an_error() {
    let db = people();
    let index = add_index(&db, "idx_name", "people", "name", false).unwrap();
    index.remove(&db).unwrap();
    index.remove(&db).unwrap();
}

#[test]
fn without_rowid_table_can_be_indexed() {
    let db = Database::memory();
    db.execute("CREATE TABLE kv (k TEXT PRIMARY KEY, v INT) WITHOUT ROWID")
        .unwrap();
    db.execute("INSERT INTO kv VALUES ('a', 1), ('b', 2)").unwrap();

    let index = add_index(&db, "idx_v", "kv", "v", false).unwrap();
    assert_eq!(index.table, "kv");
    assert!(index.covers("v"));
}
