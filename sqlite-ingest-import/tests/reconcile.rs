use sqlite_ingest_core::{Row, StorageType};
use sqlite_ingest_db::Database;
use sqlite_ingest_import::*;

fn column(name: &str, storage_type: StorageType) -> ColumnSpec {
    ColumnSpec {
        name: name.to_string(),
        storage_type,
    }
}

fn people_columns() -> Vec<ColumnSpec> {
    vec![
        column("Name", StorageType::String),
        column("Age", StorageType::Int32),
        column("Score", StorageType::Double),
    ]
}

#[test]
fn create_table_sql_quotes_and_collates() {
    let sql = create_table_sql(
        "my \"table\"",
        &[column("a", StorageType::String), column("b", StorageType::Int32)],
    );
    assert_eq!(
        sql,
        "CREATE TABLE \"my \"\"table\"\"\" (\"a\" TEXT COLLATE NOCASE, \"b\" INT32)"
    );
}

#[test]
fn absent_table_is_created_with_inferred_layout() {
    let db = Database::memory();
    let plan = reconcile(&db, "people", &people_columns(), false).unwrap();

    assert!(plan.created);
    assert!(plan.warnings.is_empty());
    assert!(plan.missing.is_empty());
    assert_eq!(plan.columns.len(), 3);

    let table = db.table("people").unwrap().unwrap();
    let fields = table.fields(&db).unwrap();
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["Name", "Age", "Score"]);
    assert_eq!(fields[0].storage_type, StorageType::String);
    assert_eq!(fields[1].storage_type, StorageType::Int32);
    assert_eq!(fields[2].storage_type, StorageType::Double);
}

#[test]
fn reconciling_twice_creates_nothing_new() {
    let db = Database::memory();
    reconcile(&db, "people", &people_columns(), false).unwrap();
    let before = db.table("people").unwrap().unwrap().fields(&db).unwrap();

    let plan = reconcile(&db, "PEOPLE", &people_columns(), false).unwrap();
    assert!(!plan.created);
    assert_eq!(plan.table, "people");
    assert!(plan.warnings.is_empty());
    assert_eq!(db.tables().unwrap().len(), 1);
    assert_eq!(
        db.table("people").unwrap().unwrap().fields(&db).unwrap(),
        before
    );
}

#[test]
fn matching_ignores_case_and_keeps_column_names() {
    let db = Database::memory();
    db.execute("CREATE TABLE people (NAME TEXT COLLATE NOCASE, age INT32)")
        .unwrap();

    let plan = reconcile(
        &db,
        "people",
        &[column("name", StorageType::String), column("AGE", StorageType::Int64)],
        false,
    )
    .unwrap();

    assert_eq!(
        plan.columns,
        vec![
            InsertColumn {
                column: "NAME".to_string(),
                property: "name".to_string(),
                storage_type: StorageType::String,
            },
            InsertColumn {
                column: "age".to_string(),
                property: "AGE".to_string(),
                storage_type: StorageType::Int32,
            },
        ]
    );
}

#[test]
fn extra_properties_warn_and_are_skipped() {
    let db = Database::memory();
    db.execute("CREATE TABLE people (Name TEXT)").unwrap();

    let plan = reconcile(&db, "people", &people_columns(), false).unwrap();
    assert_eq!(plan.columns.len(), 1);
    assert_eq!(plan.missing, ["Age", "Score"]);
    assert_eq!(plan.warnings.len(), 2);
    assert!(matches!(
        &plan.warnings[0],
        ImportWarning::MissingField { field, .. } if field == "Age"
    ));
}

#[test]
fn type_mismatch_fails_without_conversion() {
    let db = Database::memory();
    db.execute("CREATE TABLE people (Name TEXT, Age TEXT)").unwrap();

    let err = reconcile(&db, "people", &people_columns()[..2], false).unwrap_err();
    match err {
        ImportError::SchemaMismatch {
            field,
            existing,
            inferred,
            ..
        } => {
            assert_eq!(field, "Age");
            assert_eq!(existing, StorageType::String);
            assert_eq!(inferred, StorageType::Int32);
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn type_mismatch_adopts_existing_type_with_conversion() {
    let db = Database::memory();
    db.execute("CREATE TABLE people (Name TEXT, Age TEXT)").unwrap();

    let plan = reconcile(&db, "people", &people_columns()[..2], true).unwrap();
    assert_eq!(plan.columns[1].storage_type, StorageType::String);
    assert!(matches!(
        &plan.warnings[..],
        [ImportWarning::TypeAdopted { field, .. }] if field == "Age"
    ));
}

#[test]
fn no_overlap_is_an_error() {
    let db = Database::memory();
    db.execute("CREATE TABLE other (X TEXT)").unwrap();

    let err = reconcile(&db, "other", &people_columns(), false).unwrap_err();
    match err {
        ImportError::NoMatchingFields { table, fields } => {
            assert_eq!(table, "other");
            assert_eq!(fields, ["Name", "Age", "Score"]);
        }
        other => panic!("expected NoMatchingFields, got {other:?}"),
    }
}

#[test]
fn duplicate_property_names_keep_the_first() {
    let db = Database::memory();
    let plan = reconcile(
        &db,
        "t",
        &[column("Name", StorageType::String), column("NAME", StorageType::Int32)],
        false,
    )
    .unwrap();
    assert_eq!(plan.columns.len(), 1);
    assert_eq!(
        plan.warnings,
        [ImportWarning::DuplicateProperty {
            name: "NAME".to_string()
        }]
    );
}

#[test]
fn empty_record_cannot_define_a_table() {
    let db = Database::memory();
    let err = reconcile(&db, "t", &infer_columns(&Row::new()), false).unwrap_err();
    assert!(matches!(err, ImportError::EmptyRecord));
    assert!(db.tables().unwrap().is_empty());
}
