//! Schema reconciliation: make a table fit the inferred columns.
//!
//! A missing table is created from the inferred layout. An existing table is
//! never altered; each inferred column is matched by name (ignoring case)
//! against its fields, and the import proceeds with the overlap.

use sqlite_ingest_core::{StorageType, quote_ident};
use sqlite_ingest_db::{Database, Table};

use crate::error::{ImportError, ImportWarning};
use crate::infer::ColumnSpec;

/// One column of the insert statement and the record property that feeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertColumn {
    /// Column name as stored in the table.
    pub column: String,
    /// Property name as it appears on the record.
    pub property: String,
    /// Type values are coerced to before binding.
    pub storage_type: StorageType,
}

/// Result of reconciling inferred columns against a table.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Table name as stored in the catalog.
    pub table: String,
    pub created: bool,
    pub columns: Vec<InsertColumn>,
    /// Record properties with no matching column.
    pub missing: Vec<String>,
    pub warnings: Vec<ImportWarning>,
}

/// Create `table_name` from `inferred`, or validate `inferred` against the
/// existing table.
///
/// Fails with [`ImportError::SchemaMismatch`] when a matching field has an
/// incompatible type and conversion is not allowed, and with
/// [`ImportError::NoMatchingFields`] when nothing overlaps.
pub fn reconcile(
    db: &Database,
    table_name: &str,
    inferred: &[ColumnSpec],
    allow_type_conversion: bool,
) -> Result<Reconciliation, ImportError> {
    let mut warnings = Vec::new();
    let inferred = dedupe(inferred, &mut warnings);
    if inferred.is_empty() {
        return Err(ImportError::EmptyRecord);
    }

    match db.table(table_name)? {
        None => create(db, table_name, inferred, warnings),
        Some(table) => match_existing(db, &table, inferred, allow_type_conversion, warnings),
    }
}

/// Build the `CREATE TABLE` statement for `columns`.
pub fn create_table_sql(table: &str, columns: &[ColumnSpec]) -> String {
    let defs: Vec<String> = columns
        .iter()
        .map(|c| {
            let mut def = format!("{} {}", quote_ident(&c.name), c.storage_type.sql_type());
            if let Some(collation) = c.storage_type.collation() {
                def.push_str(" COLLATE ");
                def.push_str(collation);
            }
            def
        })
        .collect();
    format!("CREATE TABLE {} ({})", quote_ident(table), defs.join(", "))
}

fn create(
    db: &Database,
    table_name: &str,
    inferred: Vec<ColumnSpec>,
    warnings: Vec<ImportWarning>,
) -> Result<Reconciliation, ImportError> {
    let sql = create_table_sql(table_name, &inferred);
    log::debug!("{}", sql);
    db.execute(&sql)?;
    log::info!(
        "Created table '{}' with {} column(s)",
        table_name,
        inferred.len()
    );

    let columns = inferred
        .into_iter()
        .map(|c| InsertColumn {
            column: c.name.clone(),
            property: c.name,
            storage_type: c.storage_type,
        })
        .collect();
    Ok(Reconciliation {
        table: table_name.to_string(),
        created: true,
        columns,
        missing: Vec::new(),
        warnings,
    })
}

fn match_existing(
    db: &Database,
    table: &Table,
    inferred: Vec<ColumnSpec>,
    allow_type_conversion: bool,
    mut warnings: Vec<ImportWarning>,
) -> Result<Reconciliation, ImportError> {
    let fields = table.fields(db)?;
    let mut columns = Vec::new();
    let mut missing = Vec::new();

    for spec in &inferred {
        let Some(field) = fields.iter().find(|f| f.name.eq_ignore_ascii_case(&spec.name)) else {
            missing.push(spec.name.clone());
            warn(
                &mut warnings,
                ImportWarning::MissingField {
                    table: table.name.clone(),
                    field: spec.name.clone(),
                },
            );
            continue;
        };

        if !spec.storage_type.is_compatible_with(field.storage_type) {
            if !allow_type_conversion {
                return Err(ImportError::SchemaMismatch {
                    table: table.name.clone(),
                    field: field.name.clone(),
                    existing: field.storage_type,
                    inferred: spec.storage_type,
                });
            }
            warn(
                &mut warnings,
                ImportWarning::TypeAdopted {
                    table: table.name.clone(),
                    field: field.name.clone(),
                    existing: field.storage_type,
                    inferred: spec.storage_type,
                },
            );
        }

        // The existing column's type drives coercion either way.
        columns.push(InsertColumn {
            column: field.name.clone(),
            property: spec.name.clone(),
            storage_type: field.storage_type,
        });
    }

    if columns.is_empty() {
        return Err(ImportError::NoMatchingFields {
            table: table.name.clone(),
            fields: inferred.into_iter().map(|c| c.name).collect(),
        });
    }

    log::debug!(
        "Table '{}' exists; importing {} of {} field(s)",
        table.name,
        columns.len(),
        inferred.len()
    );
    Ok(Reconciliation {
        table: table.name.clone(),
        created: false,
        columns,
        missing,
        warnings,
    })
}

/// Drop properties whose names repeat an earlier one, ignoring case.
fn dedupe(inferred: &[ColumnSpec], warnings: &mut Vec<ImportWarning>) -> Vec<ColumnSpec> {
    let mut kept: Vec<ColumnSpec> = Vec::with_capacity(inferred.len());
    for spec in inferred {
        if kept.iter().any(|k| k.name.eq_ignore_ascii_case(&spec.name)) {
            warn(
                warnings,
                ImportWarning::DuplicateProperty {
                    name: spec.name.clone(),
                },
            );
        } else {
            kept.push(spec.clone());
        }
    }
    kept
}

fn warn(warnings: &mut Vec<ImportWarning>, warning: ImportWarning) {
    log::warn!("{}", warning);
    warnings.push(warning);
}
