//! Derive a column layout from a single record.

use sqlite_ingest_core::{Property, Record, StorageType};

/// A proposed column: name plus storage type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub storage_type: StorageType,
}

/// Infer one column per property, in the record's property order.
///
/// Records of the same shape always infer the same columns.
pub fn infer_columns<R: Record + ?Sized>(record: &R) -> Vec<ColumnSpec> {
    record.properties().iter().map(infer_property).collect()
}

/// Infer the column for a single property.
///
/// The declared type wins unless it is missing, ambiguous, or a container;
/// then the runtime value decides. A null value with no usable declaration
/// is stored as text.
pub fn infer_property(property: &Property) -> ColumnSpec {
    let storage_type = match property.hint.name() {
        Some(name) if !property.hint.is_ambiguous() => StorageType::from_type_name(name),
        _ => StorageType::of_value(&property.value).unwrap_or(StorageType::String),
    };
    ColumnSpec {
        name: property.name.clone(),
        storage_type,
    }
}
