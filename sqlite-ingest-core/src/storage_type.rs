use crate::value::Value;

/// The closed set of column storage types a table may use.
///
/// Every type name that does not resolve to one of these collapses to
/// `String`; the store only holds flat scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    Int32,
    Int64,
    Double,
    Bool,
    DateTime,
    String,
}

/// All storage types in declaration order.
const ALL_STORAGE_TYPES: &[StorageType] = &[
    StorageType::Int32,
    StorageType::Int64,
    StorageType::Double,
    StorageType::Bool,
    StorageType::DateTime,
    StorageType::String,
];

/// Namespaces whose members are plain scalars. A type path under one of
/// these is reduced to its last segment before resolution.
const SCALAR_NAMESPACES: &[&str] = &[
    "core::primitive::",
    "std::primitive::",
    "alloc::string::",
    "std::string::",
    "chrono::naive::datetime::",
    "chrono::naive::date::",
    "chrono::datetime::",
];

impl StorageType {
    pub fn all() -> &'static [StorageType] {
        ALL_STORAGE_TYPES
    }

    /// Canonical label (e.g. "Int32", "Bool").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Double => "Double",
            Self::Bool => "Bool",
            Self::DateTime => "DateTime",
            Self::String => "String",
        }
    }

    /// Column type written into `CREATE TABLE`.
    ///
    /// Chosen so SQLite's affinity rules agree with the storage type:
    /// `INT32`/`INT64` get INTEGER affinity, `DOUBLE` gets REAL, `TEXT` gets
    /// TEXT. `BOOL` and `DATETIME` get NUMERIC, which leaves formatted
    /// date-time text alone.
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Double => "DOUBLE",
            Self::Bool => "BOOL",
            Self::DateTime => "DATETIME",
            Self::String => "TEXT",
        }
    }

    /// Collation applied to the column on creation. Text compares
    /// case-insensitively.
    pub fn collation(&self) -> Option<&'static str> {
        match self {
            Self::String => Some("NOCASE"),
            _ => None,
        }
    }

    /// Resolve a type name (typically from [`std::any::type_name`]) to a
    /// storage type.
    ///
    /// `Option<T>` resolves as `T`. Generic arguments are ignored, a
    /// well-known scalar namespace prefix is stripped, and anything still
    /// carrying a path separator afterwards is a nested type and becomes
    /// `String`. Boolean names normalize to `Bool`.
    pub fn from_type_name(name: &str) -> Self {
        let name = name.trim();

        let option_inner = ["core::option::Option<", "std::option::Option<", "Option<"]
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix))
            .and_then(|rest| rest.strip_suffix('>'));
        if let Some(inner) = option_inner {
            return Self::from_type_name(inner);
        }

        let base = match name.find('<') {
            Some(pos) => &name[..pos],
            None => name,
        };
        let base = base.trim_start_matches('&').trim();
        let base = base.strip_prefix("mut ").unwrap_or(base);

        let local = SCALAR_NAMESPACES
            .iter()
            .find_map(|ns| base.strip_prefix(ns))
            .unwrap_or(base);

        if local.contains("::") {
            return Self::String;
        }

        match local.to_ascii_lowercase().as_str() {
            "i8" | "i16" | "i32" | "u8" | "u16" | "int16" | "int32" => Self::Int32,
            "i64" | "u32" | "u64" | "isize" | "usize" | "int64" => Self::Int64,
            "f32" | "f64" | "single" | "double" => Self::Double,
            "bool" | "boolean" => Self::Bool,
            "datetime" | "naivedatetime" | "naivedate" => Self::DateTime,
            _ => Self::String,
        }
    }

    /// Map a column declaration read back from the catalog to a storage
    /// type. Size arguments (`VARCHAR(20)`) and trailing qualifiers are
    /// ignored; unrecognized declarations are `String`.
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.trim().to_ascii_uppercase();
        let base = upper
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or("");
        match base {
            "INT32" | "INT" | "INT16" | "SMALLINT" | "TINYINT" | "MEDIUMINT" => Self::Int32,
            "INT64" | "INTEGER" | "BIGINT" | "INT8" => Self::Int64,
            "DOUBLE" | "REAL" | "FLOAT" | "SINGLE" | "NUMERIC" | "DECIMAL" => Self::Double,
            "BOOL" | "BOOLEAN" | "BIT" => Self::Bool,
            "DATETIME" | "DATE" | "TIMESTAMP" => Self::DateTime,
            _ => Self::String,
        }
    }

    /// Storage type of a runtime value, or `None` for null.
    pub fn of_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Self::Bool),
            Value::Integer(_) => Some(Self::Int64),
            Value::Real(_) => Some(Self::Double),
            Value::DateTime(_) => Some(Self::DateTime),
            Value::Text(_) | Value::Blob(_) | Value::Array(_) | Value::Object(_) => {
                Some(Self::String)
            }
        }
    }

    /// Whether a column of type `other` can hold values inferred as `self`
    /// without conversion. Both integer widths share INTEGER affinity.
    pub fn is_compatible_with(&self, other: StorageType) -> bool {
        self == &other || (self.is_integer() && other.is_integer())
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int32 | Self::Int64)
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string is not a storage type label.
#[derive(Debug, Clone)]
pub struct StorageTypeParseError(pub String);

impl std::fmt::Display for StorageTypeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown storage type: '{}'", self.0)
    }
}

impl std::error::Error for StorageTypeParseError {}

impl std::str::FromStr for StorageType {
    type Err = StorageTypeParseError;

    /// Parse a canonical label (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STORAGE_TYPES
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| StorageTypeParseError(s.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/storage_type_tests.rs"]
mod tests;
