//! The record abstraction: anything that can enumerate its named properties.

use crate::value::Value;

/// Type names treated as containers. A hint naming one of these says
/// nothing about the stored shape, so inference falls back to the value.
const CONTAINER_MARKERS: &[&str] = &[
    "alloc::vec::Vec",
    "std::vec::Vec",
    "Vec",
    "alloc::collections::vec_deque::VecDeque",
    "std::collections::hash::map::HashMap",
    "std::collections::HashMap",
    "HashMap",
    "alloc::collections::btree::map::BTreeMap",
    "BTreeMap",
    "serde_json::value::Value",
    "serde_json::map::Map",
    "sqlite_ingest_core::value::Value",
    "Value",
    "Object",
    "Any",
];

/// Declared type of a property, when the record knows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeHint {
    /// No static type; the runtime value decides.
    #[default]
    Dynamic,
    /// A type name such as `i32`, `alloc::string::String`, or `my_app::Address`.
    Named(String),
}

impl TypeHint {
    /// Hint naming the Rust type `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self::Named(std::any::type_name::<T>().to_string())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Dynamic => None,
            Self::Named(name) => Some(name),
        }
    }

    /// True when the hint cannot be trusted to pick a column type: no name,
    /// a blank name, a container type, or a slice/array type.
    pub fn is_ambiguous(&self) -> bool {
        let Some(name) = self.name() else {
            return true;
        };
        let name = name.trim().trim_start_matches('&');
        if name.is_empty() || name.starts_with('[') {
            return true;
        }
        let base = match name.find('<') {
            Some(pos) => &name[..pos],
            None => name,
        };
        CONTAINER_MARKERS.contains(&base)
    }
}

/// One named property of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub hint: TypeHint,
    pub value: Value,
}

impl Property {
    /// A property whose type is decided by its value.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            hint: TypeHint::Dynamic,
            value: value.into(),
        }
    }

    /// A property declared with the static type `T`.
    pub fn typed<T: Into<Value>>(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            hint: TypeHint::of::<T>(),
            value: value.into(),
        }
    }

    pub fn with_hint(mut self, hint: TypeHint) -> Self {
        self.hint = hint;
        self
    }
}

/// A structured record that can describe itself.
///
/// `properties` enumerates every readable property in the record's natural
/// order, including computed ones. Implementations for domain types are
/// usually a handful of [`Property::typed`] calls.
pub trait Record {
    fn properties(&self) -> Vec<Property>;

    /// Value of the named property (ASCII case-insensitive), if present.
    fn property(&self, name: &str) -> Option<Value> {
        self.properties()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.value)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn properties(&self) -> Vec<Property> {
        (**self).properties()
    }

    fn property(&self, name: &str) -> Option<Value> {
        (**self).property(name)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn properties(&self) -> Vec<Property> {
        (**self).properties()
    }

    fn property(&self, name: &str) -> Option<Value> {
        (**self).property(name)
    }
}

/// An ordered, owned record. Query results come back as rows, and rows are
/// the easiest way to build records by hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    properties: Vec<Property>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a dynamically typed property.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }

    /// Append a property declared with the static type `T`.
    pub fn with_typed<T: Into<Value>>(mut self, name: impl Into<String>, value: T) -> Self {
        self.properties.push(Property::typed(name, value));
        self
    }

    pub fn push(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Borrow the named value (ASCII case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| &p.value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.properties.iter().map(|p| &p.value)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl Record for Row {
    fn properties(&self) -> Vec<Property> {
        self.properties.clone()
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl FromIterator<Property> for Row {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

// ── JSON records ────────────────────────────────────────────────────────────

impl Record for serde_json::Map<String, serde_json::Value> {
    fn properties(&self) -> Vec<Property> {
        self.iter()
            .map(|(name, value)| Property::new(name.clone(), Value::from(value.clone())))
            .collect()
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.get(name)
            .or_else(|| {
                self.iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(|value| Value::from(value.clone()))
    }
}

/// Objects expose their members; any other JSON value is a one-property
/// record named `value`.
impl Record for serde_json::Value {
    fn properties(&self) -> Vec<Property> {
        match self {
            serde_json::Value::Object(map) => map.properties(),
            other => vec![Property::new("value", Value::from(other.clone()))],
        }
    }

    fn property(&self, name: &str) -> Option<Value> {
        match self {
            serde_json::Value::Object(map) => map.property(name),
            other if name.eq_ignore_ascii_case("value") => Some(Value::from(other.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/record_tests.rs"]
mod tests;
