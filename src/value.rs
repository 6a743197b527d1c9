//! The attribute value model shared by reconciliation and lookup.
//!
//! Every configuration object the core touches — a desired state decoded from
//! a Terraform plan, or an API response projected into Terraform shapes — is a
//! tree of [`Value`]s. Scalars carry an explicit tri-state: `Null` (the user
//! or server left the field unset), `Unknown` (Terraform has not resolved the
//! value yet), or a known scalar. There are no zero-value sentinels anywhere
//! in this model; `0` and `""` are real values.
//!
//! # Example
//!
//! ```
//! use dashboard_provider_core::{Record, Value};
//!
//! let network = Record::new()
//!     .with_path_attr("id", Value::Null)
//!     .with_attr("name", "branch-west")
//!     .with_attr("vlan", 120i64);
//!
//! assert!(network.is_path_field("id"));
//! assert_eq!(network.get("name"), Some(&Value::String("branch-west".into())));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The kind of a [`Value`], used for shape checks and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// An unset value.
    Null,
    /// A value Terraform has not resolved yet.
    Unknown,
    /// A string scalar.
    String,
    /// A boolean scalar.
    Bool,
    /// A 64-bit integer scalar.
    Int,
    /// A 64-bit float scalar.
    Float,
    /// An ordered list of values.
    List,
    /// An unordered set of values (stored in server order).
    Set,
    /// A named record of field → value.
    Record,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Unknown => "unknown",
            Kind::String => "string",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::List => "list",
            Kind::Set => "set",
            Kind::Record => "record",
        };
        f.write_str(name)
    }
}

/// A dynamically-typed attribute value.
///
/// `Null` and `Unknown` are the only "unset" states; every other variant is a
/// known value, including empty strings, zero, and empty collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Explicitly unset.
    Null,
    /// Not yet resolved by Terraform.
    Unknown,
    /// A string scalar.
    String(String),
    /// A boolean scalar.
    Bool(bool),
    /// A 64-bit integer scalar.
    Int(i64),
    /// A 64-bit float scalar.
    Float(f64),
    /// An ordered list.
    List(Vec<Value>),
    /// An unordered set, stored in the order the server reported.
    Set(Vec<Value>),
    /// A nested record.
    Record(Record),
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Unknown => Kind::Unknown,
            Value::String(_) => Kind::String,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::List(_) => Kind::List,
            Value::Set(_) => Kind::Set,
            Value::Record(_) => Kind::Record,
        }
    }

    /// Whether this value is known (neither `Null` nor `Unknown`).
    pub fn is_set(&self) -> bool {
        !matches!(self, Value::Null | Value::Unknown)
    }

    /// Whether this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value is `Unknown`.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// Create a list value.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Create a set value.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(items.into_iter().collect())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

/// A named mapping of field name → [`Value`].
///
/// A record's field set is fixed by the generated type it was projected from;
/// the core only ever replaces field values, never adds or removes fields.
/// Fields that form the resource's path identity (server-assigned IDs, URL
/// path components) are marked at construction with
/// [`with_path_attr`](Record::with_path_attr) and drive the `only_path` merge
/// policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    path_fields: BTreeSet<String>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Add an attribute that is part of the resource's path identity.
    pub fn with_path_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        self.path_fields.insert(name.clone());
        self.fields.insert(name, value.into());
        self
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Whether the named field is part of the path identity.
    pub fn is_path_field(&self, name: &str) -> bool {
        self.path_fields.contains(name)
    }

    /// The field map, in field-name order.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// The names of the path-identity fields.
    pub fn path_fields(&self) -> &BTreeSet<String> {
        &self.path_fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn from_parts(fields: BTreeMap<String, Value>, path_fields: BTreeSet<String>) -> Self {
        Self { fields, path_fields }
    }
}

/// An ordered collection of records, accumulated across pages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Collection {
    items: Vec<Record>,
}

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append all of `page`'s items, preserving order.
    pub fn extend(&mut self, page: Collection) {
        self.items.extend(page.items);
    }

    /// The records, in server order.
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    /// Consume the collection, yielding its records.
    pub fn into_items(self) -> Vec<Record> {
        self.items
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<Record>> for Collection {
    fn from(items: Vec<Record>) -> Self {
        Self { items }
    }
}

impl FromIterator<Record> for Collection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
