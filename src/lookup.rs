//! Keyed lookup inside fetched collections.
//!
//! Dashboard-style APIs rarely expose an upsert: a resource `Create` first
//! lists the collection and looks for an element whose natural key (usually a
//! name) matches the configuration, adopting it when present and creating it
//! otherwise. [`find_by_field`] is that lookup; a `None` result means "does
//! not exist remotely yet" and is the signal to create, never an error.
//!
//! # Example
//!
//! ```
//! use dashboard_provider_core::{find_by_field, Collection, Record, Value};
//!
//! let nets = Collection::from(vec![
//!     Record::new().with_attr("name", "a").with_attr("id", "1"),
//!     Record::new().with_attr("name", "b").with_attr("id", "2"),
//! ]);
//!
//! let hit = find_by_field(&nets, "name", &Value::from("b")).unwrap();
//! assert_eq!(hit.get("id"), Some(&Value::String("2".into())));
//! assert!(find_by_field(&nets, "name", &Value::from("zzz")).is_none());
//! ```

use crate::value::{Collection, Record, Value};

/// Type-aware equality for lookup targets.
///
/// Strings compare as strings, numbers compare after `Int`/`Float`
/// normalization, and everything else compares structurally. `Null` and
/// `Unknown` never match anything, including each other — an unset field is
/// not a usable natural key.
pub fn values_match(candidate: &Value, target: &Value) -> bool {
    if !candidate.is_set() || !target.is_set() {
        return false;
    }
    match (candidate, target) {
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
        _ => candidate == target,
    }
}

/// Find the first record whose `field` matches `target` under
/// [`values_match`].
///
/// Iterates in collection order; on duplicate keys the lowest-index match
/// wins. The natural key is assumed unique within one fetch snapshot.
///
/// # Panics
///
/// Panics when `field` does not exist on an element. The field set of a
/// record is fixed by its generated type, so a missing key field means the
/// generated adapter and the lookup key are out of sync — a bug to fail
/// loudly on, not a runtime data condition.
pub fn find_by_field<'a>(
    collection: &'a Collection,
    field: &str,
    target: &Value,
) -> Option<&'a Record> {
    find_by_field_with(collection, field, target, values_match)
}

/// Like [`find_by_field`] with a caller-supplied matcher.
pub fn find_by_field_with<'a, F>(
    collection: &'a Collection,
    field: &str,
    target: &Value,
    matches: F,
) -> Option<&'a Record>
where
    F: Fn(&Value, &Value) -> bool,
{
    collection.items().iter().find(|record| {
        let candidate = record.get(field).unwrap_or_else(|| {
            panic!(
                "lookup field '{}' does not exist on the collection element type; \
                 the generated adapter and the lookup key are out of sync",
                field
            )
        });
        matches(candidate, target)
    })
}
