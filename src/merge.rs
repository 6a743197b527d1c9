//! State reconciliation: folding an authoritative API response back into the
//! record Terraform should persist.
//!
//! [`merge`] walks a desired record (plan input or prior state) and an
//! authoritative record (a fresh API response) in lock-step over their
//! identical field sets and produces a new record. The server wins whenever
//! it has an opinion; fields the server left unset fall back to the desired
//! value. Responses from create/update calls legitimately omit fields a
//! dedicated read would return, which is what the `only_path` flag is for —
//! see [`merge`] for the exact policy.
//!
//! # Example
//!
//! ```
//! use dashboard_provider_core::{merge, Record, Value};
//!
//! let desired = Record::new()
//!     .with_path_attr("id", Value::Null)
//!     .with_attr("name", "lab")
//!     .with_attr("notes", "managed by terraform");
//! let response = Record::new()
//!     .with_path_attr("id", "N_1234")
//!     .with_attr("name", "lab")
//!     .with_attr("notes", Value::Null);
//!
//! let state = merge(&desired, &response, false).unwrap();
//! assert_eq!(state.get("id"), Some(&Value::String("N_1234".into())));
//! // The server did not round-trip `notes`; the desired value is kept.
//! assert_eq!(state.get("notes"), Some(&Value::String("managed by terraform".into())));
//! ```

use crate::error::CoreError;
use crate::value::{Record, Value};
use std::collections::BTreeMap;

/// Types that can reconcile themselves against an authoritative counterpart.
///
/// Generated resource adapters implement this on their typed state structs so
/// the per-resource merge is a compile-time dispatch instead of a reflective
/// one. [`Record`] implements it via [`merge`].
pub trait Mergeable: Sized {
    /// Merge `self` (the desired state) with `authoritative` (the server's
    /// response), producing the record to persist.
    fn merge_with(&self, authoritative: &Self, only_path: bool) -> Result<Self, CoreError>;
}

impl Mergeable for Record {
    fn merge_with(&self, authoritative: &Self, only_path: bool) -> Result<Self, CoreError> {
        merge(self, authoritative, only_path)
    }
}

/// Merge a desired record with an authoritative one.
///
/// Both records must have the identical field set and compatible field kinds;
/// anything else is [`CoreError::ShapeMismatch`] (generated-code drift, not a
/// runtime data condition).
///
/// Field policy:
///
/// - `only_path == false` (dedicated reads): for every field the
///   authoritative value wins when it is set — including empty strings and
///   zero — and the desired value is kept when the authoritative value is
///   `Null` or `Unknown`.
/// - `only_path == true` (create/update responses): path-identity fields
///   follow the same authoritative-wins-when-set rule, so a freshly assigned
///   server ID is always adopted. Every other field keeps the desired value,
///   except when the desired value is itself unset and the server has one —
///   then the server value fills the gap.
/// - Nested records: when the authoritative sub-record is unset the desired
///   sub-record is kept verbatim; otherwise the merge recurses with the same
///   flag.
/// - Lists and sets are replaced wholesale when the authoritative value is
///   set, else kept. Element identity inside nested collections is ambiguous
///   without a key, so no element-wise merge is attempted.
///
/// Returns a new record; neither input is mutated.
pub fn merge(desired: &Record, authoritative: &Record, only_path: bool) -> Result<Record, CoreError> {
    for name in authoritative.fields().keys() {
        if desired.get(name).is_none() {
            return Err(CoreError::shape_mismatch(name, "missing from desired record"));
        }
    }

    let mut fields = BTreeMap::new();
    for (name, d) in desired.fields() {
        let a = authoritative
            .get(name)
            .ok_or_else(|| CoreError::shape_mismatch(name, "missing from authoritative record"))?;
        let is_path = desired.is_path_field(name) || authoritative.is_path_field(name);
        fields.insert(name.clone(), merge_field(name, d, a, only_path, is_path)?);
    }

    let mut path_fields = desired.path_fields().clone();
    path_fields.extend(authoritative.path_fields().iter().cloned());
    Ok(Record::from_parts(fields, path_fields))
}

fn merge_field(
    name: &str,
    desired: &Value,
    authoritative: &Value,
    only_path: bool,
    is_path: bool,
) -> Result<Value, CoreError> {
    if !authoritative.is_set() {
        return Ok(desired.clone());
    }
    if desired.is_set() && desired.kind() != authoritative.kind() {
        return Err(CoreError::shape_mismatch(
            name,
            format!("kind {} vs {}", desired.kind(), authoritative.kind()),
        ));
    }

    if let (Value::Record(d), Value::Record(a)) = (desired, authoritative) {
        return Ok(Value::Record(merge(d, a, only_path)?));
    }

    if only_path && !is_path && desired.is_set() {
        return Ok(desired.clone());
    }
    Ok(authoritative.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desired() -> Record {
        Record::new()
            .with_path_attr("id", Value::Null)
            .with_attr("name", "office")
            .with_attr("vlan", 24i64)
            .with_attr("notes", "hand-curated")
    }

    #[test]
    fn test_authoritative_wins_when_set() {
        let a = Record::new()
            .with_path_attr("id", "N_9")
            .with_attr("name", "office-renamed")
            .with_attr("vlan", 30i64)
            .with_attr("notes", Value::Null);

        let merged = merge(&desired(), &a, false).unwrap();
        assert_eq!(merged.get("id"), Some(&Value::String("N_9".into())));
        assert_eq!(merged.get("name"), Some(&Value::String("office-renamed".into())));
        assert_eq!(merged.get("vlan"), Some(&Value::Int(30)));
    }

    #[test]
    fn test_desired_kept_when_authoritative_unset() {
        let a = Record::new()
            .with_path_attr("id", "N_9")
            .with_attr("name", Value::Null)
            .with_attr("vlan", Value::Unknown)
            .with_attr("notes", Value::Null);

        let merged = merge(&desired(), &a, false).unwrap();
        assert_eq!(merged.get("name"), Some(&Value::String("office".into())));
        assert_eq!(merged.get("vlan"), Some(&Value::Int(24)));
        assert_eq!(merged.get("notes"), Some(&Value::String("hand-curated".into())));
    }

    // Literal read policy: a known empty string from the server is an
    // opinion and beats the user-provided value.
    #[test]
    fn test_known_empty_string_beats_desired() {
        let d = Record::new().with_attr("name", "x").with_attr("mask", Value::Null);
        let a = Record::new().with_attr("name", "").with_attr("mask", 24i64);

        let merged = merge(&d, &a, false).unwrap();
        assert_eq!(merged.get("name"), Some(&Value::String(String::new())));
        assert_eq!(merged.get("mask"), Some(&Value::Int(24)));
    }

    #[test]
    fn test_only_path_adopts_identity_keeps_rest() {
        let a = Record::new()
            .with_path_attr("id", "N_77")
            .with_attr("name", "server-normalized")
            .with_attr("vlan", 99i64)
            .with_attr("notes", Value::Null);

        let merged = merge(&desired(), &a, true).unwrap();
        assert_eq!(merged.get("id"), Some(&Value::String("N_77".into())));
        // Non-path fields the user set are untouched by a create response.
        assert_eq!(merged.get("name"), Some(&Value::String("office".into())));
        assert_eq!(merged.get("vlan"), Some(&Value::Int(24)));
    }

    #[test]
    fn test_only_path_fills_unset_desired_fields() {
        let d = Record::new()
            .with_path_attr("id", Value::Null)
            .with_attr("serial", Value::Unknown);
        let a = Record::new()
            .with_path_attr("id", "N_5")
            .with_attr("serial", "Q2XX-AAAA-BBBB");

        let merged = merge(&d, &a, true).unwrap();
        assert_eq!(merged.get("serial"), Some(&Value::String("Q2XX-AAAA-BBBB".into())));
    }

    #[test]
    fn test_nested_record_kept_verbatim_when_authoritative_unset() {
        let sub = Record::new().with_attr("enabled", true).with_attr("port", 443i64);
        let d = Record::new().with_attr("https", sub.clone());
        let a = Record::new().with_attr("https", Value::Null);

        let merged = merge(&d, &a, false).unwrap();
        assert_eq!(merged.get("https"), Some(&Value::Record(sub)));
    }

    #[test]
    fn test_nested_record_recurses() {
        let d = Record::new().with_attr(
            "https",
            Record::new().with_attr("enabled", true).with_attr("port", 443i64),
        );
        let a = Record::new().with_attr(
            "https",
            Record::new().with_attr("enabled", false).with_attr("port", Value::Null),
        );

        let merged = merge(&d, &a, false).unwrap();
        let Some(Value::Record(https)) = merged.get("https") else {
            panic!("https should be a record");
        };
        assert_eq!(https.get("enabled"), Some(&Value::Bool(false)));
        assert_eq!(https.get("port"), Some(&Value::Int(443)));
    }

    #[test]
    fn test_collections_replaced_wholesale() {
        let d = Record::new()
            .with_attr("tags", Value::set([Value::from("a"), Value::from("b")]))
            .with_attr("dns", Value::list([Value::from("1.1.1.1")]));
        let a = Record::new()
            .with_attr("tags", Value::set([Value::from("c")]))
            .with_attr("dns", Value::Null);

        let merged = merge(&d, &a, false).unwrap();
        assert_eq!(merged.get("tags"), Some(&Value::set([Value::from("c")])));
        assert_eq!(merged.get("dns"), Some(&Value::list([Value::from("1.1.1.1")])));
    }

    #[test]
    fn test_shape_mismatch_on_missing_field() {
        let d = Record::new().with_attr("name", "x");
        let a = Record::new().with_attr("name", "x").with_attr("extra", 1i64);

        let err = merge(&d, &a, false).unwrap_err();
        assert!(matches!(err, CoreError::ShapeMismatch { ref field, .. } if field == "extra"));
    }

    #[test]
    fn test_shape_mismatch_on_kind() {
        let d = Record::new().with_attr("vlan", 24i64);
        let a = Record::new().with_attr("vlan", "24");

        let err = merge(&d, &a, false).unwrap_err();
        assert!(matches!(err, CoreError::ShapeMismatch { ref field, .. } if field == "vlan"));
    }

    #[test]
    fn test_merge_is_idempotent_against_fully_set_response() {
        let a = Record::new()
            .with_path_attr("id", "N_1")
            .with_attr("name", "a")
            .with_attr("vlan", 1i64)
            .with_attr("notes", "n");

        let once = merge(&desired(), &a, false).unwrap();
        let twice = merge(&once, &a, false).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_inputs_not_mutated() {
        let d = desired();
        let a = Record::new()
            .with_path_attr("id", "N_1")
            .with_attr("name", Value::Null)
            .with_attr("vlan", 7i64)
            .with_attr("notes", Value::Null);
        let (d_before, a_before) = (d.clone(), a.clone());

        let _ = merge(&d, &a, false).unwrap();
        assert_eq!(d, d_before);
        assert_eq!(a, a_before);
    }

    #[test]
    fn test_mergeable_trait_dispatch() {
        let d = Record::new().with_attr("name", "x");
        let a = Record::new().with_attr("name", Value::Null);
        let merged = d.merge_with(&a, false).unwrap();
        assert_eq!(merged.get("name"), Some(&Value::String("x".into())));
    }
}
