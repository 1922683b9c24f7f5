//! Read-time reconciliation of list-valued metadata.
//!
//! `applications` and `features` are stored as JSON arrays by the current
//! ingest path, but rows written before arrays became the canonical shape
//! hold a single comma-delimited string. Decoding happens once at the
//! storage boundary; everything past this module works with `Vec<String>`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A list-valued column as it may appear at rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    List(Vec<String>),
    One(String),
}

impl StringOrList {
    /// Canonical form: a list of trimmed, non-empty labels.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            StringOrList::List(items) => items,
            StringOrList::One(raw) => split_labels(&raw),
        }
    }
}

/// Normalizes a raw JSON column value into the canonical label list.
/// Absent, null and unrecognizable values collapse to an empty list.
pub fn normalize(value: Option<&Value>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    match serde_json::from_value::<StringOrList>(value.clone()) {
        Ok(decoded) => decoded.into_vec(),
        Err(_) => Vec::new(),
    }
}

/// Decodes the `specifications` column into its key/value form.
pub fn normalize_specs(value: Option<&Value>) -> BTreeMap<String, String> {
    value
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

fn split_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_is_empty() {
        assert!(normalize(None).is_empty());
        assert!(normalize(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn test_legacy_string_is_split_and_trimmed() {
        let value = json!("a, b ,c");
        assert_eq!(normalize(Some(&value)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_string_is_empty() {
        let value = json!("");
        assert!(normalize(Some(&value)).is_empty());
    }

    #[test]
    fn test_array_passes_through_unchanged() {
        let value = json!(["x", "y"]);
        assert_eq!(normalize(Some(&value)), vec!["x", "y"]);
    }

    #[test]
    fn test_dangling_delimiters_are_dropped() {
        let value = json!("one,, two ,");
        assert_eq!(normalize(Some(&value)), vec!["one", "two"]);
    }

    #[test]
    fn test_specs_decode() {
        let value = json!({"Weight": "1kg", "Material": "PLA"});
        let specs = normalize_specs(Some(&value));
        assert_eq!(specs.len(), 2);
        assert_eq!(specs["Weight"], "1kg");
    }

    #[test]
    fn test_specs_tolerate_garbage() {
        let value = json!(["not", "an", "object"]);
        assert!(normalize_specs(Some(&value)).is_empty());
        assert!(normalize_specs(None).is_empty());
    }
}
