//! Value normalization and canonical encoding.
//!
//! Agent outputs are arbitrary nested JSON values. Before any equality or
//! similarity comparison they are normalized: map keys are rewritten into
//! lexicographic order recursively, while array element order is preserved
//! (arrays are ordered data, maps are not).

use serde::{Deserialize, Serialize};
pub use serde_json::Value;

/// One agent's candidate value for the shared field under classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutput {
    pub agent_id: String,
    pub value: Value,
}

impl AgentOutput {
    pub fn new(agent_id: impl Into<String>, value: Value) -> Self {
        Self {
            agent_id: agent_id.into(),
            value,
        }
    }
}

/// Rewrite a value so map keys appear in lexicographic order at every depth.
///
/// serde_json's map iteration order flips to insertion order when any crate
/// in the dependency graph enables the `preserve_order` feature, so key order
/// is established explicitly here rather than assumed.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), normalize(value)))
                    .collect(),
            )
        }
        other => other.clone(),
    }
}

/// Deterministic string encoding of a value: compact JSON with sorted keys.
///
/// Used to compare array elements by structure regardless of how their maps
/// were built.
pub fn canonical_json(value: &Value) -> String {
    normalize(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_sorts_nested_map_keys() {
        let mut inner = serde_json::Map::new();
        inner.insert("zebra".to_string(), json!(1));
        inner.insert("alpha".to_string(), json!(2));
        let mut outer = serde_json::Map::new();
        outer.insert("outer".to_string(), Value::Object(inner));

        let normalized = normalize(&Value::Object(outer));
        let keys: Vec<&String> = normalized["outer"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, ["alpha", "zebra"]);
    }

    #[test]
    fn test_normalize_preserves_array_order() {
        let value = json!([3, 1, 2]);
        assert_eq!(normalize(&value), json!([3, 1, 2]));
    }

    #[test]
    fn test_normalize_is_identity_on_scalars() {
        for value in [json!(null), json!(true), json!(42), json!("text")] {
            assert_eq!(normalize(&value), value);
        }
    }

    #[test]
    fn test_canonical_json_is_stable_across_key_order() {
        let mut forward = serde_json::Map::new();
        forward.insert("a".to_string(), json!(1));
        forward.insert("b".to_string(), json!(2));
        let mut backward = serde_json::Map::new();
        backward.insert("b".to_string(), json!(2));
        backward.insert("a".to_string(), json!(1));

        assert_eq!(
            canonical_json(&Value::Object(forward)),
            canonical_json(&Value::Object(backward))
        );
    }

    #[test]
    fn test_canonical_json_distinguishes_bool_from_number() {
        assert_ne!(canonical_json(&json!(true)), canonical_json(&json!(1)));
    }
}
