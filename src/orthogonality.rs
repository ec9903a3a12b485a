//! Disjoint-change detection relative to a shared base value.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::value::AgentOutput;

/// Keys of `base ∪ output` whose values differ between the two maps.
///
/// Covers modifications, additions, and removals relative to the base.
pub fn changed_keys(base: &Map<String, Value>, output: &Map<String, Value>) -> BTreeSet<String> {
    let mut changed = BTreeSet::new();
    for (key, base_value) in base {
        match output.get(key) {
            Some(value) if value == base_value => {}
            _ => {
                changed.insert(key.clone());
            }
        }
    }
    for key in output.keys() {
        if !base.contains_key(key) {
            changed.insert(key.clone());
        }
    }
    changed
}

/// Whether every agent changed a disjoint set of keys relative to the base.
///
/// Requires the base and every output to be a map. Agents that all left the
/// base untouched are not orthogonal: that situation is identity, and the
/// vacuous "disjoint empty sets" reading is explicitly rejected.
pub fn is_orthogonal(base: &Value, outputs: &[AgentOutput]) -> bool {
    let Some(base_map) = base.as_object() else {
        return false;
    };

    let mut change_sets = Vec::with_capacity(outputs.len());
    for output in outputs {
        let Some(map) = output.value.as_object() else {
            return false;
        };
        change_sets.push(changed_keys(base_map, map));
    }

    if change_sets.iter().all(BTreeSet::is_empty) {
        return false;
    }

    for i in 0..change_sets.len() {
        for j in i + 1..change_sets.len() {
            if !change_sets[i].is_disjoint(&change_sets[j]) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outputs(values: &[Value]) -> Vec<AgentOutput> {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| AgentOutput::new(format!("agent-{i}"), value.clone()))
            .collect()
    }

    #[test]
    fn test_changed_keys_covers_modify_add_remove() {
        let base = json!({"keep": 1, "modify": 2, "remove": 3});
        let output = json!({"keep": 1, "modify": 20, "add": 4});
        let changed = changed_keys(base.as_object().unwrap(), output.as_object().unwrap());
        let expected: BTreeSet<String> = ["modify", "remove", "add"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(changed, expected);
    }

    #[test]
    fn test_disjoint_changes_are_orthogonal() {
        let base = json!({"a": 1, "b": 2});
        let agent_outputs = outputs(&[json!({"a": 10, "b": 2}), json!({"a": 1, "b": 20})]);
        assert!(is_orthogonal(&base, &agent_outputs));
    }

    #[test]
    fn test_overlapping_changes_are_not_orthogonal() {
        let base = json!({"a": 1, "b": 2});
        let agent_outputs = outputs(&[json!({"a": 10, "b": 2}), json!({"a": 20, "b": 2})]);
        assert!(!is_orthogonal(&base, &agent_outputs));
    }

    #[test]
    fn test_unchanged_outputs_are_not_orthogonal() {
        let base = json!({"a": 1});
        let agent_outputs = outputs(&[json!({"a": 1}), json!({"a": 1})]);
        assert!(!is_orthogonal(&base, &agent_outputs));
    }

    #[test]
    fn test_non_map_base_is_not_orthogonal() {
        let agent_outputs = outputs(&[json!({"a": 1}), json!({"b": 2})]);
        assert!(!is_orthogonal(&json!("base"), &agent_outputs));
        assert!(!is_orthogonal(&json!(null), &agent_outputs));
    }

    #[test]
    fn test_non_map_output_is_not_orthogonal() {
        let base = json!({"a": 1});
        let agent_outputs = outputs(&[json!({"a": 2}), json!("not a map")]);
        assert!(!is_orthogonal(&base, &agent_outputs));
    }

    #[test]
    fn test_added_keys_participate_in_disjointness() {
        let base = json!({});
        let agent_outputs = outputs(&[json!({"x": 1}), json!({"y": 1})]);
        assert!(is_orthogonal(&base, &agent_outputs));

        let agent_outputs = outputs(&[json!({"x": 1}), json!({"x": 2})]);
        assert!(!is_orthogonal(&base, &agent_outputs));
    }
}
