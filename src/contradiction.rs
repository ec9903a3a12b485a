//! Detection of semantically opposite agent outputs.
//!
//! Two outputs contradict when they encode a semantic opposite: a boolean
//! flip, a known antonym pair, or a map whose shared keys mostly contradict.

use serde_json::Value;

use crate::value::AgentOutput;

/// Known semantic-opposite word pairs, matched case-insensitively after
/// trimming. Read-only process-wide knowledge base.
const CONTRADICTION_PAIRS: &[(&str, &str)] = &[
    ("true", "false"),
    ("enable", "disable"),
    ("allow", "deny"),
    ("yes", "no"),
    ("on", "off"),
    ("accept", "reject"),
    ("approve", "deny"),
    ("approve", "reject"),
    ("include", "exclude"),
];

fn is_known_opposite(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    CONTRADICTION_PAIRS
        .iter()
        .any(|(left, right)| (a == *left && b == *right) || (a == *right && b == *left))
}

/// Whether two values encode a semantic opposite.
pub fn contradicts(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x != y,
        (Value::String(x), Value::String(y)) => is_known_opposite(x, y),
        (Value::Object(x), Value::Object(y)) => {
            let mut common = 0usize;
            let mut contradicting = 0usize;
            for (key, value_x) in x {
                if let Some(value_y) = y.get(key) {
                    common += 1;
                    if contradicts(value_x, value_y) {
                        contradicting += 1;
                    }
                }
            }
            if common == 0 {
                false
            } else if common <= 2 {
                // Too few shared keys for a majority vote; any flip counts.
                contradicting > 0
            } else {
                contradicting as f64 / common as f64 > 0.5
            }
        }
        _ => false,
    }
}

/// Run-level flag: true iff any pair of outputs contradicts.
pub fn any_contradiction(outputs: &[AgentOutput]) -> bool {
    for i in 0..outputs.len() {
        for j in i + 1..outputs.len() {
            if contradicts(&outputs[i].value, &outputs[j].value) {
                return true;
            }
        }
    }
    false
}
