//! Multi-metric similarity scoring between agent output values.
//!
//! Each value kind gets a dedicated metric:
//! - **Maps**: key-overlap blended with per-shared-key value similarity
//! - **Numbers**: relative difference scaled by magnitude
//! - **Strings**: multiset Dice coefficient over character bigrams
//! - **Arrays**: multiset Jaccard over canonically serialized elements
//!
//! Mismatched kinds score 0.0; structurally equal values score 1.0.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};

use crate::value::{AgentOutput, canonical_json, normalize};

/// Similarity between two values in [0.0, 1.0]. Total: never fails.
pub fn similarity(a: &Value, b: &Value) -> f64 {
    if normalize(a) == normalize(b) {
        return 1.0;
    }

    match (a, b) {
        (Value::Object(ma), Value::Object(mb)) => map_similarity(ma, mb),
        (Value::Number(na), Value::Number(nb)) => numeric_similarity(na, nb),
        (Value::String(sa), Value::String(sb)) => string_similarity(sa, sb),
        (Value::Array(xs), Value::Array(ys)) => array_similarity(xs, ys),
        // Booleans deliberately have no numeric interpretation here.
        _ => 0.0,
    }
}

fn map_similarity(a: &Map<String, Value>, b: &Map<String, Value>) -> f64 {
    let mut common = 0usize;
    let mut value_sum = 0.0;
    for (key, value_a) in a {
        if let Some(value_b) = b.get(key) {
            common += 1;
            value_sum += similarity(value_a, value_b);
        }
    }

    let union = a.len() + b.len() - common;
    if union == 0 {
        return 1.0;
    }

    let key_similarity = common as f64 / union as f64;
    let value_similarity = if common == 0 {
        0.0
    } else {
        value_sum / common as f64
    };

    // With full key agreement, score on values alone. Blending in a perfect
    // key score would drag deeply nested near-misses toward 1.0.
    if key_similarity == 1.0 {
        value_similarity
    } else {
        0.5 * key_similarity + 0.5 * value_similarity
    }
}

fn numeric_similarity(a: &Number, b: &Number) -> f64 {
    // as_f64 is total for serde_json numbers without arbitrary_precision
    let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) else {
        return 0.0;
    };

    if a == 0.0 && b == 0.0 {
        return 1.0;
    }

    // Relative difference with a magnitude floor of 1, so small absolute
    // differences near zero still register.
    1.0 - ((a - b).abs() / a.abs().max(b.abs()).max(1.0)).min(1.0)
}

fn string_similarity(a: &str, b: &str) -> f64 {
    let counts_a = bigram_counts(a);
    let counts_b = bigram_counts(b);

    let total: usize = counts_a.values().sum::<usize>() + counts_b.values().sum::<usize>();
    if total == 0 {
        // Unequal strings of length <= 1 have no bigrams to compare.
        return 0.0;
    }

    let overlap: usize = counts_a
        .iter()
        .map(|(gram, count)| (*count).min(counts_b.get(gram).copied().unwrap_or(0)))
        .sum();

    2.0 * overlap as f64 / total as f64
}

fn bigram_counts(s: &str) -> HashMap<(char, char), usize> {
    let chars: Vec<char> = s.chars().collect();
    let mut counts = HashMap::new();
    for window in chars.windows(2) {
        *counts.entry((window[0], window[1])).or_insert(0) += 1;
    }
    counts
}

fn array_similarity(a: &[Value], b: &[Value]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let counts_a = element_counts(a);
    let counts_b = element_counts(b);

    let mut intersection = 0usize;
    let mut union = 0usize;
    for (form, count_a) in &counts_a {
        let count_b = counts_b.get(form).copied().unwrap_or(0);
        intersection += (*count_a).min(count_b);
        union += (*count_a).max(count_b);
    }
    for (form, count_b) in &counts_b {
        if !counts_a.contains_key(form) {
            union += count_b;
        }
    }

    intersection as f64 / union as f64
}

fn element_counts(items: &[Value]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(canonical_json(item)).or_insert(0) += 1;
    }
    counts
}

// ============================================================================
// Pairwise Aggregation
// ============================================================================

/// Aggregated similarity signals over all unordered pairs of agent outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseReport {
    /// Arithmetic mean over all pairwise similarity scores.
    pub average_similarity: f64,
    /// Max minus min pairwise score; 0.0 with a single pair.
    pub spread: f64,
    /// Mean key overlap across map pairs; absent unless >= 2 outputs are maps.
    pub structural_similarity: Option<f64>,
    /// Mean shared-key value similarity across map pairs; same condition.
    pub semantic_similarity: Option<f64>,
}

/// Score every unordered pair of outputs in input-index order.
pub fn pairwise_report(outputs: &[AgentOutput]) -> PairwiseReport {
    let mut scores = Vec::with_capacity(outputs.len().saturating_sub(1) * outputs.len() / 2);
    for i in 0..outputs.len() {
        for j in i + 1..outputs.len() {
            scores.push(similarity(&outputs[i].value, &outputs[j].value));
        }
    }

    let average_similarity = mean(&scores);
    let spread = if scores.len() > 1 {
        let max = scores.iter().copied().fold(f64::MIN, f64::max);
        let min = scores.iter().copied().fold(f64::MAX, f64::min);
        max - min
    } else {
        0.0
    };

    let maps: Vec<&Map<String, Value>> = outputs
        .iter()
        .filter_map(|output| output.value.as_object())
        .collect();

    let (structural_similarity, semantic_similarity) = if maps.len() >= 2 {
        let mut structural = Vec::new();
        let mut semantic = Vec::new();
        for i in 0..maps.len() {
            for j in i + 1..maps.len() {
                structural.push(key_overlap(maps[i], maps[j]));
                semantic.push(shared_key_similarity(maps[i], maps[j]));
            }
        }
        (Some(mean(&structural)), Some(mean(&semantic)))
    } else {
        (None, None)
    };

    PairwiseReport {
        average_similarity,
        spread,
        structural_similarity,
        semantic_similarity,
    }
}

fn key_overlap(a: &Map<String, Value>, b: &Map<String, Value>) -> f64 {
    let common = a.keys().filter(|key| b.contains_key(*key)).count();
    let union = a.len() + b.len() - common;
    if union == 0 {
        1.0
    } else {
        common as f64 / union as f64
    }
}

fn shared_key_similarity(a: &Map<String, Value>, b: &Map<String, Value>) -> f64 {
    let mut common = 0usize;
    let mut sum = 0.0;
    for (key, value_a) in a {
        if let Some(value_b) = b.get(key) {
            common += 1;
            sum += similarity(value_a, value_b);
        }
    }
    if common == 0 { 0.0 } else { sum / common as f64 }
}

fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}
