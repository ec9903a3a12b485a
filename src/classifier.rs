//! Conflict classification over concurrently produced agent outputs.
//!
//! The classifier runs a fixed-priority decision cascade over aggregated
//! similarity, contradiction, and orthogonality signals. First match wins:
//!
//! 1. Any contradicting pair → [`ConflictType::Opposite`]
//! 2. Average similarity ≥ identical threshold → [`ConflictType::Identical`]
//! 3. Disjoint changed-key sets → [`ConflictType::Orthogonal`]
//! 4. Average similarity ≥ high threshold → [`ConflictType::LowConflict`]
//! 5. Average similarity ≥ conflicting threshold → [`ConflictType::Conflicting`]
//! 6. Otherwise → [`ConflictType::Ambiguous`]

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::ArbiterConfig;
use crate::contradiction::any_contradiction;
use crate::error::{ArbiterError, Result};
use crate::orthogonality::{changed_keys, is_orthogonal};
use crate::similarity::pairwise_report;
use crate::value::AgentOutput;

/// How a set of divergent agent outputs relate to each other.
///
/// Listed in descending cascade priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// Outputs encode semantic opposites; never auto-resolved.
    Opposite,
    /// Outputs are effectively the same value.
    Identical,
    /// Outputs changed disjoint fields of the base and merge losslessly.
    Orthogonal,
    /// Outputs differ mildly; a suggestion is safe but advisory.
    LowConflict,
    /// Outputs differ materially; a suggestion is advisory at best.
    Conflicting,
    /// Outputs diverge too far to relate; never auto-resolved.
    Ambiguous,
}

impl ConflictType {
    pub const ALL: [ConflictType; 6] = [
        Self::Opposite,
        Self::Identical,
        Self::Orthogonal,
        Self::LowConflict,
        Self::Conflicting,
        Self::Ambiguous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opposite => "opposite",
            Self::Identical => "identical",
            Self::Orthogonal => "orthogonal",
            Self::LowConflict => "low_conflict",
            Self::Conflicting => "conflicting",
            Self::Ambiguous => "ambiguous",
        }
    }

    /// Conflict classes that must be routed to a human, process-wide.
    pub fn requires_human_approval(&self) -> bool {
        matches!(self, Self::Opposite | Self::Ambiguous)
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable outcome of one classification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub conflict_type: ConflictType,
    /// Mean pairwise similarity in [0, 1].
    pub similarity_score: f64,
    /// Confidence in the verdict, in [0, 1].
    pub confidence: f64,
    /// Mean key overlap across map outputs; absent unless >= 2 outputs are maps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structural_similarity: Option<f64>,
    /// Mean shared-key value similarity across map outputs; same condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_similarity: Option<f64>,
    pub explanation: String,
    /// Keys that differ from the base across any output; empty when the base
    /// is not a map.
    pub affected_fields: BTreeSet<String>,
}

impl ClassificationResult {
    pub fn requires_human_approval(&self) -> bool {
        self.conflict_type.requires_human_approval()
    }
}

/// Pure, stateless classifier; safe to share across threads.
#[derive(Debug, Clone)]
pub struct ConflictClassifier {
    config: ArbiterConfig,
}

impl Default for ConflictClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictClassifier {
    pub fn new() -> Self {
        Self {
            config: ArbiterConfig::default(),
        }
    }

    /// Build a classifier with custom thresholds. Fails if the config does
    /// not validate.
    pub fn with_config(config: ArbiterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Classify how the agent outputs relate to each other and to the base.
    ///
    /// Deterministic: repeated calls on the same inputs produce identical
    /// results, and the verdict does not depend on output order.
    pub fn classify(&self, base: &Value, outputs: &[AgentOutput]) -> Result<ClassificationResult> {
        if outputs.len() < 2 {
            return Err(ArbiterError::InsufficientInputs(outputs.len()));
        }

        let report = pairwise_report(outputs);
        let average = report.average_similarity;

        let (conflict_type, explanation) = if any_contradiction(outputs) {
            (
                ConflictType::Opposite,
                format!("Agent outputs encode semantic opposites (avg similarity {average:.3})"),
            )
        } else if average >= self.config.identical_threshold {
            (
                ConflictType::Identical,
                format!("Agent outputs are effectively identical (avg similarity {average:.3})"),
            )
        } else if is_orthogonal(base, outputs) {
            (
                ConflictType::Orthogonal,
                format!(
                    "Agents changed disjoint fields of the base value (avg similarity {average:.3})"
                ),
            )
        } else if average >= self.config.high_similarity_threshold {
            (
                ConflictType::LowConflict,
                format!("Agent outputs differ mildly (avg similarity {average:.3})"),
            )
        } else if average >= self.config.conflicting_threshold {
            (
                ConflictType::Conflicting,
                format!("Agent outputs conflict materially (avg similarity {average:.3})"),
            )
        } else {
            (
                ConflictType::Ambiguous,
                format!(
                    "Agent outputs diverge too far to relate (avg similarity {average:.3})"
                ),
            )
        };

        let confidence = ((1.0 - report.spread)
            * self.config.confidence_scale.factor(conflict_type))
        .clamp(0.0, 1.0);

        debug!(
            conflict_type = %conflict_type,
            similarity = average,
            confidence,
            agents = outputs.len(),
            "Classified agent outputs"
        );

        Ok(ClassificationResult {
            conflict_type,
            similarity_score: average,
            confidence,
            structural_similarity: report.structural_similarity,
            semantic_similarity: report.semantic_similarity,
            explanation,
            affected_fields: affected_fields(base, outputs),
        })
    }
}

fn affected_fields(base: &Value, outputs: &[AgentOutput]) -> BTreeSet<String> {
    let Some(base_map) = base.as_object() else {
        return BTreeSet::new();
    };

    let mut fields = BTreeSet::new();
    for output in outputs {
        if let Some(map) = output.value.as_object() {
            fields.extend(changed_keys(base_map, map));
        }
    }
    fields
}
