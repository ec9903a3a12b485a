//! Advisory resolution of classified conflicts.
//!
//! The advisor proposes a value only when the classification says it is safe
//! to do so. Opposite and ambiguous conflicts are never resolved here; they
//! fail with [`ArbiterError::HumanApprovalRequired`] so the host can route
//! them to a human-approval workflow. All other proposals are suggestions,
//! not decisions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::classifier::{ClassificationResult, ConflictType};
use crate::error::{ArbiterError, Result};
use crate::orthogonality::changed_keys;
use crate::value::AgentOutput;

/// How a recommended value was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// First agent's output, taken verbatim.
    FirstOutput,
    /// Disjoint changes from every agent overlaid onto the base.
    OrthogonalMerge,
    /// First agent's output, explicitly non-authoritative.
    AdvisoryFirstOutput,
}

/// A proposed resolution value with its derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub value: Value,
    pub explanation: String,
    pub strategy: ResolutionStrategy,
}

/// Stateless advisor; consumes a classification, never re-derives similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionAdvisor;

impl ResolutionAdvisor {
    pub fn new() -> Self {
        Self
    }

    /// Propose a resolution for a classified conflict, or refuse.
    ///
    /// Fails with [`ArbiterError::HumanApprovalRequired`] for opposite and
    /// ambiguous conflicts, and with [`ArbiterError::KeyOverlapDetected`] if
    /// an orthogonal merge finds that the outputs' changed keys overlap
    /// after all.
    pub fn recommend(
        &self,
        result: &ClassificationResult,
        base: &Value,
        outputs: &[AgentOutput],
    ) -> Result<Recommendation> {
        let first = outputs
            .first()
            .ok_or(ArbiterError::InsufficientInputs(0))?;

        let recommendation = match result.conflict_type {
            ConflictType::Opposite | ConflictType::Ambiguous => {
                debug!(
                    conflict_type = %result.conflict_type,
                    "Refusing automatic resolution"
                );
                return Err(ArbiterError::HumanApprovalRequired(result.conflict_type));
            }
            ConflictType::Identical => Recommendation {
                value: first.value.clone(),
                explanation: format!(
                    "All agents agree; using output from '{}' verbatim",
                    first.agent_id
                ),
                strategy: ResolutionStrategy::FirstOutput,
            },
            ConflictType::Orthogonal => self.merge_orthogonal(base, outputs, first)?,
            ConflictType::LowConflict | ConflictType::Conflicting => Recommendation {
                value: first.value.clone(),
                explanation: format!(
                    "Advisory only: proposing output from '{}' for a {} conflict; \
                     not authoritative",
                    first.agent_id, result.conflict_type
                ),
                strategy: ResolutionStrategy::AdvisoryFirstOutput,
            },
        };

        Ok(recommendation)
    }

    /// Overlay each agent's changed keys onto the base, in input order.
    ///
    /// Disjointness may have been violated between classification and
    /// resolution, so it is re-verified here instead of trusting the
    /// verdict.
    fn merge_orthogonal(
        &self,
        base: &Value,
        outputs: &[AgentOutput],
        first: &AgentOutput,
    ) -> Result<Recommendation> {
        let Some(base_map) = base.as_object() else {
            return Ok(non_map_fallback(first));
        };

        let mut change_sets: Vec<(&AgentOutput, &Map<String, Value>, BTreeSet<String>)> =
            Vec::with_capacity(outputs.len());
        for output in outputs {
            let Some(map) = output.value.as_object() else {
                return Ok(non_map_fallback(first));
            };
            change_sets.push((output, map, changed_keys(base_map, map)));
        }

        for i in 0..change_sets.len() {
            for j in i + 1..change_sets.len() {
                let overlap: Vec<String> = change_sets[i]
                    .2
                    .intersection(&change_sets[j].2)
                    .cloned()
                    .collect();
                if !overlap.is_empty() {
                    warn!(
                        agent_a = %change_sets[i].0.agent_id,
                        agent_b = %change_sets[j].0.agent_id,
                        keys = ?overlap,
                        "Orthogonal merge aborted: changed keys overlap"
                    );
                    return Err(ArbiterError::KeyOverlapDetected {
                        agent_a: change_sets[i].0.agent_id.clone(),
                        agent_b: change_sets[j].0.agent_id.clone(),
                        keys: overlap,
                    });
                }
            }
        }

        let mut merged = base_map.clone();
        for (_, map, changed) in &change_sets {
            for key in changed {
                match map.get(key) {
                    Some(value) => {
                        merged.insert(key.clone(), value.clone());
                    }
                    // Key present in base but absent from this output: the
                    // agent removed it.
                    None => {
                        merged.remove(key);
                    }
                }
            }
        }

        let agents: Vec<&str> = outputs
            .iter()
            .map(|output| output.agent_id.as_str())
            .collect();
        Ok(Recommendation {
            value: Value::Object(merged),
            explanation: format!("Merged disjoint changes from agents: {}", agents.join(", ")),
            strategy: ResolutionStrategy::OrthogonalMerge,
        })
    }
}

fn non_map_fallback(first: &AgentOutput) -> Recommendation {
    Recommendation {
        value: first.value.clone(),
        explanation: format!(
            "Outputs are not all maps; falling back to output from '{}'",
            first.agent_id
        ),
        strategy: ResolutionStrategy::FirstOutput,
    }
}
