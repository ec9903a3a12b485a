//! Classification thresholds and confidence scaling.
//!
//! Thresholds are configuration, not hard-coded literals: hosts embed
//! [`ArbiterConfig`] in their own config tables and hand it to the
//! classifier at construction. Defaults match the reference cascade.

use serde::{Deserialize, Serialize};

use crate::classifier::ConflictType;
use crate::error::{ArbiterError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Average similarity at or above which outputs count as identical.
    pub identical_threshold: f64,
    /// Average similarity at or above which divergence is a low conflict.
    pub high_similarity_threshold: f64,
    /// Average similarity at or above which divergence is a material
    /// conflict; anything below is ambiguous.
    pub conflicting_threshold: f64,
    pub confidence_scale: ConfidenceScale,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            identical_threshold: 0.99,
            high_similarity_threshold: 0.85,
            conflicting_threshold: 0.50,
            confidence_scale: ConfidenceScale::default(),
        }
    }
}

impl ArbiterConfig {
    pub fn with_identical_threshold(mut self, threshold: f64) -> Self {
        self.identical_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_high_similarity_threshold(mut self, threshold: f64) -> Self {
        self.high_similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_conflicting_threshold(mut self, threshold: f64) -> Self {
        self.conflicting_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Validate threshold ordering and ranges.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        let thresholds = [
            ("identical_threshold", self.identical_threshold),
            ("high_similarity_threshold", self.high_similarity_threshold),
            ("conflicting_threshold", self.conflicting_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{name} must be within [0, 1], got {value}"));
            }
        }

        if self.identical_threshold < self.high_similarity_threshold {
            errors.push(
                "identical_threshold must not be below high_similarity_threshold".to_string(),
            );
        }
        if self.high_similarity_threshold < self.conflicting_threshold {
            errors.push(
                "high_similarity_threshold must not be below conflicting_threshold".to_string(),
            );
        }

        for conflict_type in ConflictType::ALL {
            let factor = self.confidence_scale.factor(conflict_type);
            if !(0.0..=1.0).contains(&factor) {
                errors.push(format!(
                    "confidence scale for {conflict_type} must be within [0, 1], got {factor}"
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ArbiterError::Config(errors.join("; ")))
        }
    }
}

/// Per-conflict-type confidence multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceScale {
    pub identical: f64,
    pub orthogonal: f64,
    pub low_conflict: f64,
    pub opposite: f64,
    pub conflicting: f64,
    pub ambiguous: f64,
}

impl Default for ConfidenceScale {
    fn default() -> Self {
        Self {
            identical: 1.0,
            orthogonal: 0.90,
            low_conflict: 0.85,
            opposite: 0.85,
            conflicting: 0.70,
            ambiguous: 0.50,
        }
    }
}

impl ConfidenceScale {
    pub fn factor(&self, conflict_type: ConflictType) -> f64 {
        match conflict_type {
            ConflictType::Identical => self.identical,
            ConflictType::Orthogonal => self.orthogonal,
            ConflictType::LowConflict => self.low_conflict,
            ConflictType::Opposite => self.opposite,
            ConflictType::Conflicting => self.conflicting,
            ConflictType::Ambiguous => self.ambiguous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ArbiterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.identical_threshold, 0.99);
        assert_eq!(config.high_similarity_threshold, 0.85);
        assert_eq!(config.conflicting_threshold, 0.50);
    }

    #[test]
    fn test_default_confidence_scale() {
        let scale = ConfidenceScale::default();
        assert_eq!(scale.factor(ConflictType::Identical), 1.0);
        assert_eq!(scale.factor(ConflictType::Orthogonal), 0.90);
        assert_eq!(scale.factor(ConflictType::LowConflict), 0.85);
        assert_eq!(scale.factor(ConflictType::Opposite), 0.85);
        assert_eq!(scale.factor(ConflictType::Conflicting), 0.70);
        assert_eq!(scale.factor(ConflictType::Ambiguous), 0.50);
    }

    #[test]
    fn test_builders_clamp_to_unit_interval() {
        let config = ArbiterConfig::default()
            .with_identical_threshold(1.5)
            .with_conflicting_threshold(-0.2);
        assert_eq!(config.identical_threshold, 1.0);
        assert_eq!(config.conflicting_threshold, 0.0);
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let config = ArbiterConfig::default()
            .with_identical_threshold(0.4)
            .with_high_similarity_threshold(0.8);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_serde() {
        let config = ArbiterConfig::default().with_conflicting_threshold(0.6);
        let text = serde_json::to_string(&config).unwrap();
        let parsed: ArbiterConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
