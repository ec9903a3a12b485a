//! Deterministic classification and advisory resolution of conflicts between
//! concurrently produced agent outputs.
//!
//! # Overview
//!
//! Several agents independently modify a shared base value; this crate
//! answers how their outputs relate (identical, orthogonal, mildly or
//! materially conflicting, contradictory, or indeterminate) and, only when
//! safe, which value to choose:
//!
//! - [`similarity`] - multi-metric structural/semantic similarity in [0, 1]
//! - [`ConflictClassifier`] - priority cascade producing a
//!   [`ClassificationResult`] with a confidence score
//! - [`ResolutionAdvisor`] - proposes a value or refuses with
//!   [`ArbiterError::HumanApprovalRequired`]
//!
//! Everything is pure and stateless: no I/O, no clocks, no randomness, no
//! shared mutable state. The same inputs always produce the same result, so
//! every operation can be called concurrently without synchronization.
//!
//! # Safety invariant
//!
//! Opposite and ambiguous conflicts are never auto-resolved. The advisor
//! fails with [`ArbiterError::HumanApprovalRequired`] for these classes;
//! routing them to a human workflow is the host's job.
//!
//! # Example
//!
//! ```
//! use agent_arbiter::{AgentOutput, ConflictClassifier, ConflictType, ResolutionAdvisor};
//! use serde_json::json;
//!
//! let base = json!({"a": 1, "b": 2});
//! let outputs = vec![
//!     AgentOutput::new("agent-a", json!({"a": 10, "b": 2})),
//!     AgentOutput::new("agent-b", json!({"a": 1, "b": 20})),
//! ];
//!
//! let result = ConflictClassifier::new().classify(&base, &outputs)?;
//! assert_eq!(result.conflict_type, ConflictType::Orthogonal);
//!
//! let merged = ResolutionAdvisor::new().recommend(&result, &base, &outputs)?;
//! assert_eq!(merged.value, json!({"a": 10, "b": 20}));
//! # Ok::<(), agent_arbiter::ArbiterError>(())
//! ```

pub mod classifier;
pub mod config;
pub mod contradiction;
pub mod error;
pub mod orthogonality;
pub mod resolution;
pub mod similarity;
pub mod value;

pub use classifier::{ClassificationResult, ConflictClassifier, ConflictType};
pub use config::{ArbiterConfig, ConfidenceScale};
pub use contradiction::contradicts;
pub use error::{ArbiterError, Result};
pub use resolution::{Recommendation, ResolutionAdvisor, ResolutionStrategy};
pub use similarity::{PairwiseReport, pairwise_report, similarity};
pub use value::{AgentOutput, Value, canonical_json, normalize};
