use thiserror::Error;

use crate::classifier::ConflictType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArbiterError {
    #[error("At least 2 agent outputs are required for classification, got {0}")]
    InsufficientInputs(usize),

    #[error("Human approval required to resolve {0} conflicts")]
    HumanApprovalRequired(ConflictType),

    #[error("Agents '{agent_a}' and '{agent_b}' changed overlapping keys: {keys:?}")]
    KeyOverlapDetected {
        agent_a: String,
        agent_b: String,
        keys: Vec<String>,
    },

    #[error("Unreachable state: {0}")]
    UnreachableState(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ArbiterError>;
