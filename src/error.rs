//! Error types for DhruvaPatrol

use thiserror::Error;

/// DhruvaPatrol error type
#[derive(Error, Debug)]
pub enum PatrolError {
    /// Occupancy grid is empty, ragged, or contains a non-integer token.
    #[error("Malformed occupancy grid: {0}")]
    MalformedInput(String),

    /// Start index is outside the grid or names a blocked cell.
    #[error("Invalid start node {node}: {reason}")]
    InvalidStartNode {
        /// Requested start index.
        node: usize,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// No free orthogonal neighbor exists for the current node.
    #[error("Unreachable topology: node {node} has no free orthogonal neighbor")]
    UnreachableTopology {
        /// Node the agent is stuck on.
        node: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PatrolError {
    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "MALFORMED_INPUT",
            Self::InvalidStartNode { .. } => "INVALID_START_NODE",
            Self::UnreachableTopology { .. } => "UNREACHABLE_TOPOLOGY",
            Self::Config(_) => "CONFIG",
            Self::Io(_) => "IO",
        }
    }
}

impl From<toml::de::Error> for PatrolError {
    fn from(e: toml::de::Error) -> Self {
        PatrolError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PatrolError>;
