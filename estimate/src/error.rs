use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// One of the three charge categories in a fee breakdown
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeeComponentKind {
    Network,
    Node,
    Service,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeEstimateError {
    #[error("Missing required {0} fee component")]
    MissingComponent(FeeComponentKind),

    #[error("Negative amount {value} in {component} fee component")]
    NegativeAmount {
        component: FeeComponentKind,
        value: i64,
    },

    #[error("Too many {0}: got {1}, limit is {2}")]
    LimitExceeded(&'static str, usize, usize),

    #[error("{component} subtotal mismatch: expected {expected}, found {found}")]
    SubtotalMismatch {
        component: FeeComponentKind,
        expected: u64,
        found: u64,
    },

    #[error("Total mismatch: expected {expected}, found {found}")]
    TotalMismatch { expected: u64, found: u64 },

    #[error("Chunk mismatch: {0}")]
    ChunkMismatch(&'static str),

    #[error("Fee amount overflow")]
    Overflow,
}
