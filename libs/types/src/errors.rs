//! Error types for the matching engine
//!
//! Error taxonomy using thiserror. Every validation error is raised before
//! any book state is touched.

use thiserror::Error;

pub use crate::ids::IdExhausted;

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    #[error("invalid instrument {index}: engine capacity is {capacity}")]
    InvalidInstrument { index: usize, capacity: usize },

    /// Fatal: the engine stops accepting orders once this is returned
    #[error(transparent)]
    IdExhausted(#[from] IdExhausted),
}

impl EngineError {
    /// Whether the error means no further order can ever be accepted
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::IdExhausted(_))
    }
}

/// Order-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("limit price must be positive")]
    NonPositivePrice,

    #[error("quantity must be positive")]
    NonPositiveQuantity,

    #[error("remaining quantity {remaining} differs from order quantity {quantity}")]
    AlreadyTraded { quantity: u64, remaining: u64 },
}
