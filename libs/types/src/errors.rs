//! Error types for the matching engine
//!
//! Three-kind taxonomy using thiserror: boundary rejection, unknown-symbol
//! reads, and illegal order state transitions. None of these mutate state
//! and none are retried.

use thiserror::Error;

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Rejected at the submit boundary: bad quantity or missing price
    #[error("Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// Read of a book that was never created
    #[error("Unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("Order error: {0}")]
    Order(#[from] OrderError),
}

/// Order-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Attempt to cancel or fill an order in a terminal state
    #[error("Illegal transition: order is {status}")]
    IllegalTransition { status: String },
}
