//! Execution layer error types.
//!
//! The split matters: a [`TransportFault`] means the remote call itself
//! failed and the whole cycle is abandoned with no state mutated, while
//! per-instruction FAILURE/TIMEOUT outcomes are data handled by the
//! interpreter and never surface as errors.

use thiserror::Error;

use furlong_domain::MarketId;

/// The remote call itself failed.
///
/// Transport adapters return this instead of a response; the executor logs
/// it and abandons the cycle. Since no order state is mutated on this path,
/// the owning layer may rebuild and resubmit the batch wholesale.
#[derive(Debug, Clone, Error)]
pub enum TransportFault {
    /// Connection-level failure before a response was obtained
    #[error("Network failure: {0}")]
    Network(String),

    /// The exchange could not parse the request
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// The exchange rejected the batch as a whole
    #[error("Batch rejected: {code} - {message}")]
    BatchRejected {
        /// Exchange rejection code
        code: String,
        /// Human-readable detail
        message: String,
    },
}

/// Errors surfaced to callers of the execution operations.
#[derive(Debug, Error)]
pub enum ExecError {
    /// A cancel package shrank to zero effective instructions before
    /// submission (every member was matched or cancelled out-of-band)
    #[error("Nothing to execute for market {market_id}")]
    EmptyBatch {
        /// Market the package targeted
        market_id: MarketId,
    },

    /// Domain invariant violation while applying a report
    #[error("Domain error: {0}")]
    Domain(#[from] furlong_domain::DomainError),
}

/// Result type for execution operations.
pub type ExecResult<T> = Result<T, ExecError>;
