//! Instruction reports returned by the exchange
//!
//! One report per submitted instruction. Reports are data, not errors: a
//! FAILURE or TIMEOUT status is a normal outcome that drives the order state
//! machine, never an exception path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::instructions::{
    CancelInstruction, PlaceInstruction, ReplaceInstruction, UpdateInstruction,
};
use crate::value_objects::{BetId, CustomerRef, Size};

// =============================================================================
// Status / Error Codes
// =============================================================================

/// Per-instruction outcome reported by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstructionStatus {
    /// Instruction was accepted
    Success,
    /// Instruction was rejected; see the error code
    Failure,
    /// The exchange could not confirm the outcome in time
    ///
    /// Genuine uncertainty: the instruction may or may not have reached the
    /// book.
    Timeout,
}

/// Closed set of exchange rejection reasons
///
/// Informational only: no error code changes how a report is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionErrorCode {
    /// Instruction was malformed or inconsistent
    ErrorInOrder,
    /// The bet was already taken or lapsed before the instruction applied
    BetTakenOrLapsed,
    /// Requested price improvement exceeded the allowed band, bet lapsed
    BetLapsedPriceImprovementTooLarge,
    /// Stake below the market minimum
    InvalidBetSize,
    /// Selection does not exist in the market
    InvalidRunner,
    /// Market is suspended or closed
    MarketNotOpenForBetting,
    /// Account balance cannot cover the stake
    InsufficientFunds,
    /// Replace: the cancel phase succeeded but the place phase did not
    CancelledNotPlaced,
    /// Replace: the paired phase failed, this one was not attempted
    RelatedActionFailed,
    /// Instruction was a no-op (e.g. nothing left to cancel)
    NoActionRequired,
}

// =============================================================================
// Instruction Reports
// =============================================================================

/// Report for one place instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceInstructionReport {
    /// Outcome of the instruction
    pub status: InstructionStatus,
    /// Rejection reason, present on failure
    pub error_code: Option<ExecutionErrorCode>,
    /// Echo of the submitted instruction
    pub instruction: Option<PlaceInstruction>,
    /// Exchange-assigned bet id, present on success
    pub bet_id: Option<BetId>,
    /// When the bet reached the book
    pub placed_at: Option<DateTime<Utc>>,
}

/// Report for one cancel instruction
///
/// The echoed instruction carries the bet id the interpreter keys on; the
/// exchange does not preserve submission order for cancels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelInstructionReport {
    /// Outcome of the instruction
    pub status: InstructionStatus,
    /// Rejection reason, present on failure
    pub error_code: Option<ExecutionErrorCode>,
    /// Echo of the submitted instruction
    pub instruction: CancelInstruction,
    /// Stake actually cancelled, present on success
    pub size_cancelled: Option<Size>,
    /// When the cancellation took effect
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Report for one update instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateInstructionReport {
    /// Outcome of the instruction
    pub status: InstructionStatus,
    /// Rejection reason, present on failure
    pub error_code: Option<ExecutionErrorCode>,
    /// Echo of the submitted instruction
    pub instruction: Option<UpdateInstruction>,
}

/// Report for one replace instruction
///
/// A replace is a cancel-then-place pair; each phase reports independently
/// and either phase may be absent if the exchange never attempted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceInstructionReport {
    /// Echo of the submitted instruction
    pub instruction: Option<ReplaceInstruction>,
    /// Report for the cancel phase (retiring the old bet)
    pub cancel_report: Option<CancelInstructionReport>,
    /// Report for the place phase (creating the replacement bet)
    pub place_report: Option<PlaceInstructionReport>,
}

// =============================================================================
// Whole-call Responses
// =============================================================================

/// Response to a place submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResponse {
    /// Echo of the operation-scoped client reference
    pub customer_ref: Option<CustomerRef>,
    /// One report per submitted instruction, in submission order
    pub reports: Vec<PlaceInstructionReport>,
}

/// Response to a cancel submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelResponse {
    /// Echo of the operation-scoped client reference
    pub customer_ref: Option<CustomerRef>,
    /// One report per submitted instruction, order NOT guaranteed
    pub reports: Vec<CancelInstructionReport>,
}

/// Response to an update submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResponse {
    /// Echo of the operation-scoped client reference
    pub customer_ref: Option<CustomerRef>,
    /// One report per submitted instruction, in submission order
    pub reports: Vec<UpdateInstructionReport>,
}

/// Response to a replace submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceResponse {
    /// Echo of the operation-scoped client reference
    pub customer_ref: Option<CustomerRef>,
    /// One report per submitted instruction, in submission order
    pub reports: Vec<ReplaceInstructionReport>,
}

// =============================================================================
// Tests
// =============================================================================
