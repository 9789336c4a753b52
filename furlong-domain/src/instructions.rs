//! Per-instruction payloads submitted to the exchange
//!
//! One instruction per member order, derived from the order at submission
//! time. The batch-level parameters (market id, customer ref, market
//! version, async flag) travel alongside, not inside, these payloads.

use serde::{Deserialize, Serialize};

use crate::value_objects::{BetId, PersistenceType, Price, SelectionId, Side, Size};

/// Instruction to place a new limit order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceInstruction {
    /// Runner the order targets
    pub selection_id: SelectionId,
    /// Back or lay
    pub side: Side,
    /// Requested odds
    pub price: Price,
    /// Requested stake
    pub size: Size,
    /// In-play persistence behaviour
    pub persistence: PersistenceType,
}

/// Instruction to cancel (or reduce) a live bet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelInstruction {
    /// Live bet to cancel
    pub bet_id: BetId,
    /// Partial reduction; None cancels the full remainder
    pub size_reduction: Option<Size>,
}

/// Instruction to amend a live bet's persistence behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateInstruction {
    /// Live bet to update
    pub bet_id: BetId,
    /// Persistence behaviour to switch to
    pub new_persistence: PersistenceType,
}

/// Instruction to move a live bet to a new price
///
/// Executed by the exchange as an atomic cancel-then-place pair; the report
/// comes back with one nested report per phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceInstruction {
    /// Live bet to replace
    pub bet_id: BetId,
    /// Odds for the replacement bet
    pub new_price: Price,
}
