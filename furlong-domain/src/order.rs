//! Order entity and lifecycle state machine
//!
//! An order is created by the owning blotter, submitted in batches by the
//! execution layer, and driven through its states by the instruction reports
//! the exchange returns. Every response received is appended to the order's
//! response log, which is audit history: extended, never rewritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reports::{
    CancelInstructionReport, PlaceInstructionReport, ReplaceInstructionReport,
    UpdateInstructionReport,
};
use crate::value_objects::{
    BetId, DomainError, MarketId, OrderId, PersistenceType, Price, SelectionId, Side, Size,
};

// =============================================================================
// Order Status
// =============================================================================

/// Order lifecycle states
///
/// `Pending` -> `Executable` -> `ExecutionComplete`, with one sanctioned
/// exception: a successful replace re-opens a completed order under a new
/// bet id (see [`Order::confirm_replaced`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Created locally; not yet confirmed on the exchange
    Pending,
    /// Live on the exchange; may still be matched, cancelled or amended
    Executable,
    /// Terminal; no further exchange action is possible
    ExecutionComplete,
}

impl OrderStatus {
    /// Get the name of the status for display
    pub fn name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Executable => "executable",
            OrderStatus::ExecutionComplete => "execution_complete",
        }
    }
}

// =============================================================================
// Response Log
// =============================================================================

/// One recorded instruction report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEntry {
    /// When the report was recorded locally
    pub recorded_at: DateTime<Utc>,
    /// The report itself, tagged by operation kind
    pub response: ExchangeResponse,
}

/// An instruction report tagged by the operation that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExchangeResponse {
    /// Report from a place submission
    Placed(PlaceInstructionReport),
    /// Report from a cancel submission
    Cancelled(CancelInstructionReport),
    /// Report from an update submission
    Updated(UpdateInstructionReport),
    /// Report from a replace submission
    Replaced(ReplaceInstructionReport),
}

/// Append-only log of every instruction report received for an order
///
/// Entries are recorded in consumption order. There is no API to remove or
/// rewrite an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseLog {
    entries: Vec<ResponseEntry>,
}

impl ResponseLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a place report.
    pub fn placed(&mut self, report: PlaceInstructionReport) {
        self.push(ExchangeResponse::Placed(report));
    }

    /// Record a cancel report.
    pub fn cancelled(&mut self, report: CancelInstructionReport) {
        self.push(ExchangeResponse::Cancelled(report));
    }

    /// Record an update report.
    pub fn updated(&mut self, report: UpdateInstructionReport) {
        self.push(ExchangeResponse::Updated(report));
    }

    /// Record a replace report.
    pub fn replaced(&mut self, report: ReplaceInstructionReport) {
        self.push(ExchangeResponse::Replaced(report));
    }

    fn push(&mut self, response: ExchangeResponse) {
        self.entries.push(ResponseEntry { recorded_at: Utc::now(), response });
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[ResponseEntry] {
        &self.entries
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&ResponseEntry> {
        self.entries.last()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Order
// =============================================================================

/// A single tradable instruction with identity, lifecycle state and history
///
/// Owned by the per-market blotter; the execution layer receives shared
/// handles and mutates state only through the transition methods below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Locally generated identity, stable for the order's lifetime
    pub id: OrderId,
    /// Market the order belongs to
    pub market_id: MarketId,
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
    /// Exchange-assigned bet id; absent until a place or replace succeeds
    pub bet_id: Option<BetId>,
    /// Partial-cancel amount staged by the strategy; consumed when a cancel
    /// package is built. None cancels the full remainder.
    pub size_reduction: Option<Size>,
    /// Append-only history of instruction reports
    pub responses: ResponseLog,
    /// When the order was created locally
    pub created_at: DateTime<Utc>,

    status: OrderStatus,
}

impl Order {
    /// Create a new pending limit order.
    pub fn new_limit(
        market_id: MarketId,
        selection_id: SelectionId,
        side: Side,
        price: Price,
        size: Size,
        persistence: PersistenceType,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            market_id,
            selection_id,
            side,
            price,
            size,
            persistence,
            bet_id: None,
            size_reduction: None,
            responses: ResponseLog::new(),
            created_at: Utc::now(),
            status: OrderStatus::Pending,
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Mark the order live on the exchange.
    ///
    /// Idempotent from `Executable`; used when a cancel/update did not take
    /// effect and the order remains on the book.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` from `ExecutionComplete`.
    pub fn mark_executable(&mut self) -> Result<(), DomainError> {
        match self.status {
            OrderStatus::Pending | OrderStatus::Executable => {
                self.status = OrderStatus::Executable;
                Ok(())
            },
            OrderStatus::ExecutionComplete => Err(DomainError::InvalidTransition {
                order_id: self.id,
                from: self.status.name(),
                to: OrderStatus::Executable.name(),
            }),
        }
    }

    /// Retire the order; no further exchange action is possible.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if already complete.
    pub fn mark_execution_complete(&mut self) -> Result<(), DomainError> {
        match self.status {
            OrderStatus::Pending | OrderStatus::Executable => {
                self.status = OrderStatus::ExecutionComplete;
                Ok(())
            },
            OrderStatus::ExecutionComplete => Err(DomainError::InvalidTransition {
                order_id: self.id,
                from: self.status.name(),
                to: OrderStatus::ExecutionComplete.name(),
            }),
        }
    }

    /// Place succeeded: attach the exchange-assigned bet id and go live.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` from `ExecutionComplete`.
    pub fn confirm_placed(&mut self, bet_id: BetId) -> Result<(), DomainError> {
        self.mark_executable()?;
        self.bet_id = Some(bet_id);
        Ok(())
    }

    /// Replace place-phase succeeded: swap in the new bet id and go live.
    ///
    /// The replace flow retires the old bet identity at the cancel phase, so
    /// this transition is valid even from `ExecutionComplete`: the same
    /// local order continues under its replacement bet.
    pub fn confirm_replaced(&mut self, bet_id: BetId) {
        self.bet_id = Some(bet_id);
        self.status = OrderStatus::Executable;
    }

    /// True if a cancel instruction can still act on this order.
    ///
    /// An order fully matched or cancelled out-of-band is marked complete by
    /// the blotter and drops out of the effective cancel list.
    pub fn is_cancellable(&self) -> bool {
        self.status == OrderStatus::Executable && self.bet_id.is_some()
    }

    /// True if the order reached its terminal state.
    pub fn is_complete(&self) -> bool {
        self.status == OrderStatus::ExecutionComplete
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::InstructionStatus;
    use rust_decimal_macros::dec;

    fn test_order() -> Order {
        Order::new_limit(
            MarketId::new("1.179082386").unwrap(),
            47972,
            Side::Back,
            Price::new(dec!(2.02)).unwrap(),
            Size::new(dec!(5)).unwrap(),
            PersistenceType::Lapse,
        )
    }

    #[test]
    fn test_new_order_is_pending() {
        let order = test_order();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.bet_id.is_none());
        assert!(order.responses.is_empty());
        assert!(!order.is_cancellable());
    }

    #[test]
    fn test_confirm_placed_attaches_bet_id() {
        let mut order = test_order();
        order.confirm_placed(BetId::new("111").unwrap()).unwrap();

        assert_eq!(order.status(), OrderStatus::Executable);
        assert_eq!(order.bet_id.as_ref().unwrap().as_str(), "111");
        assert!(order.is_cancellable());
    }

    #[test]
    fn test_mark_executable_idempotent_while_live() {
        let mut order = test_order();
        order.mark_executable().unwrap();
        order.mark_executable().unwrap();
        assert_eq!(order.status(), OrderStatus::Executable);
    }

    #[test]
    fn test_execution_complete_is_terminal() {
        let mut order = test_order();
        order.mark_executable().unwrap();
        order.mark_execution_complete().unwrap();

        assert!(order.is_complete());
        assert!(order.mark_executable().is_err());
        assert!(order.mark_execution_complete().is_err());
        assert!(order.confirm_placed(BetId::new("222").unwrap()).is_err());
    }

    #[test]
    fn test_confirm_replaced_reopens_completed_order() {
        let mut order = test_order();
        order.confirm_placed(BetId::new("111").unwrap()).unwrap();
        order.mark_execution_complete().unwrap();

        order.confirm_replaced(BetId::new("222").unwrap());

        assert_eq!(order.status(), OrderStatus::Executable);
        assert_eq!(order.bet_id.as_ref().unwrap().as_str(), "222");
    }

    #[test]
    fn test_response_log_preserves_order() {
        let mut order = test_order();

        order.responses.placed(PlaceInstructionReport {
            status: InstructionStatus::Failure,
            error_code: None,
            instruction: None,
            bet_id: None,
            placed_at: None,
        });
        order.responses.placed(PlaceInstructionReport {
            status: InstructionStatus::Success,
            error_code: None,
            instruction: None,
            bet_id: Some(BetId::new("111").unwrap()),
            placed_at: Some(Utc::now()),
        });

        assert_eq!(order.responses.len(), 2);
        let statuses: Vec<_> = order
            .responses
            .entries()
            .iter()
            .map(|entry| match &entry.response {
                ExchangeResponse::Placed(report) => report.status,
                _ => panic!("expected place reports"),
            })
            .collect();
        assert_eq!(
            statuses,
            vec![InstructionStatus::Failure, InstructionStatus::Success]
        );
    }

    #[test]
    fn test_cancellable_requires_bet_id() {
        let mut order = test_order();
        order.mark_executable().unwrap();
        // live but never confirmed on the exchange
        assert!(!order.is_cancellable());
    }
}
