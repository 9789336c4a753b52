//! Factory functions for orders, handles and instruction reports.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal_macros::dec;

use furlong_domain::{
    BetId, CancelInstruction, CancelInstructionReport, ExecutionErrorCode, InstructionStatus,
    MarketId, Order, PersistenceType, PlaceInstructionReport, Price, ReplaceInstructionReport,
    Side, Size, UpdateInstructionReport,
};
use furlong_exec::OrderHandle;

/// The market every factory order belongs to.
pub fn test_market() -> MarketId {
    MarketId::new("1.179082386").expect("valid market id")
}

/// A freshly created order: pending, no bet id.
pub fn pending_order() -> Order {
    Order::new_limit(
        test_market(),
        47972,
        Side::Back,
        Price::new(dec!(2.02)).expect("valid price"),
        Size::new(dec!(5)).expect("valid size"),
        PersistenceType::Lapse,
    )
}

/// An order live on the exchange under the given bet id.
pub fn live_order(bet_id: &str) -> Order {
    let mut order = pending_order();
    order
        .confirm_placed(BetId::new(bet_id).expect("valid bet id"))
        .expect("pending order becomes executable");
    order
}

/// Wrap an order in the shared handle the execution layer works with.
pub fn wrap_order(order: Order) -> OrderHandle {
    Arc::new(RwLock::new(order))
}

/// Handle around a fresh pending order.
pub fn pending_handle() -> OrderHandle {
    wrap_order(pending_order())
}

/// Handle around a live order with the given bet id.
pub fn live_handle(bet_id: &str) -> OrderHandle {
    wrap_order(live_order(bet_id))
}

/// A SUCCESS place report carrying the given bet id.
pub fn success_place_report(bet_id: &str) -> PlaceInstructionReport {
    PlaceInstructionReport {
        status: InstructionStatus::Success,
        error_code: None,
        instruction: None,
        bet_id: Some(BetId::new(bet_id).expect("valid bet id")),
        placed_at: Some(Utc::now()),
    }
}

/// A FAILURE place report with the given error code.
pub fn failure_place_report(error_code: ExecutionErrorCode) -> PlaceInstructionReport {
    PlaceInstructionReport {
        status: InstructionStatus::Failure,
        error_code: Some(error_code),
        instruction: None,
        bet_id: None,
        placed_at: None,
    }
}

/// A TIMEOUT place report.
pub fn timeout_place_report() -> PlaceInstructionReport {
    PlaceInstructionReport {
        status: InstructionStatus::Timeout,
        error_code: None,
        instruction: None,
        bet_id: None,
        placed_at: None,
    }
}

/// A cancel report for the given bet id with the given outcome.
pub fn cancel_report(status: InstructionStatus, bet_id: &str) -> CancelInstructionReport {
    CancelInstructionReport {
        status,
        error_code: matches!(status, InstructionStatus::Failure)
            .then_some(ExecutionErrorCode::BetTakenOrLapsed),
        instruction: CancelInstruction {
            bet_id: BetId::new(bet_id).expect("valid bet id"),
            size_reduction: None,
        },
        size_cancelled: matches!(status, InstructionStatus::Success)
            .then(|| Size::new(dec!(5)).expect("valid size")),
        cancelled_at: matches!(status, InstructionStatus::Success).then(Utc::now),
    }
}

/// An update report with the given outcome.
pub fn update_report(status: InstructionStatus) -> UpdateInstructionReport {
    UpdateInstructionReport {
        status,
        error_code: matches!(status, InstructionStatus::Failure)
            .then_some(ExecutionErrorCode::ErrorInOrder),
        instruction: None,
    }
}

/// A replace report: cancel phase for the old bet id, place phase carrying
/// the new one when successful.
pub fn replace_report(
    cancel_status: InstructionStatus,
    old_bet_id: &str,
    place_status: InstructionStatus,
    new_bet_id: Option<&str>,
) -> ReplaceInstructionReport {
    ReplaceInstructionReport {
        instruction: None,
        cancel_report: Some(cancel_report(cancel_status, old_bet_id)),
        place_report: Some(match (place_status, new_bet_id) {
            (InstructionStatus::Success, Some(bet_id)) => success_place_report(bet_id),
            (InstructionStatus::Success, None) => success_place_report("STUB-REPLACEMENT"),
            (InstructionStatus::Failure, _) => {
                failure_place_report(ExecutionErrorCode::RelatedActionFailed)
            },
            (InstructionStatus::Timeout, _) => timeout_place_report(),
        }),
    }
}
