//! Response interpretation: instruction reports -> order state transitions.
//!
//! Place, update and replace reports come back in submission order and are
//! aligned positionally. Cancel reports carry no ordering guarantee and are
//! aligned by the bet id echoed in each report's instruction; members the
//! exchange never answered for are reset to executable so a later cycle can
//! pick them up.
//!
//! Reports are applied strictly sequentially: the leftover reconciliation
//! for cancels requires having consumed every report before deciding which
//! orders were left unresolved.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, error, warn};

use furlong_domain::{
    BetId, CancelResponse, InstructionStatus, PlaceResponse, ReplaceResponse, UpdateResponse,
};

use crate::error::ExecResult;
use crate::package::{OrderHandle, OrderPackage, PackageKind};
use crate::ports::{AuditSink, InstructionRecord};

/// Serialize a report for its audit record.
fn raw<R: Serialize>(report: &R) -> serde_json::Value {
    serde_json::to_value(report).unwrap_or(serde_json::Value::Null)
}

fn warn_on_count_mismatch(package: &OrderPackage, reports: usize) {
    if package.len() != reports {
        warn!(
            market_id = %package.market_id,
            kind = package.kind.name(),
            orders = package.len(),
            reports,
            "report count mismatch, interpreting common prefix"
        );
    }
}

// =============================================================================
// Place
// =============================================================================

/// Apply place reports positionally.
///
/// SUCCESS attaches the returned bet id and makes the order executable.
/// FAILURE and TIMEOUT leave the order exactly as submitted: a place
/// rejection carries no side effect on the book, and a timeout carries
/// genuine uncertainty, so neither assumes one.
pub(crate) async fn interpret_place<A: AuditSink>(
    audit: &A,
    package: &OrderPackage,
    response: &PlaceResponse,
) -> ExecResult<()> {
    warn_on_count_mismatch(package, response.reports.len());

    for (handle, report) in package.orders().iter().zip(&response.reports) {
        let order_id = {
            let mut order = handle.write();
            order.responses.placed(report.clone());

            match report.status {
                InstructionStatus::Success => match report.bet_id.clone() {
                    Some(bet_id) => order.confirm_placed(bet_id)?,
                    None => warn!(
                        order_id = %order.id,
                        "place SUCCESS report without bet id, order left as submitted"
                    ),
                },
                InstructionStatus::Failure => {
                    warn!(
                        order_id = %order.id,
                        error_code = ?report.error_code,
                        "place FAILURE"
                    );
                },
                InstructionStatus::Timeout => {
                    error!(
                        order_id = %order.id,
                        error_code = ?report.error_code,
                        "place TIMEOUT"
                    );
                },
            }
            order.id
        };

        audit
            .record_instruction(InstructionRecord {
                order_id,
                kind: PackageKind::Place,
                report: raw(report),
            })
            .await;
    }

    Ok(())
}

// =============================================================================
// Cancel
// =============================================================================

/// Apply cancel reports by bet-id lookup, then reset unanswered members.
///
/// The lookup is built from the members whose instructions were actually
/// submitted, so an order completed out-of-band is never resurrected by the
/// leftover reset.
pub(crate) async fn interpret_cancel<A: AuditSink>(
    audit: &A,
    package: &OrderPackage,
    response: &CancelResponse,
) -> ExecResult<()> {
    let mut lookup: HashMap<BetId, OrderHandle> = HashMap::new();
    for handle in package.orders() {
        let order = handle.read();
        if order.is_cancellable() {
            if let Some(bet_id) = order.bet_id.clone() {
                lookup.insert(bet_id, handle.clone());
            }
        }
    }

    for report in &response.reports {
        // can't rely on the order reports are returned in
        let Some(handle) = lookup.remove(&report.instruction.bet_id) else {
            warn!(
                market_id = %package.market_id,
                bet_id = %report.instruction.bet_id,
                "cancel report for unknown bet id, skipping"
            );
            continue;
        };

        let order_id = {
            let mut order = handle.write();
            order.responses.cancelled(report.clone());

            match report.status {
                InstructionStatus::Success => order.mark_execution_complete()?,
                InstructionStatus::Failure => {
                    warn!(
                        order_id = %order.id,
                        error_code = ?report.error_code,
                        "cancel FAILURE, order still live"
                    );
                    order.mark_executable()?;
                },
                InstructionStatus::Timeout => {
                    error!(order_id = %order.id, "cancel TIMEOUT, order still live");
                    order.mark_executable()?;
                },
            }
            order.id
        };

        audit
            .record_instruction(InstructionRecord {
                order_id,
                kind: PackageKind::Cancel,
                report: raw(report),
            })
            .await;
    }

    // reset any not returned so that they can be picked back up
    for (bet_id, handle) in lookup {
        let mut order = handle.write();
        debug!(
            order_id = %order.id,
            %bet_id,
            "no cancel report received, resetting to executable"
        );
        order.mark_executable()?;
    }

    Ok(())
}

// =============================================================================
// Update
// =============================================================================

/// Apply update reports positionally.
///
/// The order remains live on the book whatever the outcome, so every status
/// maps to executable.
pub(crate) async fn interpret_update<A: AuditSink>(
    audit: &A,
    package: &OrderPackage,
    response: &UpdateResponse,
) -> ExecResult<()> {
    warn_on_count_mismatch(package, response.reports.len());

    for (handle, report) in package.orders().iter().zip(&response.reports) {
        let order_id = {
            let mut order = handle.write();
            order.responses.updated(report.clone());

            match report.status {
                InstructionStatus::Success => {},
                InstructionStatus::Failure => warn!(
                    order_id = %order.id,
                    error_code = ?report.error_code,
                    "update FAILURE"
                ),
                InstructionStatus::Timeout => {
                    error!(order_id = %order.id, "update TIMEOUT")
                },
            }
            order.mark_executable()?;
            order.id
        };

        audit
            .record_instruction(InstructionRecord {
                order_id,
                kind: PackageKind::Update,
                report: raw(report),
            })
            .await;
    }

    Ok(())
}

// =============================================================================
// Replace
// =============================================================================

/// Apply replace reports positionally, one phase at a time.
///
/// Cancel-phase SUCCESS retires the old bet identity; place-phase SUCCESS
/// re-opens the order under the returned bet id. A non-success or absent
/// phase leaves the order's state untouched: the report is still logged and
/// recorded so the strategy layer can reconcile.
pub(crate) async fn interpret_replace<A: AuditSink>(
    audit: &A,
    package: &OrderPackage,
    response: &ReplaceResponse,
) -> ExecResult<()> {
    warn_on_count_mismatch(package, response.reports.len());

    for (handle, report) in package.orders().iter().zip(&response.reports) {
        let order_id = {
            let mut order = handle.write();
            order.responses.replaced(report.clone());

            match &report.cancel_report {
                Some(cancel_report) => match cancel_report.status {
                    InstructionStatus::Success => order.mark_execution_complete()?,
                    InstructionStatus::Failure => warn!(
                        order_id = %order.id,
                        error_code = ?cancel_report.error_code,
                        "replace cancel-phase FAILURE, state unchanged"
                    ),
                    InstructionStatus::Timeout => error!(
                        order_id = %order.id,
                        "replace cancel-phase TIMEOUT, state unchanged"
                    ),
                },
                None => warn!(order_id = %order.id, "replace report missing cancel phase"),
            }

            match &report.place_report {
                Some(place_report) => match place_report.status {
                    InstructionStatus::Success => match place_report.bet_id.clone() {
                        Some(bet_id) => order.confirm_replaced(bet_id),
                        None => warn!(
                            order_id = %order.id,
                            "replace place-phase SUCCESS without bet id, state unchanged"
                        ),
                    },
                    InstructionStatus::Failure => warn!(
                        order_id = %order.id,
                        error_code = ?place_report.error_code,
                        "replace place-phase FAILURE, state unchanged"
                    ),
                    InstructionStatus::Timeout => error!(
                        order_id = %order.id,
                        "replace place-phase TIMEOUT, state unchanged"
                    ),
                },
                None => warn!(order_id = %order.id, "replace report missing place phase"),
            }

            order.id
        };

        audit
            .record_instruction(InstructionRecord {
                order_id,
                kind: PackageKind::Replace,
                report: raw(report),
            })
            .await;
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
