//! Order packages: one batch of same-kind instructions per remote call.
//!
//! A package is immutable for the submission cycle. It is constructed by the
//! owning order-management layer from a stable snapshot of its orders,
//! consumed exactly once by the executor, and discarded when the cycle
//! completes. Per-instruction payloads are derived from the member orders at
//! submission time, not stored.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use furlong_domain::{
    CancelInstruction, CustomerRef, DomainError, MarketId, MarketVersion, Order,
    PlaceInstruction, ReplaceInstruction, UpdateInstruction,
};

use crate::config::ExecConfig;

/// Shared handle to an order owned by the order-management layer.
///
/// The engine never creates or destroys orders; it receives handles for the
/// duration of one batch. The caller guarantees an order belongs to at most
/// one in-flight package at a time.
pub type OrderHandle = Arc<RwLock<Order>>;

// =============================================================================
// Package Kind
// =============================================================================

/// Operation kind of a package, fixed at construction.
///
/// Determines which transport call and which interpreter apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageKind {
    /// Place new orders
    Place,
    /// Cancel live bets
    Cancel,
    /// Amend persistence of live bets
    Update,
    /// Move live bets to a new price
    Replace,
}

impl PackageKind {
    /// Get the name of the kind for display
    pub fn name(&self) -> &'static str {
        match self {
            PackageKind::Place => "place",
            PackageKind::Cancel => "cancel",
            PackageKind::Update => "update",
            PackageKind::Replace => "replace",
        }
    }

    /// How instruction reports are aligned with member orders.
    pub fn alignment(&self) -> AlignmentPolicy {
        match self {
            PackageKind::Place | PackageKind::Update | PackageKind::Replace => {
                AlignmentPolicy::Positional
            },
            PackageKind::Cancel => AlignmentPolicy::ByBetId,
        }
    }
}

/// Report-to-order alignment policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentPolicy {
    /// Reports come back in submission order; align by position
    Positional,
    /// Report order is not guaranteed; align by the bet id echoed in each
    /// report's instruction
    ByBetId,
}

// =============================================================================
// Order Package
// =============================================================================

/// A batch of same-kind instructions for one market.
#[derive(Debug, Clone)]
pub struct OrderPackage {
    /// Operation kind, fixed at construction
    pub kind: PackageKind,
    /// Market every member order belongs to
    pub market_id: MarketId,
    /// Market version guard (place/replace only)
    pub market_version: Option<MarketVersion>,
    /// Fresh operation-scoped client reference
    pub customer_ref: CustomerRef,
    /// Strategy attribution (place only)
    pub customer_strategy_ref: Option<String>,
    /// Request asynchronous execution (place/replace only)
    pub async_execution: bool,

    orders: Vec<OrderHandle>,
}

impl OrderPackage {
    /// Build a place package.
    pub fn place(
        market_id: MarketId,
        market_version: Option<MarketVersion>,
        orders: Vec<OrderHandle>,
        config: &ExecConfig,
    ) -> Self {
        Self {
            kind: PackageKind::Place,
            market_id,
            market_version,
            customer_ref: CustomerRef::generate(),
            customer_strategy_ref: config.customer_strategy_ref.clone(),
            async_execution: config.async_execution,
            orders,
        }
    }

    /// Build a cancel package.
    pub fn cancel(market_id: MarketId, orders: Vec<OrderHandle>) -> Self {
        Self {
            kind: PackageKind::Cancel,
            market_id,
            market_version: None,
            customer_ref: CustomerRef::generate(),
            customer_strategy_ref: None,
            async_execution: false,
            orders,
        }
    }

    /// Build an update package.
    pub fn update(market_id: MarketId, orders: Vec<OrderHandle>) -> Self {
        Self {
            kind: PackageKind::Update,
            market_id,
            market_version: None,
            customer_ref: CustomerRef::generate(),
            customer_strategy_ref: None,
            async_execution: false,
            orders,
        }
    }

    /// Build a replace package.
    pub fn replace(
        market_id: MarketId,
        market_version: Option<MarketVersion>,
        orders: Vec<OrderHandle>,
        config: &ExecConfig,
    ) -> Self {
        Self {
            kind: PackageKind::Replace,
            market_id,
            market_version,
            customer_ref: CustomerRef::generate(),
            customer_strategy_ref: None,
            async_execution: config.async_execution,
            orders,
        }
    }

    /// Member order handles, in submission order.
    pub fn orders(&self) -> &[OrderHandle] {
        &self.orders
    }

    /// Number of member orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// True if the package has no member orders.
    ///
    /// An empty package must never reach the transport; the submission
    /// helper checks this before every call.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    // =========================================================================
    // Instruction derivation
    // =========================================================================

    /// One place instruction per member order.
    pub fn place_instructions(&self) -> Vec<PlaceInstruction> {
        self.orders
            .iter()
            .map(|handle| {
                let order = handle.read();
                PlaceInstruction {
                    selection_id: order.selection_id,
                    side: order.side,
                    price: order.price,
                    size: order.size,
                    persistence: order.persistence,
                }
            })
            .collect()
    }

    /// Cancel instructions for members a cancel can still act on.
    ///
    /// An order matched or cancelled out-of-band between package
    /// construction and submission drops out here, which can shrink the
    /// effective list to empty even though the package holds orders.
    pub fn cancel_instructions(&self) -> Vec<CancelInstruction> {
        self.orders
            .iter()
            .filter_map(|handle| {
                let order = handle.read();
                if !order.is_cancellable() {
                    return None;
                }
                let bet_id = order.bet_id.clone()?;
                Some(CancelInstruction { bet_id, size_reduction: order.size_reduction })
            })
            .collect()
    }

    /// One update instruction per member order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingBetId` if any member was never placed.
    /// Positional report alignment forbids silently skipping members.
    pub fn update_instructions(&self) -> Result<Vec<UpdateInstruction>, DomainError> {
        self.orders
            .iter()
            .map(|handle| {
                let order = handle.read();
                let bet_id = order.bet_id.clone().ok_or(DomainError::MissingBetId(order.id))?;
                Ok(UpdateInstruction { bet_id, new_persistence: order.persistence })
            })
            .collect()
    }

    /// One replace instruction per member order.
    ///
    /// The new price is the order's locally amended price; the exchange
    /// still holds the bet at its original price.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingBetId` if any member was never placed.
    pub fn replace_instructions(&self) -> Result<Vec<ReplaceInstruction>, DomainError> {
        self.orders
            .iter()
            .map(|handle| {
                let order = handle.read();
                let bet_id = order.bet_id.clone().ok_or(DomainError::MissingBetId(order.id))?;
                Ok(ReplaceInstruction { bet_id, new_price: order.price })
            })
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
