//! Value Objects for the Furlong domain
//!
//! Immutable, validated domain primitives.
//! All value objects enforce invariants at construction time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a locally created order
pub type OrderId = Uuid;

/// Exchange identifier for a runner within a market
pub type SelectionId = u64;

/// Domain errors for value object and entity validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Price must be within the exchange odds ladder
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Size must be positive
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    /// Market identifier must be non-empty
    #[error("Invalid market id: {0}")]
    InvalidMarketId(String),

    /// Bet identifier must be non-empty
    #[error("Invalid bet id: {0}")]
    InvalidBetId(String),

    /// Order has no exchange-assigned bet id yet
    #[error("Order {0} has no bet id")]
    MissingBetId(OrderId),

    /// Invalid order state transition
    #[error("Invalid transition for order {order_id}: {from} -> {to}")]
    InvalidTransition {
        /// Order attempting the transition
        order_id: OrderId,
        /// State the order is currently in
        from: &'static str,
        /// State the transition targeted
        to: &'static str,
    },
}

// =============================================================================
// Price
// =============================================================================

/// Minimum price on the exchange odds ladder.
pub const MIN_PRICE: Decimal = Decimal::from_parts(101, 0, 0, false, 2); // 1.01

/// Maximum price on the exchange odds ladder.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0); // 1000

/// Price represents decimal odds on the exchange ladder
///
/// # Invariants
/// - Must be within [1.01, 1000]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    /// Create a new Price with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if outside the odds ladder.
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value < MIN_PRICE || value > MAX_PRICE {
            return Err(DomainError::InvalidPrice(format!(
                "{} outside ladder [{}, {}]",
                value, MIN_PRICE, MAX_PRICE
            )));
        }
        Ok(Self(value))
    }

    /// Get the underlying decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Size
// =============================================================================

/// Size represents a positive stake amount
///
/// # Invariants
/// - Must be > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Size(Decimal);

impl Size {
    /// Create a new Size with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSize` if not positive.
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidSize(format!("{} must be positive", value)));
        }
        Ok(Self(value))
    }

    /// Get the underlying decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Market Id
// =============================================================================

/// Exchange market identifier (e.g. "1.179082386")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketId(String);

impl MarketId {
    /// Create a new MarketId with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMarketId` if empty.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidMarketId("empty market id".to_string()));
        }
        Ok(Self(value))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Bet Id
// =============================================================================

/// Exchange-assigned identifier for a live bet
///
/// Known only after a successful place or replace. Used as the lookup key
/// when aligning cancel reports with their orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BetId(String);

impl BetId {
    /// Create a new BetId with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBetId` if empty.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidBetId("empty bet id".to_string()));
        }
        Ok(Self(value))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Customer Ref
// =============================================================================

/// Operation-scoped client reference sent with each submission
///
/// The exchange echoes it back and uses it for duplicate detection.
/// Rendered as the 32-character simple hex form on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef(Uuid);

impl CustomerRef {
    /// Generate a fresh reference.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wire form: 32 hex characters, no hyphens.
    pub fn as_hex(&self) -> String {
        self.0.simple().to_string()
    }
}

impl fmt::Display for CustomerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

// =============================================================================
// Market Version
// =============================================================================

/// Market version guard for place/replace submissions
///
/// The exchange rejects the instruction if the market has since changed
/// version (e.g. a runner was removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketVersion(u64);

impl MarketVersion {
    /// Create a new market version.
    pub fn new(version: u64) -> Self {
        Self(version)
    }

    /// Get the underlying version number
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MarketVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Side / Persistence
// =============================================================================

/// Side of the book an order sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Backing a selection to win
    Back,
    /// Laying a selection to lose
    Lay,
}

/// What happens to an unmatched order when the market turns in-play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersistenceType {
    /// Lapse the order at the in-play transition
    Lapse,
    /// Keep the order live in-play
    Persist,
    /// Convert to a market-on-close bet
    MarketOnClose,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_within_ladder() {
        assert!(Price::new(dec!(1.01)).is_ok());
        assert!(Price::new(dec!(2.5)).is_ok());
        assert!(Price::new(dec!(1000)).is_ok());
    }

    #[test]
    fn test_price_outside_ladder_rejected() {
        assert!(Price::new(dec!(1.0)).is_err());
        assert!(Price::new(dec!(1000.5)).is_err());
        assert!(Price::new(dec!(-2)).is_err());
    }

    #[test]
    fn test_size_must_be_positive() {
        assert!(Size::new(dec!(2)).is_ok());
        assert!(Size::new(dec!(0)).is_err());
        assert!(Size::new(dec!(-5)).is_err());
    }

    #[test]
    fn test_market_id_validation() {
        let market = MarketId::new("1.179082386").unwrap();
        assert_eq!(market.as_str(), "1.179082386");
        assert!(MarketId::new("").is_err());
        assert!(MarketId::new("   ").is_err());
    }

    #[test]
    fn test_bet_id_validation() {
        let bet_id = BetId::new("228548668665").unwrap();
        assert_eq!(bet_id.as_str(), "228548668665");
        assert!(BetId::new("").is_err());
    }

    #[test]
    fn test_customer_ref_hex_form() {
        let customer_ref = CustomerRef::generate();
        let hex = customer_ref.as_hex();
        assert_eq!(hex.len(), 32);
        assert!(!hex.contains('-'));
    }

    #[test]
    fn test_customer_refs_are_unique() {
        assert_ne!(CustomerRef::generate().as_hex(), CustomerRef::generate().as_hex());
    }

    #[test]
    fn test_market_version() {
        let version = MarketVersion::new(42);
        assert_eq!(version.as_u64(), 42);
        assert_eq!(version.to_string(), "42");
    }

    #[test]
    fn test_side_wire_vocabulary() {
        assert_eq!(serde_json::to_string(&Side::Back).unwrap(), "\"BACK\"");
        assert_eq!(serde_json::to_string(&Side::Lay).unwrap(), "\"LAY\"");
    }

    #[test]
    fn test_persistence_wire_vocabulary() {
        assert_eq!(
            serde_json::to_string(&PersistenceType::MarketOnClose).unwrap(),
            "\"MARKET_ON_CLOSE\""
        );
    }
}
