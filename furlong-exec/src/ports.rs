//! Execution layer port definitions.
//!
//! Ports define the interfaces for external services. Adapters implement
//! them for a concrete exchange client; the stubs in this crate implement
//! them for tests. The wire encoding behind a transport adapter is not this
//! layer's concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use furlong_domain::{
    CancelResponse, CustomerRef, MarketId, OrderId, PlaceResponse, ReplaceResponse,
    UpdateResponse,
};

use crate::error::TransportFault;
use crate::package::{OrderPackage, PackageKind};

// =============================================================================
// Exchange Transport Port
// =============================================================================

/// Port for submitting one package as one remote call.
///
/// Each method serializes the package into the corresponding exchange call
/// and returns the structured response, or a [`TransportFault`] if the call
/// itself failed. Per-instruction FAILURE/TIMEOUT outcomes live inside the
/// response; they are not faults.
///
/// The session is an opaque connection handle owned by the caller; this
/// layer never manages its lifecycle.
#[async_trait]
pub trait ExchangeTransport: Send + Sync {
    /// Caller-owned connection/channel handle.
    type Session: Send + Sync;

    /// Submit a place package.
    async fn place(
        &self,
        package: &OrderPackage,
        session: &Self::Session,
    ) -> Result<PlaceResponse, TransportFault>;

    /// Submit a cancel package.
    async fn cancel(
        &self,
        package: &OrderPackage,
        session: &Self::Session,
    ) -> Result<CancelResponse, TransportFault>;

    /// Submit an update package.
    async fn update(
        &self,
        package: &OrderPackage,
        session: &Self::Session,
    ) -> Result<UpdateResponse, TransportFault>;

    /// Submit a replace package.
    async fn replace(
        &self,
        package: &OrderPackage,
        session: &Self::Session,
    ) -> Result<ReplaceResponse, TransportFault>;
}

// =============================================================================
// Audit Port
// =============================================================================

/// One record per submission attempt that obtained a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Operation kind of the package
    pub kind: PackageKind,
    /// Market the package targeted
    pub market_id: MarketId,
    /// Operation-scoped client reference
    pub customer_ref: CustomerRef,
    /// Raw response as received, for offline reconciliation
    pub response: serde_json::Value,
}

/// One record per instruction report consumed for an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionRecord {
    /// Order the report applied to
    pub order_id: OrderId,
    /// Operation kind that produced the report
    pub kind: PackageKind,
    /// The report itself
    pub report: serde_json::Value,
}

/// Port for the external audit collaborator.
///
/// Called on every successful transport response, regardless of the
/// per-instruction outcomes inside it. Durable storage is the
/// implementation's concern.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record a submission attempt and its raw response.
    async fn record_submission(&self, record: SubmissionRecord);

    /// Record one consumed instruction report.
    async fn record_instruction(&self, record: InstructionRecord);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_record_serialization() {
        let record = SubmissionRecord {
            kind: PackageKind::Place,
            market_id: MarketId::new("1.179082386").unwrap(),
            customer_ref: CustomerRef::generate(),
            response: serde_json::json!({ "reports": [] }),
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed: SubmissionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.kind, PackageKind::Place);
        assert_eq!(parsed.market_id.as_str(), "1.179082386");
    }
}
