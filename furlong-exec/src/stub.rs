//! Stub implementations for testing.
//!
//! These implementations simulate the exchange and the audit collaborator
//! without making real API calls. Responses can be scripted per operation;
//! with nothing scripted, the stub synthesizes an all-SUCCESS response.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use furlong_domain::{
    BetId, CancelInstructionReport, CancelResponse, InstructionStatus, PlaceInstructionReport,
    PlaceResponse, ReplaceInstructionReport, ReplaceResponse, UpdateInstructionReport,
    UpdateResponse,
};

use crate::error::TransportFault;
use crate::package::OrderPackage;
use crate::ports::{AuditSink, ExchangeTransport, InstructionRecord, SubmissionRecord};

// =============================================================================
// Stub Transport
// =============================================================================

/// Stub transport for testing.
///
/// Scripted responses are consumed front-to-back per operation; when the
/// queue is empty the stub synthesizes an all-SUCCESS response with
/// generated `STUB-n` bet ids.
pub struct StubTransport {
    place_responses: Mutex<VecDeque<Result<PlaceResponse, TransportFault>>>,
    cancel_responses: Mutex<VecDeque<Result<CancelResponse, TransportFault>>>,
    update_responses: Mutex<VecDeque<Result<UpdateResponse, TransportFault>>>,
    replace_responses: Mutex<VecDeque<Result<ReplaceResponse, TransportFault>>>,
    /// Per-operation call counters
    place_calls: Mutex<usize>,
    cancel_calls: Mutex<usize>,
    update_calls: Mutex<usize>,
    replace_calls: Mutex<usize>,
    /// Bet id counter for generated responses
    bet_counter: Mutex<u64>,
    /// Whether to fail the next call with a transport fault
    fail_next: Mutex<bool>,
}

impl StubTransport {
    /// Create a new stub transport.
    pub fn new() -> Self {
        Self {
            place_responses: Mutex::new(VecDeque::new()),
            cancel_responses: Mutex::new(VecDeque::new()),
            update_responses: Mutex::new(VecDeque::new()),
            replace_responses: Mutex::new(VecDeque::new()),
            place_calls: Mutex::new(0),
            cancel_calls: Mutex::new(0),
            update_calls: Mutex::new(0),
            replace_calls: Mutex::new(0),
            bet_counter: Mutex::new(0),
            fail_next: Mutex::new(false),
        }
    }

    /// Script the next place response.
    pub fn enqueue_place(&self, response: Result<PlaceResponse, TransportFault>) {
        self.place_responses.lock().push_back(response);
    }

    /// Script the next cancel response.
    pub fn enqueue_cancel(&self, response: Result<CancelResponse, TransportFault>) {
        self.cancel_responses.lock().push_back(response);
    }

    /// Script the next update response.
    pub fn enqueue_update(&self, response: Result<UpdateResponse, TransportFault>) {
        self.update_responses.lock().push_back(response);
    }

    /// Script the next replace response.
    pub fn enqueue_replace(&self, response: Result<ReplaceResponse, TransportFault>) {
        self.replace_responses.lock().push_back(response);
    }

    /// Configure the next call to fail with a transport fault.
    pub fn set_fail_next(&self, fail: bool) {
        *self.fail_next.lock() = fail;
    }

    /// Number of place calls made.
    pub fn place_calls(&self) -> usize {
        *self.place_calls.lock()
    }

    /// Number of cancel calls made.
    pub fn cancel_calls(&self) -> usize {
        *self.cancel_calls.lock()
    }

    /// Number of update calls made.
    pub fn update_calls(&self) -> usize {
        *self.update_calls.lock()
    }

    /// Number of replace calls made.
    pub fn replace_calls(&self) -> usize {
        *self.replace_calls.lock()
    }

    /// Generate a unique bet id.
    fn next_bet_id(&self) -> BetId {
        let mut counter = self.bet_counter.lock();
        *counter += 1;
        BetId::new(format!("STUB-{}", *counter)).expect("generated bet id is non-empty")
    }

    /// Check if the next call should fail (resets after check).
    fn should_fail(&self) -> bool {
        let mut fail_next = self.fail_next.lock();
        let fail = *fail_next;
        *fail_next = false;
        fail
    }

    fn simulated_fault() -> TransportFault {
        TransportFault::Network("simulated transport failure".to_string())
    }
}

impl Default for StubTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeTransport for StubTransport {
    type Session = ();

    async fn place(
        &self,
        package: &OrderPackage,
        _session: &Self::Session,
    ) -> Result<PlaceResponse, TransportFault> {
        *self.place_calls.lock() += 1;
        if self.should_fail() {
            return Err(Self::simulated_fault());
        }
        if let Some(scripted) = self.place_responses.lock().pop_front() {
            return scripted;
        }

        let reports = package
            .place_instructions()
            .into_iter()
            .map(|instruction| PlaceInstructionReport {
                status: InstructionStatus::Success,
                error_code: None,
                instruction: Some(instruction),
                bet_id: Some(self.next_bet_id()),
                placed_at: Some(Utc::now()),
            })
            .collect();

        Ok(PlaceResponse { customer_ref: Some(package.customer_ref), reports })
    }

    async fn cancel(
        &self,
        package: &OrderPackage,
        _session: &Self::Session,
    ) -> Result<CancelResponse, TransportFault> {
        *self.cancel_calls.lock() += 1;
        if self.should_fail() {
            return Err(Self::simulated_fault());
        }
        if let Some(scripted) = self.cancel_responses.lock().pop_front() {
            return scripted;
        }

        let reports = package
            .cancel_instructions()
            .into_iter()
            .map(|instruction| CancelInstructionReport {
                status: InstructionStatus::Success,
                error_code: None,
                instruction,
                size_cancelled: None,
                cancelled_at: Some(Utc::now()),
            })
            .collect();

        Ok(CancelResponse { customer_ref: Some(package.customer_ref), reports })
    }

    async fn update(
        &self,
        package: &OrderPackage,
        _session: &Self::Session,
    ) -> Result<UpdateResponse, TransportFault> {
        *self.update_calls.lock() += 1;
        if self.should_fail() {
            return Err(Self::simulated_fault());
        }
        if let Some(scripted) = self.update_responses.lock().pop_front() {
            return scripted;
        }

        let reports = package
            .update_instructions()
            .map_err(|e| TransportFault::MalformedRequest(e.to_string()))?
            .into_iter()
            .map(|instruction| UpdateInstructionReport {
                status: InstructionStatus::Success,
                error_code: None,
                instruction: Some(instruction),
            })
            .collect();

        Ok(UpdateResponse { customer_ref: Some(package.customer_ref), reports })
    }

    async fn replace(
        &self,
        package: &OrderPackage,
        _session: &Self::Session,
    ) -> Result<ReplaceResponse, TransportFault> {
        *self.replace_calls.lock() += 1;
        if self.should_fail() {
            return Err(Self::simulated_fault());
        }
        if let Some(scripted) = self.replace_responses.lock().pop_front() {
            return scripted;
        }

        let reports = package
            .replace_instructions()
            .map_err(|e| TransportFault::MalformedRequest(e.to_string()))?
            .into_iter()
            .map(|instruction| ReplaceInstructionReport {
                cancel_report: Some(CancelInstructionReport {
                    status: InstructionStatus::Success,
                    error_code: None,
                    instruction: furlong_domain::CancelInstruction {
                        bet_id: instruction.bet_id.clone(),
                        size_reduction: None,
                    },
                    size_cancelled: None,
                    cancelled_at: Some(Utc::now()),
                }),
                place_report: Some(PlaceInstructionReport {
                    status: InstructionStatus::Success,
                    error_code: None,
                    instruction: None,
                    bet_id: Some(self.next_bet_id()),
                    placed_at: Some(Utc::now()),
                }),
                instruction: Some(instruction),
            })
            .collect();

        Ok(ReplaceResponse { customer_ref: Some(package.customer_ref), reports })
    }
}

// =============================================================================
// Memory Audit Sink
// =============================================================================

/// In-memory audit sink for testing.
#[derive(Default)]
pub struct MemoryAuditSink {
    submissions: Mutex<Vec<SubmissionRecord>>,
    instructions: Mutex<Vec<InstructionRecord>>,
}

impl MemoryAuditSink {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All submission records, in arrival order.
    pub fn submissions(&self) -> Vec<SubmissionRecord> {
        self.submissions.lock().clone()
    }

    /// All instruction records, in arrival order.
    pub fn instructions(&self) -> Vec<InstructionRecord> {
        self.instructions.lock().clone()
    }

    /// Number of submission records.
    pub fn submission_count(&self) -> usize {
        self.submissions.lock().len()
    }

    /// Number of instruction records.
    pub fn instruction_count(&self) -> usize {
        self.instructions.lock().len()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record_submission(&self, record: SubmissionRecord) {
        self.submissions.lock().push(record);
    }

    async fn record_instruction(&self, record: InstructionRecord) {
        self.instructions.lock().push(record);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::RwLock;
    use rust_decimal_macros::dec;

    use furlong_domain::{MarketId, Order, PersistenceType, Price, Side, Size};

    use crate::config::ExecConfig;
    use crate::package::OrderHandle;

    fn pending_handle() -> OrderHandle {
        Arc::new(RwLock::new(Order::new_limit(
            MarketId::new("1.179082386").unwrap(),
            47972,
            Side::Back,
            Price::new(dec!(2.02)).unwrap(),
            Size::new(dec!(5)).unwrap(),
            PersistenceType::Lapse,
        )))
    }

    #[tokio::test]
    async fn test_stub_synthesizes_success_place_response() {
        let stub = StubTransport::new();
        let package = OrderPackage::place(
            MarketId::new("1.179082386").unwrap(),
            None,
            vec![pending_handle(), pending_handle()],
            &ExecConfig::default(),
        );

        let response = stub.place(&package, &()).await.unwrap();

        assert_eq!(response.reports.len(), 2);
        assert!(response
            .reports
            .iter()
            .all(|report| report.status == InstructionStatus::Success));
        assert_ne!(response.reports[0].bet_id, response.reports[1].bet_id);
        assert_eq!(stub.place_calls(), 1);
    }

    #[tokio::test]
    async fn test_stub_fail_next_resets() {
        let stub = StubTransport::new();
        let package = OrderPackage::place(
            MarketId::new("1.179082386").unwrap(),
            None,
            vec![pending_handle()],
            &ExecConfig::default(),
        );

        stub.set_fail_next(true);
        assert!(stub.place(&package, &()).await.is_err());
        assert!(stub.place(&package, &()).await.is_ok());
        assert_eq!(stub.place_calls(), 2);
    }

    #[tokio::test]
    async fn test_scripted_response_takes_precedence() {
        let stub = StubTransport::new();
        let package = OrderPackage::place(
            MarketId::new("1.179082386").unwrap(),
            None,
            vec![pending_handle()],
            &ExecConfig::default(),
        );

        stub.enqueue_place(Ok(PlaceResponse { customer_ref: None, reports: vec![] }));

        let response = stub.place(&package, &()).await.unwrap();
        assert!(response.reports.is_empty());
    }

    #[tokio::test]
    async fn test_memory_audit_sink_records_in_order() {
        let sink = MemoryAuditSink::new();

        sink.record_instruction(InstructionRecord {
            order_id: uuid::Uuid::now_v7(),
            kind: crate::package::PackageKind::Place,
            report: serde_json::json!({"status": "SUCCESS"}),
        })
        .await;

        assert_eq!(sink.instruction_count(), 1);
        assert_eq!(sink.submission_count(), 0);
    }
}
