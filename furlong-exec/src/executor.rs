//! Executor: submits order packages and drives order state from responses.
//!
//! One operation per package kind. Each operation runs the same cycle:
//! shared submission helper (empty-package guard + transport call), audit
//! record for the submission, then the kind's interpreter.
//!
//! Exchange-level FAILURE/TIMEOUT outcomes are data, never errors. A
//! transport fault abandons the cycle with nothing mutated, so the owning
//! layer may resubmit the batch wholesale on a later cycle; retry
//! scheduling itself is a policy layered above this core.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{ExecError, ExecResult, TransportFault};
use crate::interpreter;
use crate::package::{OrderPackage, PackageKind};
use crate::ports::{AuditSink, ExchangeTransport, SubmissionRecord};

/// Executes order packages against an exchange transport.
///
/// `Send + Sync`: packages for different markets may be submitted
/// concurrently by cloning the `Arc`s. Within one response, report
/// processing is strictly sequential. The caller guarantees an order never
/// belongs to two in-flight packages at once.
pub struct Executor<T: ExchangeTransport, A: AuditSink> {
    /// Transport port for the four exchange calls
    transport: Arc<T>,
    /// Audit collaborator, fed on every obtained response
    audit: Arc<A>,
}

impl<T: ExchangeTransport, A: AuditSink> Executor<T, A> {
    /// Create a new executor.
    pub fn new(transport: Arc<T>, audit: Arc<A>) -> Self {
        Self { transport, audit }
    }

    /// Execute a package, dispatching on its kind.
    ///
    /// The single registration point mapping each kind to its transport
    /// call and interpreter.
    pub async fn execute(&self, package: &OrderPackage, session: &T::Session) -> ExecResult<()> {
        match package.kind {
            PackageKind::Place => self.execute_place(package, session).await,
            PackageKind::Cancel => self.execute_cancel(package, session).await,
            PackageKind::Update => self.execute_update(package, session).await,
            PackageKind::Replace => self.execute_replace(package, session).await,
        }
    }

    /// Submit a place package and interpret the reports.
    pub async fn execute_place(
        &self,
        package: &OrderPackage,
        session: &T::Session,
    ) -> ExecResult<()> {
        let Some(response) =
            self.submit("place", package, self.transport.place(package, session)).await
        else {
            return Ok(());
        };

        info!(
            market_id = %package.market_id,
            customer_ref = %package.customer_ref,
            orders = package.len(),
            "execute_place"
        );
        self.record_submission(package, &response).await;
        interpreter::interpret_place(self.audit.as_ref(), package, &response).await
    }

    /// Submit a cancel package and interpret the reports.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::EmptyBatch`] if every member dropped out of the
    /// effective instruction list between package construction and
    /// submission (matched or cancelled out-of-band). Nothing is sent in
    /// that case.
    pub async fn execute_cancel(
        &self,
        package: &OrderPackage,
        session: &T::Session,
    ) -> ExecResult<()> {
        if !package.is_empty() && package.cancel_instructions().is_empty() {
            warn!(
                market_id = %package.market_id,
                orders = package.len(),
                "every cancel instruction dropped before submission"
            );
            return Err(ExecError::EmptyBatch { market_id: package.market_id.clone() });
        }

        let Some(response) =
            self.submit("cancel", package, self.transport.cancel(package, session)).await
        else {
            return Ok(());
        };

        info!(
            market_id = %package.market_id,
            customer_ref = %package.customer_ref,
            orders = package.len(),
            "execute_cancel"
        );
        self.record_submission(package, &response).await;
        interpreter::interpret_cancel(self.audit.as_ref(), package, &response).await
    }

    /// Submit an update package and interpret the reports.
    pub async fn execute_update(
        &self,
        package: &OrderPackage,
        session: &T::Session,
    ) -> ExecResult<()> {
        if !package.is_empty() {
            // surfaces a caller bug before anything reaches the wire
            package.update_instructions()?;
        }

        let Some(response) =
            self.submit("update", package, self.transport.update(package, session)).await
        else {
            return Ok(());
        };

        info!(
            market_id = %package.market_id,
            customer_ref = %package.customer_ref,
            orders = package.len(),
            "execute_update"
        );
        self.record_submission(package, &response).await;
        interpreter::interpret_update(self.audit.as_ref(), package, &response).await
    }

    /// Submit a replace package and interpret the reports.
    pub async fn execute_replace(
        &self,
        package: &OrderPackage,
        session: &T::Session,
    ) -> ExecResult<()> {
        if !package.is_empty() {
            package.replace_instructions()?;
        }

        let Some(response) =
            self.submit("replace", package, self.transport.replace(package, session)).await
        else {
            return Ok(());
        };

        info!(
            market_id = %package.market_id,
            customer_ref = %package.customer_ref,
            orders = package.len(),
            "execute_replace"
        );
        self.record_submission(package, &response).await;
        interpreter::interpret_replace(self.audit.as_ref(), package, &response).await
    }

    /// Shared submission helper.
    ///
    /// Never lets an empty package reach the transport (the remote API
    /// rejects empty calls), and converts a transport fault into an
    /// abandoned cycle: logged, nothing mutated, `None` returned. The
    /// transport future is created lazily by the caller and only polled
    /// once the guards pass.
    async fn submit<R>(
        &self,
        operation: &'static str,
        package: &OrderPackage,
        call: impl Future<Output = Result<R, TransportFault>>,
    ) -> Option<R> {
        if package.is_empty() {
            warn!(
                market_id = %package.market_id,
                kind = package.kind.name(),
                "empty package, not executing"
            );
            return None;
        }

        match call.await {
            Ok(response) => Some(response),
            Err(fault) => {
                error!(
                    market_id = %package.market_id,
                    kind = package.kind.name(),
                    customer_ref = %package.customer_ref,
                    operation,
                    error = %fault,
                    "transport fault, submission abandoned"
                );
                None
            },
        }
    }

    /// Record the submission and its raw response for audit.
    async fn record_submission<R: Serialize>(&self, package: &OrderPackage, response: &R) {
        self.audit
            .record_submission(SubmissionRecord {
                kind: package.kind,
                market_id: package.market_id.clone(),
                customer_ref: package.customer_ref,
                response: serde_json::to_value(response).unwrap_or(serde_json::Value::Null),
            })
            .await;
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

    use furlong_domain::{
        BetId, MarketId, Order, OrderStatus, PersistenceType, Price, Side, Size,
    };

    use crate::config::ExecConfig;
    use crate::package::OrderHandle;
    use crate::stub::{MemoryAuditSink, StubTransport};

    fn market() -> MarketId {
        MarketId::new("1.179082386").unwrap()
    }

    fn pending_handle() -> OrderHandle {
        Arc::new(RwLock::new(Order::new_limit(
            market(),
            47972,
            Side::Back,
            Price::new(dec!(2.02)).unwrap(),
            Size::new(dec!(5)).unwrap(),
            PersistenceType::Lapse,
        )))
    }

    fn live_handle(bet_id: &str) -> OrderHandle {
        let handle = pending_handle();
        handle.write().confirm_placed(BetId::new(bet_id).unwrap()).unwrap();
        handle
    }

    fn executor() -> (Executor<StubTransport, MemoryAuditSink>, Arc<StubTransport>, Arc<MemoryAuditSink>)
    {
        let transport = Arc::new(StubTransport::new());
        let audit = Arc::new(MemoryAuditSink::new());
        (Executor::new(transport.clone(), audit.clone()), transport, audit)
    }

    #[tokio::test]
    async fn test_empty_package_never_reaches_transport() {
        let (executor, transport, audit) = executor();

        let place = OrderPackage::place(market(), None, vec![], &ExecConfig::default());
        let update = OrderPackage::update(market(), vec![]);
        let replace = OrderPackage::replace(market(), None, vec![], &ExecConfig::default());

        executor.execute_place(&place, &()).await.unwrap();
        executor.execute_update(&update, &()).await.unwrap();
        executor.execute_replace(&replace, &()).await.unwrap();

        assert_eq!(transport.place_calls(), 0);
        assert_eq!(transport.update_calls(), 0);
        assert_eq!(transport.replace_calls(), 0);
        assert_eq!(audit.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_race_raises_without_transport_call() {
        let (executor, transport, _audit) = executor();

        let handle = live_handle("111");
        let package = OrderPackage::cancel(market(), vec![handle.clone()]);

        // matched out-of-band after the package was built
        handle.write().mark_execution_complete().unwrap();

        let result = executor.execute_cancel(&package, &()).await;

        assert!(matches!(result, Err(ExecError::EmptyBatch { .. })));
        assert_eq!(transport.cancel_calls(), 0);
    }

    #[tokio::test]
    async fn test_structurally_empty_cancel_is_not_an_error() {
        let (executor, transport, _audit) = executor();

        let package = OrderPackage::cancel(market(), vec![]);
        executor.execute_cancel(&package, &()).await.unwrap();

        assert_eq!(transport.cancel_calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_fault_mutates_nothing() {
        let (executor, transport, audit) = executor();
        transport.set_fail_next(true);

        let handle = pending_handle();
        let package = OrderPackage::place(market(), None, vec![handle.clone()], &ExecConfig::default());

        executor.execute_place(&package, &()).await.unwrap();

        assert_eq!(transport.place_calls(), 1);
        assert_eq!(handle.read().status(), OrderStatus::Pending);
        assert!(handle.read().responses.is_empty());
        assert_eq!(audit.submission_count(), 0);
        assert_eq!(audit.instruction_count(), 0);
    }

    #[tokio::test]
    async fn test_update_with_unplaced_member_is_a_caller_error() {
        let (executor, transport, _audit) = executor();

        let package = OrderPackage::update(market(), vec![pending_handle()]);
        let result = executor.execute_update(&package, &()).await;

        assert!(matches!(result, Err(ExecError::Domain(_))));
        assert_eq!(transport.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_execute_dispatches_on_kind() {
        let (executor, transport, audit) = executor();

        let place = OrderPackage::place(
            market(),
            None,
            vec![pending_handle()],
            &ExecConfig::default(),
        );
        let cancel = OrderPackage::cancel(market(), vec![live_handle("1")]);
        let update = OrderPackage::update(market(), vec![live_handle("2")]);
        let replace = OrderPackage::replace(
            market(),
            None,
            vec![live_handle("3")],
            &ExecConfig::default(),
        );

        executor.execute(&place, &()).await.unwrap();
        executor.execute(&cancel, &()).await.unwrap();
        executor.execute(&update, &()).await.unwrap();
        executor.execute(&replace, &()).await.unwrap();

        assert_eq!(transport.place_calls(), 1);
        assert_eq!(transport.cancel_calls(), 1);
        assert_eq!(transport.update_calls(), 1);
        assert_eq!(transport.replace_calls(), 1);
        assert_eq!(audit.submission_count(), 4);
    }

    #[tokio::test]
    async fn test_stub_default_place_fills_whole_package() {
        let (executor, _transport, audit) = executor();

        let first = pending_handle();
        let second = pending_handle();
        let package = OrderPackage::place(
            market(),
            None,
            vec![first.clone(), second.clone()],
            &ExecConfig::default(),
        );

        executor.execute_place(&package, &()).await.unwrap();

        assert_eq!(first.read().status(), OrderStatus::Executable);
        assert_eq!(second.read().status(), OrderStatus::Executable);
        assert_ne!(first.read().bet_id, second.read().bet_id);
        assert_eq!(audit.submission_count(), 1);
        assert_eq!(audit.instruction_count(), 2);
    }
}
