//! Furlong Execution Layer
//!
//! Submits batches of trading instructions to the exchange and drives each
//! order's lifecycle from the per-instruction reports that come back.
//!
//! # Architecture
//!
//! ```text
//! Order Package → Executor → Transport Port → Interpreter → Order state
//! ```
//!
//! # Components
//!
//! - **Package**: one batch of same-kind instructions for one market
//! - **Ports**: traits for the exchange transport and the audit collaborator
//! - **Executor**: empty-package guard, transport call, audit, dispatch
//! - **Interpreter**: per-kind report-to-order alignment and transitions
//! - **Stub**: test implementations for development
//!
//! # Example
//!
//! ```rust,ignore
//! use furlong_exec::{ExecConfig, Executor, OrderPackage, StubTransport, MemoryAuditSink};
//! use std::sync::Arc;
//!
//! let transport = Arc::new(StubTransport::new());
//! let audit = Arc::new(MemoryAuditSink::new());
//! let executor = Executor::new(transport, audit);
//!
//! let package = OrderPackage::place(market_id, None, orders, &ExecConfig::from_env());
//! executor.execute(&package, &session).await?;
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod executor;
mod interpreter;
pub mod package;
pub mod ports;
pub mod stub;

// Re-exports for convenience
pub use config::ExecConfig;
pub use error::{ExecError, ExecResult, TransportFault};
pub use executor::Executor;
pub use package::{AlignmentPolicy, OrderHandle, OrderPackage, PackageKind};
pub use ports::{AuditSink, ExchangeTransport, InstructionRecord, SubmissionRecord};
pub use stub::{MemoryAuditSink, StubTransport};
