//! Test helpers for Furlong execution tests.
//!
//! Provides factories for orders, order handles, packages and instruction
//! reports, plus tracing setup for tests.

mod helpers;

pub use helpers::{
    cancel_report, failure_place_report, live_handle, live_order, pending_handle, pending_order,
    replace_report, success_place_report, test_market, timeout_place_report, update_report,
    wrap_order,
};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing for a test binary.
///
/// Safe to call from every test; only the first call installs the
/// subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .try_init();
}
