//! Execution configuration.
//!
//! Loads configuration from environment variables with sensible defaults.
//! These are client-level settings stamped onto packages at construction;
//! nothing here varies per submission.

use std::env;

// =============================================================================
// Configuration
// =============================================================================

/// Client-level execution configuration.
#[derive(Debug, Clone, Default)]
pub struct ExecConfig {
    /// Strategy reference attached to place submissions so fills can be
    /// attributed to the strategy that created them
    pub customer_strategy_ref: Option<String>,

    /// Request asynchronous execution for place/replace submissions
    /// (the exchange acknowledges before matching)
    pub async_execution: bool,
}

impl ExecConfig {
    /// Load configuration from environment variables.
    ///
    /// - `FURLONG_STRATEGY_REF`: strategy reference (default: none)
    /// - `FURLONG_ASYNC_EXECUTION`: "true"/"1" to enable (default: false)
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let customer_strategy_ref = env::var("FURLONG_STRATEGY_REF")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let async_execution = env::var("FURLONG_ASYNC_EXECUTION")
            .map(|value| matches!(value.trim(), "true" | "1"))
            .unwrap_or(false);

        Self { customer_strategy_ref, async_execution }
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            customer_strategy_ref: Some("furlong-test".to_string()),
            async_execution: false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExecConfig::default();
        assert!(config.customer_strategy_ref.is_none());
        assert!(!config.async_execution);
    }

    #[test]
    fn test_test_config() {
        let config = ExecConfig::test();
        assert_eq!(config.customer_strategy_ref.as_deref(), Some("furlong-test"));
    }
}
