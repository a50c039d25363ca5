#![doc(test(attr(deny(warnings))))]

//! Cashflow Advisor keeps an append-only income/expense ledger, derives the
//! current month's view and per-category expense totals from it, and relays
//! tax or investment questions to an external language-model service.

pub mod advisor;
pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod time;
pub mod utils;

pub use errors::{CashFlowError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Cashflow Advisor tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
