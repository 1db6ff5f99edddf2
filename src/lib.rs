#![doc(test(attr(deny(warnings))))]

//! Spender Core holds the transaction ledger, recurring-series engine,
//! budgets, and JSON persistence behind a personal spending tracker.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(build = %utils::build_info::current().summary(), "Spender Core tracing initialized.");
    });
}
