#![doc(test(attr(deny(warnings))))]

//! Field-service reporting core: calendar bucketing of jobs and tasks, and
//! revenue/payroll/profit roll-ups over estimates, invoices, and job records.
//!
//! All calendar and finance operations are pure functions over caller-owned
//! data; configuration reaches them as explicit parameters.

pub mod calendar;
pub mod cli;
pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod finance;
pub mod report;
pub mod utils;

pub use errors::{FieldOpsError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("fieldops core tracing initialized.");
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
