use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{FinancialRecord, PaymentBasis};
use crate::errors::{ensure_finite, FieldOpsError, Result};

/// Hours in a month of full-time work: 40 hours/week over 4.33 weeks.
pub const FULL_TIME_MONTHLY_HOURS: f64 = 40.0 * 4.33;

/// Parameters for turning a record's rate into earnings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarningsConfig {
    /// Hours billed per record under [`PaymentBasis::Hourly`].
    pub hours_per_record: f64,
}

impl EarningsConfig {
    pub fn new(hours_per_record: f64) -> Self {
        Self { hours_per_record }
    }

    /// Each record is one month of full-time work.
    pub fn full_time_monthly() -> Self {
        Self::new(FULL_TIME_MONTHLY_HOURS)
    }
}

impl Default for EarningsConfig {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Earnings (technician or contractor pay) owed for a single record.
pub fn compute_earnings(record: &FinancialRecord, config: &EarningsConfig) -> Result<f64> {
    let amount = ensure_finite(record.amount, "amount", &record.id)?;
    let rate = ensure_finite(record.rate, "rate", &record.id)?;

    let earnings = match &record.payment_basis {
        PaymentBasis::Unrecognized(tag) => {
            return Err(FieldOpsError::InvalidPaymentBasis(tag.clone()))
        }
        PaymentBasis::Percentage => {
            if !(0.0..=100.0).contains(&rate) {
                warn!(record = %record.id, rate, "percentage rate outside 0..=100");
            }
            amount * (rate / 100.0)
        }
        PaymentBasis::FlatPerJob => rate,
        PaymentBasis::Hourly => {
            let hours = ensure_finite(config.hours_per_record, "hours_per_record", &record.id)?;
            rate * hours
        }
    };
    Ok(earnings)
}
