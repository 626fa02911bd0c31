//! Earnings, filtering, and revenue/profit roll-ups over financial records.

pub mod aggregate;
pub mod document;
pub mod earnings;
pub mod filter;

pub use aggregate::{
    aggregate, AggregateOptions, AggregateResult, ExpensePolicy, GroupBy, GroupTotals, Totals,
};
pub use document::{Discount, DocumentTotals, LineItem};
pub use earnings::{compute_earnings, EarningsConfig, FULL_TIME_MONTHLY_HOURS};
pub use filter::{filter, AmountRange, FilterCriteria};
