//! Records supplied by the host application and the timestamp normalization
//! applied at every public boundary.

pub mod clock;
pub mod record;
pub mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use record::{DateField, Dated, DatedRecord, FinancialRecord, PaymentBasis};
pub use timestamp::{RawTimestamp, ZonePolicy};
