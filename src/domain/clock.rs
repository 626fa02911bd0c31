use chrono::{DateTime, NaiveDate, Utc};

use super::timestamp::ZonePolicy;

/// Clock abstracts access to the current timestamp so reports stay deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns today's date in `zone`, falling back to the UTC date.
    fn today(&self, zone: &ZonePolicy) -> NaiveDate {
        let now = self.now();
        zone.date_of(now).unwrap_or_else(|| now.date_naive())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
