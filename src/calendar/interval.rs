use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::granularity::Granularity;
use crate::errors::{FieldOpsError, Result};

/// Closed wall-clock interval; both bounds are inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if end < start {
            return Err(FieldOpsError::InvalidInput(
                "interval end must not precede start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Whole calendar days from `first` through `last`.
    pub fn from_dates(first: NaiveDate, last: NaiveDate) -> Result<Self> {
        Self::new(start_of_day(first), end_of_day(last))
    }

    pub fn contains(&self, wall: NaiveDateTime) -> bool {
        wall >= self.start && wall <= self.end
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }

    /// Number of calendar days touched by the interval.
    pub fn day_count(&self) -> i64 {
        (self.last_day() - self.first_day()).num_days() + 1
    }
}

/// The day, ISO week, or calendar month containing `reference`.
pub fn interval_for(reference: NaiveDate, granularity: Granularity) -> DateInterval {
    DateInterval {
        start: start_of_day(granularity.period_start(reference)),
        end: end_of_day(granularity.period_end(reference)),
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    // Last representable instant of the day, so every time on it is inside.
    let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}
