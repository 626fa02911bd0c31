use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{FieldOpsError, Result};

/// Calendar view unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    /// ISO week, Monday through Sunday.
    Week,
    #[default]
    Month,
}

impl Granularity {
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    /// First calendar day of the period containing `reference`.
    pub fn period_start(&self, reference: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => reference,
            Granularity::Week => {
                let delta = reference.weekday().num_days_from_monday() as i64;
                shift_days(reference, -delta)
            }
            Granularity::Month => shift_days(reference, -(reference.day0() as i64)),
        }
    }

    /// Last calendar day of the period containing `reference`.
    pub fn period_end(&self, reference: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => reference,
            Granularity::Week => {
                let delta = reference.weekday().num_days_from_sunday() as i64;
                shift_days(reference, (7 - delta) % 7)
            }
            Granularity::Month => {
                let last = days_in_month(reference.year(), reference.month());
                shift_days(reference, (last - reference.day()) as i64)
            }
        }
    }

    /// Heading for a calendar page, e.g. "Week of 12 Oct 2026".
    pub fn title(&self, reference: NaiveDate) -> String {
        match self {
            Granularity::Day => reference.format("%a %d %b %Y").to_string(),
            Granularity::Week => format!(
                "Week of {}",
                self.period_start(reference).format("%d %b %Y")
            ),
            Granularity::Month => reference.format("%B %Y").to_string(),
        }
    }
}

/// Moves `date` by `days`, saturating at chrono's representable range.
fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let delta = Duration::days(days);
    match date.checked_add_signed(delta) {
        Some(shifted) => shifted,
        None if days < 0 => NaiveDate::MIN,
        None => NaiveDate::MAX,
    }
}

impl FromStr for Granularity {
    type Err = FieldOpsError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            other => Err(FieldOpsError::InvalidInput(format!(
                "unknown calendar view `{other}` (expected day, week, or month)"
            ))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Navigation step for prev/next controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    fn sign(self) -> i32 {
        match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = FieldOpsError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            -1 => Ok(Direction::Backward),
            1 => Ok(Direction::Forward),
            other => Err(FieldOpsError::InvalidInput(format!(
                "direction must be -1 or +1, got {other}"
            ))),
        }
    }
}

/// Moves `reference` by one unit of `granularity`.
///
/// Month steps keep the day of month, clamped to the target month's length.
/// At the edge of the representable date range the reference is returned
/// unchanged.
pub fn advance(reference: NaiveDate, granularity: Granularity, direction: Direction) -> NaiveDate {
    let sign = direction.sign();
    let moved = match granularity {
        Granularity::Day => reference.checked_add_signed(Duration::days(sign as i64)),
        Granularity::Week => reference.checked_add_signed(Duration::weeks(sign as i64)),
        Granularity::Month => shift_month(reference, sign),
    };
    moved.unwrap_or(reference)
}

fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}
