use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use super::interval::DateInterval;
use crate::domain::{Dated, ZonePolicy};

/// Records split by whether they fall inside an interval.
#[derive(Debug)]
pub struct BucketSplit<'a, T> {
    pub inside: Vec<&'a T>,
    pub outside: Vec<&'a T>,
    /// Records whose timestamp is missing or could not be parsed.
    pub undated: Vec<&'a T>,
}

fn normalized<T: Dated>(record: &T, zone: &ZonePolicy) -> Option<NaiveDateTime> {
    let wall = record.occurs_at().and_then(|raw| raw.normalize(zone));
    if wall.is_none() {
        debug!(record = record.record_id(), "skipping record without a usable date");
    }
    wall
}

/// Records inside `interval`, in input order. Undated records are dropped.
pub fn bucket<'a, T, I>(records: I, interval: &DateInterval, zone: &ZonePolicy) -> Vec<&'a T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|record| {
            normalized(*record, zone)
                .map(|wall| interval.contains(wall))
                .unwrap_or(false)
        })
        .collect()
}

/// Three-way split of `records` against `interval`, preserving input order.
pub fn partition<'a, T, I>(
    records: I,
    interval: &DateInterval,
    zone: &ZonePolicy,
) -> BucketSplit<'a, T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut split = BucketSplit {
        inside: Vec::new(),
        outside: Vec::new(),
        undated: Vec::new(),
    };
    for record in records {
        match normalized(record, zone) {
            Some(wall) if interval.contains(wall) => split.inside.push(record),
            Some(_) => split.outside.push(record),
            None => split.undated.push(record),
        }
    }
    split
}

/// Every calendar day touched by `interval`, in order.
pub fn days_in(interval: &DateInterval) -> Vec<NaiveDate> {
    interval
        .first_day()
        .iter_days()
        .take(interval.day_count().max(0) as usize)
        .collect()
}

/// Calendar cells: each day of `interval` mapped to its records. Days
/// without records map to an empty list.
pub fn bucket_by_day<'a, T, I>(
    records: I,
    interval: &DateInterval,
    zone: &ZonePolicy,
) -> BTreeMap<NaiveDate, Vec<&'a T>>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut cells: BTreeMap<NaiveDate, Vec<&'a T>> = days_in(interval)
        .into_iter()
        .map(|day| (day, Vec::new()))
        .collect();
    for record in records {
        let Some(wall) = normalized(record, zone) else {
            continue;
        };
        if interval.contains(wall) {
            cells.entry(wall.date()).or_default().push(record);
        }
    }
    cells
}
