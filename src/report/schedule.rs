use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{bucket_by_day, interval_for, DateInterval, Granularity};
use crate::domain::{Dated, ZonePolicy};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub record_ids: Vec<String>,
}

/// Jobs and tasks laid out on a day, week, or month calendar page.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulePage {
    pub title: String,
    pub interval: DateInterval,
    pub cells: Vec<DayCell>,
}

impl SchedulePage {
    pub fn build<T: Dated>(
        records: &[T],
        reference: NaiveDate,
        granularity: Granularity,
        zone: &ZonePolicy,
    ) -> Self {
        let interval = interval_for(reference, granularity);
        let cells = bucket_by_day(records, &interval, zone)
            .into_iter()
            .map(|(date, records)| DayCell {
                date,
                record_ids: records
                    .iter()
                    .map(|record| record.record_id().to_string())
                    .collect(),
            })
            .collect();
        Self {
            title: granularity.title(reference),
            interval,
            cells,
        }
    }

    pub fn scheduled_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.record_ids.len()).sum()
    }
}
