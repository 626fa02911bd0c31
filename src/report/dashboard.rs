use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::calendar::{advance, interval_for, DateInterval, Direction, Granularity};
use crate::config::ReportConfig;
use crate::domain::FinancialRecord;
use crate::errors::Result;
use crate::finance::{
    aggregate, filter, AggregateOptions, AggregateResult, FilterCriteria, GroupBy,
};

/// What the caller is currently looking at.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub reference: NaiveDate,
    pub granularity: Granularity,
    /// Filters applied on top of the period restriction. Any date interval
    /// set here is replaced by the period's interval.
    pub criteria: FilterCriteria,
    pub group_by: Option<GroupBy>,
}

impl ReportRequest {
    pub fn new(reference: NaiveDate, granularity: Granularity) -> Self {
        Self {
            reference,
            granularity,
            criteria: FilterCriteria::default(),
            group_by: None,
        }
    }

    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn grouped_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }
}

/// Financial summary of one calendar period.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub title: String,
    pub granularity: Granularity,
    pub reference: NaiveDate,
    pub interval: DateInterval,
    /// Reference dates for the prev/next navigation controls.
    pub previous: NaiveDate,
    pub next: NaiveDate,
    pub matched_records: usize,
    /// Records skipped because the period's date field is missing or malformed.
    pub undated_records: usize,
    pub summary: AggregateResult,
}

impl DashboardReport {
    pub fn build(
        records: &[FinancialRecord],
        request: &ReportRequest,
        config: &ReportConfig,
    ) -> Result<Self> {
        let interval = interval_for(request.reference, request.granularity);
        let date_field = config.date_field();
        let mut criteria = request
            .criteria
            .clone()
            .within(interval, date_field.clone(), config.zone);
        if criteria.search_fields.is_empty() {
            criteria.search_fields = config.search_fields.clone();
        }

        let undated_records = records
            .iter()
            .filter(|record| {
                record
                    .date_field(&date_field)
                    .and_then(|raw| raw.normalize(&config.zone))
                    .is_none()
            })
            .count();
        let matched = filter(records, &criteria);

        let options = AggregateOptions {
            earnings: config.earnings(),
            expenses: config.expense_policy(),
            group_by: request.group_by.clone(),
        };
        let summary = aggregate(matched.iter().copied(), &options)?;

        info!(
            view = %request.granularity,
            reference = %request.reference,
            matched = matched.len(),
            undated = undated_records,
            "built dashboard report"
        );

        Ok(Self {
            title: request.granularity.title(request.reference),
            granularity: request.granularity,
            reference: request.reference,
            interval,
            previous: advance(request.reference, request.granularity, Direction::Backward),
            next: advance(request.reference, request.granularity, Direction::Forward),
            matched_records: matched.len(),
            undated_records,
            summary,
        })
    }
}
