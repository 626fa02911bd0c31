use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::calendar::DateInterval;
use crate::domain::{DateField, FinancialRecord, ZonePolicy};

/// Inclusive amount bounds; a missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AmountRange {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn contains(&self, amount: f64) -> bool {
        self.min.map_or(true, |min| amount >= min) && self.max.map_or(true, |max| amount <= max)
    }
}

/// Independently optional record filters, combined with logical AND.
///
/// Empty sets and blank search text are inactive.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub search_text: Option<String>,
    /// Text fields searched by `search_text`. When empty, `id`, `group`,
    /// `status`, and every entry of [`FinancialRecord::fields`] are searched.
    pub search_fields: Vec<String>,
    pub include_groups: BTreeSet<String>,
    pub include_statuses: BTreeSet<String>,
    pub amount_range: Option<AmountRange>,
    pub date_interval: Option<DateInterval>,
    pub date_field: DateField,
    pub zone: ZonePolicy,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn search_in<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn groups<S: Into<String>>(mut self, groups: impl IntoIterator<Item = S>) -> Self {
        self.include_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn statuses<S: Into<String>>(mut self, statuses: impl IntoIterator<Item = S>) -> Self {
        self.include_statuses = statuses.into_iter().map(Into::into).collect();
        self
    }

    pub fn amounts(mut self, range: AmountRange) -> Self {
        self.amount_range = Some(range);
        self
    }

    pub fn within(mut self, interval: DateInterval, field: DateField, zone: ZonePolicy) -> Self {
        self.date_interval = Some(interval);
        self.date_field = field;
        self.zone = zone;
        self
    }

    pub fn matches(&self, record: &FinancialRecord) -> bool {
        self.matches_search(record)
            && self.matches_group(record)
            && self.matches_status(record)
            && self.matches_amount(record)
            && self.matches_date(record)
    }

    fn matches_search(&self, record: &FinancialRecord) -> bool {
        let Some(needle) = self
            .search_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
        else {
            return true;
        };
        let needle = needle.to_lowercase();
        let hit = |value: &str| value.to_lowercase().contains(&needle);

        if self.search_fields.is_empty() {
            ["id", "group", "status"]
                .into_iter()
                .filter_map(|name| record.text_field(name))
                .chain(record.fields.values().map(String::as_str))
                .any(hit)
        } else {
            self.search_fields
                .iter()
                .filter_map(|name| record.text_field(name))
                .any(hit)
        }
    }

    fn matches_group(&self, record: &FinancialRecord) -> bool {
        self.include_groups.is_empty()
            || record
                .group_key
                .as_ref()
                .map_or(false, |key| self.include_groups.contains(key))
    }

    fn matches_status(&self, record: &FinancialRecord) -> bool {
        self.include_statuses.is_empty()
            || record
                .status
                .as_ref()
                .map_or(false, |status| self.include_statuses.contains(status))
    }

    fn matches_amount(&self, record: &FinancialRecord) -> bool {
        self.amount_range
            .map_or(true, |range| range.contains(record.amount))
    }

    fn matches_date(&self, record: &FinancialRecord) -> bool {
        let Some(interval) = &self.date_interval else {
            return true;
        };
        record
            .date_field(&self.date_field)
            .and_then(|raw| raw.normalize(&self.zone))
            .map_or(false, |wall| interval.contains(wall))
    }
}

/// Records satisfying every active criterion, in input order.
pub fn filter<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a FinancialRecord>
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    records
        .into_iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{interval_for, Granularity};
    use chrono::NaiveDate;

    fn invoices() -> Vec<FinancialRecord> {
        vec![
            FinancialRecord::with_id("INV-1001", 1200.0)
                .in_group("Angi")
                .with_status("paid")
                .with_field("customer", "Acme Roofing")
                .occurring_at("2024-05-02"),
            FinancialRecord::with_id("INV-1002", 300.0)
                .in_group("Google Ads")
                .with_status("pending")
                .with_field("customer", "Blue Sky HVAC")
                .occurring_at("2024-05-20"),
            FinancialRecord::with_id("INV-1003", 75.0)
                .with_status("cancelled")
                .with_field("customer", "acme plumbing")
                .occurring_at("2024-06-01"),
            FinancialRecord::with_id("INV-1004", 640.0)
                .in_group("Angi")
                .with_status("paid")
                .occurring_at("not-a-date"),
        ]
    }

    fn ids<'a>(records: &[&'a FinancialRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn empty_criteria_keep_everything() {
        let records = invoices();
        assert_eq!(filter(&records, &FilterCriteria::new()).len(), records.len());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = invoices();
        let criteria = FilterCriteria::new().search("ACME");
        assert_eq!(ids(&filter(&records, &criteria)), vec!["INV-1001", "INV-1003"]);
    }

    #[test]
    fn search_respects_designated_fields() {
        let records = invoices();
        let criteria = FilterCriteria::new().search("acme").search_in(["id"]);
        assert!(filter(&records, &criteria).is_empty());
        let criteria = FilterCriteria::new().search("1002").search_in(["id", "customer"]);
        assert_eq!(ids(&filter(&records, &criteria)), vec!["INV-1002"]);
    }

    #[test]
    fn blank_search_is_inactive() {
        let records = invoices();
        let criteria = FilterCriteria::new().search("   ");
        assert_eq!(filter(&records, &criteria).len(), 4);
    }

    #[test]
    fn group_and_status_sets_combine_with_and() {
        let records = invoices();
        let criteria = FilterCriteria::new().groups(["Angi"]).statuses(["paid", "pending"]);
        assert_eq!(ids(&filter(&records, &criteria)), vec!["INV-1001", "INV-1004"]);
        let criteria = criteria.statuses(["pending"]);
        assert!(filter(&records, &criteria).is_empty());
    }

    #[test]
    fn amount_range_is_inclusive() {
        let records = invoices();
        let criteria = FilterCriteria::new().amounts(AmountRange::between(300.0, 1200.0));
        assert_eq!(
            ids(&filter(&records, &criteria)),
            vec!["INV-1001", "INV-1002", "INV-1004"]
        );
        let open_ended = FilterCriteria::new().amounts(AmountRange {
            min: None,
            max: Some(300.0),
        });
        assert_eq!(ids(&filter(&records, &open_ended)), vec!["INV-1002", "INV-1003"]);
    }

    #[test]
    fn date_interval_excludes_malformed_dates() {
        let records = invoices();
        let may = interval_for(NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(), Granularity::Month);
        let criteria = FilterCriteria::new().within(may, DateField::OccursAt, ZonePolicy::Utc);
        assert_eq!(ids(&filter(&records, &criteria)), vec!["INV-1001", "INV-1002"]);
    }

    #[test]
    fn date_interval_reads_named_field() {
        let records = vec![
            FinancialRecord::with_id("a", 10.0).with_date("paid", "2024-05-03"),
            FinancialRecord::with_id("b", 10.0).occurring_at("2024-05-03"),
        ];
        let may = interval_for(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), Granularity::Month);
        let criteria =
            FilterCriteria::new().within(may, DateField::parse("paid"), ZonePolicy::Utc);
        assert_eq!(ids(&filter(&records, &criteria)), vec!["a"]);
    }

    #[test]
    fn additional_criteria_never_grow_the_result() {
        let records = invoices();
        let base = FilterCriteria::new().statuses(["paid", "pending", "cancelled"]);
        let narrower = base.clone().search("acme");
        let narrowest = narrower.clone().amounts(AmountRange::between(100.0, 10_000.0));
        let sizes = [
            filter(&records, &base).len(),
            filter(&records, &narrower).len(),
            filter(&records, &narrowest).len(),
        ];
        assert!(sizes[0] >= sizes[1] && sizes[1] >= sizes[2], "{sizes:?}");
        assert_eq!(sizes, [4, 2, 1]);
    }
}
