use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fieldops_core::{
    calendar::{bucket, interval_for, Granularity},
    domain::{DateField, FinancialRecord, PaymentBasis, ZonePolicy},
    finance::{
        aggregate, filter, AggregateOptions, EarningsConfig, ExpensePolicy, FilterCriteria,
        GroupBy,
    },
};

const TECHNICIANS: [&str; 5] = ["Marcus", "Priya", "Jonah", "Elena", "Sam"];
const STATUSES: [&str; 3] = ["completed", "pending", "cancelled"];

fn build_sample_records(count: usize) -> Vec<FinancialRecord> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let basis = match idx % 3 {
                0 => PaymentBasis::Percentage,
                1 => PaymentBasis::FlatPerJob,
                _ => PaymentBasis::Hourly,
            };
            FinancialRecord::with_id(format!("JOB-{idx}"), 100.0 + (idx % 900) as f64)
                .paid(basis, 10.0 + (idx % 30) as f64)
                .in_group(TECHNICIANS[idx % TECHNICIANS.len()])
                .with_status(STATUSES[idx % STATUSES.len()])
                .with_field("customer", format!("Customer {}", idx % 250))
                .occurring_at(start + Duration::days((idx % 365) as i64))
        })
        .collect()
}

fn bench_roll_up(c: &mut Criterion) {
    let records = build_sample_records(black_box(10_000));
    let month = interval_for(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(), Granularity::Month);
    let criteria = FilterCriteria::new()
        .statuses(["completed", "pending"])
        .search("customer 1")
        .within(month, DateField::OccursAt, ZonePolicy::Utc);
    let options = AggregateOptions::new()
        .earnings(EarningsConfig::new(8.0))
        .expenses(ExpensePolicy::Ratio(0.33))
        .group_by(GroupBy::GroupKey);

    c.bench_function("filter_month_10k", |b| {
        b.iter(|| black_box(filter(&records, &criteria)))
    });

    c.bench_function("aggregate_grouped_10k", |b| {
        b.iter(|| black_box(aggregate(&records, &options).expect("aggregate")))
    });

    c.bench_function("bucket_week_10k", |b| {
        let week = interval_for(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(), Granularity::Week);
        b.iter(|| black_box(bucket(&records, &week, &ZonePolicy::Utc)))
    });
}

criterion_group!(benches, bench_roll_up);
criterion_main!(benches);
