#![allow(dead_code)]

use chrono::NaiveDate;
use fieldops_core::domain::{DatedRecord, FinancialRecord, PaymentBasis};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

/// A small book of technician job records spread over March and April 2024.
pub fn technician_jobs() -> Vec<FinancialRecord> {
    vec![
        FinancialRecord::with_id("JOB-301", 1450.0)
            .paid(PaymentBasis::Percentage, 30.0)
            .in_group("Marcus")
            .with_status("completed")
            .with_field("customer", "Hillside Dental")
            .with_field("source", "Google Ads")
            .occurring_at("2024-03-04T08:15:00"),
        FinancialRecord::with_id("JOB-302", 380.0)
            .paid(PaymentBasis::FlatPerJob, 75.0)
            .in_group("Priya")
            .with_status("completed")
            .with_field("customer", "Oak Street Bakery")
            .with_field("source", "Referral")
            .occurring_at("2024-03-06"),
        FinancialRecord::with_id("JOB-303", 2200.0)
            .paid(PaymentBasis::Hourly, 45.0)
            .in_group("Marcus")
            .with_status("pending")
            .with_field("customer", "Hillside Apartments")
            .with_field("source", "Angi")
            .occurring_at("2024-03-10T17:45:00Z"),
        FinancialRecord::with_id("JOB-304", 640.0)
            .paid(PaymentBasis::Percentage, 25.0)
            .in_group("Jonah")
            .with_status("cancelled")
            .with_field("source", "Angi")
            .occurring_at("2024-03-11"),
        FinancialRecord::with_id("JOB-305", 990.0)
            .paid(PaymentBasis::FlatPerJob, 120.0)
            .in_group("Priya")
            .with_status("completed")
            .with_field("source", "Google Ads")
            .occurring_at("2024-04-02"),
        FinancialRecord::with_id("JOB-306", 150.0)
            .paid(PaymentBasis::Percentage, 20.0)
            .in_group("Jonah")
            .with_status("completed")
            .occurring_at("03/12/2024"),
    ]
}

pub fn calendar_tasks() -> Vec<DatedRecord> {
    vec![
        DatedRecord::new("task-a", "2024-02-26T09:00:00").with_title("Furnace tune-up"),
        DatedRecord::new("task-b", "2024-02-29").with_title("Leap day install"),
        DatedRecord::new("task-c", "2024-03-01T00:00:00").with_title("Permit pickup"),
        DatedRecord::new("task-d", "invalid").with_title("Unscheduled"),
        DatedRecord::new("task-e", "2024-03-03T23:59:59").with_title("Weekend callout"),
    ]
}
