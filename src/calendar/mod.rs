//! Day/week/month intervals and the bucketing of dated records into them.

pub mod bucket;
pub mod granularity;
pub mod interval;

pub use bucket::{bucket, bucket_by_day, days_in, partition, BucketSplit};
pub use granularity::{advance, Direction, Granularity};
pub use interval::{interval_for, DateInterval};
