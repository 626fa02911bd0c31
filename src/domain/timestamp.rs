use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{FieldOpsError, Result};

const WALL_CLOCK_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A timestamp as callers hand it over: a native chrono value or a string.
///
/// Strings are kept verbatim and only parsed when the timestamp is
/// normalized, so a malformed value survives deserialization and is later
/// treated as "no date".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// An instant carrying its UTC offset.
    Instant(DateTime<FixedOffset>),
    /// Wall-clock date and time, already expressed in the reporting zone.
    WallClock(NaiveDateTime),
    /// Calendar date; normalizes to midnight.
    Date(NaiveDate),
    Text(String),
}

impl RawTimestamp {
    /// Converts the timestamp into wall-clock time of `zone`.
    ///
    /// Returns `None` when a text value cannot be parsed.
    pub fn normalize(&self, zone: &ZonePolicy) -> Option<NaiveDateTime> {
        match self {
            RawTimestamp::Instant(instant) => zone.localize(instant.with_timezone(&Utc)),
            RawTimestamp::WallClock(wall) => Some(*wall),
            RawTimestamp::Date(date) => Some(date.and_time(NaiveTime::MIN)),
            RawTimestamp::Text(text) => parse_text(text)?.normalize(zone),
        }
    }

    /// Calendar date of the normalized timestamp.
    pub fn date_in(&self, zone: &ZonePolicy) -> Option<NaiveDate> {
        self.normalize(zone).map(|wall| wall.date())
    }
}

fn parse_text(text: &str) -> Option<RawTimestamp> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(RawTimestamp::Instant(instant));
    }
    for format in WALL_CLOCK_FORMATS {
        if let Ok(wall) = NaiveDateTime::parse_from_str(text, format) {
            return Some(RawTimestamp::WallClock(wall));
        }
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .map(RawTimestamp::Date)
}

impl From<NaiveDate> for RawTimestamp {
    fn from(date: NaiveDate) -> Self {
        RawTimestamp::Date(date)
    }
}

impl From<NaiveDateTime> for RawTimestamp {
    fn from(wall: NaiveDateTime) -> Self {
        RawTimestamp::WallClock(wall)
    }
}

impl From<DateTime<FixedOffset>> for RawTimestamp {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        RawTimestamp::Instant(instant)
    }
}

impl From<DateTime<Utc>> for RawTimestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        RawTimestamp::Instant(instant.fixed_offset())
    }
}

impl From<&str> for RawTimestamp {
    fn from(text: &str) -> Self {
        RawTimestamp::Text(text.to_string())
    }
}

impl From<String> for RawTimestamp {
    fn from(text: String) -> Self {
        RawTimestamp::Text(text)
    }
}

/// Time zone in which day, week, and month boundaries are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZonePolicy {
    #[default]
    Utc,
    /// The host's local zone.
    Local,
    /// A fixed offset east of UTC.
    Fixed { offset_seconds: i32 },
}

impl ZonePolicy {
    pub fn fixed(offset_seconds: i32) -> Result<Self> {
        FixedOffset::east_opt(offset_seconds)
            .map(|_| ZonePolicy::Fixed { offset_seconds })
            .ok_or_else(|| {
                FieldOpsError::InvalidInput(format!(
                    "UTC offset of {offset_seconds} seconds is out of range"
                ))
            })
    }

    /// Wall-clock time of `instant` in this zone.
    pub fn localize(&self, instant: DateTime<Utc>) -> Option<NaiveDateTime> {
        match self {
            ZonePolicy::Utc => Some(instant.naive_utc()),
            ZonePolicy::Local => Some(instant.with_timezone(&chrono::Local).naive_local()),
            ZonePolicy::Fixed { offset_seconds } => FixedOffset::east_opt(*offset_seconds)
                .map(|offset| instant.with_timezone(&offset).naive_local()),
        }
    }

    /// Calendar date of `instant` in this zone.
    pub fn date_of(&self, instant: DateTime<Utc>) -> Option<NaiveDate> {
        self.localize(instant).map(|wall| wall.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn text_forms_normalize_to_the_same_wall_clock() {
        let zone = ZonePolicy::Utc;
        let expected = date(2024, 3, 5).and_hms_opt(14, 30, 0).unwrap();
        for text in [
            "2024-03-05T14:30:00Z",
            "2024-03-05T14:30:00",
            "2024-03-05 14:30:00",
            "2024-03-05T14:30",
            "2024-03-05T16:30:00+02:00",
        ] {
            assert_eq!(
                RawTimestamp::from(text).normalize(&zone),
                Some(expected),
                "{text}"
            );
        }
    }

    #[test]
    fn date_only_normalizes_to_midnight() {
        let raw = RawTimestamp::from("2024-02-29");
        assert_eq!(
            raw.normalize(&ZonePolicy::Utc),
            Some(date(2024, 2, 29).and_time(NaiveTime::MIN))
        );
        assert_eq!(
            RawTimestamp::from(date(2024, 2, 29)),
            RawTimestamp::Date(date(2024, 2, 29))
        );
    }

    #[test]
    fn malformed_text_yields_none() {
        for text in ["", "   ", "not a date", "2024-13-01", "2023-02-29"] {
            assert_eq!(RawTimestamp::from(text).normalize(&ZonePolicy::Utc), None);
        }
    }

    #[test]
    fn fixed_zone_shifts_calendar_day() {
        let raw = RawTimestamp::from("2024-03-05T23:30:00Z");
        let tokyo = ZonePolicy::fixed(9 * 3600).unwrap();
        assert_eq!(raw.date_in(&ZonePolicy::Utc), Some(date(2024, 3, 5)));
        assert_eq!(raw.date_in(&tokyo), Some(date(2024, 3, 6)));
    }

    #[test]
    fn naive_values_ignore_zone() {
        let raw = RawTimestamp::from("2024-03-05T23:30:00");
        let tokyo = ZonePolicy::fixed(9 * 3600).unwrap();
        assert_eq!(raw.date_in(&tokyo), Some(date(2024, 3, 5)));
    }

    #[test]
    fn fixed_offset_out_of_range_is_rejected() {
        assert!(ZonePolicy::fixed(90_000).is_err());
        assert!(ZonePolicy::fixed(-3600).is_ok());
    }

    #[test]
    fn deserializes_untagged_values() {
        let parsed: Vec<RawTimestamp> =
            serde_json::from_str(r#"["2024-01-15", "2024-01-15T08:00:00", "garbage"]"#).unwrap();
        assert_eq!(parsed[0], RawTimestamp::Date(date(2024, 1, 15)));
        assert!(matches!(parsed[1], RawTimestamp::WallClock(_)));
        assert_eq!(parsed[2], RawTimestamp::Text("garbage".into()));
    }

    #[test]
    fn zone_policy_serializes_with_kind_tag() {
        let json = serde_json::to_string(&ZonePolicy::Fixed { offset_seconds: 3600 }).unwrap();
        assert_eq!(json, r#"{"kind":"fixed","offset_seconds":3600}"#);
        let parsed: ZonePolicy = serde_json::from_str(r#"{"kind":"local"}"#).unwrap();
        assert_eq!(parsed, ZonePolicy::Local);
    }
}
