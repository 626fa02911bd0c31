use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{de::Deserializer, Deserialize, Serialize, Serializer};
use uuid::Uuid;

use super::timestamp::RawTimestamp;
use crate::errors::FieldOpsError;

/// Anything that can be placed on the calendar.
pub trait Dated {
    fn record_id(&self) -> &str;

    /// The timestamp used for bucketing, if the record carries one.
    fn occurs_at(&self) -> Option<&RawTimestamp>;
}

impl<T: Dated + ?Sized> Dated for &T {
    fn record_id(&self) -> &str {
        (**self).record_id()
    }

    fn occurs_at(&self) -> Option<&RawTimestamp> {
        (**self).occurs_at()
    }
}

/// A scheduled job or task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedRecord {
    pub id: String,
    pub occurs_at: RawTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl DatedRecord {
    pub fn new(id: impl Into<String>, occurs_at: impl Into<RawTimestamp>) -> Self {
        Self {
            id: id.into(),
            occurs_at: occurs_at.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl Dated for DatedRecord {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn occurs_at(&self) -> Option<&RawTimestamp> {
        Some(&self.occurs_at)
    }
}

/// How a record's earnings are derived from its amount and rate.
///
/// Unknown tags are preserved as [`PaymentBasis::Unrecognized`] so that
/// loading data never fails on them; computing earnings does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PaymentBasis {
    /// `rate` is a percentage of `amount`.
    #[default]
    Percentage,
    /// `rate` is paid once per record.
    FlatPerJob,
    /// `rate` is paid per hour.
    Hourly,
    Unrecognized(String),
}

impl PaymentBasis {
    /// Lenient parse: casing and `_`/`-`/space separators are ignored.
    pub fn parse(value: &str) -> Self {
        let folded: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '_' | '-' | ' '))
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "percentage" | "percent" => PaymentBasis::Percentage,
            "flatperjob" | "flat" => PaymentBasis::FlatPerJob,
            "hourly" => PaymentBasis::Hourly,
            _ => PaymentBasis::Unrecognized(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentBasis::Percentage => "percentage",
            PaymentBasis::FlatPerJob => "flatPerJob",
            PaymentBasis::Hourly => "hourly",
            PaymentBasis::Unrecognized(raw) => raw,
        }
    }
}

impl FromStr for PaymentBasis {
    type Err = FieldOpsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match PaymentBasis::parse(value) {
            PaymentBasis::Unrecognized(raw) => Err(FieldOpsError::InvalidPaymentBasis(raw)),
            basis => Ok(basis),
        }
    }
}

impl fmt::Display for PaymentBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentBasis {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentBasis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(PaymentBasis::parse(&value))
    }
}

/// Which date of a financial record a date filter looks at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateField {
    #[default]
    OccursAt,
    /// A key of [`FinancialRecord::dates`], such as `due` or `paid`.
    Named(String),
}

impl DateField {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "occurs_at" | "occursAt" => DateField::OccursAt,
            other => DateField::Named(other.to_string()),
        }
    }
}

/// An estimate, invoice, payroll line, or expense contributing to a roll-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub id: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    #[serde(default)]
    pub payment_basis: PaymentBasis,
    #[serde(default)]
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurs_at: Option<RawTimestamp>,
    /// Free-form text such as customer, job title, or technician.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
    /// Secondary dates such as `due` or `paid`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dates: BTreeMap<String, RawTimestamp>,
}

impl FinancialRecord {
    pub fn new(amount: f64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), amount)
    }

    pub fn with_id(id: impl Into<String>, amount: f64) -> Self {
        Self {
            id: id.into(),
            amount,
            group_key: None,
            payment_basis: PaymentBasis::default(),
            rate: 0.0,
            status: None,
            occurs_at: None,
            fields: BTreeMap::new(),
            dates: BTreeMap::new(),
        }
    }

    pub fn paid(mut self, basis: PaymentBasis, rate: f64) -> Self {
        self.payment_basis = basis;
        self.rate = rate;
        self
    }

    pub fn in_group(mut self, key: impl Into<String>) -> Self {
        self.group_key = Some(key.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn occurring_at(mut self, when: impl Into<RawTimestamp>) -> Self {
        self.occurs_at = Some(when.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_date(mut self, name: impl Into<String>, when: impl Into<RawTimestamp>) -> Self {
        self.dates.insert(name.into(), when.into());
        self
    }

    /// Looks up a text value by name. `id`, `group`, and `status` resolve to
    /// the built-in fields; anything else is read from [`Self::fields`].
    pub fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(self.id.as_str()),
            "group" | "group_key" => self.group_key.as_deref(),
            "status" => self.status.as_deref(),
            other => self.fields.get(other).map(String::as_str),
        }
    }

    pub fn date_field(&self, field: &DateField) -> Option<&RawTimestamp> {
        match field {
            DateField::OccursAt => self.occurs_at.as_ref(),
            DateField::Named(name) => self.dates.get(name),
        }
    }
}

impl Dated for FinancialRecord {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn occurs_at(&self) -> Option<&RawTimestamp> {
        self.occurs_at.as_ref()
    }
}
