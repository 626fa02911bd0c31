//! Basic currency and percentage rendering for report output.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String")]
pub struct CurrencyCode(pub String);

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

/// Number formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub decimal_separator: char,
    pub grouping_separator: char,
    #[serde(default)]
    pub negative_style: NegativeStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
            negative_style: NegativeStyle::Sign,
        }
    }
}

pub fn symbol_for(code: &str) -> &str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "AUD" => "A$",
        "CAD" => "C$",
        _ => code,
    }
}

pub fn minor_units_for(code: &str) -> usize {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Renders `value` with grouping and decimal separators, without a sign.
pub fn format_number(locale: &LocaleConfig, value: f64, precision: usize) -> String {
    let body = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let mut rendered = group_digits(int_part, locale.grouping_separator);
    if let Some(frac) = frac_part {
        rendered.push(locale.decimal_separator);
        rendered.push_str(frac);
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

fn apply_sign(body: String, negative: bool, style: NegativeStyle) -> String {
    match (negative, style) {
        (false, _) => body,
        (true, NegativeStyle::Sign) => format!("-{body}"),
        (true, NegativeStyle::Parentheses) => format!("({body})"),
    }
}

fn is_negative(value: f64, precision: usize) -> bool {
    // Values that round to zero print without a sign.
    value < 0.0
        && format!("{:.*}", precision, value.abs())
            .chars()
            .any(|ch| ch.is_ascii_digit() && ch != '0')
}

pub fn format_currency(amount: f64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format!(
        "{}{}",
        symbol_for(code.as_str()),
        format_number(locale, amount, precision)
    );
    apply_sign(body, is_negative(amount, precision), locale.negative_style)
}

pub fn format_percent(value: f64, locale: &LocaleConfig) -> String {
    let body = format!("{}%", format_number(locale, value, 1));
    apply_sign(body, is_negative(value, 1), NegativeStyle::Sign)
}
