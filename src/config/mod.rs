use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::calendar::Granularity;
use crate::currency::{CurrencyCode, LocaleConfig};
use crate::domain::{DateField, ZonePolicy};
use crate::errors::{FieldOpsError, Result};
use crate::finance::{EarningsConfig, ExpensePolicy};

const HOME_ENV: &str = "FIELDOPS_HOME";
const DEFAULT_DIR_NAME: &str = ".fieldops";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Serializable form of [`ExpensePolicy`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExpenseSetting {
    #[default]
    None,
    Fixed(f64),
    Ratio(f64),
}

impl From<ExpenseSetting> for ExpensePolicy {
    fn from(setting: ExpenseSetting) -> Self {
        match setting {
            ExpenseSetting::None => ExpensePolicy::None,
            ExpenseSetting::Fixed(total) => ExpensePolicy::Fixed(total),
            ExpenseSetting::Ratio(ratio) => ExpensePolicy::Ratio(ratio),
        }
    }
}

/// Reporting preferences. Every field falls back to its default when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub currency: CurrencyCode,
    pub locale: LocaleConfig,
    pub zone: ZonePolicy,
    pub default_granularity: Granularity,
    /// Hours billed per record for hourly pay.
    pub hours_per_record: f64,
    pub expenses: ExpenseSetting,
    /// Date the period filter applies to: `occurs_at` or a named date.
    pub date_field: String,
    pub search_fields: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            locale: LocaleConfig::default(),
            zone: ZonePolicy::default(),
            default_granularity: Granularity::default(),
            hours_per_record: EarningsConfig::default().hours_per_record,
            expenses: ExpenseSetting::default(),
            date_field: "occurs_at".into(),
            search_fields: Vec::new(),
        }
    }
}

impl ReportConfig {
    pub fn earnings(&self) -> EarningsConfig {
        EarningsConfig::new(self.hours_per_record)
    }

    pub fn expense_policy(&self) -> ExpensePolicy {
        self.expenses.into()
    }

    pub fn date_field(&self) -> DateField {
        DateField::parse(&self.date_field)
    }
}

/// Loads and saves [`ReportConfig`] as JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `$FIELDOPS_HOME/config.json`, else `~/.fieldops/config.json`.
    pub fn from_environment() -> Self {
        Self::new(app_data_dir().join(CONFIG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<ReportConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(ReportConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            FieldOpsError::ConfigError(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &ReportConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: ReportConfig =
            serde_json::from_str(r#"{"expenses":{"kind":"ratio","value":0.2}}"#).unwrap();
        assert_eq!(config.expenses, ExpenseSetting::Ratio(0.2));
        assert_eq!(config.currency.as_str(), "USD");
        assert_eq!(config.zone, ZonePolicy::Utc);
        assert_eq!(config.date_field(), DateField::OccursAt);
        assert_eq!(config.hours_per_record, 1.0);
    }

    #[test]
    fn lowercase_currency_is_normalized() {
        let config: ReportConfig = serde_json::from_str(r#"{"currency":"eur"}"#).unwrap();
        assert_eq!(config.currency.as_str(), "EUR");
    }

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/x/config.json")),
            PathBuf::from("/x/config.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("/x/config")), PathBuf::from("/x/config.tmp"));
    }

    #[test]
    fn expense_setting_converts_to_policy() {
        let policy: ExpensePolicy = ExpenseSetting::Fixed(120.0).into();
        assert!(matches!(policy, ExpensePolicy::Fixed(total) if total == 120.0));
    }
}
