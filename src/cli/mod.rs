//! Command-line front end: load records, build a dashboard report, print it.

use std::{
    fs,
    io::IsTerminal,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use clap::Parser;

use crate::calendar::Granularity;
use crate::config::ConfigManager;
use crate::domain::{Clock, FinancialRecord, SystemClock};
use crate::errors::{FieldOpsError, Result};
use crate::finance::{AmountRange, FilterCriteria, GroupBy};
use crate::report::{render_text, DashboardReport, ReportRequest};

#[derive(Parser, Debug, Clone)]
#[command(name = "fieldops_report")]
#[command(about = "Summarize revenue, payroll, and profit for a calendar period", long_about = None)]
pub struct CliArgs {
    #[arg(long, value_name = "FILE", help = "JSON array of financial records")]
    pub records: PathBuf,

    #[arg(long, value_name = "YYYY-MM-DD", help = "Reference date (defaults to today)")]
    pub date: Option<String>,

    #[arg(long, value_name = "day|week|month", help = "Calendar view")]
    pub view: Option<String>,

    #[arg(long, value_name = "SELECTOR", help = "group, status, or a text field name")]
    pub group_by: Option<String>,

    #[arg(long = "status", value_name = "STATUS", help = "Keep only this status (repeatable)")]
    pub statuses: Vec<String>,

    #[arg(long = "group", value_name = "GROUP", help = "Keep only this group (repeatable)")]
    pub groups: Vec<String>,

    #[arg(long, value_name = "TEXT", help = "Case-insensitive text search")]
    pub search: Option<String>,

    #[arg(long, value_name = "AMOUNT")]
    pub min: Option<f64>,

    #[arg(long, value_name = "AMOUNT")]
    pub max: Option<f64>,

    #[arg(long, value_name = "FILE", help = "Config file (defaults to $FIELDOPS_HOME/config.json)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Print the report as JSON")]
    pub json: bool,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,
}

impl CliArgs {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new()
            .groups(self.groups.iter().cloned())
            .statuses(self.statuses.iter().cloned());
        if let Some(text) = &self.search {
            criteria = criteria.search(text.clone());
        }
        if self.min.is_some() || self.max.is_some() {
            criteria = criteria.amounts(AmountRange {
                min: self.min,
                max: self.max,
            });
        }
        criteria
    }
}

/// Entry point used by the `fieldops_report` binary.
pub fn run_cli() -> Result<()> {
    let args = CliArgs::parse();
    let use_color = !args.no_color && std::io::stdout().is_terminal();
    let output = run(&args, &SystemClock, use_color)?;
    println!("{output}");
    Ok(())
}

/// Builds the report described by `args` and returns the text to print.
pub fn run(args: &CliArgs, clock: &dyn Clock, use_color: bool) -> Result<String> {
    let manager = match &args.config {
        Some(path) => ConfigManager::new(path.clone()),
        None => ConfigManager::from_environment(),
    };
    let config = manager.load()?;
    let records = load_records(&args.records)?;

    let reference = match &args.date {
        Some(raw) => parse_date(raw)?,
        None => clock.today(&config.zone),
    };
    let granularity = match &args.view {
        Some(raw) => raw.parse::<Granularity>()?,
        None => config.default_granularity,
    };

    let mut request = ReportRequest::new(reference, granularity).with_criteria(args.criteria());
    if let Some(selector) = &args.group_by {
        request = request.grouped_by(GroupBy::parse(selector));
    }

    let report = DashboardReport::build(&records, &request, &config)?;
    if args.json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(render_text(&report, &config, use_color))
    }
}

pub fn load_records(path: &Path) -> Result<Vec<FinancialRecord>> {
    let data = fs::read_to_string(path)
        .map_err(|err| FieldOpsError::StorageError(format!("{}: {}", path.display(), err)))?;
    let records: Vec<FinancialRecord> = serde_json::from_str(&data)
        .map_err(|err| FieldOpsError::StorageError(format!("{}: {}", path.display(), err)))?;
    tracing::debug!(count = records.len(), path = %path.display(), "loaded records");
    Ok(records)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| FieldOpsError::InvalidInput(format!("`{raw}` is not a YYYY-MM-DD date")))
}
