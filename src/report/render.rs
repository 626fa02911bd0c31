use colored::Colorize;

use super::dashboard::DashboardReport;
use super::table::{Table, TableColumn};
use crate::config::ReportConfig;
use crate::currency::{format_currency, format_percent};
use crate::finance::Totals;

const UNGROUPED_LABEL: &str = "(none)";

/// Text rendering of a dashboard report for terminals.
pub fn render_text(report: &DashboardReport, config: &ReportConfig, use_color: bool) -> String {
    let heading = format!(
        "{} ({} to {})",
        report.title,
        report.interval.first_day(),
        report.interval.last_day()
    );
    let mut out = if use_color {
        heading.bold().to_string()
    } else {
        heading
    };
    out.push('\n');

    let mut table = Table::new(vec![
        TableColumn::left("Group"),
        TableColumn::right("Records"),
        TableColumn::right("Amount"),
        TableColumn::right("Earnings"),
        TableColumn::right("Expenses"),
        TableColumn::right("Profit"),
        TableColumn::right("Margin"),
    ]);
    for group in &report.summary.by_group {
        let label = group.key.as_deref().unwrap_or(UNGROUPED_LABEL);
        table.push_row(totals_row(label, &group.totals, config, use_color));
    }
    table.push_row(totals_row("Total", &report.summary.totals, config, use_color));
    out.push_str(&table.render());
    out.push('\n');

    out.push_str(&format!(
        "{} matched, {} without a usable date. Previous: {}  Next: {}",
        report.matched_records, report.undated_records, report.previous, report.next
    ));
    out
}

fn totals_row(label: &str, totals: &Totals, config: &ReportConfig, use_color: bool) -> Vec<String> {
    let money = |value: f64| format_currency(value, &config.currency, &config.locale);
    let mut profit = money(totals.total_profit);
    let mut margin = format_percent(totals.margin_percent, &config.locale);
    if use_color && totals.total_profit < 0.0 {
        profit = profit.red().to_string();
        margin = margin.red().to_string();
    }
    vec![
        label.to_string(),
        totals.record_count.to_string(),
        money(totals.total_amount),
        money(totals.total_earnings),
        money(totals.total_expenses),
        profit,
        margin,
    ]
}
