use std::{collections::HashMap, fmt, sync::Arc};

use serde::Serialize;
use tracing::debug;

use super::earnings::{compute_earnings, EarningsConfig};
use crate::domain::FinancialRecord;
use crate::errors::{ensure_finite, Result};

const POLICY_SCOPE: &str = "expense policy";
const TOTALS_SCOPE: &str = "grand totals";
const UNGROUPED_SCOPE: &str = "ungrouped totals";

type RatioFn = dyn Fn(&FinancialRecord) -> f64 + Send + Sync;
type KeyFn = dyn Fn(&FinancialRecord) -> Option<String> + Send + Sync;

/// How operating expenses are attributed when computing profit.
#[derive(Clone, Default)]
pub enum ExpensePolicy {
    #[default]
    None,
    /// A total for the whole record set. Groups receive a share in
    /// proportion to their amount.
    Fixed(f64),
    /// The same fraction of every record's amount, e.g. `0.33`.
    Ratio(f64),
    /// A fraction of the amount chosen per record.
    PerRecord(Arc<RatioFn>),
}

impl ExpensePolicy {
    pub fn per_record<F>(ratio: F) -> Self
    where
        F: Fn(&FinancialRecord) -> f64 + Send + Sync + 'static,
    {
        ExpensePolicy::PerRecord(Arc::new(ratio))
    }

    fn record_expense(&self, record: &FinancialRecord, amount: f64) -> Result<f64> {
        match self {
            ExpensePolicy::None | ExpensePolicy::Fixed(_) => Ok(0.0),
            ExpensePolicy::Ratio(ratio) => Ok(amount * ratio),
            ExpensePolicy::PerRecord(ratio) => {
                let ratio = ensure_finite(ratio(record), "expense_ratio", &record.id)?;
                Ok(amount * ratio)
            }
        }
    }
}

impl fmt::Debug for ExpensePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpensePolicy::None => f.write_str("None"),
            ExpensePolicy::Fixed(total) => f.debug_tuple("Fixed").field(total).finish(),
            ExpensePolicy::Ratio(ratio) => f.debug_tuple("Ratio").field(ratio).finish(),
            ExpensePolicy::PerRecord(_) => f.write_str("PerRecord(..)"),
        }
    }
}

/// Selects the key a record is rolled up under.
#[derive(Clone)]
pub enum GroupBy {
    GroupKey,
    Status,
    /// A named text field, see [`FinancialRecord::text_field`].
    Field(String),
    Custom(Arc<KeyFn>),
}

impl GroupBy {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "group" | "group_key" => GroupBy::GroupKey,
            "status" => GroupBy::Status,
            other => GroupBy::Field(other.to_string()),
        }
    }

    pub fn custom<F>(key: F) -> Self
    where
        F: Fn(&FinancialRecord) -> Option<String> + Send + Sync + 'static,
    {
        GroupBy::Custom(Arc::new(key))
    }

    fn key_for(&self, record: &FinancialRecord) -> Option<String> {
        match self {
            GroupBy::GroupKey => record.group_key.clone(),
            GroupBy::Status => record.status.clone(),
            GroupBy::Field(name) => record.text_field(name).map(str::to_string),
            GroupBy::Custom(key) => key(record),
        }
    }
}

impl fmt::Debug for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupBy::GroupKey => f.write_str("GroupKey"),
            GroupBy::Status => f.write_str("Status"),
            GroupBy::Field(name) => f.debug_tuple("Field").field(name).finish(),
            GroupBy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AggregateOptions {
    pub earnings: EarningsConfig,
    pub expenses: ExpensePolicy,
    pub group_by: Option<GroupBy>,
}

impl AggregateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn earnings(mut self, earnings: EarningsConfig) -> Self {
        self.earnings = earnings;
        self
    }

    pub fn expenses(mut self, expenses: ExpensePolicy) -> Self {
        self.expenses = expenses;
        self
    }

    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }
}

/// Revenue, cost, and profit figures for a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub record_count: usize,
    pub total_amount: f64,
    pub total_earnings: f64,
    pub total_expenses: f64,
    pub total_profit: f64,
    /// Profit as a percentage of amount; `0` when the amount is zero.
    pub margin_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotals {
    /// `None` collects records the selector found no key for.
    pub key: Option<String>,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub totals: Totals,
    /// One entry per distinct key, in first-seen order. Empty unless a
    /// [`GroupBy`] was requested.
    pub by_group: Vec<GroupTotals>,
}

impl AggregateResult {
    pub fn group(&self, key: Option<&str>) -> Option<&Totals> {
        self.by_group
            .iter()
            .find(|group| group.key.as_deref() == key)
            .map(|group| &group.totals)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    count: usize,
    amount: f64,
    earnings: f64,
    expenses: f64,
}

impl Accumulator {
    fn add(&mut self, amount: f64, earnings: f64, expenses: f64) {
        self.count += 1;
        self.amount += amount;
        self.earnings += earnings;
        self.expenses += expenses;
    }

    /// Sums of finite inputs can still overflow; `scope` names the
    /// totals in the resulting error.
    fn finish(self, scope: &str) -> Result<Totals> {
        let amount = ensure_finite(self.amount, "total_amount", scope)?;
        let earnings = ensure_finite(self.earnings, "total_earnings", scope)?;
        let expenses = ensure_finite(self.expenses, "total_expenses", scope)?;
        let profit = ensure_finite(amount - earnings - expenses, "total_profit", scope)?;
        let margin_percent = if amount > 0.0 {
            ensure_finite(profit / amount * 100.0, "margin_percent", scope)?
        } else {
            0.0
        };
        Ok(Totals {
            record_count: self.count,
            total_amount: amount,
            total_earnings: earnings,
            total_expenses: expenses,
            total_profit: profit,
            margin_percent,
        })
    }
}

/// Rolls up `records` into grand totals and, when requested, per-group totals.
///
/// Any non-finite amount, rate, or expense figure fails the whole call.
pub fn aggregate<'a, I>(records: I, options: &AggregateOptions) -> Result<AggregateResult>
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    let fixed_expenses = match &options.expenses {
        ExpensePolicy::Fixed(total) => Some(ensure_finite(*total, "fixed_expenses", POLICY_SCOPE)?),
        ExpensePolicy::Ratio(ratio) => {
            ensure_finite(*ratio, "expense_ratio", POLICY_SCOPE)?;
            None
        }
        _ => None,
    };

    let mut grand = Accumulator::default();
    let mut groups: Vec<(Option<String>, Accumulator)> = Vec::new();
    let mut slots: HashMap<Option<String>, usize> = HashMap::new();

    for record in records {
        let amount = ensure_finite(record.amount, "amount", &record.id)?;
        let earnings = compute_earnings(record, &options.earnings)?;
        let expenses = options.expenses.record_expense(record, amount)?;
        grand.add(amount, earnings, expenses);

        if let Some(group_by) = &options.group_by {
            let key = group_by.key_for(record);
            let slot = match slots.get(&key) {
                Some(slot) => *slot,
                None => {
                    slots.insert(key.clone(), groups.len());
                    groups.push((key, Accumulator::default()));
                    groups.len() - 1
                }
            };
            groups[slot].1.add(amount, earnings, expenses);
        }
    }

    if let Some(total) = fixed_expenses {
        grand.expenses = total;
        for (_, group) in groups.iter_mut() {
            group.expenses = total * allocation_share(group, &grand);
        }
    }

    debug!(
        records = grand.count,
        groups = groups.len(),
        "aggregated financial records"
    );

    let by_group = groups
        .into_iter()
        .map(|(key, group)| {
            let totals = group.finish(key.as_deref().unwrap_or(UNGROUPED_SCOPE))?;
            Ok(GroupTotals { key, totals })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AggregateResult {
        totals: grand.finish(TOTALS_SCOPE)?,
        by_group,
    })
}

/// Share of a fixed expense carried by `group`: by amount, or by record
/// count when the set has no amount at all.
fn allocation_share(group: &Accumulator, grand: &Accumulator) -> f64 {
    if grand.amount > 0.0 {
        group.amount / grand.amount
    } else if grand.count > 0 {
        group.count as f64 / grand.count as f64
    } else {
        0.0
    }
}
