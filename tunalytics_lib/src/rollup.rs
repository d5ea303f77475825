//! Period rollups: folds timestamped records into one entry per UTC day
//! (or ISO week, or calendar month).
//!
//! [`RollupConfig`] names the value and category fields explicitly, so one
//! implementation serves revenue, liquidations and orders.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::range::DateRange;
use crate::record::{CategoryField, Record, ValueField, UNKNOWN_CATEGORY};

/// Width of a rollup bucket. Buckets are aligned to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    /// ISO week, labelled by its Monday.
    Week,
    Month,
}

impl Granularity {
    /// First day of the bucket containing `at`.
    pub fn bucket_start(&self, at: DateTime<Utc>) -> NaiveDate {
        let day = at.date_naive();
        match self {
            Granularity::Day => day,
            Granularity::Week => {
                day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
            }
            Granularity::Month => day.with_day(1).unwrap_or(day),
        }
    }

    /// Number of periods `window` spans, the divisor for per-period averages.
    ///
    /// For days this is the window length in days. For weeks and months it
    /// counts every ISO week or calendar month the window touches, so a
    /// partial bucket at either edge counts as one period.
    pub fn periods_in(&self, window: &DateRange) -> usize {
        if window.end <= window.start {
            return 0;
        }
        let first = self.bucket_start(window.start);
        let last = self.bucket_start(window.end - Duration::milliseconds(1));
        match self {
            Granularity::Day => window.period_days(),
            Granularity::Week => ((last - first).num_days() / 7 + 1) as usize,
            Granularity::Month => {
                let months = (last.year() - first.year()) * 12 + last.month() as i32
                    - first.month() as i32;
                (months + 1) as usize
            }
        }
    }

    fn label(&self, start: NaiveDate) -> String {
        match self {
            Granularity::Day | Granularity::Week => start.format("%Y-%m-%d").to_string(),
            Granularity::Month => start.format("%Y-%m").to_string(),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            other => Err(format!(
                "unknown granularity '{}'. Valid options: day, week, month",
                other
            )),
        }
    }
}

/// Which record fields a rollup sums and breaks down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollupConfig {
    /// Field accumulated into [`DailyRollup::total`] and category values.
    pub value: ValueField,
    /// Optional categorical field for the nested per-category breakdown.
    pub category: Option<CategoryField>,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self::revenue()
    }
}

impl RollupConfig {
    /// Revenue inflows: USD value, no breakdown.
    pub fn revenue() -> Self {
        Self {
            value: ValueField::UsdValue,
            category: None,
        }
    }

    /// Liquidations: USD value broken down by token.
    pub fn liquidations() -> Self {
        Self {
            value: ValueField::UsdValue,
            category: Some(CategoryField::TokenSymbol),
        }
    }

    /// Limit orders: USD value broken down by trading pair.
    pub fn orders() -> Self {
        Self {
            value: ValueField::UsdValue,
            category: Some(CategoryField::Pair),
        }
    }
}

/// Per-category accumulator nested inside a [`DailyRollup`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CategoryTotals {
    /// Sum of `token_amount`.
    pub amount: f64,
    /// Sum of the configured value field.
    pub value: f64,
}

/// Accumulated totals for one period.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DailyRollup {
    /// `YYYY-MM-DD` for day and week buckets, `YYYY-MM` for month buckets.
    pub date: String,
    pub total: f64,
    pub count: usize,
    pub sol_amount: f64,
    pub usdc_amount: f64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, CategoryTotals>,
}

/// Folds `records` into one rollup per UTC calendar day, ascending by date.
///
/// Totals and counts are conserved for every record chrono can place on a
/// date (roughly ±262,000 years around the epoch). Records outside that span
/// are skipped with a warning; windowed input from [`crate::ingest::Ingestor`]
/// never contains them.
pub fn aggregate_daily(records: &[Record], config: &RollupConfig) -> Vec<DailyRollup> {
    aggregate_by_period(records, config, Granularity::Day)
}

/// Folds `records` into one rollup per bucket of `granularity`, ascending.
///
/// Records whose timestamp cannot be represented as a date are skipped, so
/// conservation holds over the representable records only.
pub fn aggregate_by_period(
    records: &[Record],
    config: &RollupConfig,
    granularity: Granularity,
) -> Vec<DailyRollup> {
    let mut buckets: BTreeMap<NaiveDate, DailyRollup> = BTreeMap::new();

    for record in records {
        let Some(at) = record.datetime() else {
            tracing::warn!(
                "Skipping record with unrepresentable timestamp {} (entity {})",
                record.timestamp,
                record.entity_id
            );
            continue;
        };
        let start = granularity.bucket_start(at);
        let entry = buckets.entry(start).or_insert_with(|| DailyRollup {
            date: granularity.label(start),
            ..DailyRollup::default()
        });

        let value = record.value(config.value);
        entry.total += value;
        entry.count += 1;
        entry.sol_amount += record.sol_amount;
        entry.usdc_amount += record.usdc_amount;

        if let Some(field) = config.category {
            let name = record.category(field).unwrap_or(UNKNOWN_CATEGORY);
            let slot = entry.categories.entry(name.to_string()).or_default();
            slot.amount += record.token_amount;
            slot.value += value;
        }
    }

    buckets.into_values().collect()
}
