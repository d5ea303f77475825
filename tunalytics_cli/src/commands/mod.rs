//! CLI subcommand implementations.

pub mod liquidations;
pub mod orders;
pub mod pools;
pub mod revenue;
pub mod users;
pub mod wallets;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tunalytics_lib::{
    DailyRollup, DateRange, Granularity, Ingestor, Metrics, Origin, TimeRange, TrackedWallets,
};

use crate::output::{format_percentage, format_usd};

/// Everything a subcommand needs, built once in `main`.
pub struct Context {
    pub ingestor: Ingestor,
    pub wallets: TrackedWallets,
    pub now: DateTime<Utc>,
}

/// How a record-based subcommand groups its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Period(Granularity),
    Wallet,
    Category,
}

/// Parses a `--by` value. `category` names the breakdown this subcommand
/// supports, if any (e.g. `token` for liquidations).
pub fn parse_grouping(input: &str, category: Option<&str>) -> Result<Grouping> {
    let value = input.trim().to_lowercase();
    if value == "wallet" {
        return Ok(Grouping::Wallet);
    }
    if Some(value.as_str()) == category {
        return Ok(Grouping::Category);
    }
    match value.parse::<Granularity>() {
        Ok(granularity) => Ok(Grouping::Period(granularity)),
        Err(_) => {
            let mut valid = vec!["day", "week", "month", "wallet"];
            valid.extend(category);
            bail!(
                "unknown grouping '{}'. Valid options: {}",
                input,
                valid.join(", ")
            )
        }
    }
}

/// JSON shape for period rollups.
#[derive(Serialize)]
pub struct PeriodReport<'a> {
    pub range: TimeRange,
    pub window: DateRange,
    pub granularity: Granularity,
    pub origin: Origin,
    pub metrics: Metrics,
    pub periods: &'a [DailyRollup],
}

pub fn print_metrics_summary(label: &str, range: TimeRange, origin: Origin, metrics: &Metrics) {
    eprintln!(
        "{} over {} ({} data): total {}, avg {}/period, trailing {}, growth {}",
        label,
        range,
        origin,
        format_usd(metrics.total),
        format_usd(metrics.average_per_period),
        format_usd(metrics.trailing_average),
        format_percentage(metrics.growth_percentage),
    );
    if !metrics.top_period.date.is_empty() {
        eprintln!(
            "Top period: {} ({})",
            metrics.top_period.date,
            format_usd(metrics.top_period.total)
        );
    }
}
