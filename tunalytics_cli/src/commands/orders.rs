use std::collections::BTreeMap;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tunalytics_lib::metrics::orders_by_pair;
use tunalytics_lib::validation;
use tunalytics_lib::{
    aggregate_by_period, compute_metrics, order_stats, resolve_range, Dataset, Granularity,
    OrderStats, Origin, Record, RollupConfig, TimeRange,
};

use super::{print_metrics_summary, Context, PeriodReport};
use crate::output::{
    build_order_rows, build_pair_rows, build_period_rows, emit, format_usd, OutputFormat,
};

#[derive(Args)]
pub struct OrdersArgs {
    /// Time range: day, week, month, year, all, 7d, 30d, 90d
    #[arg(long, default_value = "7d")]
    pub range: String,

    /// Filter by status: open, filled, canceled
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by trading pair (e.g. SOL/USDC)
    #[arg(long)]
    pub pair: Option<String>,

    /// Filter by side: buy, sell
    #[arg(long)]
    pub side: Option<String>,

    /// Group by: order, pair, day, week, month
    #[arg(long, default_value = "order")]
    pub by: String,
}

#[derive(Serialize)]
struct OrdersReport<'a> {
    range: TimeRange,
    origin: Origin,
    stats: OrderStats,
    orders: &'a [Record],
}

#[derive(Serialize)]
struct PairReport<'a> {
    range: TimeRange,
    origin: Origin,
    pairs: &'a BTreeMap<String, OrderStats>,
}

/// Status with the same defaults the order stats use: missing is open.
fn normalized_status(order: &Record) -> String {
    match order.status.as_deref().map(str::to_lowercase).as_deref() {
        None => "open".to_string(),
        Some("cancelled") => "canceled".to_string(),
        Some(other) => other.to_string(),
    }
}

struct OrderFilter {
    status: Option<String>,
    pair: Option<String>,
    side: Option<String>,
}

impl OrderFilter {
    fn from_args(args: &OrdersArgs) -> Result<Self> {
        Ok(Self {
            status: args
                .status
                .as_deref()
                .map(validation::validate_status)
                .transpose()?,
            pair: args.pair.as_deref().map(validation::validate_pair).transpose()?,
            side: args.side.as_deref().map(validation::validate_side).transpose()?,
        })
    }

    fn matches(&self, order: &Record) -> bool {
        if let Some(status) = &self.status {
            if normalized_status(order) != *status {
                return false;
            }
        }
        if let Some(pair) = &self.pair {
            if order.pair.as_deref().map(str::to_uppercase).as_ref() != Some(pair) {
                return false;
            }
        }
        if let Some(side) = &self.side {
            if order.side.as_deref().map(str::to_lowercase).as_ref() != Some(side) {
                return false;
            }
        }
        true
    }
}

pub async fn run(args: &OrdersArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let range = validation::validate_range(&args.range)?;
    let filter = OrderFilter::from_args(args)?;
    let window = resolve_range(range, ctx.now);

    let result = ctx.ingestor.records(Dataset::Orders, &window).await?;
    let mut orders: Vec<Record> = result
        .data
        .into_iter()
        .filter(|o| filter.matches(o))
        .collect();
    orders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let stats = order_stats(&orders);
    eprintln!(
        "{} orders over {} ({} data): {} open, {} filled, {} canceled, filled volume {} (avg {})",
        stats.total_orders,
        range,
        result.origin,
        stats.open_orders,
        stats.filled_orders,
        stats.canceled_orders,
        format_usd(stats.total_volume),
        format_usd(stats.average_order_size),
    );

    match args.by.trim().to_lowercase().as_str() {
        "order" => {
            let report = OrdersReport {
                range,
                origin: result.origin,
                stats,
                orders: &orders,
            };
            emit(format, build_order_rows(&orders), &report)
        }
        "pair" => {
            let pairs: BTreeMap<String, OrderStats> = orders_by_pair(&orders)
                .into_iter()
                .map(|(pair, group)| {
                    let group: Vec<Record> = group.into_iter().cloned().collect();
                    (pair, order_stats(&group))
                })
                .collect();
            let report = PairReport {
                range,
                origin: result.origin,
                pairs: &pairs,
            };
            emit(format, build_pair_rows(&pairs), &report)
        }
        other => {
            let granularity: Granularity = other.parse().map_err(|_| {
                anyhow::anyhow!(
                    "unknown grouping '{}'. Valid options: order, pair, day, week, month",
                    args.by
                )
            })?;
            let rollup = aggregate_by_period(&orders, &RollupConfig::orders(), granularity);
            let metrics = compute_metrics(&rollup, granularity.periods_in(&window));
            print_metrics_summary("Order value", range, result.origin, &metrics);
            let report = PeriodReport {
                range,
                window,
                granularity,
                origin: result.origin,
                metrics,
                periods: &rollup,
            };
            emit(format, build_period_rows(&rollup), &report)
        }
    }
}
