use anyhow::{bail, Result};
use clap::Args;
use tunalytics_lib::validation;
use tunalytics_lib::{
    aggregate_by_entity, aggregate_by_period, compute_metrics, resolve_range, top_entities,
    Dataset, RollupConfig, ValueField,
};

use super::{parse_grouping, print_metrics_summary, Context, Grouping, PeriodReport};
use crate::output::{build_entity_rows, build_period_rows, emit, format_usd, OutputFormat};

#[derive(Args)]
pub struct RevenueArgs {
    /// Time range: day, week, month, year, all, 7d, 30d, 90d
    #[arg(long, default_value = "30d")]
    pub range: String,

    /// Group by: day, week, month, wallet
    #[arg(long, default_value = "day")]
    pub by: String,

    /// Number of wallets to show when grouping by wallet
    #[arg(long, default_value = "10")]
    pub top: usize,
}

pub async fn run(args: &RevenueArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let range = validation::validate_range(&args.range)?;
    let grouping = parse_grouping(&args.by, None)?;
    let window = resolve_range(range, ctx.now);

    let result = ctx.ingestor.records(Dataset::Revenue, &window).await?;

    match grouping {
        Grouping::Period(granularity) => {
            let rollup = aggregate_by_period(&result.data, &RollupConfig::revenue(), granularity);
            let metrics = compute_metrics(&rollup, granularity.periods_in(&window));
            print_metrics_summary("Revenue", range, result.origin, &metrics);
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
        Grouping::Wallet => {
            let top = validation::validate_top(args.top)?;
            let entities = aggregate_by_entity(&result.data, &ctx.wallets, ValueField::UsdValue);
            let total: f64 = entities.iter().map(|e| e.total).sum();
            let shown = top_entities(&entities, top);
            eprintln!(
                "Revenue over {} ({} data): {} across {} wallets",
                range,
                result.origin,
                format_usd(total),
                entities.len()
            );
            emit(format, build_entity_rows(shown), &shown)
        }
        Grouping::Category => bail!("revenue has no category breakdown"),
    }
}
