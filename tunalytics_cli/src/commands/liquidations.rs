use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tunalytics_lib::metrics::{top_category, CategoryLeader};
use tunalytics_lib::validation;
use tunalytics_lib::{
    aggregate_by_entity, aggregate_by_period, aggregate_daily, compute_metrics, resolve_range,
    top_entities, DailyRollup, Dataset, Origin, RollupConfig, TimeRange, ValueField,
};

use super::{parse_grouping, print_metrics_summary, Context, Grouping, PeriodReport};
use crate::output::{
    build_category_rows, build_entity_rows, build_period_rows, emit, format_usd, OutputFormat,
};

#[derive(Args)]
pub struct LiquidationsArgs {
    /// Time range: day, week, month, year, all, 7d, 30d, 90d
    #[arg(long, default_value = "30d")]
    pub range: String,

    /// Group by: day, week, month, wallet, token
    #[arg(long, default_value = "day")]
    pub by: String,

    /// Number of wallets to show when grouping by wallet
    #[arg(long, default_value = "10")]
    pub top: usize,
}

#[derive(Serialize)]
struct TokenReport<'a> {
    range: TimeRange,
    origin: Origin,
    top_token: Option<CategoryLeader>,
    periods: &'a [DailyRollup],
}

pub async fn run(args: &LiquidationsArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let range = validation::validate_range(&args.range)?;
    let grouping = parse_grouping(&args.by, Some("token"))?;
    let window = resolve_range(range, ctx.now);

    let result = ctx.ingestor.records(Dataset::Liquidations, &window).await?;
    let config = RollupConfig::liquidations();

    match grouping {
        Grouping::Period(granularity) => {
            let rollup = aggregate_by_period(&result.data, &config, granularity);
            let metrics = compute_metrics(&rollup, granularity.periods_in(&window));
            print_metrics_summary("Liquidations", range, result.origin, &metrics);
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
        Grouping::Category => {
            let rollup = aggregate_daily(&result.data, &config);
            let top_token = top_category(&rollup);
            match &top_token {
                Some(leader) => eprintln!(
                    "Liquidations over {} ({} data): most liquidated {} ({})",
                    range,
                    result.origin,
                    leader.name,
                    format_usd(leader.value)
                ),
                None => eprintln!(
                    "Liquidations over {} ({} data): none",
                    range, result.origin
                ),
            }
            let report = TokenReport {
                range,
                origin: result.origin,
                top_token,
                periods: &rollup,
            };
            emit(format, build_category_rows(&rollup), &report)
        }
        Grouping::Wallet => {
            let top = validation::validate_top(args.top)?;
            let entities = aggregate_by_entity(&result.data, &ctx.wallets, ValueField::UsdValue);
            let shown = top_entities(&entities, top);
            eprintln!(
                "Liquidations over {} ({} data): {} wallets affected",
                range,
                result.origin,
                entities.iter().filter(|e| e.count > 0).count()
            );
            emit(format, build_entity_rows(shown), &shown)
        }
    }
}
