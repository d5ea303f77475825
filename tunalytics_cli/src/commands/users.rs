use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tunalytics_lib::validation;
use tunalytics_lib::{
    resolve_range, user_metrics, DailyUserActivity, Origin, TimeRange, UserMetrics,
};

use super::Context;
use crate::output::{build_user_rows, emit, OutputFormat};

#[derive(Args)]
pub struct UsersArgs {
    /// Time range: day, week, month, year, all, 7d, 30d, 90d
    #[arg(long, default_value = "30d")]
    pub range: String,

    /// Show the metrics the API reports instead of computing them from the
    /// daily activity
    #[arg(long)]
    pub reported: bool,
}

#[derive(Serialize)]
struct UsersReport<'a> {
    range: TimeRange,
    origin: Origin,
    metrics: UserMetrics,
    days: &'a [DailyUserActivity],
}

pub async fn run(args: &UsersArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let range = validation::validate_range(&args.range)?;
    let window = resolve_range(range, ctx.now);

    let activity = ctx.ingestor.user_activity(&window).await?;
    let metrics = if args.reported {
        ctx.ingestor.user_metrics().await?.data
    } else {
        user_metrics(&activity.data)
    };

    eprintln!(
        "Users over {} ({} data): DAU {:.0}, WAU {:.0}, MAU {:.0}, retention {:.1}%, {:.2} tx/user",
        range,
        activity.origin,
        metrics.dau,
        metrics.wau,
        metrics.mau,
        metrics.retention_rate,
        metrics.average_transactions_per_user,
    );

    let report = UsersReport {
        range,
        origin: activity.origin,
        metrics,
        days: &activity.data,
    };
    emit(format, build_user_rows(&activity.data), &report)
}
