use anyhow::Result;
use clap::Args;
use tunalytics_lib::validation;
use tunalytics_lib::{filter_by_range, resolve_range};

use super::Context;
use crate::output::{build_tracked_rows, build_wallet_rows, emit, format_usd, OutputFormat};

#[derive(Args)]
pub struct WalletsArgs {
    /// Number of wallets on the leaderboard (1-100)
    #[arg(long, default_value = "10")]
    pub limit: u32,

    /// Only keep wallets last active within this range
    #[arg(long)]
    pub range: Option<String>,

    /// List the tracked wallets instead of the leaderboard
    #[arg(long)]
    pub tracked: bool,
}

pub async fn run(args: &WalletsArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    if args.tracked {
        eprintln!("{} tracked wallets", ctx.wallets.len());
        return emit(format, build_tracked_rows(&ctx.wallets), &ctx.wallets);
    }

    let limit = validation::validate_limit(args.limit)?;
    let range = args
        .range
        .as_deref()
        .map(validation::validate_range)
        .transpose()?;

    let result = ctx.ingestor.top_wallets(limit).await?;
    let wallets = match range {
        Some(range) => filter_by_range(&result.data, &resolve_range(range, ctx.now)),
        None => result.data,
    };

    let volume: f64 = wallets.iter().map(|w| w.trade_volume).sum();
    eprintln!(
        "Top {} wallets ({} data): {} combined volume",
        wallets.len(),
        result.origin,
        format_usd(volume)
    );

    emit(format, build_wallet_rows(&wallets), &wallets)
}
