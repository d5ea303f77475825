use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use tunalytics_lib::{pool_summary, Origin, PoolSnapshot, PoolSummary};

use super::Context;
use crate::output::{build_pool_rows, emit, format_usd, OutputFormat};

#[derive(Args)]
pub struct PoolsArgs {
    /// Sort field: tvl, apy, utilization, volume
    #[arg(long, default_value = "tvl")]
    pub sort_by: String,
}

#[derive(Serialize)]
struct PoolsReport<'a> {
    origin: Origin,
    summary: PoolSummary,
    pools: &'a [PoolSnapshot],
}

fn sort_key(field: &str) -> Result<fn(&PoolSnapshot) -> f64> {
    let key: fn(&PoolSnapshot) -> f64 = match field.trim().to_lowercase().as_str() {
        "tvl" => |p: &PoolSnapshot| p.tvl,
        "apy" => |p: &PoolSnapshot| p.apy,
        "utilization" => |p: &PoolSnapshot| p.utilization_rate,
        "volume" => |p: &PoolSnapshot| p.volume_24h,
        other => bail!(
            "unknown sort field '{}'. Valid options: tvl, apy, utilization, volume",
            other
        ),
    };
    Ok(key)
}

pub async fn run(args: &PoolsArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let key = sort_key(&args.sort_by)?;

    let result = ctx.ingestor.pools().await?;
    let mut pools = result.data;
    pools.sort_by(|a, b| key(b).total_cmp(&key(a)));

    let summary = pool_summary(&pools);
    eprintln!(
        "{} pools ({} data): TVL {}, 24h volume {}, avg utilization {:.1}%",
        pools.len(),
        result.origin,
        format_usd(summary.total_tvl),
        format_usd(summary.total_volume),
        summary.average_utilization,
    );

    let report = PoolsReport {
        origin: result.origin,
        summary,
        pools: &pools,
    };
    emit(format, build_pool_rows(&pools), &report)
}
