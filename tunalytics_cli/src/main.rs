mod commands;
mod output;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tunalytics_lib::{
    Config, Environment, HttpSource, Ingestor, MockSource, TrackedWallets,
};

use crate::commands::Context;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "tunalytics")]
#[command(about = "Aggregate DeFi Tuna protocol revenue, liquidations, orders and usage")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Use generated data instead of the live API
    #[arg(long, global = true)]
    mock: bool,

    /// Seed for generated data (reproducible output)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Environment: production or development (overrides TUNA_ENV)
    #[arg(long, global = true)]
    env: Option<String>,

    /// Analytics API base URL (overrides TUNA_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// YAML file listing tracked wallets (overrides TUNA_WALLETS_FILE)
    #[arg(long, global = true)]
    wallets_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Protocol revenue by period or by wallet
    Revenue(commands::revenue::RevenueArgs),
    /// Liquidations by period, wallet or token
    Liquidations(commands::liquidations::LiquidationsArgs),
    /// Limit orders with status, pair and side filters
    Orders(commands::orders::OrdersArgs),
    /// Lending pool snapshots
    Pools(commands::pools::PoolsArgs),
    /// Daily active users and retention
    Users(commands::users::UsersArgs),
    /// Trading-volume leaderboard or the tracked wallets
    Wallets(commands::wallets::WalletsArgs),
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(env) = &cli.env {
        config.environment = env.parse::<Environment>()?;
    }
    if let Some(base) = &cli.api_base {
        config.api_base = base.clone();
    }
    if let Some(path) = &cli.wallets_file {
        config.wallets_file = Some(path.clone());
    }
    Ok(config)
}

/// Wires the data source, fallback and tracked wallets for this run.
async fn build_context(cli: &Cli, config: &Config) -> Result<Context> {
    let now = Utc::now();

    let file_wallets = match &config.wallets_file {
        Some(path) => Some(
            TrackedWallets::from_file(path)
                .with_context(|| format!("loading wallets from {}", path.display()))?,
        ),
        None => None,
    };
    let configured = match &file_wallets {
        Some(wallets) => wallets.clone(),
        None => TrackedWallets::builtin()?,
    };

    let mock = MockSource::new(cli.seed, now, configured.clone());
    let mut ingestor = if cli.mock {
        Ingestor::new(Box::new(mock), config.environment)
    } else {
        Ingestor::new(Box::new(HttpSource::from_config(config)), config.environment)
            .with_fallback(Box::new(mock))
    };
    if let Some(start) = config.protocol_start {
        ingestor = ingestor.with_protocol_start(start);
    }

    let wallets = match file_wallets {
        Some(wallets) => wallets,
        None => ingestor.tracked_wallets(configured).await,
    };

    Ok(Context {
        ingestor,
        wallets,
        now,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tunalytics=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format: OutputFormat = cli.output.parse()?;
    let config = load_config(&cli)?;
    tracing::debug!("Running against {} ({})", config.api_base, config.environment);

    let ctx = build_context(&cli, &config).await?;

    match &cli.command {
        Commands::Revenue(args) => commands::revenue::run(args, &ctx, &format).await?,
        Commands::Liquidations(args) => commands::liquidations::run(args, &ctx, &format).await?,
        Commands::Orders(args) => commands::orders::run(args, &ctx, &format).await?,
        Commands::Pools(args) => commands::pools::run(args, &ctx, &format).await?,
        Commands::Users(args) => commands::users::run(args, &ctx, &format).await?,
        Commands::Wallets(args) => commands::wallets::run(args, &ctx, &format).await?,
    }

    Ok(())
}
