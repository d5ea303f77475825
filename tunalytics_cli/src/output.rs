use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::DateTime;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tunalytics_lib::{
    DailyRollup, DailyUserActivity, EntityRollup, OrderStats, PoolSnapshot, Record,
    TrackedWallet, WalletActivity,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => bail!(
                "unknown output format '{}'. Valid options: table, json, csv, markdown",
                other
            ),
        }
    }
}

#[derive(Tabled, Serialize)]
pub(crate) struct PeriodRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Total")]
    #[serde(rename = "Total")]
    total: String,
    #[tabled(rename = "Count")]
    #[serde(rename = "Count")]
    count: usize,
    #[tabled(rename = "SOL")]
    #[serde(rename = "SOL")]
    sol: String,
    #[tabled(rename = "USDC")]
    #[serde(rename = "USDC")]
    usdc: String,
}

#[derive(Tabled, Serialize)]
pub(crate) struct EntityRow {
    #[tabled(rename = "#")]
    #[serde(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Wallet")]
    #[serde(rename = "Wallet")]
    wallet: String,
    #[tabled(rename = "Label")]
    #[serde(rename = "Label")]
    label: String,
    #[tabled(rename = "Total")]
    #[serde(rename = "Total")]
    total: String,
    #[tabled(rename = "Share")]
    #[serde(rename = "Share")]
    share: String,
    #[tabled(rename = "Count")]
    #[serde(rename = "Count")]
    count: usize,
}

#[derive(Tabled, Serialize)]
pub(crate) struct CategoryRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Amount")]
    #[serde(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
    #[tabled(rename = "Share")]
    #[serde(rename = "Share")]
    share: String,
}

#[derive(Tabled, Serialize)]
pub(crate) struct OrderRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Pair")]
    #[serde(rename = "Pair")]
    pair: String,
    #[tabled(rename = "Side")]
    #[serde(rename = "Side")]
    side: String,
    #[tabled(rename = "Status")]
    #[serde(rename = "Status")]
    status: String,
    #[tabled(rename = "Size")]
    #[serde(rename = "Size")]
    size: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
    #[tabled(rename = "Owner")]
    #[serde(rename = "Owner")]
    owner: String,
}

#[derive(Tabled, Serialize)]
pub(crate) struct PairRow {
    #[tabled(rename = "Pair")]
    #[serde(rename = "Pair")]
    pair: String,
    #[tabled(rename = "Orders")]
    #[serde(rename = "Orders")]
    orders: usize,
    #[tabled(rename = "Open")]
    #[serde(rename = "Open")]
    open: usize,
    #[tabled(rename = "Filled")]
    #[serde(rename = "Filled")]
    filled: usize,
    #[tabled(rename = "Filled Volume")]
    #[serde(rename = "Filled Volume")]
    volume: String,
}

#[derive(Tabled, Serialize)]
pub(crate) struct PoolRow {
    #[tabled(rename = "Pool")]
    #[serde(rename = "Pool")]
    name: String,
    #[tabled(rename = "TVL")]
    #[serde(rename = "TVL")]
    tvl: String,
    #[tabled(rename = "Borrowed")]
    #[serde(rename = "Borrowed")]
    borrowed: String,
    #[tabled(rename = "Utilization")]
    #[serde(rename = "Utilization")]
    utilization: String,
    #[tabled(rename = "APY")]
    #[serde(rename = "APY")]
    apy: String,
    #[tabled(rename = "Volume 24h")]
    #[serde(rename = "Volume 24h")]
    volume: String,
}

#[derive(Tabled, Serialize)]
pub(crate) struct UserRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Unique")]
    #[serde(rename = "Unique")]
    unique: u64,
    #[tabled(rename = "New")]
    #[serde(rename = "New")]
    new: u64,
    #[tabled(rename = "Returning")]
    #[serde(rename = "Returning")]
    returning: u64,
    #[tabled(rename = "Transactions")]
    #[serde(rename = "Transactions")]
    transactions: u64,
}

#[derive(Tabled, Serialize)]
pub(crate) struct WalletRow {
    #[tabled(rename = "#")]
    #[serde(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Wallet")]
    #[serde(rename = "Wallet")]
    wallet: String,
    #[tabled(rename = "Volume")]
    #[serde(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Trades")]
    #[serde(rename = "Trades")]
    trades: u64,
    #[tabled(rename = "Last Active")]
    #[serde(rename = "Last Active")]
    last_active: String,
    #[tabled(rename = "Favorite")]
    #[serde(rename = "Favorite")]
    favorite: String,
}

#[derive(Tabled, Serialize)]
pub(crate) struct TrackedRow {
    #[tabled(rename = "Address")]
    #[serde(rename = "Address")]
    address: String,
    #[tabled(rename = "Label")]
    #[serde(rename = "Label")]
    label: String,
    #[tabled(rename = "Color")]
    #[serde(rename = "Color")]
    color: String,
}

// -- Row builders --

pub(crate) fn build_period_rows(rollup: &[DailyRollup]) -> Vec<PeriodRow> {
    rollup
        .iter()
        .map(|d| PeriodRow {
            date: d.date.clone(),
            total: format_usd(d.total),
            count: d.count,
            sol: format_amount(d.sol_amount),
            usdc: format_amount(d.usdc_amount),
        })
        .collect()
}

pub(crate) fn build_entity_rows(entities: &[EntityRollup]) -> Vec<EntityRow> {
    entities
        .iter()
        .enumerate()
        .map(|(i, e)| EntityRow {
            rank: i + 1,
            wallet: tunalytics_lib::short_address(&e.entity_id),
            label: e.label.clone().unwrap_or_default(),
            total: format_usd(e.total),
            share: format!("{:.1}%", e.percentage),
            count: e.count,
        })
        .collect()
}

/// One row per category across the whole rollup, largest value first.
pub(crate) fn build_category_rows(rollup: &[DailyRollup]) -> Vec<CategoryRow> {
    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for day in rollup {
        for (name, cat) in &day.categories {
            let entry = totals.entry(name.as_str()).or_default();
            entry.0 += cat.amount;
            entry.1 += cat.value;
        }
    }
    let grand: f64 = totals.values().map(|(_, value)| value).sum();
    let mut rows: Vec<(&str, f64, f64)> = totals
        .into_iter()
        .map(|(name, (amount, value))| (name, amount, value))
        .collect();
    rows.sort_by(|a, b| b.2.total_cmp(&a.2));
    rows.into_iter()
        .map(|(name, amount, value)| CategoryRow {
            name: name.to_string(),
            amount: format_amount(amount),
            value: format_usd(value),
            share: format!("{:.1}%", tunalytics_lib::percentage_of(value, grand)),
        })
        .collect()
}

pub(crate) fn build_order_rows(orders: &[Record]) -> Vec<OrderRow> {
    orders
        .iter()
        .map(|o| OrderRow {
            date: format_timestamp(o.timestamp),
            pair: o.pair.clone().unwrap_or_default(),
            side: o.side.clone().unwrap_or_default(),
            status: o.status.clone().unwrap_or_default(),
            size: format_amount(o.token_amount),
            value: format_usd(o.usd_value),
            owner: tunalytics_lib::short_address(&o.entity_id),
        })
        .collect()
}

pub(crate) fn build_pair_rows(stats: &BTreeMap<String, OrderStats>) -> Vec<PairRow> {
    stats
        .iter()
        .map(|(pair, s)| PairRow {
            pair: pair.clone(),
            orders: s.total_orders,
            open: s.open_orders,
            filled: s.filled_orders,
            volume: format_usd(s.total_volume),
        })
        .collect()
}

pub(crate) fn build_pool_rows(pools: &[PoolSnapshot]) -> Vec<PoolRow> {
    pools
        .iter()
        .map(|p| PoolRow {
            name: p.name.clone(),
            tvl: format_usd(p.tvl),
            borrowed: format_usd(p.total_borrowed),
            utilization: format!("{:.1}%", p.utilization_rate),
            apy: format!("{:.2}%", p.apy),
            volume: format_usd(p.volume_24h),
        })
        .collect()
}

pub(crate) fn build_user_rows(days: &[DailyUserActivity]) -> Vec<UserRow> {
    days.iter()
        .map(|d| UserRow {
            date: d.date.to_string(),
            unique: d.unique_users,
            new: d.new_users,
            returning: d.returning_users,
            transactions: d.total_transactions,
        })
        .collect()
}

pub(crate) fn build_wallet_rows(wallets: &[WalletActivity]) -> Vec<WalletRow> {
    wallets
        .iter()
        .enumerate()
        .map(|(i, w)| WalletRow {
            rank: i + 1,
            wallet: w.short_address.clone(),
            volume: format_usd(w.trade_volume),
            trades: w.trade_count,
            last_active: format_timestamp(w.last_active),
            favorite: w.favorite_token.clone().unwrap_or_default(),
        })
        .collect()
}

pub(crate) fn build_tracked_rows<'a>(
    wallets: impl IntoIterator<Item = &'a TrackedWallet>,
) -> Vec<TrackedRow> {
    wallets
        .into_iter()
        .map(|w| TrackedRow {
            address: w.address.clone(),
            label: w.label.clone(),
            color: w.color.clone(),
        })
        .collect()
}

// -- Emitters --

pub fn print_table<T: Tabled>(rows: Vec<T>) {
    println!("{}", Table::new(rows));
}

pub fn print_markdown<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Prints `rows` in the tabular formats, or `report` as JSON.
pub fn emit<T, R>(format: &OutputFormat, rows: Vec<T>, report: &R) -> Result<()>
where
    T: Tabled + Serialize,
    R: Serialize,
{
    match format {
        OutputFormat::Table => print_table(rows),
        OutputFormat::Markdown => print_markdown(rows),
        OutputFormat::Csv => print_csv(&rows)?,
        OutputFormat::Json => print_json(report),
    }
    Ok(())
}

// -- Formatting --

pub fn format_usd(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    if abs >= 1_000_000_000.0 {
        format!("{}${:.2}B", sign, abs / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{}${:.2}M", sign, abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{}${:.1}K", sign, abs / 1_000.0)
    } else {
        format!("{}${:.2}", sign, abs)
    }
}

pub fn format_amount(value: f64) -> String {
    if value.abs() >= 1_000.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

pub fn format_percentage(value: f64) -> String {
    if value > 0.0 {
        format!("+{:.1}%", value)
    } else {
        format!("{:.1}%", value)
    }
}

/// `YYYY-MM-DD HH:MM` in UTC, or the raw value if out of range.
pub fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
