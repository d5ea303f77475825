//! Maps loosely-typed upstream payloads onto the canonical model.
//!
//! The API is inconsistent about field names (`wallet` vs `borrower`,
//! `volume` vs `tradeVolume`, ...). Each function below takes the first
//! present alias for every canonical field and falls back to a fixed default
//! when none is present. Nothing past this module sees raw field names.

use chrono::NaiveDate;
use defituna_api::types::{
    RawLiquidation, RawOrder, RawPool, RawRevenue, RawTopWallet, RawTrackedWallet,
    RawUserActivity, RawUserMetrics,
};

use crate::entity::short_address;
use crate::error::AnalyticsError;
use crate::metrics::{safe_div, UserMetrics};
use crate::record::Record;
use crate::snapshot::{DailyUserActivity, PoolSnapshot, WalletActivity};
use crate::wallets::{TrackedWallets, WalletEntry};

fn join_pair(a: Option<&str>, b: Option<&str>, suffix: &str) -> Option<String> {
    match (a, b) {
        (Some(a), Some(b)) => Some(format!("{}/{}{}", a, b, suffix)),
        _ => None,
    }
}

/// Revenue inflow.
///
/// | canonical     | source       | default |
/// |---------------|--------------|---------|
/// | `timestamp`   | `timestamp`  | `0`     |
/// | `entity_id`   | `wallet`     | `""`    |
/// | `sol_amount`  | `solAmount`  | `0`     |
/// | `usdc_amount` | `usdcAmount` | `0`     |
///
/// `usd_value` is always `sol_amount * sol_price + usdc_amount`.
pub fn revenue(raw: &RawRevenue, sol_price: f64) -> Record {
    Record::revenue(
        raw.timestamp.unwrap_or(0),
        raw.wallet.clone().unwrap_or_default(),
        raw.sol_amount.unwrap_or(0.0),
        raw.usdc_amount.unwrap_or(0.0),
        sol_price,
    )
}

/// Liquidation event.
///
/// `entity_id` from `wallet | borrower` (`""`), `token_symbol` from
/// `tokenSymbol | "{tokenA}/{tokenB} LP"`, `token_amount` and `usd_value`
/// default to 0, `tx_id` from `txId | signature`.
pub fn liquidation(raw: &RawLiquidation) -> Record {
    let mut record = Record::new(
        raw.timestamp.unwrap_or(0),
        raw.wallet
            .clone()
            .or_else(|| raw.borrower.clone())
            .unwrap_or_default(),
    );
    record.token_symbol = raw
        .token_symbol
        .clone()
        .or_else(|| join_pair(raw.token_a.as_deref(), raw.token_b.as_deref(), " LP"));
    record.token_amount = raw.token_amount.unwrap_or(0.0);
    record.usd_value = raw.usd_value.unwrap_or(0.0);
    record.tx_id = raw.tx_id.clone().or_else(|| raw.signature.clone());
    record
}

/// Limit order.
///
/// `entity_id` from `owner | wallet`, `pair` from `pair | "{tokenA}/{tokenB}"`,
/// `side` defaults to `buy`, `token_amount` from `size | amount` (0),
/// `usd_value` from `usdValue | price * size`, `timestamp` defaults to
/// `fetched_at`, `status` defaults to `open`, `tx_id` from `orderId | id`.
pub fn order(raw: &RawOrder, fetched_at: i64) -> Record {
    let size = raw.size.or(raw.amount).unwrap_or(0.0);
    let price = raw.price.unwrap_or(0.0);
    let mut record = Record::new(
        raw.timestamp.unwrap_or(fetched_at),
        raw.owner
            .clone()
            .or_else(|| raw.wallet.clone())
            .unwrap_or_default(),
    );
    record.pair = raw
        .pair
        .clone()
        .or_else(|| join_pair(raw.token_a.as_deref(), raw.token_b.as_deref(), ""));
    record.side = Some(raw.side.clone().unwrap_or_else(|| "buy".to_string()));
    record.token_amount = size;
    record.usd_value = raw.usd_value.unwrap_or(price * size);
    record.status = Some(raw.status.clone().unwrap_or_else(|| "open".to_string()));
    record.tx_id = raw.order_id.clone().or_else(|| raw.id.clone());
    record
}

/// Lending pool snapshot. Utilization is derived from borrowed/supplied when
/// absent; TVL falls back to the supplied amount.
pub fn pool(raw: &RawPool) -> PoolSnapshot {
    let token_a = raw.token_a.clone().unwrap_or_default();
    let token_b = raw.token_b.clone().unwrap_or_default();
    let supplied = raw.total_supplied.or(raw.supplied).unwrap_or(0.0);
    let borrowed = raw.total_borrowed.or(raw.borrowed).unwrap_or(0.0);
    PoolSnapshot {
        pool_address: raw
            .address
            .clone()
            .or_else(|| raw.id.clone())
            .unwrap_or_default(),
        name: raw
            .name
            .clone()
            .unwrap_or_else(|| format!("{}/{} Pool", token_a, token_b)),
        token_a,
        token_b,
        total_supplied: supplied,
        total_borrowed: borrowed,
        utilization_rate: raw
            .utilization_rate
            .unwrap_or_else(|| safe_div(borrowed, supplied) * 100.0),
        apy: raw.apy.unwrap_or(0.0),
        volume_24h: raw.volume_24h.or(raw.volume).unwrap_or(0.0),
        tvl: raw.tvl.unwrap_or(supplied),
    }
}

/// One day of user activity. Rows without a parseable `YYYY-MM-DD` date are
/// dropped with a warning since they cannot be placed on the timeline.
pub fn user_activity(raw: &RawUserActivity) -> Option<DailyUserActivity> {
    let date = raw.date.as_deref().and_then(|d| {
        NaiveDate::parse_from_str(d.get(..10).unwrap_or(d), "%Y-%m-%d").ok()
    });
    let Some(date) = date else {
        tracing::warn!("Dropping user activity row with bad date {:?}", raw.date);
        return None;
    };
    Some(DailyUserActivity {
        date,
        unique_users: raw.unique_users.unwrap_or(0),
        new_users: raw.new_users.unwrap_or(0),
        returning_users: raw.returning_users.unwrap_or(0),
        total_transactions: raw.total_transactions.unwrap_or(0),
    })
}

/// Server-computed user metrics; every missing field is 0.
pub fn user_metrics(raw: &RawUserMetrics) -> UserMetrics {
    UserMetrics {
        dau: raw.dau.unwrap_or(0.0),
        wau: raw.wau.unwrap_or(0.0),
        mau: raw.mau.unwrap_or(0.0),
        retention_rate: raw.retention_rate.unwrap_or(0.0),
        average_transactions_per_user: raw.average_transactions_per_user.unwrap_or(0.0),
    }
}

/// Leaderboard wallet. `tradeVolume | volume`, `tradeCount | count`,
/// `lastActive | timestamp` (defaults to `fetched_at`), `favoriteToken | token`.
pub fn top_wallet(raw: &RawTopWallet, fetched_at: i64) -> WalletActivity {
    let address = raw.address.clone().unwrap_or_default();
    WalletActivity {
        short_address: short_address(&address),
        address,
        trade_volume: raw.trade_volume.or(raw.volume).unwrap_or(0.0),
        trade_count: raw.trade_count.or(raw.count).unwrap_or(0),
        last_active: raw.last_active.or(raw.timestamp).unwrap_or(fetched_at),
        favorite_token: raw.favorite_token.clone().or_else(|| raw.token.clone()),
    }
}

/// Tracked-wallet configuration from `/config/wallets`. Entries without an
/// address are skipped; missing labels and colors are filled by position.
pub fn tracked_wallets(raws: &[RawTrackedWallet]) -> Result<TrackedWallets, AnalyticsError> {
    let entries = raws
        .iter()
        .filter_map(|raw| match raw.address.as_deref() {
            Some(address) if !address.trim().is_empty() => Some(WalletEntry {
                address: address.to_string(),
                label: raw.label.clone(),
                color: raw.color.clone(),
            }),
            _ => {
                tracing::warn!("Skipping tracked wallet entry without an address");
                None
            }
        })
        .collect();
    TrackedWallets::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revenue_defaults_and_formula() {
        let raw = RawRevenue {
            timestamp: Some(1_704_110_400_000),
            wallet: None,
            sol_amount: Some(2.0),
            usdc_amount: None,
        };
        let r = revenue(&raw, 25.0);
        assert_eq!(r.entity_id, "");
        assert_eq!(r.usdc_amount, 0.0);
        assert_eq!(r.usd_value, 50.0);
        assert_eq!(revenue(&RawRevenue::default(), 25.0).timestamp, 0);
    }

    #[test]
    fn liquidation_aliases() {
        let raw = RawLiquidation {
            borrower: Some("B".into()),
            token_a: Some("BONK".into()),
            token_b: Some("SOL".into()),
            signature: Some("sig".into()),
            ..RawLiquidation::default()
        };
        let r = liquidation(&raw);
        assert_eq!(r.entity_id, "B");
        assert_eq!(r.token_symbol.as_deref(), Some("BONK/SOL LP"));
        assert_eq!(r.tx_id.as_deref(), Some("sig"));
        assert_eq!(r.usd_value, 0.0);

        let preferred = RawLiquidation {
            wallet: Some("W".into()),
            borrower: Some("B".into()),
            token_symbol: Some("SOL/USDC LP".into()),
            token_a: Some("X".into()),
            token_b: Some("Y".into()),
            ..RawLiquidation::default()
        };
        let r = liquidation(&preferred);
        assert_eq!(r.entity_id, "W");
        assert_eq!(r.token_symbol.as_deref(), Some("SOL/USDC LP"));
    }

    #[test]
    fn liquidation_without_token_info_has_no_symbol() {
        let raw = RawLiquidation {
            token_a: Some("SOL".into()),
            ..RawLiquidation::default()
        };
        assert_eq!(liquidation(&raw).token_symbol, None);
    }

    #[test]
    fn order_derives_value_and_defaults() {
        let raw = RawOrder {
            id: Some("o-2".into()),
            wallet: Some("W".into()),
            token_a: Some("ETH".into()),
            token_b: Some("USDC".into()),
            price: Some(2000.0),
            amount: Some(0.5),
            ..RawOrder::default()
        };
        let r = order(&raw, 99);
        assert_eq!(r.timestamp, 99);
        assert_eq!(r.entity_id, "W");
        assert_eq!(r.pair.as_deref(), Some("ETH/USDC"));
        assert_eq!(r.side.as_deref(), Some("buy"));
        assert_eq!(r.status.as_deref(), Some("open"));
        assert_eq!(r.token_amount, 0.5);
        assert_eq!(r.usd_value, 1000.0);
        assert_eq!(r.tx_id.as_deref(), Some("o-2"));
    }

    #[test]
    fn pool_derives_utilization() {
        let raw = RawPool {
            id: Some("p".into()),
            token_a: Some("SOL".into()),
            token_b: Some("USDC".into()),
            supplied: Some(200_000.0),
            borrowed: Some(50_000.0),
            volume: Some(12_000.0),
            ..RawPool::default()
        };
        let p = pool(&raw);
        assert_eq!(p.pool_address, "p");
        assert_eq!(p.name, "SOL/USDC Pool");
        assert_eq!(p.utilization_rate, 25.0);
        assert_eq!(p.volume_24h, 12_000.0);
        assert_eq!(p.tvl, 200_000.0);
        assert_eq!(pool(&RawPool::default()).utilization_rate, 0.0);
    }

    #[test]
    fn user_activity_requires_date() {
        let raw = RawUserActivity {
            date: Some("2024-01-02".into()),
            unique_users: Some(150),
            ..RawUserActivity::default()
        };
        let day = user_activity(&raw).unwrap();
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(day.total_transactions, 0);

        let with_time = RawUserActivity {
            date: Some("2024-01-02T00:00:00Z".into()),
            ..RawUserActivity::default()
        };
        assert!(user_activity(&with_time).is_some());
        assert!(user_activity(&RawUserActivity::default()).is_none());
        let bad = RawUserActivity {
            date: Some("yesterday".into()),
            ..RawUserActivity::default()
        };
        assert!(user_activity(&bad).is_none());
    }

    #[test]
    fn top_wallet_aliases() {
        let raw = RawTopWallet {
            address: Some("9j6dHYVg6jkWX2Ejp1i6M4HkzRqKtVdWfLNE9ZUhsUxM".into()),
            volume: Some(10.0),
            count: Some(3),
            token: Some("BONK".into()),
            ..RawTopWallet::default()
        };
        let w = top_wallet(&raw, 1234);
        assert_eq!(w.short_address, "9j6d...sUxM");
        assert_eq!(w.trade_volume, 10.0);
        assert_eq!(w.trade_count, 3);
        assert_eq!(w.last_active, 1234);
        assert_eq!(w.favorite_token.as_deref(), Some("BONK"));
    }

    #[test]
    fn tracked_wallets_fill_defaults_and_skip_blank() {
        let raws = vec![
            RawTrackedWallet {
                address: Some("A".into()),
                label: Some("Fees".into()),
                color: Some("#000000".into()),
            },
            RawTrackedWallet::default(),
            RawTrackedWallet {
                address: Some("B".into()),
                ..RawTrackedWallet::default()
            },
        ];
        let wallets = tracked_wallets(&raws).unwrap();
        assert_eq!(wallets.len(), 2);
        let b = wallets.get("B").unwrap();
        assert_eq!(b.label, "Wallet 2");
    }
}
