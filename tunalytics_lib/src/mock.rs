//! Synthetic data for development and tests.
//!
//! Amounts are random but every generated event is internally consistent
//! (revenue `usd_value` follows [`usd_value_of`] at [`MOCK_SOL_PRICE`]) and
//! date coverage is gapless: a `days`-long series populates each of the
//! `days` UTC dates ending at `now`. A fixed seed reproduces the same data.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::entity::short_address;
use crate::record::{usd_value_of, Record};
use crate::snapshot::{DailyUserActivity, PoolSnapshot, WalletActivity};
use crate::wallets::TrackedWallets;

/// SOL price used for all generated revenue.
pub const MOCK_SOL_PRICE: f64 = 20.0;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

const LIQUIDATION_TOKENS: [&str; 5] = [
    "SOL/USDC LP",
    "ETH/USDC LP",
    "BTC/USDC LP",
    "BONK/SOL LP",
    "RAY/SOL LP",
];

const ORDER_PAIRS: [&str; 5] = ["SOL/USDC", "ETH/USDC", "BTC/USDC", "BONK/USDC", "RAY/USDC"];

const ORDER_STATUSES: [&str; 3] = ["open", "filled", "canceled"];

const POOL_TOKENS: [(&str, &str); 5] = [
    ("SOL", "USDC"),
    ("ETH", "USDC"),
    ("BTC", "USDC"),
    ("BONK", "SOL"),
    ("RAY", "SOL"),
];

const WALLET_TOKENS: [&str; 6] = ["SOL", "USDC", "ETH", "BTC", "BONK", "RAY"];

const BASE58: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// USD per token unit for a liquidated LP symbol.
fn liquidation_multiplier(symbol: &str) -> f64 {
    if symbol.contains("SOL") {
        20.0
    } else if symbol.contains("USDC") {
        1.0
    } else {
        10.0
    }
}

pub struct MockGenerator {
    rng: StdRng,
    now: DateTime<Utc>,
}

impl MockGenerator {
    /// `seed: None` draws from OS entropy.
    pub fn new(seed: Option<u64>, now: DateTime<Utc>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, now }
    }

    /// Latest instant strictly inside `[.., now)`.
    fn anchor(&self) -> DateTime<Utc> {
        self.now - Duration::milliseconds(1)
    }

    fn today(&self) -> NaiveDate {
        self.anchor().date_naive()
    }

    /// Midnight of day `i` back from today, and the usable span in ms.
    /// Day 0 is cut off at `now`.
    fn day_bounds(&self, i: usize) -> (i64, i64) {
        let midnight = self.today().and_time(NaiveTime::MIN).and_utc();
        let start = midnight - Duration::days(i as i64);
        let span = if i == 0 {
            (self.anchor() - midnight).num_milliseconds() + 1
        } else {
            DAY_MS
        };
        (start.timestamp_millis(), span)
    }

    fn timestamp_on_day(&mut self, i: usize) -> i64 {
        let (start, span) = self.day_bounds(i);
        start + self.rng.gen_range(0..span)
    }

    fn address(&mut self) -> String {
        let len = self.rng.gen_range(32..=44);
        (0..len)
            .map(|_| BASE58[self.rng.gen_range(0..BASE58.len())] as char)
            .collect()
    }

    fn signature(&mut self) -> String {
        (0..88)
            .map(|_| BASE58[self.rng.gen_range(0..BASE58.len())] as char)
            .collect()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items.choose(&mut self.rng).copied().unwrap_or_default()
    }

    /// One fee payment per tracked wallet per day: 1-11 SOL and 100-1100
    /// USDC. With no tracked wallets a single random wallet is used.
    pub fn revenue(&mut self, days: usize, wallets: &TrackedWallets) -> Vec<Record> {
        let mut owners: Vec<String> = wallets.iter().map(|w| w.address.clone()).collect();
        if owners.is_empty() {
            owners.push(self.address());
        }
        let mut records = Vec::with_capacity(days * owners.len());
        for i in 0..days {
            for owner in &owners {
                let timestamp = self.timestamp_on_day(i);
                let sol = self.rng.gen_range(1.0..11.0);
                let usdc = self.rng.gen_range(100.0..1100.0);
                records.push(Record::revenue(
                    timestamp,
                    owner.clone(),
                    sol,
                    usdc,
                    MOCK_SOL_PRICE,
                ));
            }
        }
        records
    }

    /// One to five liquidations per day of 1-101 LP tokens.
    pub fn liquidations(&mut self, days: usize) -> Vec<Record> {
        let mut records = Vec::new();
        for i in 0..days {
            let count = self.rng.gen_range(1..=5);
            for _ in 0..count {
                let timestamp = self.timestamp_on_day(i);
                let symbol = self.pick(&LIQUIDATION_TOKENS);
                let amount = self.rng.gen_range(1.0..101.0);
                let wallet = self.address();
                let signature = self.signature();
                records.push(
                    Record::new(timestamp, wallet)
                        .with_token(symbol, amount)
                        .with_usd_value(amount * liquidation_multiplier(symbol))
                        .with_tx_id(signature),
                );
            }
        }
        records
    }

    /// `count` limit orders; order `i` lands on day `i % days`. The first 60%
    /// are open, the rest get a random status.
    pub fn orders(&mut self, count: usize, days: usize) -> Vec<Record> {
        let days = days.max(1);
        let open_until = count * 6 / 10;
        (0..count)
            .map(|i| {
                let timestamp = self.timestamp_on_day(i % days);
                let pair = self.pick(&ORDER_PAIRS);
                let side = if self.rng.gen_bool(0.5) { "buy" } else { "sell" };
                let price = self.rng.gen_range(1.0..1001.0);
                let size = self.rng.gen_range(0.1..10.1);
                let status = if i < open_until {
                    ORDER_STATUSES[0]
                } else {
                    self.pick(&ORDER_STATUSES)
                };
                let owner = self.address();
                Record::new(timestamp, owner)
                    .with_pair(pair)
                    .with_side(side)
                    .with_status(status)
                    .with_usd_value(price * size)
                    .with_token(pair, size)
                    .with_tx_id(format!("order{}-{}", i, self.rng.gen::<u32>()))
            })
            .collect()
    }

    /// `count` lending pools, sorted by TVL descending.
    pub fn pools(&mut self, count: usize) -> Vec<PoolSnapshot> {
        let mut pools: Vec<PoolSnapshot> = (0..count)
            .map(|i| {
                let (a, b) = POOL_TOKENS[i % POOL_TOKENS.len()];
                let supplied = self.rng.gen_range(100_000.0..1_100_000.0);
                let utilization = self.rng.gen_range(10.0..90.0);
                PoolSnapshot {
                    pool_address: self.address(),
                    name: format!("{}/{} Pool", a, b),
                    token_a: a.to_string(),
                    token_b: b.to_string(),
                    total_supplied: supplied,
                    total_borrowed: supplied * utilization / 100.0,
                    utilization_rate: utilization,
                    apy: 2.0 + utilization * 0.1,
                    volume_24h: self.rng.gen_range(10_000.0..510_000.0),
                    tvl: supplied,
                }
            })
            .collect();
        pools.sort_by(|a, b| b.tvl.total_cmp(&a.tvl));
        pools
    }

    /// `days` of user activity, ascending by date, trending upward 1-3% a day.
    pub fn user_activity(&mut self, days: usize) -> Vec<DailyUserActivity> {
        let today = self.today();
        let mut base = 100.0 + self.rng.gen_range(0..50) as f64;
        let growth = self.rng.gen_range(1.01..1.03);
        let mut out = Vec::with_capacity(days);
        for i in 0..days {
            let unique = (base * self.rng.gen_range(0.9..1.1)).floor() as u64;
            let new_users = (unique as f64 * self.rng.gen_range(0.3..0.4)).floor() as u64;
            let per_user = self.rng.gen_range(2.0..5.0);
            out.push(DailyUserActivity {
                date: today - Duration::days(i as i64),
                unique_users: unique,
                new_users,
                returning_users: unique - new_users,
                total_transactions: (unique as f64 * per_user).floor() as u64,
            });
            base /= growth;
        }
        out.reverse();
        out
    }

    /// `count` leaderboard wallets active within the last week, by volume
    /// descending.
    pub fn top_wallets(&mut self, count: usize) -> Vec<WalletActivity> {
        let now = self.now.timestamp_millis();
        let mut wallets: Vec<WalletActivity> = (0..count)
            .map(|_| {
                let address = self.address();
                WalletActivity {
                    short_address: short_address(&address),
                    address,
                    trade_volume: self.rng.gen_range(1_000.0..101_000.0),
                    trade_count: self.rng.gen_range(10..510),
                    last_active: now - self.rng.gen_range(0..7 * DAY_MS),
                    favorite_token: Some(self.pick(&WALLET_TOKENS).to_string()),
                }
            })
            .collect();
        wallets.sort_by(|a, b| b.trade_volume.total_cmp(&a.trade_volume));
        wallets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{filter_by_range, resolve_range, TimeRange};
    use crate::rollup::{aggregate_daily, RollupConfig};
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn revenue_satisfies_usd_formula() {
        let wallets = TrackedWallets::builtin().unwrap();
        let records = MockGenerator::new(Some(7), now()).revenue(10, &wallets);
        assert_eq!(records.len(), 20);
        for r in &records {
            assert_eq!(r.usd_value, usd_value_of(r.sol_amount, r.usdc_amount, MOCK_SOL_PRICE));
            assert!((1.0..11.0).contains(&r.sol_amount));
            assert!((100.0..1100.0).contains(&r.usdc_amount));
        }
    }

    #[test]
    fn coverage_is_gapless_and_inside_window() {
        for range in [TimeRange::Last7Days, TimeRange::Last30Days, TimeRange::Last90Days] {
            let window = resolve_range(range, now());
            let days = window.period_days();
            let records = MockGenerator::new(Some(1), now()).liquidations(days);
            assert_eq!(filter_by_range(&records, &window).len(), records.len());
            let daily = aggregate_daily(&records, &RollupConfig::liquidations());
            assert_eq!(daily.len(), days, "{range}");
            let dates: BTreeSet<NaiveDate> = daily
                .iter()
                .map(|d| NaiveDate::parse_from_str(&d.date, "%Y-%m-%d").unwrap())
                .collect();
            let first = *dates.iter().next().unwrap();
            let last = *dates.iter().last().unwrap();
            assert_eq!(last, now().date_naive());
            assert_eq!((last - first).num_days() as usize, days - 1);
        }
    }

    #[test]
    fn coverage_at_exact_midnight() {
        let midnight = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let window = resolve_range(TimeRange::Week, midnight);
        let records = MockGenerator::new(Some(3), midnight).liquidations(7);
        assert_eq!(filter_by_range(&records, &window).len(), records.len());
        let daily = aggregate_daily(&records, &RollupConfig::liquidations());
        assert_eq!(daily.len(), 7);
        assert_eq!(daily.last().unwrap().date, "2024-03-14");
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let a = MockGenerator::new(Some(42), now()).orders(50, 7);
        let b = MockGenerator::new(Some(42), now()).orders(50, 7);
        assert_eq!(a, b);
        let c = MockGenerator::new(Some(43), now()).orders(50, 7);
        assert_ne!(a, c);
    }

    #[test]
    fn liquidation_values_use_multiplier() {
        let records = MockGenerator::new(Some(9), now()).liquidations(5);
        for r in records {
            let symbol = r.token_symbol.as_deref().unwrap();
            assert!(LIQUIDATION_TOKENS.contains(&symbol));
            assert_eq!(r.usd_value, r.token_amount * liquidation_multiplier(symbol));
        }
        assert_eq!(liquidation_multiplier("SOL/USDC LP"), 20.0);
        assert_eq!(liquidation_multiplier("ETH/USDC LP"), 1.0);
    }

    #[test]
    fn orders_cover_every_day_and_start_open() {
        let orders = MockGenerator::new(Some(5), now()).orders(50, 7);
        let daily = aggregate_daily(&orders, &RollupConfig::orders());
        assert_eq!(daily.len(), 7);
        assert!(orders[..30]
            .iter()
            .all(|o| o.status.as_deref() == Some("open")));
        for o in &orders {
            assert!(o.pair.is_some());
            assert!(o.usd_value > 0.0);
        }
    }

    #[test]
    fn pools_sorted_by_tvl() {
        let pools = MockGenerator::new(Some(2), now()).pools(5);
        assert_eq!(pools.len(), 5);
        assert!(pools.windows(2).all(|w| w[0].tvl >= w[1].tvl));
        for p in &pools {
            assert!((10.0..90.0).contains(&p.utilization_rate));
            assert_eq!(p.tvl, p.total_supplied);
        }
    }

    #[test]
    fn user_activity_ascending_and_consistent() {
        let days = MockGenerator::new(Some(4), now()).user_activity(30);
        assert_eq!(days.len(), 30);
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(days.last().unwrap().date, now().date_naive());
        for d in &days {
            assert_eq!(d.new_users + d.returning_users, d.unique_users);
        }
    }

    #[test]
    fn top_wallets_sorted_by_volume() {
        let wallets = MockGenerator::new(Some(8), now()).top_wallets(10);
        assert_eq!(wallets.len(), 10);
        assert!(wallets
            .windows(2)
            .all(|w| w[0].trade_volume >= w[1].trade_volume));
        for w in &wallets {
            assert!(w.address.len() >= 32);
            assert_eq!(w.short_address, short_address(&w.address));
        }
    }

    #[test]
    fn zero_days_is_empty() {
        let mut gen = MockGenerator::new(Some(0), now());
        assert!(gen.liquidations(0).is_empty());
        assert!(gen.revenue(0, &TrackedWallets::empty()).is_empty());
        assert!(gen.user_activity(0).is_empty());
    }
}
