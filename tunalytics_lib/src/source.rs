//! Data sources: where records come from.
//!
//! The aggregators never know whether they run on live or synthetic data.
//! Callers pick a [`DataSource`] implementation at the composition root
//! ([`HttpSource`] for the upstream API, [`MockSource`] for the generator).

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use defituna_api::{PriceClient, TimeWindowQuery, TopWalletsQuery};
use serde::Serialize;

use crate::client::RetryingClient;
use crate::config::Config;
use crate::error::AnalyticsError;
use crate::metrics::{user_metrics, UserMetrics};
use crate::mock::MockGenerator;
use crate::normalize;
use crate::range::DateRange;
use crate::record::Record;
use crate::snapshot::{DailyUserActivity, PoolSnapshot, WalletActivity};
use crate::wallets::TrackedWallets;

/// Minimum number of mock limit orders per request.
const MOCK_MIN_ORDERS: usize = 50;
const MOCK_POOL_COUNT: usize = 5;
/// Days of mock activity behind [`MockSource`] user metrics.
const MOCK_METRICS_DAYS: usize = 30;

/// Where a result set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Live,
    Mock,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Live => f.write_str("live"),
            Origin::Mock => f.write_str("mock"),
        }
    }
}

/// Record-shaped datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Revenue,
    Liquidations,
    Orders,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Revenue => f.write_str("revenue"),
            Dataset::Liquidations => f.write_str("liquidations"),
            Dataset::Orders => f.write_str("orders"),
        }
    }
}

#[async_trait]
pub trait DataSource: Send + Sync {
    fn origin(&self) -> Origin;

    /// Records for `dataset` in `range`. Sources may return records outside
    /// the range; callers filter.
    async fn fetch_records(
        &self,
        dataset: Dataset,
        range: &DateRange,
    ) -> Result<Vec<Record>, AnalyticsError>;

    async fn fetch_pools(&self) -> Result<Vec<PoolSnapshot>, AnalyticsError>;

    async fn fetch_user_activity(
        &self,
        range: &DateRange,
    ) -> Result<Vec<DailyUserActivity>, AnalyticsError>;

    async fn fetch_user_metrics(&self) -> Result<UserMetrics, AnalyticsError>;

    async fn fetch_top_wallets(&self, limit: u32) -> Result<Vec<WalletActivity>, AnalyticsError>;

    async fn fetch_tracked_wallets(&self) -> Result<TrackedWallets, AnalyticsError>;
}

/// Live data from the upstream API, normalized at the boundary.
pub struct HttpSource {
    client: RetryingClient,
    prices: PriceClient,
    fallback_sol_price: f64,
}

impl HttpSource {
    pub fn new(client: RetryingClient, prices: PriceClient, fallback_sol_price: f64) -> Self {
        Self {
            client,
            prices,
            fallback_sol_price,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let api = defituna_api::Client::with_base_url(&config.api_base).with_timeout(config.timeout);
        let prices = PriceClient::with_base_url(&config.price_api_base);
        Self::new(
            RetryingClient::new(api, config.retry),
            prices,
            config.fallback_sol_price,
        )
    }

    /// Current SOL price, or the configured fallback when the price API fails.
    pub async fn sol_price(&self) -> f64 {
        match self.prices.get_sol_price().await {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!(
                    "SOL price unavailable ({}), using fallback ${:.2}",
                    e,
                    self.fallback_sol_price
                );
                self.fallback_sol_price
            }
        }
    }
}

fn window_query(range: &DateRange) -> TimeWindowQuery {
    TimeWindowQuery::from_millis(range.start_millis(), range.end_millis())
}

#[async_trait]
impl DataSource for HttpSource {
    fn origin(&self) -> Origin {
        Origin::Live
    }

    async fn fetch_records(
        &self,
        dataset: Dataset,
        range: &DateRange,
    ) -> Result<Vec<Record>, AnalyticsError> {
        let records: Vec<Record> = match dataset {
            Dataset::Revenue => {
                let raw = self.client.get_revenue(&window_query(range)).await?;
                let price = self.sol_price().await;
                raw.iter().map(|r| normalize::revenue(r, price)).collect()
            }
            Dataset::Liquidations => self
                .client
                .get_liquidations(&window_query(range))
                .await?
                .iter()
                .map(normalize::liquidation)
                .collect(),
            Dataset::Orders => {
                // Orders without a timestamp are treated as seen at the end of the window.
                let fetched_at = range.end_millis() - 1;
                self.client
                    .get_orders()
                    .await?
                    .iter()
                    .map(|r| normalize::order(r, fetched_at))
                    .collect()
            }
        };
        tracing::debug!("Fetched {} {} records", records.len(), dataset);
        Ok(records)
    }

    async fn fetch_pools(&self) -> Result<Vec<PoolSnapshot>, AnalyticsError> {
        let mut pools: Vec<PoolSnapshot> = self
            .client
            .get_pools()
            .await?
            .iter()
            .map(normalize::pool)
            .collect();
        pools.sort_by(|a, b| b.tvl.total_cmp(&a.tvl));
        Ok(pools)
    }

    async fn fetch_user_activity(
        &self,
        range: &DateRange,
    ) -> Result<Vec<DailyUserActivity>, AnalyticsError> {
        let mut days: Vec<DailyUserActivity> = self
            .client
            .get_user_activity(&window_query(range))
            .await?
            .iter()
            .filter_map(normalize::user_activity)
            .collect();
        days.sort_by_key(|d| d.date);
        Ok(days)
    }

    async fn fetch_user_metrics(&self) -> Result<UserMetrics, AnalyticsError> {
        let raw = self.client.get_user_metrics().await?;
        Ok(normalize::user_metrics(&raw))
    }

    async fn fetch_top_wallets(&self, limit: u32) -> Result<Vec<WalletActivity>, AnalyticsError> {
        let query = TopWalletsQuery::default().with_limit(limit);
        let fetched_at = Utc::now().timestamp_millis();
        let mut wallets: Vec<WalletActivity> = self
            .client
            .get_top_wallets(&query)
            .await?
            .iter()
            .map(|w| normalize::top_wallet(w, fetched_at))
            .collect();
        wallets.sort_by(|a, b| b.trade_volume.total_cmp(&a.trade_volume));
        wallets.truncate(limit as usize);
        Ok(wallets)
    }

    async fn fetch_tracked_wallets(&self) -> Result<TrackedWallets, AnalyticsError> {
        let raw = self.client.get_tracked_wallets().await?;
        normalize::tracked_wallets(&raw)
    }
}

/// Synthetic data from [`MockGenerator`].
///
/// Each fetch builds a fresh generator, so with a fixed seed repeated calls
/// return identical data.
pub struct MockSource {
    seed: Option<u64>,
    now: DateTime<Utc>,
    wallets: TrackedWallets,
}

impl MockSource {
    pub fn new(seed: Option<u64>, now: DateTime<Utc>, wallets: TrackedWallets) -> Self {
        Self { seed, now, wallets }
    }

    fn generator(&self) -> MockGenerator {
        MockGenerator::new(self.seed, self.now)
    }
}

#[async_trait]
impl DataSource for MockSource {
    fn origin(&self) -> Origin {
        Origin::Mock
    }

    async fn fetch_records(
        &self,
        dataset: Dataset,
        range: &DateRange,
    ) -> Result<Vec<Record>, AnalyticsError> {
        let days = range.period_days();
        let mut gen = self.generator();
        Ok(match dataset {
            Dataset::Revenue => gen.revenue(days, &self.wallets),
            Dataset::Liquidations => gen.liquidations(days),
            Dataset::Orders => gen.orders(days.max(MOCK_MIN_ORDERS), days),
        })
    }

    async fn fetch_pools(&self) -> Result<Vec<PoolSnapshot>, AnalyticsError> {
        Ok(self.generator().pools(MOCK_POOL_COUNT))
    }

    async fn fetch_user_activity(
        &self,
        range: &DateRange,
    ) -> Result<Vec<DailyUserActivity>, AnalyticsError> {
        Ok(self.generator().user_activity(range.period_days()))
    }

    async fn fetch_user_metrics(&self) -> Result<UserMetrics, AnalyticsError> {
        let activity = self.generator().user_activity(MOCK_METRICS_DAYS);
        Ok(user_metrics(&activity))
    }

    async fn fetch_top_wallets(&self, limit: u32) -> Result<Vec<WalletActivity>, AnalyticsError> {
        Ok(self.generator().top_wallets(limit as usize))
    }

    async fn fetch_tracked_wallets(&self) -> Result<TrackedWallets, AnalyticsError> {
        Ok(self.wallets.clone())
    }
}
