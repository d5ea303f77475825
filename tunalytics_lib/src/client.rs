//! Retrying wrapper around the API client.

use std::time::Duration;

use defituna_api::types::{
    RawLiquidation, RawOrder, RawPool, RawRevenue, RawTopWallet, RawTrackedWallet,
    RawUserActivity, RawUserMetrics,
};
use defituna_api::{Client, TimeWindowQuery, TopWalletsQuery};
use rand::Rng;

use crate::error::AnalyticsError;

/// Exponential backoff settings for transient upstream failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryConfig {
    /// Backoff before retry number `attempt` (1-based), with +/-20% jitter.
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

/// API client that retries 429s, 5xx responses, timeouts and transport
/// errors with exponential backoff.
pub struct RetryingClient {
    inner: Client,
    retry: RetryConfig,
}

impl RetryingClient {
    pub fn new(inner: Client, retry: RetryConfig) -> Self {
        Self { inner, retry }
    }

    /// Creates a client against `base_url` with default retry settings. Used for testing.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(Client::with_base_url(base_url), RetryConfig::default())
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    async fn with_retry<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, AnalyticsError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, defituna_api::Error>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !err.is_transient() {
                        tracing::debug!("{} request failed permanently: {}", label, err);
                        return Err(err.into());
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        label,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    pub async fn get_revenue(
        &self,
        query: &TimeWindowQuery,
    ) -> Result<Vec<RawRevenue>, AnalyticsError> {
        self.with_retry("revenue", || self.inner.get_revenue(query))
            .await
    }

    pub async fn get_liquidations(
        &self,
        query: &TimeWindowQuery,
    ) -> Result<Vec<RawLiquidation>, AnalyticsError> {
        self.with_retry("liquidations", || self.inner.get_liquidations(query))
            .await
    }

    pub async fn get_orders(&self) -> Result<Vec<RawOrder>, AnalyticsError> {
        self.with_retry("orders", || self.inner.get_orders()).await
    }

    pub async fn get_pools(&self) -> Result<Vec<RawPool>, AnalyticsError> {
        self.with_retry("pools", || self.inner.get_pools()).await
    }

    pub async fn get_user_activity(
        &self,
        query: &TimeWindowQuery,
    ) -> Result<Vec<RawUserActivity>, AnalyticsError> {
        self.with_retry("user activity", || self.inner.get_user_activity(query))
            .await
    }

    pub async fn get_user_metrics(&self) -> Result<RawUserMetrics, AnalyticsError> {
        self.with_retry("user metrics", || self.inner.get_user_metrics())
            .await
    }

    pub async fn get_top_wallets(
        &self,
        query: &TopWalletsQuery,
    ) -> Result<Vec<RawTopWallet>, AnalyticsError> {
        self.with_retry("top wallets", || self.inner.get_top_wallets(query))
            .await
    }

    pub async fn get_tracked_wallets(&self) -> Result<Vec<RawTrackedWallet>, AnalyticsError> {
        self.with_retry("tracked wallets", || self.inner.get_tracked_wallets())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_and_caps() {
        let cfg = RetryConfig {
            max_retries: 5,
            base_delay_ms: 100,
            max_delay_ms: 1_000,
        };
        let first = cfg.delay_for_attempt(1).as_millis();
        assert!((80..=120).contains(&first), "{first}");
        let third = cfg.delay_for_attempt(3).as_millis();
        assert!((320..=480).contains(&third), "{third}");
        let capped = cfg.delay_for_attempt(20).as_millis();
        assert!(capped <= 1_200, "{capped}");
    }

    #[test]
    fn zero_attempt_does_not_underflow() {
        let cfg = RetryConfig::default();
        assert!(cfg.delay_for_attempt(0) <= Duration::from_millis(600));
    }
}
