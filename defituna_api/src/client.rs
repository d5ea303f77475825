//! HTTP client for the DeFi Tuna analytics API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{NoQuery, Query, TimeWindowQuery, TopWalletsQuery},
    types::{
        RawLiquidation, RawOrder, RawPool, RawRevenue, RawTopWallet, RawTrackedWallet,
        RawUserActivity, RawUserMetrics,
    },
    Error,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the DeFi Tuna analytics API.
///
/// Every endpoint returns a bare JSON value (array or object); there is no
/// pagination envelope. Each request builds a fresh `reqwest::Client` with
/// the configured timeout.
pub struct Client {
    /// Base URL for the API. Defaults to `https://api.defituna.com`.
    base_api_url: String,
    timeout: Duration,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production API.
    pub fn new() -> Self {
        Self::with_base_url("https://api.defituna.com")
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, path: &str, query: &impl Query) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(query.add_to_url(&url))
    }

    async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Query,
    {
        let url = self.get_url(path, query)?;
        get_json(url, self.timeout).await
    }

    /// Fetches revenue wallet inflows within the window.
    pub async fn get_revenue(&self, query: &TimeWindowQuery) -> Result<Vec<RawRevenue>, Error> {
        self.get("/revenue", query).await
    }

    /// Fetches liquidation events within the window.
    pub async fn get_liquidations(
        &self,
        query: &TimeWindowQuery,
    ) -> Result<Vec<RawLiquidation>, Error> {
        self.get("/liquidations", query).await
    }

    /// Fetches all known limit orders.
    pub async fn get_orders(&self) -> Result<Vec<RawOrder>, Error> {
        self.get("/orders", &NoQuery).await
    }

    /// Fetches the current lending pool snapshots.
    pub async fn get_pools(&self) -> Result<Vec<RawPool>, Error> {
        self.get("/pools", &NoQuery).await
    }

    /// Fetches daily user activity within the window.
    pub async fn get_user_activity(
        &self,
        query: &TimeWindowQuery,
    ) -> Result<Vec<RawUserActivity>, Error> {
        self.get("/users/activity", query).await
    }

    /// Fetches the upstream's own engagement metrics.
    pub async fn get_user_metrics(&self) -> Result<RawUserMetrics, Error> {
        self.get("/users/metrics", &NoQuery).await
    }

    /// Fetches the trading-volume leaderboard.
    pub async fn get_top_wallets(
        &self,
        query: &TopWalletsQuery,
    ) -> Result<Vec<RawTopWallet>, Error> {
        self.get("/wallets/top", query).await
    }

    /// Fetches the revenue wallets the protocol wants tracked.
    pub async fn get_tracked_wallets(&self) -> Result<Vec<RawTrackedWallet>, Error> {
        self.get("/config/wallets", &NoQuery).await
    }
}

/// Issues a GET and decodes the JSON body, mapping transport, status and
/// decode failures onto [`Error`].
pub(crate) async fn get_json<T: DeserializeOwned>(url: Url, timeout: Duration) -> Result<T, Error> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            Error::RequestFailed
        })?;
    tracing::debug!("GET {}", url);
    let resp = client
        .get(url)
        .header("accept", "application/json")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                tracing::error!("Request timed out: {}", e);
                Error::Timeout
            } else {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            }
        })?;

    let status = resp.status();
    let body = resp.text().await.map_err(|e| {
        tracing::error!("Failed to read response body: {}", e);
        Error::RequestFailed
    })?;

    if !status.is_success() {
        let snippet = truncate_body(&body);
        tracing::error!("Request failed with status {}: {}", status, snippet);
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            body: snippet,
        });
    }

    serde_json::from_str::<T>(&body).map_err(|e| {
        let snippet = truncate_body(&body);
        tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
        Error::Parse(e.to_string())
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_body_untouched() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_long_body() {
        let body = "x".repeat(2500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
        assert_eq!(out.len(), 2000 + "...[truncated]".len());
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = Client::with_base_url("http://localhost:9999/");
        assert_eq!(client.base_url(), "http://localhost:9999");
    }
}
