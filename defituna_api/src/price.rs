//! SOL/USD spot price lookup against CoinGecko's free `simple/price` endpoint.

use std::time::Duration;

use url::Url;

use crate::{client::get_json, types::SimplePrice, Error};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the CoinGecko simple price API.
pub struct PriceClient {
    base_url: String,
    timeout: Duration,
}

impl Default for PriceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceClient {
    pub fn new() -> Self {
        Self::with_base_url("https://api.coingecko.com")
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the current SOL price in USD.
    ///
    /// A well-formed response without a `solana.usd` quote is a parse error.
    pub async fn get_sol_price(&self) -> Result<f64, Error> {
        let mut url = Url::parse(&format!("{}/api/v3/simple/price", self.base_url)).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        url.query_pairs_mut()
            .append_pair("ids", "solana")
            .append_pair("vs_currencies", "usd");

        let resp: SimplePrice = get_json(url, self.timeout).await?;
        resp.solana
            .and_then(|q| q.usd)
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| Error::Parse("missing solana.usd quote".to_string()))
    }
}
