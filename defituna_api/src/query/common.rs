//! Query infrastructure: the [`Query`] trait plus the two parameter shapes the
//! upstream API accepts ([`TimeWindowQuery`] and [`TopWalletsQuery`]).

use url::Url;

/// Trait implemented by all query builders. Provides URL serialization.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}

/// A `[startTime, endTime]` window in UNIX seconds.
///
/// Both bounds are optional; the upstream applies its own default window
/// (the last 30 days) when they are missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeWindowQuery {
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl TimeWindowQuery {
    pub fn with_start_time(mut self, start_time: i64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_end_time(mut self, end_time: i64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Builds a window from millisecond timestamps, truncating to seconds.
    pub fn from_millis(start_ms: i64, end_ms: i64) -> Self {
        Self::default()
            .with_start_time(start_ms.div_euclid(1000))
            .with_end_time(end_ms.div_euclid(1000))
    }
}

impl Query for TimeWindowQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(start_time) = self.start_time {
            url.query_pairs_mut()
                .append_pair("startTime", &start_time.to_string());
        }
        if let Some(end_time) = self.end_time {
            url.query_pairs_mut()
                .append_pair("endTime", &end_time.to_string());
        }
        url
    }
}

/// Parameters for the top-wallets leaderboard endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopWalletsQuery {
    /// Maximum number of wallets to return. Defaults to 10.
    pub limit: u32,
}

impl Default for TopWalletsQuery {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

impl TopWalletsQuery {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

impl Query for TopWalletsQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &self.limit.to_string());
        url
    }
}

/// A query that adds no parameters.
pub(crate) struct NoQuery;

impl Query for NoQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/revenue").unwrap()
    }

    #[test]
    fn empty_window_adds_nothing() {
        let url = TimeWindowQuery::default().add_to_url(&base_url());
        assert_eq!(url.query(), None);
    }

    #[test]
    fn window_bounds_serialized_as_seconds() {
        let url = TimeWindowQuery::from_millis(1_704_067_200_000, 1_704_153_600_999)
            .add_to_url(&base_url());
        assert_eq!(
            url.query(),
            Some("startTime=1704067200&endTime=1704153600")
        );
    }

    #[test]
    fn top_wallets_default_limit() {
        let url = TopWalletsQuery::default().add_to_url(&base_url());
        assert_eq!(url.query(), Some("limit=10"));

        let url = TopWalletsQuery::default()
            .with_limit(25)
            .add_to_url(&base_url());
        assert_eq!(url.query(), Some("limit=25"));
    }
}
