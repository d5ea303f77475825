//! Ingestion boundary.
//!
//! [`Ingestor`] is the only place fetch failures are handled. In
//! [`Environment::Development`] a failed fetch is logged and served from the
//! fallback source (normally [`MockSource`](crate::source::MockSource)); in
//! [`Environment::Production`] it becomes [`AnalyticsError::DataUnavailable`].
//! Either way the aggregators receive a complete record set or nothing.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::config::Environment;
use crate::error::AnalyticsError;
use crate::metrics::UserMetrics;
use crate::range::{filter_by_range, DateRange};
use crate::record::Record;
use crate::snapshot::{DailyUserActivity, PoolSnapshot, WalletActivity};
use crate::source::{DataSource, Dataset, Origin};
use crate::wallets::TrackedWallets;

/// A result set tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingested<T> {
    pub data: T,
    pub origin: Origin,
}

pub struct Ingestor {
    source: Box<dyn DataSource>,
    fallback: Option<Box<dyn DataSource>>,
    environment: Environment,
    protocol_start: Option<DateTime<Utc>>,
}

impl Ingestor {
    pub fn new(source: Box<dyn DataSource>, environment: Environment) -> Self {
        Self {
            source,
            fallback: None,
            environment,
            protocol_start: None,
        }
    }

    /// Source used when the primary fails in development.
    pub fn with_fallback(mut self, fallback: Box<dyn DataSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Drops anything dated before midnight UTC on `date`.
    pub fn with_protocol_start(mut self, date: NaiveDate) -> Self {
        self.protocol_start = Some(date.and_time(NaiveTime::MIN).and_utc());
        self
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// `range` with its start raised to the protocol start, if one is set.
    fn effective_window(&self, range: &DateRange) -> DateRange {
        match self.protocol_start {
            Some(floor) => range.clamp_start(floor),
            None => *range,
        }
    }

    /// Decides what a failed fetch of `what` turns into: a fallback source to
    /// retry against, or the error to return.
    fn on_failure(&self, what: &str, err: AnalyticsError) -> Result<&dyn DataSource, AnalyticsError> {
        if !err.is_fetch_failure() {
            return Err(err);
        }
        match (self.environment, self.fallback.as_deref()) {
            (Environment::Development, Some(fallback)) => {
                tracing::warn!("Failed to fetch {} ({}), using {} data", what, err, fallback.origin());
                Ok(fallback)
            }
            _ => {
                tracing::error!("Failed to fetch {}: {}", what, err);
                Err(AnalyticsError::DataUnavailable(format!("{}: {}", what, err)))
            }
        }
    }

    /// Records for `dataset`, narrowed to `range`.
    pub async fn records(
        &self,
        dataset: Dataset,
        range: &DateRange,
    ) -> Result<Ingested<Vec<Record>>, AnalyticsError> {
        let range = &self.effective_window(range);
        let (raw, origin) = match self.source.fetch_records(dataset, range).await {
            Ok(records) => (records, self.source.origin()),
            Err(err) => {
                let fallback = self.on_failure(&dataset.to_string(), err)?;
                (fallback.fetch_records(dataset, range).await?, fallback.origin())
            }
        };
        let data = filter_by_range(&raw, range);
        if data.len() < raw.len() {
            tracing::debug!(
                "Dropped {} {} records outside the window",
                raw.len() - data.len(),
                dataset
            );
        }
        Ok(Ingested { data, origin })
    }

    pub async fn pools(&self) -> Result<Ingested<Vec<PoolSnapshot>>, AnalyticsError> {
        match self.source.fetch_pools().await {
            Ok(data) => Ok(Ingested {
                data,
                origin: self.source.origin(),
            }),
            Err(err) => {
                let fallback = self.on_failure("pools", err)?;
                Ok(Ingested {
                    data: fallback.fetch_pools().await?,
                    origin: fallback.origin(),
                })
            }
        }
    }

    /// Daily activity for the UTC dates `range` touches, ascending. At most
    /// `range.period_days()` rows are kept, the most recent ones.
    pub async fn user_activity(
        &self,
        range: &DateRange,
    ) -> Result<Ingested<Vec<DailyUserActivity>>, AnalyticsError> {
        let range = &self.effective_window(range);
        let (raw, origin) = match self.source.fetch_user_activity(range).await {
            Ok(days) => (days, self.source.origin()),
            Err(err) => {
                let fallback = self.on_failure("user activity", err)?;
                (fallback.fetch_user_activity(range).await?, fallback.origin())
            }
        };
        let first = range.start.date_naive();
        let last = range.last_day();
        let mut data: Vec<DailyUserActivity> = raw
            .into_iter()
            .filter(|d| d.date >= first && d.date <= last)
            .collect();
        data.sort_by(|a, b| b.date.cmp(&a.date));
        data.truncate(range.period_days());
        data.reverse();
        Ok(Ingested { data, origin })
    }

    pub async fn user_metrics(&self) -> Result<Ingested<UserMetrics>, AnalyticsError> {
        match self.source.fetch_user_metrics().await {
            Ok(data) => Ok(Ingested {
                data,
                origin: self.source.origin(),
            }),
            Err(err) => {
                let fallback = self.on_failure("user metrics", err)?;
                Ok(Ingested {
                    data: fallback.fetch_user_metrics().await?,
                    origin: fallback.origin(),
                })
            }
        }
    }

    pub async fn top_wallets(
        &self,
        limit: u32,
    ) -> Result<Ingested<Vec<WalletActivity>>, AnalyticsError> {
        match self.source.fetch_top_wallets(limit).await {
            Ok(data) => Ok(Ingested {
                data,
                origin: self.source.origin(),
            }),
            Err(err) => {
                let fallback = self.on_failure("top wallets", err)?;
                Ok(Ingested {
                    data: fallback.fetch_top_wallets(limit).await?,
                    origin: fallback.origin(),
                })
            }
        }
    }

    /// Tracked wallets published by the source, or `configured` when the
    /// source has none or cannot be reached. Wallet configuration is not
    /// data, so this never fails.
    pub async fn tracked_wallets(&self, configured: TrackedWallets) -> TrackedWallets {
        match self.source.fetch_tracked_wallets().await {
            Ok(wallets) if !wallets.is_empty() => wallets,
            Ok(_) => configured,
            Err(err) => {
                tracing::warn!("Using configured tracked wallets: {}", err);
                configured
            }
        }
    }
}
