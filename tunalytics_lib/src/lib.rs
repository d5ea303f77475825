//! Library layer for tunalytics: the data-aggregation core of the DeFi Tuna
//! analytics dashboard.
//!
//! Records come in through an [`Ingestor`] backed by a [`DataSource`] (the
//! live API via [`HttpSource`], or [`MockSource`]), get narrowed by the
//! time-window filter in [`range`], folded by [`rollup`] and [`entity`], and
//! summarized by [`metrics`]. Everything past ingestion is synchronous and
//! pure.

pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod mock;
pub mod normalize;
pub mod range;
pub mod record;
pub mod rollup;
pub mod snapshot;
pub mod source;
pub mod validation;
pub mod wallets;

pub use defituna_api;

pub use client::{RetryConfig, RetryingClient};
pub use config::{Config, Environment};
pub use entity::{aggregate_by_entity, short_address, top_entities, EntityRollup};
pub use error::AnalyticsError;
pub use ingest::{Ingested, Ingestor};
pub use metrics::{
    calculate_growth, compute_metrics, order_stats, percentage_of, pool_summary, top_category,
    user_metrics, Metrics, OrderStats, PoolSummary, TopPeriod, UserMetrics,
};
pub use mock::{MockGenerator, MOCK_SOL_PRICE};
pub use range::{filter_by_range, resolve_range, resolve_token, DateRange, TimeRange};
pub use record::{usd_value_of, CategoryField, Record, Timestamped, ValueField};
pub use rollup::{aggregate_by_period, aggregate_daily, DailyRollup, Granularity, RollupConfig};
pub use snapshot::{DailyUserActivity, PoolSnapshot, WalletActivity};
pub use source::{DataSource, Dataset, HttpSource, MockSource, Origin};
pub use wallets::{TrackedWallet, TrackedWallets};
