//! Canonical record model consumed by every aggregation.
//!
//! A [`Record`] is one timestamped financial event (a fee payment, a
//! liquidation, a limit order). Upstream payloads are mapped onto it at the
//! ingestion boundary (see [`crate::normalize`]) and the mock generator builds
//! it directly, so the aggregators never see raw field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category bucket for records that carry no value for the configured field.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// USD value of a SOL + USDC pair at the given SOL price.
///
/// Normalization and the mock generator both derive `usd_value` through this
/// function so that rollups over either source agree.
pub fn usd_value_of(sol_amount: f64, usdc_amount: f64, sol_price: f64) -> f64 {
    sol_amount * sol_price + usdc_amount
}

/// Anything with a millisecond UNIX timestamp that the time-window filter can test.
pub trait Timestamped {
    fn timestamp_millis(&self) -> i64;
}

/// A single immutable financial/activity event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    /// Milliseconds since the UNIX epoch.
    pub timestamp: i64,
    /// Owning entity, usually a wallet address. Empty when unknown.
    pub entity_id: String,
    pub sol_amount: f64,
    pub usdc_amount: f64,
    pub token_amount: f64,
    /// Canonical value of the event in USD.
    pub usd_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
}

impl Record {
    pub fn new(timestamp: i64, entity_id: impl Into<String>) -> Self {
        Self {
            timestamp,
            entity_id: entity_id.into(),
            ..Self::default()
        }
    }

    /// A revenue inflow whose USD value is derived from its SOL and USDC legs.
    pub fn revenue(
        timestamp: i64,
        entity_id: impl Into<String>,
        sol_amount: f64,
        usdc_amount: f64,
        sol_price: f64,
    ) -> Self {
        Self {
            sol_amount,
            usdc_amount,
            usd_value: usd_value_of(sol_amount, usdc_amount, sol_price),
            ..Self::new(timestamp, entity_id)
        }
    }

    pub fn with_usd_value(mut self, usd_value: f64) -> Self {
        self.usd_value = usd_value;
        self
    }

    pub fn with_token(mut self, symbol: impl Into<String>, amount: f64) -> Self {
        self.token_symbol = Some(symbol.into());
        self.token_amount = amount;
        self
    }

    pub fn with_pair(mut self, pair: impl Into<String>) -> Self {
        self.pair = Some(pair.into());
        self
    }

    pub fn with_side(mut self, side: impl Into<String>) -> Self {
        self.side = Some(side.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_tx_id(mut self, tx_id: impl Into<String>) -> Self {
        self.tx_id = Some(tx_id.into());
        self
    }

    /// The event time, or `None` if the timestamp is outside chrono's range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Reads the numeric field selected by `field`.
    pub fn value(&self, field: ValueField) -> f64 {
        match field {
            ValueField::SolAmount => self.sol_amount,
            ValueField::UsdcAmount => self.usdc_amount,
            ValueField::TokenAmount => self.token_amount,
            ValueField::UsdValue => self.usd_value,
        }
    }

    /// Reads the categorical field selected by `field`.
    pub fn category(&self, field: CategoryField) -> Option<&str> {
        match field {
            CategoryField::TokenSymbol => self.token_symbol.as_deref(),
            CategoryField::Pair => self.pair.as_deref(),
            CategoryField::Status => self.status.as_deref(),
        }
    }
}

impl Timestamped for Record {
    fn timestamp_millis(&self) -> i64 {
        self.timestamp
    }
}

/// Which numeric field of a [`Record`] an aggregation sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueField {
    SolAmount,
    UsdcAmount,
    TokenAmount,
    #[default]
    UsdValue,
}

/// Which categorical field of a [`Record`] feeds per-category breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    TokenSymbol,
    Pair,
    Status,
}
