//! Non-event data shown next to the rollups: pool snapshots, daily user
//! activity and the trading-volume leaderboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::Timestamped;

/// Point-in-time state of a lending pool.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub pool_address: String,
    pub name: String,
    pub token_a: String,
    pub token_b: String,
    pub total_supplied: f64,
    pub total_borrowed: f64,
    /// Percentage in `[0, 100]`.
    pub utilization_rate: f64,
    pub apy: f64,
    pub volume_24h: f64,
    pub tvl: f64,
}

/// One UTC day of protocol usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUserActivity {
    pub date: NaiveDate,
    pub unique_users: u64,
    pub new_users: u64,
    pub returning_users: u64,
    pub total_transactions: u64,
}

/// A wallet's trading activity, as ranked on the leaderboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WalletActivity {
    pub address: String,
    pub short_address: String,
    pub trade_volume: f64,
    pub trade_count: u64,
    /// Milliseconds since the UNIX epoch.
    pub last_active: i64,
    pub favorite_token: Option<String>,
}

impl Timestamped for WalletActivity {
    fn timestamp_millis(&self) -> i64 {
        self.last_active
    }
}
