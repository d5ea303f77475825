use serde::{Deserialize, Serialize};

/// A leaderboard entry from `/wallets/top`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawTopWallet {
    pub address: Option<String>,

    pub trade_volume: Option<f64>,
    pub volume: Option<f64>,

    pub trade_count: Option<u64>,
    pub count: Option<u64>,

    pub last_active: Option<i64>,
    pub timestamp: Option<i64>,

    pub favorite_token: Option<String>,
    pub token: Option<String>,
}

/// A revenue wallet the protocol asks dashboards to track, from `/config/wallets`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawTrackedWallet {
    pub address: Option<String>,
    pub label: Option<String>,
    pub color: Option<String>,
}
