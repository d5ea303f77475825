use serde::{Deserialize, Serialize};

/// One day of user activity from `/users/activity`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawUserActivity {
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    pub unique_users: Option<u64>,
    pub new_users: Option<u64>,
    pub returning_users: Option<u64>,
    pub total_transactions: Option<u64>,
}

/// Pre-computed engagement metrics from `/users/metrics`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawUserMetrics {
    pub dau: Option<f64>,
    pub wau: Option<f64>,
    pub mau: Option<f64>,
    pub retention_rate: Option<f64>,
    pub average_transactions_per_user: Option<f64>,
}
