use serde::{Deserialize, Serialize};

/// A limit order as reported by `/orders`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    pub order_id: Option<String>,
    pub id: Option<String>,

    pub owner: Option<String>,
    pub wallet: Option<String>,

    pub pair: Option<String>,
    pub token_a: Option<String>,
    pub token_b: Option<String>,

    pub side: Option<String>,
    pub price: Option<f64>,
    pub size: Option<f64>,
    pub amount: Option<f64>,
    pub usd_value: Option<f64>,

    pub timestamp: Option<i64>,
    /// One of `open`, `filled`, `canceled`.
    pub status: Option<String>,
}
