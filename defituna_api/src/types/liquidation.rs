use serde::{Deserialize, Serialize};

/// A single liquidation event.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawLiquidation {
    pub timestamp: Option<i64>,

    pub wallet: Option<String>,
    /// Older payloads name the liquidated account `borrower`.
    pub borrower: Option<String>,

    pub token_symbol: Option<String>,
    pub token_a: Option<String>,
    pub token_b: Option<String>,

    pub token_amount: Option<f64>,
    pub usd_value: Option<f64>,

    pub tx_id: Option<String>,
    pub signature: Option<String>,
}
