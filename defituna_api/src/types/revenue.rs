use serde::{Deserialize, Serialize};

/// A fee payment into one of the protocol's revenue wallets.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawRevenue {
    /// Milliseconds since the UNIX epoch.
    pub timestamp: Option<i64>,
    pub wallet: Option<String>,
    pub sol_amount: Option<f64>,
    pub usdc_amount: Option<f64>,
}
