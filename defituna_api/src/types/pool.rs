use serde::{Deserialize, Serialize};

/// A lending pool snapshot as reported by `/pools`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawPool {
    pub address: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub token_a: Option<String>,
    pub token_b: Option<String>,

    pub total_supplied: Option<f64>,
    pub supplied: Option<f64>,
    pub total_borrowed: Option<f64>,
    pub borrowed: Option<f64>,

    /// Percentage in `[0, 100]`.
    pub utilization_rate: Option<f64>,
    pub apy: Option<f64>,

    #[serde(rename = "volume24h")]
    pub volume_24h: Option<f64>,
    pub volume: Option<f64>,
    pub tvl: Option<f64>,
}
