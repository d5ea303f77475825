use serde::{Deserialize, Serialize};

/// Response of CoinGecko's `/simple/price?ids=solana&vs_currencies=usd`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SimplePrice {
    pub solana: Option<UsdQuote>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub struct UsdQuote {
    pub usd: Option<f64>,
}
