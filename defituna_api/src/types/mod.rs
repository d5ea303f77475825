//! Raw response shapes returned by the upstream API.
//!
//! The upstream is loosely typed: field names drift between endpoints
//! (`wallet` vs `borrower`, `volume` vs `tradeVolume`) and any field may be
//! absent or null. Every field is therefore optional here; mapping onto the
//! canonical record model happens in the library's normalization layer.

mod liquidation;
pub use self::liquidation::RawLiquidation;

mod order;
pub use self::order::RawOrder;

mod pool;
pub use self::pool::RawPool;

mod price;
pub use self::price::{SimplePrice, UsdQuote};

mod revenue;
pub use self::revenue::RawRevenue;

mod user;
pub use self::user::{RawUserActivity, RawUserMetrics};

mod wallet;
pub use self::wallet::{RawTopWallet, RawTrackedWallet};
