mod client;
mod errors;
mod price;
mod query;
pub mod types;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::price::PriceClient;
pub use self::query::{Query, TimeWindowQuery, TopWalletsQuery};
