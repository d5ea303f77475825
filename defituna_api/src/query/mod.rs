mod common;
pub(crate) use self::common::NoQuery;
pub use self::common::{Query, TimeWindowQuery, TopWalletsQuery};
