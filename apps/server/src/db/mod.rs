//! Database layer - storage traits and backends

pub mod memory;
pub mod search;
pub mod store;
pub mod traits;

pub use memory::{InMemoryListingStore, InMemoryMarketListingStore};
pub use store::{PostgresListingStore, PostgresMarketListingStore};
pub use traits::{ListingStore, MarketListingStore};
