//! Service layer - business rules between the HTTP handlers and the stores

pub mod listing;
pub mod market_listing;

pub use listing::ListingService;
pub use market_listing::MarketListingService;
