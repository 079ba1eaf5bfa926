//! Domain models for the marketplace

pub mod business;
pub mod listing;
pub mod market_listing;
pub mod product;

pub use business::{Address, Business, BusinessType};
pub use listing::{InventoryItem, Listing};
pub use market_listing::{
    CreateMarketListing, MarketListing, MarketListingSection, NewMarketListing,
};
pub use product::{NutriScore, NutritionLevel, Product};

use serde::Serialize;

/// One page of results together with the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub results: Vec<T>,
    /// Count of all matching rows, ignoring pagination bounds
    pub total_count: i64,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, total_count: i64) -> Self {
        Self {
            results,
            total_count,
        }
    }
}
