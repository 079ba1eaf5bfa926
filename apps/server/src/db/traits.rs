//! Storage traits for the marketplace
//!
//! Services only see these traits; the Postgres stores and the in-memory
//! stores implement them.

use crate::{
    db::search::{ListingQuery, MarketListingSortBy, PageRequest},
    models::{Listing, MarketListing, MarketListingSection, NewMarketListing, Page},
    Result,
};
use async_trait::async_trait;

/// Read access to listings.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Run a listing search.
    ///
    /// Returns the requested page of matches, ordered per the query's page
    /// request, together with the total number of matches.
    async fn search(&self, query: &ListingQuery) -> Result<Page<Listing>>;

    /// Whether a business with this id exists.
    async fn business_exists(&self, business_id: i64) -> Result<bool>;
}

/// Storage for community marketplace cards.
#[async_trait]
pub trait MarketListingStore: Send + Sync {
    /// Store a new card and return its assigned id.
    async fn insert(&self, card: NewMarketListing) -> Result<i64>;

    /// One page of the cards in `section`, plus the section's total card count.
    async fn list_by_section(
        &self,
        section: MarketListingSection,
        page: &PageRequest<MarketListingSortBy>,
    ) -> Result<Page<MarketListing>>;
}
