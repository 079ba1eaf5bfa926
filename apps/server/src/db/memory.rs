//! In-memory storage backend.
//!
//! Evaluates the same [`Predicate`](crate::db::search::Predicate) trees the
//! Postgres store renders to SQL. Used for `storage.backend = "memory"` and by
//! the HTTP tests.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    db::search::{ListingQuery, MarketListingSortBy, PageRequest},
    db::traits::{ListingStore, MarketListingStore},
    models::{Business, Listing, MarketListing, MarketListingSection, NewMarketListing, Page},
    Result,
};

#[derive(Default)]
struct ListingData {
    businesses: BTreeSet<i64>,
    listings: Vec<Listing>,
}

#[derive(Clone, Default)]
pub struct InMemoryListingStore {
    data: Arc<RwLock<ListingData>>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_business(&self, business: &Business) {
        self.data.write().await.businesses.insert(business.id);
    }

    /// Add a listing, registering its business.
    pub async fn insert(&self, listing: Listing) {
        let mut data = self.data.write().await;
        data.businesses.insert(listing.business().id);
        data.listings.push(listing);
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn search(&self, query: &ListingQuery) -> Result<Page<Listing>> {
        let data = self.data.read().await;
        let matched: Vec<Listing> = data
            .listings
            .iter()
            .filter(|l| query.predicate.matches(l))
            .cloned()
            .collect();
        drop(data);

        let total = matched.len() as i64;
        Ok(Page::new(query.page.apply(matched), total))
    }

    async fn business_exists(&self, business_id: i64) -> Result<bool> {
        Ok(self.data.read().await.businesses.contains(&business_id))
    }
}

pub struct InMemoryMarketListingStore {
    cards: RwLock<Vec<MarketListing>>,
    next_id: AtomicI64,
}

impl Default for InMemoryMarketListingStore {
    fn default() -> Self {
        Self {
            cards: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryMarketListingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketListingStore for InMemoryMarketListingStore {
    async fn insert(&self, card: NewMarketListing) -> Result<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut card = card.into_market_listing(id);
        card.keyword_ids.sort_unstable();
        card.keyword_ids.dedup();
        self.cards.write().await.push(card);
        Ok(id)
    }

    async fn list_by_section(
        &self,
        section: MarketListingSection,
        page: &PageRequest<MarketListingSortBy>,
    ) -> Result<Page<MarketListing>> {
        let matched: Vec<MarketListing> = self
            .cards
            .read()
            .await
            .iter()
            .filter(|c| c.section == section)
            .cloned()
            .collect();
        let total = matched.len() as i64;
        Ok(Page::new(page.apply(matched), total))
    }
}
