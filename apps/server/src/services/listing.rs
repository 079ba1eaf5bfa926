//! Listing service - listing search and per-business listings
//!
//! Validates and normalizes request parameters, assembles the search
//! predicate and hands it to the [`ListingStore`]. Invalid input is rejected
//! before the store is touched.

use std::sync::Arc;

use crate::{
    db::search::{
        build_listing_predicate, normalize, Field, ListingQuery, ListingSortBy, PageRequest,
        Predicate, RawListingSearchParams, SearchParams, Value,
    },
    db::ListingStore,
    metrics,
    models::{Listing, Page},
    Error, Result,
};

pub struct ListingService {
    store: Arc<dyn ListingStore>,
    max_search_terms: usize,
}

impl ListingService {
    pub fn new(store: Arc<dyn ListingStore>, max_search_terms: usize) -> Self {
        Self {
            store,
            max_search_terms,
        }
    }

    /// Search listings from decoded query pairs.
    ///
    /// GET /listings/search?searchQuery=...&...
    #[tracing::instrument(name = "listing_service.search", skip_all)]
    pub async fn search(&self, query_items: &[(String, String)]) -> Result<Page<Listing>> {
        let result = async {
            let raw = RawListingSearchParams::from_items(query_items)?;
            self.search_with(normalize(raw)?).await
        }
        .await;
        metrics::record_search("listings", &result);
        result
    }

    /// Search with already normalized parameters.
    pub async fn search_with(&self, params: SearchParams) -> Result<Page<Listing>> {
        let page = params.page_request()?;
        let predicate = build_listing_predicate(&params, self.max_search_terms);
        metrics::SEARCH_PREDICATE_LEAVES
            .with_label_values(&["listings"])
            .observe(predicate.leaf_count() as f64);

        tracing::info!(
            query = %params.query,
            sort_by = ?page.sort_by,
            ascending = page.ascending,
            start = page.start,
            end = page.end,
            "Searching listings"
        );

        let result = self.store.search(&ListingQuery::new(predicate, page)).await?;
        tracing::debug!(
            total = result.total_count,
            returned = result.results.len(),
            "Listing search returned"
        );
        Ok(result)
    }

    /// Listings of one business, paginated and sorted.
    ///
    /// GET /businesses/:business_id/listings
    #[tracing::instrument(name = "listing_service.business_listings", skip(self, query_items))]
    pub async fn business_listings(
        &self,
        business_id: i64,
        query_items: &[(String, String)],
    ) -> Result<Page<Listing>> {
        let result = async {
            let page = PageRequest::from_items(query_items, ListingSortBy::Created)?;
            if !self.store.business_exists(business_id).await? {
                return Err(Error::BusinessNotFound(business_id));
            }
            let predicate = Predicate::equals(Field::BusinessId, Value::Integer(business_id));
            self.store.search(&ListingQuery::new(predicate, page)).await
        }
        .await;
        metrics::record_search("business_listings", &result);
        result
    }
}
