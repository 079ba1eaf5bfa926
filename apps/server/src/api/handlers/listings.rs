//! Listing handlers
//!
//! - GET /listings/search
//! - GET /businesses/:business_id/listings

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    api::extractors::QueryItems,
    models::{Listing, Page},
    state::AppState,
    Result,
};

/// Search all listings.
pub async fn search_listings(
    State(state): State<AppState>,
    QueryItems(items): QueryItems,
) -> Result<Json<Page<Listing>>> {
    let page = state.listing_service.search(&items).await?;
    Ok(Json(page))
}

/// Listings of one business.
pub async fn business_listings(
    State(state): State<AppState>,
    Path(business_id): Path<i64>,
    QueryItems(items): QueryItems,
) -> Result<Json<Page<Listing>>> {
    let page = state
        .listing_service
        .business_listings(business_id, &items)
        .await?;
    Ok(Json(page))
}
