//! Market listing card handlers
//!
//! - POST /cards
//! - GET  /cards?section=...

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::{
    api::extractors::{JsonBody, QueryItems},
    models::{CreateMarketListing, MarketListing, Page},
    state::AppState,
    Result,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCard {
    pub card_id: i64,
}

pub async fn create_card(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateMarketListing>,
) -> Result<(StatusCode, Json<CreatedCard>)> {
    let card_id = state.market_listing_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(CreatedCard { card_id })))
}

pub async fn list_cards(
    State(state): State<AppState>,
    QueryItems(items): QueryItems,
) -> Result<Json<Page<MarketListing>>> {
    let page = state.market_listing_service.list(&items).await?;
    Ok(Json(page))
}
