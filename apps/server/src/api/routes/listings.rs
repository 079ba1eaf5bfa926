use crate::api::handlers::listings;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/listings/search", get(listings::search_listings))
        .route(
            "/businesses/:business_id/listings",
            get(listings::business_listings),
        )
}
