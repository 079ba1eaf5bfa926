use crate::api::handlers::cards;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn card_routes() -> Router<AppState> {
    Router::new().route("/cards", get(cards::list_cards).post(cards::create_card))
}
