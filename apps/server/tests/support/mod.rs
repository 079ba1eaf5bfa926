pub mod assertions;
pub mod builders;
pub mod fixtures;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt as _;
use wasteless::{
    api::create_router,
    config::StorageBackend,
    db::{InMemoryListingStore, InMemoryMarketListingStore},
    models::Listing,
    AppState, Config,
};

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub listings: InMemoryListingStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::new_with_config(|_| {})
    }

    pub fn new_with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;
        configure(&mut config);

        let listings = InMemoryListingStore::new();
        let state = AppState::with_stores(
            config,
            Arc::new(listings.clone()),
            Arc::new(InMemoryMarketListingStore::new()),
        );
        let router = create_router(state.clone());

        Self {
            router,
            state,
            listings,
        }
    }

    /// App preloaded with [`catalog`].
    pub async fn with_catalog() -> Self {
        let app = Self::new();
        app.seed(catalog()).await;
        app
    }

    pub async fn seed(&self, listings: impl IntoIterator<Item = Listing>) {
        for listing in listings {
            self.listings.insert(listing).await;
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "example.org")
            .header("content-type", "application/json")
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }

    /// GET and decode a JSON body, asserting the status.
    pub async fn get_json(
        &self,
        path_and_query: &str,
        expected: StatusCode,
    ) -> anyhow::Result<serde_json::Value> {
        let (status, _headers, body) = self.request(Method::GET, path_and_query, None).await?;
        assert_status(status, expected, path_and_query);
        serde_json::from_slice(&body).context("decode JSON response")
    }
}
