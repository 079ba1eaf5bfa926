//! Listing search pipeline
//!
//! Raw query pairs are collected and normalized (`params`), the free-text
//! query is tokenized (`tokenizer`), terms and filters are composed into one
//! [`Predicate`] (`compose`, `filters`), and the predicate is either rendered
//! to SQL (`query_builder`) or evaluated in memory (`evaluate`) together with
//! a validated page (`pagination`).

pub mod compose;
mod escape;
mod evaluate;
pub mod filters;
pub mod pagination;
pub mod params;
pub mod predicate;
pub mod query_builder;
pub mod tokenizer;

pub use compose::build_listing_predicate;
pub use pagination::{
    ListingSortBy, MarketListingSortBy, PageRequest, SortField, DEFAULT_PAGE_END_INDEX,
};
pub use params::{normalize, RawListingSearchParams, SearchKey, SearchParams};
pub use predicate::{Comparison, Field, Predicate, Value};
pub use query_builder::{BindValue, ListingQuery, MarketListingQuery};
