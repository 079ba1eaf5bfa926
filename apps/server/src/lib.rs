//! Wasteless marketplace server
//!
//! Listing search with a small query language (quoted full matches, `AND`/`OR`
//! connectives), attribute filters and pagination, plus the community
//! marketplace card board.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
