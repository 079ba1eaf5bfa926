//! Request handlers for API endpoints
//!
//! Handlers extract request data, call a service and let [`crate::Error`]
//! shape failures.

pub mod cards;
pub mod listings;
pub mod metrics;

pub use cards::*;
pub use listings::*;
pub use metrics::*;
