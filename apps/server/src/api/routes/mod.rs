//! Route tables, merged by [`crate::api::create_router`]

pub mod cards;
pub mod listings;
pub mod metrics;
