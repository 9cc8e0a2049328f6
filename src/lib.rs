//! store-api - a product listing service with query filtering and pagination
//!
//! Translates URL query parameters into a bounded document query and
//! executes it against an in-process collection.

pub mod api;
pub mod cli;
pub mod config;
pub mod observability;
pub mod products;
pub mod store;
