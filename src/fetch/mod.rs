//! Page fetching for the catalogue site
//!
//! This module contains the HTTP layer of the ingester:
//! - Building the shared client with browser-like headers
//! - Single-GET page fetches with typed failure outcomes
//! - Fixed-delay request pacing

mod client;
mod limiter;

pub use client::{build_http_client, fetch_page, FetchError};
pub use limiter::RateLimiter;
