//! Remote art catalog access
//!
//! This module holds the catalog data model, the `PageFetcher` seam the rest
//! of the application pulls pages through, and the HTTP client for the
//! Art Institute of Chicago public API.

pub mod artic;
pub mod errors;
pub mod fetcher;
pub mod types;

pub use artic::*;
pub use errors::*;
pub use fetcher::*;
pub use types::*;

#[cfg(test)]
pub(crate) use fetcher::testing;
