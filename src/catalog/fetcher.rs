//! The page-fetching seam between the application and the remote catalog

use async_trait::async_trait;

use super::{
    errors::CatalogResult,
    types::CatalogPage,
};

/// Source of catalog pages.
///
/// `page` is 1-based and `limit` is the page size. Implementations report
/// every transport, status or decoding failure as an error; deciding what a
/// failure means is left to the call site.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page of items together with the catalog's total record count
    async fn fetch_page(&self, page: u32, limit: u32) -> CatalogResult<CatalogPage>;
    
    /// Short name used in log lines
    fn name(&self) -> &str;
}
