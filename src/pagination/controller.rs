use std::sync::Arc;
use tracing::{debug, warn};

use super::window::PageWindow;
use crate::catalog::{CatalogError, CatalogItem, CatalogPage, CatalogResult, PageFetcher};

/// A started page load.
///
/// The ticket carries the generation it was issued under; applying it after
/// a newer load was started is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    generation: u64,
    page: u32,
    page_size: u32,
}

impl PageTicket {
    /// Requested page (1-based)
    pub fn page(&self) -> u32 {
        self.page
    }
    
    /// Perform the network fetch for this ticket.
    ///
    /// Does not touch the controller, so it can run on a detached task.
    pub async fn fetch(&self, fetcher: &dyn PageFetcher) -> CatalogResult<CatalogPage> {
        fetcher.fetch_page(self.page, self.page_size).await
    }
}

/// Result of applying a finished load to the controller
#[derive(Debug)]
pub enum LoadOutcome {
    /// The page replaced the current items
    Applied,
    /// The fetch failed; the controller now shows an empty page
    Failed(CatalogError),
    /// A newer load was started after this one; the result was dropped
    Stale,
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied)
    }
}

/// Owns the page on screen and the items loaded for it
pub struct PaginationController {
    fetcher: Arc<dyn PageFetcher>,
    window: PageWindow,
    items: Vec<CatalogItem>,
    loaded_page: u32,
    iiif_url: Option<String>,
    generation: u64,
    in_flight: Option<u64>,
}

impl PaginationController {
    pub fn new(fetcher: Arc<dyn PageFetcher>, page_size: u32) -> Self {
        Self {
            fetcher,
            window: PageWindow::new(page_size),
            items: Vec::new(),
            loaded_page: 1,
            iiif_url: None,
            generation: 0,
            in_flight: None,
        }
    }
    
    /// Handle to the fetcher, for work that runs outside the controller
    pub fn fetcher(&self) -> Arc<dyn PageFetcher> {
        Arc::clone(&self.fetcher)
    }
    
    pub fn window(&self) -> &PageWindow {
        &self.window
    }
    
    /// Items of the current page, in catalog order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }
    
    /// Page the current items were loaded for.
    ///
    /// Lags behind `window().page()` while a newer load is outstanding.
    pub fn loaded_page(&self) -> u32 {
        self.loaded_page
    }
    
    /// IIIF base advertised by the last successful response
    pub fn iiif_url(&self) -> Option<&str> {
        self.iiif_url.as_deref()
    }
    
    /// Whether the most recently started load is still outstanding
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }
    
    /// Start loading `page` (1-based), superseding any load in flight.
    ///
    /// The window moves to the requested page immediately; its items are
    /// replaced when the matching result is applied.
    pub fn begin_load(&mut self, page: u32) -> PageTicket {
        let page = page.max(1);
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.window.set_page(page);
        
        debug!("Starting load of page {} (generation {})", page, self.generation);
        PageTicket {
            generation: self.generation,
            page,
            page_size: self.window.page_size(),
        }
    }
    
    /// Apply a finished load.
    ///
    /// Items and total are swapped in together. A failure leaves no items and
    /// a zero total and is handed back for the caller to report.
    pub fn apply(&mut self, ticket: PageTicket, result: CatalogResult<CatalogPage>) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale result for page {} (generation {}, current {})",
                ticket.page, ticket.generation, self.generation
            );
            return LoadOutcome::Stale;
        }
        self.in_flight = None;
        self.loaded_page = ticket.page;
        
        match result {
            Ok(page) => {
                self.window.set_total_records(page.total_records);
                self.items = page.items;
                if page.iiif_url.is_some() {
                    self.iiif_url = page.iiif_url;
                }
                LoadOutcome::Applied
            }
            Err(e) => {
                warn!("Failed to load page {}: {}", ticket.page, e);
                self.items.clear();
                self.window.set_total_records(0);
                LoadOutcome::Failed(e)
            }
        }
    }
    
    /// Load `page` and apply the result in one step
    pub async fn load_page(&mut self, page: u32) -> LoadOutcome {
        let ticket = self.begin_load(page);
        let fetcher = self.fetcher();
        let result = ticket.fetch(fetcher.as_ref()).await;
        self.apply(ticket, result)
    }
    
    /// Load the page a zero-based page-control index points at
    pub async fn on_page_change(&mut self, page_index: u32) -> LoadOutcome {
        self.load_page(page_index.saturating_add(1)).await
    }
    
    /// Ticket for the following page, if there is one
    pub fn next_page(&mut self) -> Option<PageTicket> {
        if self.window.has_next() {
            Some(self.begin_load(self.window.page() + 1))
        } else {
            None
        }
    }
    
    /// Ticket for the preceding page, if there is one
    pub fn previous_page(&mut self) -> Option<PageTicket> {
        if self.window.has_previous() {
            Some(self.begin_load(self.window.page() - 1))
        } else {
            None
        }
    }
    
    pub fn first_page(&mut self) -> PageTicket {
        self.begin_load(1)
    }
    
    pub fn last_page(&mut self) -> PageTicket {
        let last = self.window.total_pages();
        self.begin_load(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::ScriptedFetcher;
    use std::time::Duration;
    
    fn controller(fetcher: ScriptedFetcher, page_size: u32) -> (PaginationController, Arc<ScriptedFetcher>) {
        let fetcher = Arc::new(fetcher);
        let controller = PaginationController::new(fetcher.clone(), page_size);
        (controller, fetcher)
    }
    
    #[tokio::test]
    async fn test_load_page_replaces_items_and_total() {
        let (mut controller, fetcher) = controller(ScriptedFetcher::with_items(30), 12);
        
        let outcome = controller.load_page(2).await;
        assert!(outcome.is_applied());
        assert_eq!(controller.window().page(), 2);
        assert_eq!(controller.window().total_records(), 30);
        assert_eq!(controller.window().total_pages(), 3);
        assert_eq!(controller.items().len(), 12);
        assert_eq!(controller.items()[0].id, 13);
        assert!(!controller.is_loading());
        assert_eq!(fetcher.calls(), vec![2]);
    }
    
    #[tokio::test]
    async fn test_failed_load_empties_page() {
        let (mut controller, _) = controller(ScriptedFetcher::with_items(30).failing_on(2), 12);
        controller.load_page(1).await;
        assert_eq!(controller.items().len(), 12);
        
        let outcome = controller.load_page(2).await;
        assert!(matches!(outcome, LoadOutcome::Failed(CatalogError::Status { status: 503, .. })));
        assert!(controller.items().is_empty());
        assert_eq!(controller.window().total_records(), 0);
    }
    
    #[tokio::test]
    async fn test_zero_based_page_change() {
        let (mut controller, fetcher) = controller(ScriptedFetcher::with_items(30), 12);
        
        assert!(controller.on_page_change(0).await.is_applied());
        assert_eq!(controller.window().page(), 1);
        
        assert!(controller.on_page_change(2).await.is_applied());
        assert_eq!(controller.window().page(), 3);
        assert_eq!(controller.items().len(), 6);
        assert_eq!(fetcher.calls(), vec![1, 3]);
    }
    
    #[tokio::test]
    async fn test_loaded_page_lags_until_applied() {
        let (mut controller, fetcher) = controller(ScriptedFetcher::with_items(30), 12);
        controller.load_page(1).await;
        
        let ticket = controller.next_page().unwrap();
        assert_eq!(controller.window().page(), 2);
        assert_eq!(controller.loaded_page(), 1);
        assert_eq!(controller.items()[0].id, 1);
        
        let result = ticket.fetch(fetcher.as_ref()).await;
        controller.apply(ticket, result);
        assert_eq!(controller.loaded_page(), 2);
        assert_eq!(controller.items()[0].id, 13);
    }
    
    #[tokio::test]
    async fn test_superseded_result_is_discarded() {
        let fetcher = ScriptedFetcher::with_items(40).delayed_on(2, Duration::from_millis(50));
        let (mut controller, fetcher) = controller(fetcher, 10);
        
        let slow = controller.begin_load(2);
        let fast = controller.begin_load(3);
        
        let (slow_result, fast_result) = tokio::join!(
            slow.fetch(fetcher.as_ref()),
            fast.fetch(fetcher.as_ref()),
        );
        
        assert!(controller.apply(fast, fast_result).is_applied());
        assert!(matches!(controller.apply(slow, slow_result), LoadOutcome::Stale));
        
        assert_eq!(controller.window().page(), 3);
        assert_eq!(controller.items()[0].id, 21);
    }
    
    #[tokio::test]
    async fn test_result_resolving_before_newer_load_is_still_stale() {
        let (mut controller, fetcher) = controller(ScriptedFetcher::with_items(40), 10);
        
        let first = controller.begin_load(2);
        let first_result = first.fetch(fetcher.as_ref()).await;
        let second = controller.begin_load(4);
        
        assert!(matches!(controller.apply(first, first_result), LoadOutcome::Stale));
        assert!(controller.items().is_empty());
        assert!(controller.is_loading());
        
        let second_result = second.fetch(fetcher.as_ref()).await;
        assert!(controller.apply(second, second_result).is_applied());
        assert_eq!(controller.items()[0].id, 31);
    }
    
    #[tokio::test]
    async fn test_stale_failure_does_not_clear_items() {
        let fetcher = ScriptedFetcher::with_items(40).failing_on(2);
        let (mut controller, fetcher) = controller(fetcher, 10);
        
        let failing = controller.begin_load(2);
        let failing_result = failing.fetch(fetcher.as_ref()).await;
        controller.load_page(3).await;
        
        assert!(matches!(controller.apply(failing, failing_result), LoadOutcome::Stale));
        assert_eq!(controller.items().len(), 10);
        assert_eq!(controller.window().total_records(), 40);
    }
    
    #[tokio::test]
    async fn test_page_navigation() {
        let (mut controller, fetcher) = controller(ScriptedFetcher::with_items(100), 20);
        controller.load_page(1).await;
        assert_eq!(controller.window().total_pages(), 5);
        
        assert!(controller.previous_page().is_none());
        
        let ticket = controller.next_page().unwrap();
        assert_eq!(ticket.page(), 2);
        let result = ticket.fetch(fetcher.as_ref()).await;
        controller.apply(ticket, result);
        
        let ticket = controller.last_page();
        assert_eq!(ticket.page(), 5);
        let result = ticket.fetch(fetcher.as_ref()).await;
        controller.apply(ticket, result);
        assert!(controller.next_page().is_none());
        
        assert_eq!(controller.first_page().page(), 1);
    }
}
