use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::strategy::{pick_indices, Strategy};
use crate::catalog::{total_pages, CatalogItem, PageFetcher};
use crate::selection::{SelectionMap, SelectionRecord, SelectionStore};

/// What the user asked the bulk picker for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkRequest {
    /// Target number of items; zero or less closes the picker without effect
    pub count: i64,
    pub strategy: Strategy,
    /// Keep the existing selection and add to it, instead of replacing it
    pub add_to_existing: bool,
}

impl BulkRequest {
    pub fn new(count: i64, strategy: Strategy, add_to_existing: bool) -> Self {
        Self {
            count,
            strategy,
            add_to_existing,
        }
    }
    
    /// Target count, or `None` when the request is a no-op
    pub fn target(&self) -> Option<usize> {
        if self.count <= 0 {
            None
        } else {
            Some(usize::try_from(self.count).unwrap_or(usize::MAX))
        }
    }
}

/// The page the user is looking at when the picker runs
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Current page (1-based)
    pub page: u32,
    pub page_size: u32,
    /// Items already loaded for the current page
    pub items: Vec<CatalogItem>,
    /// Total record count as last reported by the catalog
    pub total_records: u64,
}

/// Items gathered and picked, ready to be committed to the store
#[derive(Debug, Clone)]
pub struct BulkPlan {
    pub request: BulkRequest,
    /// Newly picked records, in pick order
    pub picked: SelectionMap,
    /// Number of items the picks were drawn from
    pub available: usize,
    /// Pages fetched beyond the current one, in request order
    pub pages_fetched: Vec<u32>,
    /// Pages whose fetch failed and contributed nothing
    pub failed_pages: Vec<u32>,
}

impl BulkPlan {
    /// Selection the store should hold after this plan is committed
    pub fn resulting_selection(&self, existing: &SelectionMap) -> SelectionMap {
        if self.request.add_to_existing {
            let mut result = existing.clone();
            result.extend_from(&self.picked);
            result
        } else {
            self.picked.clone()
        }
    }
    
    /// Replace the store's contents with the resulting selection in one merge
    pub fn commit(self, store: &mut SelectionStore) -> BulkReport {
        let result = self.resulting_selection(store.map());
        store.merge(result, true);
        
        info!(
            "Bulk {} selection picked {} of {} items ({} now selected)",
            self.request.strategy,
            self.picked.len(),
            self.available,
            store.len()
        );
        
        BulkReport {
            picked: self.picked.len(),
            available: self.available,
            pages_fetched: self.pages_fetched,
            failed_pages: self.failed_pages,
            selection_size: store.len(),
        }
    }
}

/// Summary of a committed bulk selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport {
    pub picked: usize,
    pub available: usize,
    pub pages_fetched: Vec<u32>,
    pub failed_pages: Vec<u32>,
    pub selection_size: usize,
}

/// Outcome of triggering the bulk picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    /// The count was zero or negative; nothing was fetched or changed
    Skipped,
    /// Another bulk selection is still running
    Busy,
    Completed(BulkReport),
}

/// Marks a bulk selection as running until dropped
#[derive(Debug)]
pub struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Runs bulk selections, at most one at a time
#[derive(Debug, Clone, Default)]
pub struct BulkSelector {
    in_flight: Arc<AtomicBool>,
}

impl BulkSelector {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Whether a bulk selection is running
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
    
    /// Claim the in-flight flag, `None` if it is already held
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                flag: Arc::clone(&self.in_flight),
            })
    }
    
    /// Gather, pick and commit in one call
    pub async fn run<R: Rng + ?Sized>(
        &self,
        request: BulkRequest,
        context: PageContext,
        fetcher: &dyn PageFetcher,
        store: &mut SelectionStore,
        rng: &mut R,
    ) -> BulkOutcome {
        if request.target().is_none() {
            return BulkOutcome::Skipped;
        }
        let Some(_guard) = self.try_begin() else {
            debug!("Bulk selection already running, ignoring trigger");
            return BulkOutcome::Busy;
        };
        
        match plan(request, context, fetcher, rng).await {
            Some(plan) => BulkOutcome::Completed(plan.commit(store)),
            None => BulkOutcome::Skipped,
        }
    }
}

/// Gather enough items and pick from them, without touching the store.
///
/// Returns `None` for a no-op request.
pub async fn plan<R: Rng + ?Sized>(
    request: BulkRequest,
    context: PageContext,
    fetcher: &dyn PageFetcher,
    rng: &mut R,
) -> Option<BulkPlan> {
    let target = request.target()?;
    let gathered = gather(target, context, fetcher).await;
    
    let available = gathered.items.len();
    let picked = pick_indices(request.strategy, target, available, rng)
        .into_iter()
        .map(|index| SelectionRecord::from(&gathered.items[index]))
        .collect();
    
    Some(BulkPlan {
        request,
        picked,
        available,
        pages_fetched: gathered.pages_fetched,
        failed_pages: gathered.failed_pages,
    })
}

struct Gathered {
    items: Vec<CatalogItem>,
    pages_fetched: Vec<u32>,
    failed_pages: Vec<u32>,
}

/// Accumulate items from the current page onward until `target` are held or
/// the catalog runs out of pages. Fetches are strictly sequential.
async fn gather(target: usize, context: PageContext, fetcher: &dyn PageFetcher) -> Gathered {
    let last_page = total_pages(context.total_records, context.page_size);
    let mut items = context.items;
    let mut cursor = context.page;
    let mut pages_fetched = Vec::new();
    let mut failed_pages = Vec::new();
    
    while items.len() < target && cursor < last_page {
        cursor += 1;
        pages_fetched.push(cursor);
        
        match fetcher.fetch_page(cursor, context.page_size).await {
            Ok(page) if page.is_empty() => {
                debug!("Bulk gather: page {} came back empty, the total has drifted", cursor);
            }
            Ok(page) => {
                debug!("Bulk gather: page {} added {} items", cursor, page.items.len());
                items.extend(page.items);
            }
            Err(e) => {
                warn!(fetcher = fetcher.name(), "Bulk gather: page {} failed, skipping it: {}", cursor, e);
                failed_pages.push(cursor);
            }
        }
    }
    
    Gathered {
        items,
        pages_fetched,
        failed_pages,
    }
}
