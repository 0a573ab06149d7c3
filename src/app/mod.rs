//! Core application logic and orchestration
//!
//! This module wires the catalog client, pagination, selection store and
//! bulk picker together and routes table events to them.

mod events;

pub use events::*;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{
    bulk::{BulkOutcome, BulkRequest, BulkSelector, PageContext},
    catalog::{ArticClient, PageFetcher},
    config::Config,
    pagination::{LoadOutcome, PaginationController},
    selection::{BlobStore, FileBlobStore, MemoryBlobStore, SelectionStore},
};

/// What handling a table event produced
#[derive(Debug)]
pub enum EventOutcome {
    Page(LoadOutcome),
    Bulk(BulkOutcome),
    SelectionChanged,
}

/// Main application structure
pub struct App {
    config: Config,
    pagination: PaginationController,
    selection: SelectionStore,
    bulk: BulkSelector,
}

impl App {
    /// Create the application against the live catalog.
    ///
    /// With `ephemeral` the selection lives in memory only.
    pub fn new(config: Config, ephemeral: bool) -> Result<Self> {
        debug!("Creating new App instance");
        
        let fetcher: Arc<dyn PageFetcher> = Arc::new(ArticClient::new(config.client_options())?);
        let blob: Arc<dyn BlobStore> = if ephemeral {
            info!("Selection will not be persisted");
            Arc::new(MemoryBlobStore::new())
        } else {
            Arc::new(FileBlobStore::new(&config.data_dir))
        };
        
        Ok(Self::with_parts(config, fetcher, blob))
    }
    
    /// Create the application from explicit collaborators
    pub fn with_parts(config: Config, fetcher: Arc<dyn PageFetcher>, blob: Arc<dyn BlobStore>) -> Self {
        let pagination = PaginationController::new(fetcher, config.page_size);
        let selection = SelectionStore::load(blob, config.storage_key.clone());
        
        Self {
            config,
            pagination,
            selection,
            bulk: BulkSelector::new(),
        }
    }
    
    pub fn config(&self) -> &Config {
        &self.config
    }
    
    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }
    
    pub fn pagination_mut(&mut self) -> &mut PaginationController {
        &mut self.pagination
    }
    
    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }
    
    pub fn selection_mut(&mut self) -> &mut SelectionStore {
        &mut self.selection
    }
    
    pub fn bulk(&self) -> &BulkSelector {
        &self.bulk
    }
    
    /// IIIF base for thumbnails: the catalog's own if it sent one
    pub fn iiif_base(&self) -> &str {
        self.pagination
            .iiif_url()
            .unwrap_or(self.config.iiif_base_url.as_str())
    }
    
    /// Snapshot of the loaded page for the bulk picker.
    ///
    /// Uses the page the items came from, which differs from the window's
    /// page while a newer load is outstanding.
    pub fn page_context(&self) -> PageContext {
        let window = self.pagination.window();
        PageContext {
            page: self.pagination.loaded_page(),
            page_size: window.page_size(),
            items: self.pagination.items().to_vec(),
            total_records: window.total_records(),
        }
    }
    
    /// Load a page (1-based), logging a failure
    pub async fn load_page(&mut self, page: u32) -> LoadOutcome {
        let outcome = self.pagination.load_page(page).await;
        self.report_load(&outcome);
        outcome
    }
    
    fn report_load(&self, outcome: &LoadOutcome) {
        if let LoadOutcome::Failed(e) = outcome {
            error!("Could not load page {}: {}", self.pagination.window().page(), e);
        }
    }
    
    /// Route a table event to the component that owns it
    pub async fn handle_event(&mut self, event: TableEvent) -> Result<EventOutcome> {
        debug!("Handling table event: {:?}", event);
        
        let outcome = match event {
            TableEvent::PageChanged { page_index } => {
                let outcome = self.pagination.on_page_change(page_index).await;
                self.report_load(&outcome);
                EventOutcome::Page(outcome)
            }
            TableEvent::RowToggled { item, checked } => {
                self.selection.toggle(&item, checked);
                EventOutcome::SelectionChanged
            }
            TableEvent::BulkSelect {
                count,
                strategy,
                add_to_existing,
            } => {
                let request = BulkRequest::new(count, strategy, add_to_existing);
                let context = self.page_context();
                let fetcher = self.pagination.fetcher();
                let mut rng = StdRng::from_entropy();
                let outcome = self
                    .bulk
                    .run(request, context, fetcher.as_ref(), &mut self.selection, &mut rng)
                    .await;
                EventOutcome::Bulk(outcome)
            }
            TableEvent::SelectionRemoved { id } => {
                self.selection.remove(id);
                EventOutcome::SelectionChanged
            }
            TableEvent::SelectionCleared => {
                self.selection.clear();
                EventOutcome::SelectionChanged
            }
        };
        
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk::{BulkReport, Strategy};
    use crate::catalog::testing::ScriptedFetcher;
    
    fn app(fetcher: ScriptedFetcher, blob: &MemoryBlobStore) -> App {
        App::with_parts(Config::default(), Arc::new(fetcher), Arc::new(blob.clone()))
    }
    
    #[tokio::test]
    async fn test_selection_survives_page_navigation() {
        let blob = MemoryBlobStore::new();
        let mut app = app(ScriptedFetcher::with_items(40), &blob);
        
        app.handle_event(TableEvent::PageChanged { page_index: 0 }).await.unwrap();
        let item = app.pagination().items()[3].clone();
        app.handle_event(TableEvent::RowToggled { item, checked: true }).await.unwrap();
        
        app.handle_event(TableEvent::PageChanged { page_index: 2 }).await.unwrap();
        assert_eq!(app.pagination().window().page(), 3);
        assert!(app.selection().contains(4));
        
        // A fresh session over the same blob sees the selection too
        let reopened = App::with_parts(Config::default(), Arc::new(ScriptedFetcher::with_items(40)), Arc::new(blob.clone()));
        assert!(reopened.selection().contains(4));
    }
    
    #[tokio::test]
    async fn test_bulk_event_uses_loaded_page() {
        let blob = MemoryBlobStore::new();
        let mut app = app(ScriptedFetcher::with_items(10), &blob);
        app.handle_event(TableEvent::PageChanged { page_index: 0 }).await.unwrap();
        
        let outcome = app
            .handle_event(TableEvent::BulkSelect {
                count: 5,
                strategy: Strategy::First,
                add_to_existing: false,
            })
            .await
            .unwrap();
        
        assert!(matches!(
            outcome,
            EventOutcome::Bulk(BulkOutcome::Completed(BulkReport { picked: 5, available: 10, .. }))
        ));
        assert_eq!(app.selection().map().ids(), vec![1, 2, 3, 4, 5]);
    }
    
    #[tokio::test]
    async fn test_remove_and_clear_events() {
        let blob = MemoryBlobStore::new();
        let mut app = app(ScriptedFetcher::with_items(12), &blob);
        app.handle_event(TableEvent::PageChanged { page_index: 0 }).await.unwrap();
        app.handle_event(TableEvent::BulkSelect { count: 3, strategy: Strategy::First, add_to_existing: false })
            .await
            .unwrap();
        
        app.handle_event(TableEvent::SelectionRemoved { id: 2 }).await.unwrap();
        assert_eq!(app.selection().map().ids(), vec![1, 3]);
        
        app.handle_event(TableEvent::SelectionCleared).await.unwrap();
        assert!(app.selection().is_empty());
        assert_eq!(blob.get("selected_artworks").as_deref(), Some("{}"));
    }
    
    #[tokio::test]
    async fn test_failed_page_event_reports_failure() {
        let blob = MemoryBlobStore::new();
        let mut app = app(ScriptedFetcher::with_items(30).failing_on(2), &blob);
        
        let outcome = app.handle_event(TableEvent::PageChanged { page_index: 1 }).await.unwrap();
        assert!(matches!(outcome, EventOutcome::Page(LoadOutcome::Failed(_))));
        assert!(app.pagination().items().is_empty());
    }
    
    #[tokio::test]
    async fn test_page_context_follows_loaded_items() {
        let blob = MemoryBlobStore::new();
        let mut app = app(ScriptedFetcher::with_items(60), &blob);
        app.load_page(1).await;
        
        let ticket = app.pagination_mut().next_page().unwrap();
        let context = app.page_context();
        assert_eq!(ticket.page(), 2);
        assert_eq!(context.page, 1);
        assert_eq!(context.items[0].id, 1);
        
        let result = ticket.fetch(app.pagination().fetcher().as_ref()).await;
        app.pagination_mut().apply(ticket, result);
        let context = app.page_context();
        assert_eq!(context.page, 2);
        assert_eq!(context.items[0].id, 13);
    }
    
    #[test]
    fn test_iiif_base_falls_back_to_config() {
        let app = app(ScriptedFetcher::with_items(1), &MemoryBlobStore::new());
        assert_eq!(app.iiif_base(), crate::catalog::DEFAULT_IIIF_URL);
    }
}
