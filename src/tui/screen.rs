//! State and event handling for the artwork table screen

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::events::Event;
use super::keys::{Action, KeyMap};
use crate::app::{App, TableEvent};
use crate::bulk::{self, BulkRequest, InFlightGuard, Strategy};
use crate::pagination::{LoadOutcome, PageTicket};

/// Inputs of the bulk-select dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDialog {
    pub count_input: String,
    pub strategy: Strategy,
    pub add_to_existing: bool,
}

impl Default for BulkDialog {
    fn default() -> Self {
        Self {
            count_input: String::new(),
            strategy: Strategy::First,
            add_to_existing: true,
        }
    }
}

impl BulkDialog {
    /// The request the dialog currently describes; blank counts as zero
    pub fn request(&self) -> BulkRequest {
        let count = self.count_input.parse::<i64>().unwrap_or(0);
        BulkRequest::new(count, self.strategy, self.add_to_existing)
    }
    
    fn apply(&mut self, action: Action) {
        match action {
            Action::DialogDigit(digit) if self.count_input.len() < 6 => self.count_input.push(digit),
            Action::DialogMinus if self.count_input.is_empty() => self.count_input.push('-'),
            Action::DialogBackspace => {
                self.count_input.pop();
            }
            Action::DialogCycleStrategy => self.strategy = self.strategy.next(),
            Action::DialogToggleAdd => self.add_to_existing = !self.add_to_existing,
            _ => {}
        }
    }
}

/// Everything the table screen tracks besides the app itself
#[derive(Debug, Default)]
pub struct TableScreen {
    pub cursor: usize,
    pub dialog: Option<BulkDialog>,
    pub status: Option<String>,
    pub should_quit: bool,
    keys: KeyMap,
    bulk_guard: Option<InFlightGuard>,
}

impl TableScreen {
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn key_map(&self) -> &KeyMap {
        &self.keys
    }
    
    /// Whether a bulk selection started from this screen is still running
    pub fn bulk_running(&self) -> bool {
        self.bulk_guard.is_some()
    }
    
    /// Handle one event
    pub async fn handle_event(
        &mut self,
        app: &mut App,
        event: Event,
        sender: &mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        match event {
            Event::Key(key) => {
                let action = if self.dialog.is_some() {
                    self.key_map().dialog_action(&key)
                } else {
                    self.key_map().table_action(&key)
                };
                if let Some(action) = action {
                    self.handle_action(app, action, sender).await?;
                }
            }
            Event::PageLoaded { ticket, result } => {
                match app.pagination_mut().apply(ticket, result) {
                    LoadOutcome::Applied => {
                        let len = app.pagination().items().len();
                        self.cursor = self.cursor.min(len.saturating_sub(1));
                    }
                    LoadOutcome::Failed(e) => {
                        error!("Could not load page {}: {}", ticket.page(), e);
                        self.cursor = 0;
                        self.status = Some(format!("Failed to load page {}: {}", ticket.page(), e));
                    }
                    LoadOutcome::Stale => debug!("Ignored superseded load of page {}", ticket.page()),
                }
            }
            Event::BulkPlanned(plan) => {
                if let Some(plan) = plan {
                    let report = plan.commit(app.selection_mut());
                    let mut status = format!(
                        "Picked {} of {} gathered artworks, {} selected",
                        report.picked, report.available, report.selection_size
                    );
                    if !report.failed_pages.is_empty() {
                        status.push_str(&format!(" (skipped failed pages {:?})", report.failed_pages));
                    }
                    self.status = Some(status);
                }
                self.bulk_guard = None;
            }
            Event::Tick | Event::Resize(_, _) => {}
        }
        Ok(())
    }
    
    async fn handle_action(
        &mut self,
        app: &mut App,
        action: Action,
        sender: &mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::CursorUp => self.cursor = self.cursor.saturating_sub(1),
            Action::CursorDown => {
                let len = app.pagination().items().len();
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            Action::ToggleRow => {
                if let Some(item) = app.pagination().items().get(self.cursor).cloned() {
                    let checked = !app.selection().contains(item.id);
                    app.handle_event(TableEvent::RowToggled { item, checked }).await?;
                    self.report_persist_error(app);
                }
            }
            Action::NextPage => {
                if let Some(ticket) = app.pagination_mut().next_page() {
                    self.start_load(app, ticket, sender);
                }
            }
            Action::PreviousPage => {
                if let Some(ticket) = app.pagination_mut().previous_page() {
                    self.start_load(app, ticket, sender);
                }
            }
            Action::FirstPage => {
                let ticket = app.pagination_mut().first_page();
                self.start_load(app, ticket, sender);
            }
            Action::LastPage => {
                let ticket = app.pagination_mut().last_page();
                self.start_load(app, ticket, sender);
            }
            Action::OpenBulkDialog => {
                if self.bulk_running() || app.bulk().is_running() {
                    self.status = Some("A bulk selection is already running".to_string());
                } else if app.pagination().is_loading() {
                    self.status = Some(page_loading_status(app));
                } else {
                    self.dialog = Some(BulkDialog::default());
                }
            }
            Action::ClearSelection => {
                app.handle_event(TableEvent::SelectionCleared).await?;
                self.status = Some("Selection cleared".to_string());
                self.report_persist_error(app);
            }
            Action::DialogConfirm => {
                // Bulk picks seed from the loaded items, which must match the window's page
                if app.pagination().is_loading() {
                    self.status = Some(page_loading_status(app));
                } else if let Some(dialog) = self.dialog.take() {
                    self.start_bulk(app, dialog.request(), sender);
                }
            }
            Action::DialogCancel => self.dialog = None,
            other => {
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.apply(other);
                }
            }
        }
        Ok(())
    }
    
    /// Fetch the ticket's page on a background task
    pub fn start_load(&mut self, app: &App, ticket: PageTicket, sender: &mpsc::UnboundedSender<Event>) {
        self.cursor = 0;
        let fetcher = app.pagination().fetcher();
        let sender = sender.clone();
        tokio::spawn(async move {
            let result = ticket.fetch(fetcher.as_ref()).await;
            if sender.send(Event::PageLoaded { ticket, result }).is_err() {
                debug!("Screen closed before page {} arrived", ticket.page());
            }
        });
    }
    
    /// Run the gather phase of a bulk selection on a background task
    fn start_bulk(&mut self, app: &App, request: BulkRequest, sender: &mpsc::UnboundedSender<Event>) {
        if request.target().is_none() {
            self.status = Some("Nothing to select".to_string());
            return;
        }
        let Some(guard) = app.bulk().try_begin() else {
            self.status = Some("A bulk selection is already running".to_string());
            return;
        };
        
        info!(
            "Starting bulk selection of {} ({}, add: {})",
            request.count, request.strategy, request.add_to_existing
        );
        self.bulk_guard = Some(guard);
        self.status = Some(format!("Selecting {} artworks…", request.count));
        
        let context = app.page_context();
        let fetcher = app.pagination().fetcher();
        let sender = sender.clone();
        tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let plan = bulk::plan(request, context, fetcher.as_ref(), &mut rng).await;
            if sender.send(Event::BulkPlanned(plan)).is_err() {
                debug!("Screen closed before bulk selection finished");
            }
        });
    }
    
    fn report_persist_error(&mut self, app: &App) {
        if let Some(e) = app.selection().last_persist_error() {
            self.status = Some(format!("Selection not saved: {}", e));
        }
    }
}

fn page_loading_status(app: &App) -> String {
    format!("Page {} is still loading", app.pagination().window().page())
}
