use anyhow::{anyhow, Result};
use clap::Args;
use tracing::debug;

use crate::app::{App, EventOutcome, TableEvent};
use crate::bulk::{BulkOutcome, Strategy};
use crate::catalog::CatalogItem;
use crate::pagination::LoadOutcome;

/// Print one page of the catalog
#[derive(Args)]
pub struct PageCommand {
    /// Page number (1-based)
    #[arg(default_value_t = 1)]
    pub page: u32,

    /// Also print origin, date and image URL
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl PageCommand {
    pub async fn execute(&self, app: &mut App) -> Result<()> {
        load_or_fail(app, self.page).await?;

        let window = *app.pagination().window();
        let range = window.record_range();
        println!(
            "Page {} of {} ({}-{} of {} items)",
            window.page(),
            window.total_pages(),
            if range.is_empty() { range.start } else { range.start + 1 },
            range.end,
            window.total_records()
        );

        for item in app.pagination().items() {
            let mark = if app.selection().contains(item.id) { "[x]" } else { "[ ]" };
            println!("{} {:>8}  {}  -  {}", mark, item.id, item.display_title(), item.display_artist());
            if self.verbose {
                print_details(item, app.iiif_base());
            }
        }
        Ok(())
    }
}

fn print_details(item: &CatalogItem, iiif_base: &str) {
    if let Some(origin) = &item.place_of_origin {
        println!("             origin: {}", origin);
    }
    if let Some(date) = item.date_start {
        println!("             date:   {}", date);
    }
    if let Some(url) = item.image_url(iiif_base) {
        println!("             image:  {}", url);
    }
}

/// Select or deselect an artwork shown on a page
#[derive(Args)]
pub struct ToggleCommand {
    /// Artwork identifier
    pub id: u64,

    /// Page the artwork is on (1-based)
    #[arg(short = 'p', long = "page", default_value_t = 1)]
    pub page: u32,

    /// Deselect instead of select
    #[arg(long = "off")]
    pub off: bool,
}

impl ToggleCommand {
    pub async fn execute(&self, app: &mut App) -> Result<()> {
        load_or_fail(app, self.page).await?;

        let item = app
            .pagination()
            .items()
            .iter()
            .find(|item| item.id == self.id)
            .cloned()
            .ok_or_else(|| anyhow!("Artwork {} is not on page {}", self.id, self.page))?;

        let title = item.display_title().to_string();
        let checked = !self.off;
        app.handle_event(TableEvent::RowToggled { item, checked }).await?;

        println!(
            "{} {} ({} selected)",
            if checked { "Selected" } else { "Deselected" },
            title,
            app.selection().len()
        );
        Ok(())
    }
}

/// Select many artworks at once
#[derive(Args)]
pub struct BulkCommand {
    /// How many artworks to select; zero or less does nothing
    #[arg(allow_hyphen_values = true)]
    pub count: i64,

    /// Which of the gathered artworks to take
    #[arg(short = 's', long = "strategy", value_enum, default_value_t = Strategy::First)]
    pub strategy: Strategy,

    /// Add to the current selection instead of replacing it
    #[arg(short = 'a', long = "add")]
    pub add: bool,

    /// Page to start gathering from (1-based)
    #[arg(short = 'p', long = "page", default_value_t = 1)]
    pub page: u32,
}

impl BulkCommand {
    pub async fn execute(&self, app: &mut App) -> Result<()> {
        if self.count <= 0 {
            println!("Nothing to select");
            return Ok(());
        }

        // The start page only seeds the buffer; a failure there is not fatal
        if !app.load_page(self.page).await.is_applied() {
            println!("Page {} could not be loaded, gathering from the pages after it", self.page);
        }

        let event = TableEvent::BulkSelect {
            count: self.count,
            strategy: self.strategy,
            add_to_existing: self.add,
        };

        match app.handle_event(event).await? {
            EventOutcome::Bulk(BulkOutcome::Completed(report)) => {
                println!(
                    "Picked {} of {} gathered artworks ({} strategy); {} now selected",
                    report.picked,
                    report.available,
                    self.strategy,
                    report.selection_size
                );
                if !report.failed_pages.is_empty() {
                    println!("Pages that failed to load and were skipped: {:?}", report.failed_pages);
                }
            }
            EventOutcome::Bulk(BulkOutcome::Skipped) => println!("Nothing to select"),
            EventOutcome::Bulk(BulkOutcome::Busy) => println!("A bulk selection is already running"),
            other => debug!("Unexpected outcome for bulk event: {:?}", other),
        }

        if let Some(e) = app.selection().last_persist_error() {
            println!("Warning: selection could not be saved: {}", e);
        }
        Ok(())
    }
}

/// List the current selection
#[derive(Args)]
pub struct SelectedCommand {
    /// Print the selection as JSON
    #[arg(long = "json")]
    pub json: bool,
}

impl SelectedCommand {
    pub fn execute(&self, app: &App) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(app.selection().map())?);
            return Ok(());
        }

        if app.selection().is_empty() {
            println!("No artworks selected");
            return Ok(());
        }

        for record in app.selection().records() {
            println!("{:>8}  {}  -  {}", record.id, record.display_title(), record.display_artist());
        }
        println!("{} selected", app.selection().len());
        Ok(())
    }
}

/// Remove one artwork from the selection
#[derive(Args)]
pub struct RemoveCommand {
    /// Artwork identifier
    pub id: u64,
}

impl RemoveCommand {
    pub async fn execute(&self, app: &mut App) -> Result<()> {
        if !app.selection().contains(self.id) {
            println!("Artwork {} is not selected", self.id);
            return Ok(());
        }
        app.handle_event(TableEvent::SelectionRemoved { id: self.id }).await?;
        println!("Removed {} ({} selected)", self.id, app.selection().len());
        Ok(())
    }
}

/// Load a page for a command that cannot do anything useful without it
async fn load_or_fail(app: &mut App, page: u32) -> Result<()> {
    match app.load_page(page).await {
        LoadOutcome::Applied | LoadOutcome::Stale => Ok(()),
        LoadOutcome::Failed(e) => Err(anyhow!("Failed to load page {}: {}", page, e)),
    }
}
