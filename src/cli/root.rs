use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::app::App;
use crate::config::Config;
use crate::tui;
use super::commands::{BulkCommand, PageCommand, RemoveCommand, SelectedCommand, ToggleCommand};

/// catpick - browse the public art catalog and keep a selection of artworks
#[derive(Parser)]
#[command(
    name = "catpick",
    version,
    about = "Browse a public art catalog page by page and keep a persistent selection",
    long_about = r#"catpick lists artworks from the Art Institute of Chicago public API,
lets you tick rows, remembers the selection between runs and can pick
many items at once across pages.

Examples:
  catpick                               # Start the interactive table
  catpick page 3                        # Print page 3
  catpick toggle 27992 --page 1         # Select an artwork shown on page 1
  catpick bulk 20 --strategy random     # Pick 20 artworks at random
  catpick selected --json               # Dump the current selection"#
)]
pub struct Cli {
    /// Configuration file to use instead of the default locations
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Override the configured page size
    #[arg(long = "page-size", global = true)]
    pub page_size: Option<u32>,

    /// Keep the selection in memory only
    #[arg(long = "ephemeral", global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print one page of the catalog
    Page(PageCommand),
    /// Select or deselect an artwork shown on a page
    Toggle(ToggleCommand),
    /// Select many artworks at once
    Bulk(BulkCommand),
    /// List the current selection
    Selected(SelectedCommand),
    /// Remove one artwork from the selection
    Remove(RemoveCommand),
    /// Clear the whole selection
    Clear,
}

impl Cli {
    /// Whether this invocation takes over the terminal
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }

    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        let mut config = Config::init(self.config.as_deref()).await?;
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        config.validate()?;
        debug!("Configuration initialized");

        let mut app = App::new(config, self.ephemeral)?;

        match self.command {
            Some(Commands::Page(cmd)) => cmd.execute(&mut app).await,
            Some(Commands::Toggle(cmd)) => cmd.execute(&mut app).await,
            Some(Commands::Bulk(cmd)) => cmd.execute(&mut app).await,
            Some(Commands::Selected(cmd)) => cmd.execute(&app),
            Some(Commands::Remove(cmd)) => cmd.execute(&mut app).await,
            Some(Commands::Clear) => {
                let count = app.selection().len();
                app.handle_event(crate::app::TableEvent::SelectionCleared).await?;
                println!("Cleared {} selected artworks", count);
                Ok(())
            }
            None => {
                info!("Starting interactive mode");
                tui::run(app).await
            }
        }
    }
}
