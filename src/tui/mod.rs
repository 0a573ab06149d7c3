//! Terminal User Interface module using ratatui
//!
//! A single screen: the current catalog page as a table with checkboxes,
//! the selection in a side panel, and a bulk-select dialog.

mod events;
mod keys;
mod screen;
mod styles;
mod view;

pub use events::EventHandler;
pub use screen::TableScreen;

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tracing::info;

use crate::app::App;
use styles::Theme;

pub type Backend = CrosstermBackend<io::Stdout>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Best-effort terminal restore for the panic hook
pub fn force_restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Main TUI entry point
pub async fn run(mut app: App) -> Result<()> {
    let mut terminal = init_terminal()?;
    let mut events = EventHandler::new(Duration::from_millis(250));
    let mut screen = TableScreen::new();
    
    let ticket = app.pagination_mut().first_page();
    screen.start_load(&app, ticket, &events.sender());
    
    let result = run_app(&mut terminal, &mut app, &mut screen, &mut events).await;
    
    restore_terminal(&mut terminal)?;
    info!("Interactive session ended with {} selected", app.selection().len());
    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    screen: &mut TableScreen,
    events: &mut EventHandler,
) -> Result<()> {
    let theme = Theme::default();
    let sender = events.sender();
    
    while !screen.should_quit {
        terminal.draw(|frame| view::render(frame, app, screen, &theme))?;
        
        match events.next().await {
            Some(event) => screen.handle_event(app, event, &sender).await?,
            None => break,
        }
    }
    Ok(())
}
