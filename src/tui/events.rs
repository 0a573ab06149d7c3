use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::bulk::BulkPlan;
use crate::catalog::{CatalogPage, CatalogResult};
use crate::pagination::PageTicket;

/// Events driving the table screen
#[derive(Debug)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),
    
    /// Terminal resize event
    Resize(u16, u16),
    
    /// Periodic tick event
    Tick,
    
    /// A page fetch started by the screen finished
    PageLoaded {
        ticket: PageTicket,
        result: CatalogResult<CatalogPage>,
    },
    
    /// The gather phase of a bulk selection finished
    BulkPlanned(Option<BulkPlan>),
}

/// Merges terminal input and background task results into one stream
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    sender: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler and start reading terminal input
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        
        let input_sender = sender.clone();
        tokio::task::spawn_blocking(move || loop {
            let event = match crossterm::event::poll(tick_interval) {
                Ok(true) => match crossterm::event::read() {
                    Ok(event) => convert_crossterm_event(event),
                    Err(e) => {
                        debug!("Failed to read terminal event: {}", e);
                        None
                    }
                },
                Ok(false) => Some(Event::Tick),
                Err(e) => {
                    debug!("Failed to poll terminal events: {}", e);
                    Some(Event::Tick)
                }
            };
            
            if let Some(event) = event {
                // Receiver gone: the screen has shut down
                if input_sender.send(event).is_err() {
                    break;
                }
            }
        });
        
        Self { receiver, sender }
    }
    
    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }
    
    /// Get a clone of the sender for background tasks
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

/// Convert crossterm events to screen events, dropping the ones we ignore
fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => Some(Event::Key(key_event)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    }
}
