use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the table screen to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    CursorUp,
    CursorDown,
    ToggleRow,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    OpenBulkDialog,
    ClearSelection,
    // Bulk dialog
    DialogDigit(char),
    DialogMinus,
    DialogBackspace,
    DialogCycleStrategy,
    DialogToggleAdd,
    DialogConfirm,
    DialogCancel,
}

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub const fn new(key: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }
    
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.code && self.modifiers == event.modifiers
    }
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Quit application from anywhere
    pub force_quit: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            force_quit: KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        }
    }
}

impl KeyMap {
    /// Map a key press on the table
    pub fn table_action(&self, event: &KeyEvent) -> Option<Action> {
        if self.force_quit.matches(event) {
            return Some(Action::Quit);
        }
        
        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
            KeyCode::Char(' ') | KeyCode::Enter => Some(Action::ToggleRow),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::NextPage),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::PreviousPage),
            KeyCode::Home => Some(Action::FirstPage),
            KeyCode::End => Some(Action::LastPage),
            KeyCode::Char('b') => Some(Action::OpenBulkDialog),
            KeyCode::Char('c') => Some(Action::ClearSelection),
            _ => None,
        }
    }
    
    /// Map a key press while the bulk dialog is open
    pub fn dialog_action(&self, event: &KeyEvent) -> Option<Action> {
        if self.force_quit.matches(event) {
            return Some(Action::Quit);
        }
        
        match event.code {
            KeyCode::Char(c) if c.is_ascii_digit() => Some(Action::DialogDigit(c)),
            KeyCode::Char('-') => Some(Action::DialogMinus),
            KeyCode::Backspace => Some(Action::DialogBackspace),
            KeyCode::Tab | KeyCode::Char('s') => Some(Action::DialogCycleStrategy),
            KeyCode::Char('a') => Some(Action::DialogToggleAdd),
            KeyCode::Enter => Some(Action::DialogConfirm),
            KeyCode::Esc => Some(Action::DialogCancel),
            _ => None,
        }
    }
    
    /// One-line key help for the footer
    pub fn help_text(&self) -> &'static str {
        "↑/↓ move  space toggle  ←/→ page  b bulk  c clear  q quit"
    }
}
