use ratatui::style::{Color, Modifier, Style};

/// Application theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary colors
    pub primary: Color,
    
    /// Text colors
    pub text: Color,
    pub text_dim: Color,
    
    /// Border colors
    pub border: Color,
    pub border_focused: Color,
    
    /// Status colors
    pub success: Color,
    pub warning: Color,
    
    /// Highlight for the row under the cursor
    pub cursor: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(147, 51, 234),    // Purple
            
            text: Color::Rgb(248, 250, 252),      // Slate-50
            text_dim: Color::Rgb(148, 163, 184),  // Slate-400
            
            border: Color::Rgb(71, 85, 105),      // Slate-600
            border_focused: Color::Rgb(147, 51, 234), // Purple
            
            success: Color::Rgb(34, 197, 94),     // Green-500
            warning: Color::Rgb(234, 179, 8),     // Yellow-500
            
            cursor: Color::Rgb(30, 41, 59),       // Slate-800
        }
    }
    
    pub fn title(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }
    
    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }
    
    pub fn dim(&self) -> Style {
        Style::default().fg(self.text_dim)
    }
    
    pub fn checked(&self) -> Style {
        Style::default().fg(self.success).add_modifier(Modifier::BOLD)
    }
    
    pub fn highlight(&self) -> Style {
        Style::default().bg(self.cursor).add_modifier(Modifier::BOLD)
    }
    
    pub fn status(&self) -> Style {
        Style::default().fg(self.warning)
    }
    
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }
}
