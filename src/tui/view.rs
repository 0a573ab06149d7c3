//! Rendering of the table screen

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState},
    Frame,
};

use super::screen::{BulkDialog, TableScreen};
use super::styles::Theme;
use crate::app::App;
use crate::pagination::PageWindow;

/// Draw the whole screen
pub fn render(frame: &mut Frame, app: &App, screen: &TableScreen, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(frame.size());
    
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(chunks[0]);
    
    render_table(frame, body[0], app, screen, theme);
    render_selection_panel(frame, body[1], app, theme);
    render_footer(frame, chunks[1], app, screen, theme);
    
    if let Some(dialog) = &screen.dialog {
        render_bulk_dialog(frame, frame.size(), dialog, theme);
    }
}

fn render_table(frame: &mut Frame, area: Rect, app: &App, screen: &TableScreen, theme: &Theme) {
    let header = Row::new(vec!["", "ID", "Title", "Artist", "Origin", "Date"]).style(theme.title());
    
    let rows: Vec<Row> = app
        .pagination()
        .items()
        .iter()
        .map(|item| {
            let checked = app.selection().contains(item.id);
            let mark = if checked {
                Cell::from("[x]").style(theme.checked())
            } else {
                Cell::from("[ ]").style(theme.dim())
            };
            Row::new(vec![
                mark,
                Cell::from(item.id.to_string()),
                Cell::from(item.display_title().to_string()),
                Cell::from(item.display_artist().to_string()),
                Cell::from(item.place_of_origin.clone().unwrap_or_default()),
                Cell::from(item.date_start.map(|date| date.to_string()).unwrap_or_default()),
            ])
            .style(theme.text())
        })
        .collect();
    
    let title = if app.pagination().is_loading() {
        " Artworks (loading…) ".to_string()
    } else {
        " Artworks ".to_string()
    };
    
    let widths = [
        Constraint::Length(3),
        Constraint::Length(8),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
        Constraint::Percentage(18),
        Constraint::Length(6),
    ];
    
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border(screen.dialog.is_none()))
                .title(Span::styled(title, theme.title())),
        )
        .highlight_style(theme.highlight());
    
    let mut state = TableState::default();
    if !app.pagination().items().is_empty() {
        state.select(Some(screen.cursor));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_selection_panel(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let items: Vec<ListItem> = app
        .selection()
        .records()
        .into_iter()
        .map(|record| {
            ListItem::new(vec![
                Line::from(Span::styled(record.display_title().to_string(), theme.text())),
                Line::from(Span::styled(format!("  {}", record.display_artist()), theme.dim())),
            ])
        })
        .collect();
    
    let title = format!(" Selected ({}) ", app.selection().len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border(false))
            .title(Span::styled(title, theme.title())),
    );
    frame.render_widget(list, area);
}

/// "Page 2 of 10 (13-24 of 120 items)"
pub fn pagination_label(window: &PageWindow) -> String {
    let range = window.record_range();
    let first = if range.is_empty() { range.start } else { range.start + 1 };
    format!(
        "Page {} of {} ({}-{} of {} items)",
        window.page(),
        window.total_pages(),
        first,
        range.end,
        window.total_records()
    )
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App, screen: &TableScreen, theme: &Theme) {
    let mut spans = vec![Span::styled(pagination_label(app.pagination().window()), theme.text())];
    if screen.bulk_running() {
        spans.push(Span::styled("  [bulk selection running]", theme.status()));
    }
    if let Some(status) = &screen.status {
        spans.push(Span::styled(format!("  {}", status), theme.status()));
    }
    
    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(screen.key_map().help_text(), theme.dim())),
    ];
    let footer = Paragraph::new(lines).block(Block::default().borders(Borders::TOP).border_style(theme.border(false)));
    frame.render_widget(footer, area);
}

fn render_bulk_dialog(frame: &mut Frame, area: Rect, dialog: &BulkDialog, theme: &Theme) {
    let popup = centered_rect(48, 9, area);
    
    let count = if dialog.count_input.is_empty() { "_" } else { dialog.count_input.as_str() };
    let mode = if dialog.add_to_existing { "add to selection" } else { "replace selection" };
    let lines = vec![
        Line::from(vec![Span::styled("How many:  ", theme.dim()), Span::styled(count.to_string(), theme.text())]),
        Line::from(vec![
            Span::styled("Strategy:  ", theme.dim()),
            Span::styled(dialog.strategy.to_string(), theme.text()),
        ]),
        Line::from(vec![Span::styled("Mode:      ", theme.dim()), Span::styled(mode, theme.text())]),
        Line::from(""),
        Line::from(Span::styled("tab strategy  a add/replace  enter go  esc cancel", theme.dim())),
    ];
    
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(true))
        .title(Span::styled(" Bulk select ", theme.title()));
    
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block).alignment(Alignment::Left), popup);
}

/// Rectangle of at most `width` x `height` centered in `area`
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
