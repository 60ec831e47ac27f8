use crate::app::App;
use crate::ui::theme::Palette;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Renders the title, search bar and display mode toggle
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let palette = Palette::for_mode(app.display_mode());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(28), // Title
            Constraint::Min(20),    // Search
            Constraint::Length(9),  // Mode toggle
        ])
        .split(area);

    let mut title = vec![Span::styled(
        "Movies",
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(updated) = app.last_updated {
        title.push(Span::styled(
            format!(" (updated {})", updated.format("%H:%M")),
            palette.muted(),
        ));
    }
    let title_block = Block::default().borders(Borders::ALL).style(palette.base());
    frame.render_widget(Paragraph::new(Line::from(title)).block(title_block), chunks[0]);

    frame.render_widget(search_bar(app, &palette), chunks[1]);

    // Only the icon for the active mode is shown
    let (light_visible, dark_visible) = app.display_mode().icons();
    let mut icons = Vec::new();
    if light_visible {
        icons.push(Span::styled("☀ ", Style::default().fg(palette.star)));
    }
    if dark_visible {
        icons.push(Span::styled("☾ ", Style::default().fg(palette.accent)));
    }
    icons.push(Span::styled("(d)", palette.muted()));
    let toggle_block = Block::default().borders(Borders::ALL).style(palette.base());
    frame.render_widget(Paragraph::new(Line::from(icons)).block(toggle_block), chunks[2]);
}

fn search_bar<'a>(app: &'a App, palette: &Palette) -> Paragraph<'a> {
    let border_style = if app.search.focused {
        Style::default().fg(palette.accent)
    } else {
        palette.base()
    };

    let mut line = vec![Span::styled("Search: ", palette.muted())];
    if app.search.input.is_empty() && !app.search.focused {
        line.push(Span::styled("press / to search", palette.muted()));
    } else {
        line.push(Span::raw(app.search.input.as_str()));
    }
    if app.search.focused {
        line.push(Span::styled("█", Style::default().fg(palette.accent)));
    }
    if app.search.debouncer.is_pending() {
        line.push(Span::styled(" …", palette.muted()));
    }
    if app.search.shows_clear() {
        line.push(Span::styled(
            "  [c] clear",
            Style::default().fg(palette.error),
        ));
    }

    Paragraph::new(Line::from(line)).block(
        Block::default()
            .borders(Borders::ALL)
            .style(palette.base())
            .border_style(border_style),
    )
}
