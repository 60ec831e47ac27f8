use crate::app::App;
use crate::ui::cards::movie_card;
use crate::ui::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use tui_big_text::{BigText, PixelSize};

/// Renders the main content area showing the movie list or empty state
pub fn render_main_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let palette = Palette::for_mode(app.display_mode());

    if app.movies.is_empty() {
        render_empty_catalog(frame, app, &palette, area);
        return;
    }

    let movies = app.visible_movies();

    if movies.is_empty() {
        let message = format!("No movies match \"{}\"", app.search.applied);
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(message, palette.muted())),
            Line::from(Span::styled("Press (c) to clear the search", palette.muted())),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title("Movies (0)")
                .borders(Borders::ALL)
                .style(palette.base()),
        );
        frame.render_widget(empty, area);
        return;
    }

    let title = format!("Movies ({} of {})", movies.len(), app.movies.len());
    let items: Vec<ListItem> = movies
        .iter()
        .map(|movie| movie_card(movie, &palette))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .style(palette.base()),
        )
        .highlight_style(
            Style::default()
                .bg(palette.highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_empty_catalog(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .title("No movies loaded")
        .borders(Borders::ALL)
        .style(palette.base());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Big text
            Constraint::Min(3),    // Reason
        ])
        .split(inner);

    let big_text = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .lines(vec!["NO MOVIES".into()])
        .alignment(Alignment::Center)
        .build();
    frame.render_widget(big_text, chunks[0]);

    let mut reason = vec![Line::from("")];
    if let Some(error) = &app.load_error {
        reason.push(Line::from(Span::styled(
            "Failed to load the catalog",
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )));
        reason.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(palette.error),
        )));
    } else {
        reason.push(Line::from(Span::styled(
            "The catalog is empty",
            palette.muted(),
        )));
    }
    reason.push(Line::from(""));
    reason.push(Line::from(Span::styled(
        "Press (g) to load again",
        palette.muted(),
    )));

    let paragraph = Paragraph::new(reason)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, chunks[1]);
}
