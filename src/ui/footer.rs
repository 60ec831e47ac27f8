use crate::app::{App, CurrentScreen};
use crate::ui::theme::Palette;
use ratatui::{
    Frame,
    layout::Rect,
    text::Text,
    widgets::{Block, Borders, Paragraph},
};

/// Returns the appropriate instruction text based on app state
fn get_instruction_text(app: &App) -> &'static str {
    match app.current_screen {
        CurrentScreen::Main if app.search.focused => {
            "Type to filter, (Enter) done, (Esc) clear search"
        }
        CurrentScreen::Main if app.loading_movies => "Loading movies... (q) to quit",
        CurrentScreen::Main if app.movies.is_empty() => {
            "(g) to load movies, (d) dark mode, (q) to quit"
        }
        CurrentScreen::Main if app.search.shows_clear() => {
            "(↑↓/jk) scroll, (Enter) open, (/) search, (c) clear, (g) reload, (d) dark mode, (q) quit"
        }
        CurrentScreen::Main => {
            "(↑↓/jk) scroll, (Enter) open, (/) search, (g) reload, (d) dark mode, (q) quit"
        }
        CurrentScreen::MovieDetail if app.detail.form.editing => {
            "(Tab) next field, (←→/1-5) rating, (Enter) submit review, (Esc) done"
        }
        CurrentScreen::MovieDetail => {
            "(Esc/b) close, (t) trailer, (r) retry trailer, (Tab) write review, (q) quit"
        }
    }
}

/// Renders the footer with instructions at the bottom of the screen
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let palette = Palette::for_mode(app.display_mode());
    let bottom_block = Block::default()
        .borders(Borders::ALL)
        .style(palette.base());

    let instruction_text = get_instruction_text(app);
    let bottom = Paragraph::new(Text::styled(instruction_text, palette.muted()))
        .block(bottom_block);

    frame.render_widget(bottom, area);
}
