use crate::app::App;
use crate::ui::theme::Palette;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders},
};
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, WhichUse};

/// Spinner line used wherever something is being fetched.
pub fn throbber<'a>(label: &'a str, palette: &Palette) -> Throbber<'a> {
    Throbber::default()
        .label(label)
        .style(Style::default().fg(palette.text))
        .throbber_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin)
}

/// Renders the loading screen shown while the catalog is fetched
pub fn render_loading(frame: &mut Frame, app: &mut App, area: Rect) {
    let palette = Palette::for_mode(app.display_mode());
    let loading_block = Block::default()
        .title("Loading Movies")
        .borders(Borders::ALL)
        .style(palette.base());

    let inner = loading_block.inner(area);
    frame.render_widget(loading_block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    frame.render_stateful_widget(
        throbber("Loading movie data...", &palette),
        rows[1],
        &mut app.throbber_state,
    );
}
