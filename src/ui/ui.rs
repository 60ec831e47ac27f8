use crate::app::{App, CurrentScreen};
use crate::ui::theme::Palette;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    widgets::Block,
};

use super::footer::render_footer;
use super::header::render_header;
use super::loading::render_loading;
use super::main_content::render_main_content;
use super::movie_detail::render_movie_detail;

/// Main UI rendering function that orchestrates all UI components
pub fn ui(frame: &mut Frame, app: &mut App) {
    let palette = Palette::for_mode(app.display_mode());
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    // Create the main layout: header, content area, footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    // The list stays underneath the detail overlay
    if app.loading_movies {
        render_loading(frame, app, chunks[1]);
    } else {
        render_main_content(frame, app, chunks[1]);
    }

    if app.current_screen == CurrentScreen::MovieDetail {
        render_movie_detail(frame, app, chunks[1]);
    }

    render_footer(frame, app, chunks[2]);
}
