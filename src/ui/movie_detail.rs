use crate::app::App;
use crate::app::api::Movie;
use crate::app::review::{ReviewField, ReviewForm};
use crate::app::trailer::{TrailerState, watch_url};
use crate::ui::cards::star_spans;
use crate::ui::loading::throbber;
use crate::ui::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use ratatui_image::{Resize, StatefulImage, protocol::StatefulProtocol};

/// Area of the overlay drawn on top of the movie list.
fn overlay_area(area: Rect) -> Rect {
    let [vertical] = Layout::vertical([Constraint::Percentage(90)])
        .flex(Flex::Center)
        .areas(area);
    let [overlay] = Layout::horizontal([Constraint::Percentage(90)])
        .flex(Flex::Center)
        .areas(vertical);
    overlay
}

/// Renders the movie detail overlay
pub fn render_movie_detail(frame: &mut Frame, app: &mut App, area: Rect) {
    let palette = Palette::for_mode(app.display_mode());
    let area = overlay_area(area);
    frame.render_widget(Clear, area);

    let title = match app.detail.title() {
        Some(name) => format!("Movie Details - {}", name),
        None => "Movie Details".to_string(),
    };
    let outer_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(palette.base());
    let inner_area = outer_block.inner(area);
    frame.render_widget(outer_block, area);

    if app.detail.movie.is_none() {
        if app.detail.loading {
            let rows = Layout::vertical([Constraint::Length(2), Constraint::Length(1)])
                .split(inner_area);
            frame.render_stateful_widget(
                throbber("Fetching movie details...", &palette),
                rows[1],
                &mut app.throbber_state,
            );
        } else {
            render_error_state(frame, inner_area, &palette, app.detail.error.as_deref());
        }
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(32), // Poster
            Constraint::Min(30),    // Details
        ])
        .split(inner_area);

    render_poster_section(frame, columns[0], app, &palette);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Description and reviews
            Constraint::Length(4), // Trailer
            Constraint::Length(6), // Review form
        ])
        .split(columns[1]);

    if let Some(movie) = &app.detail.movie {
        render_content_section(
            frame,
            rows[0],
            movie,
            app.detail.loading,
            app.detail.error.as_deref(),
            &palette,
        );
    }
    render_trailer_section(frame, rows[1], app, &palette);
    render_review_form(frame, rows[2], &app.detail.form, &palette);
}

/// Renders the poster section
fn render_poster_section(frame: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let poster_block = Block::default()
        .borders(Borders::ALL)
        .title("Poster")
        .style(palette.base());

    if app.loading_poster {
        let inner = poster_block.inner(area);
        frame.render_widget(poster_block, area);
        let rows = Layout::vertical([Constraint::Length(2), Constraint::Length(1)]).split(inner);
        frame.render_stateful_widget(
            throbber("Downloading poster...", palette),
            rows[1],
            &mut app.throbber_state,
        );
    } else if let Some(protocol) = &mut app.poster_protocol {
        let image = StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None));
        let inner_area = poster_block.inner(area);
        frame.render_widget(poster_block, area);
        frame.render_stateful_widget(image, inner_area, protocol);
    } else {
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled("No poster available", palette.muted())),
        ])
        .alignment(Alignment::Center)
        .block(poster_block);
        frame.render_widget(placeholder, area);
    }
}

/// Renders the description and the reviews, in the order the API sent them
fn render_content_section(
    frame: &mut Frame,
    area: Rect,
    movie: &Movie,
    refreshing: bool,
    refresh_error: Option<&str>,
    palette: &Palette,
) {
    let heading = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);

    let mut title_line = vec![Span::styled(
        movie.name.clone(),
        Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD),
    )];
    title_line.push(Span::raw("  "));
    title_line.extend(star_spans(movie.average_rating, palette));

    let mut content = vec![
        Line::from(title_line),
        Line::from(""),
        Line::from(Span::styled("Description:", heading)),
        Line::from(Span::styled(
            movie.description.as_str(),
            Style::default().fg(palette.text),
        )),
        Line::from(""),
    ];

    let reviews_heading = if refreshing {
        format!("Reviews ({}) - refreshing...", movie.reviews.len())
    } else {
        format!("Reviews ({})", movie.reviews.len())
    };
    let mut heading_line = vec![Span::styled(reviews_heading, heading)];
    // The copy on screen is stale when the last re-fetch failed
    if refresh_error.is_some() {
        heading_line.push(Span::styled(
            " - refresh failed",
            Style::default().fg(palette.error),
        ));
    }
    content.push(Line::from(heading_line));

    if movie.reviews.is_empty() {
        content.push(Line::from(Span::styled(
            "No reviews yet. Press (Tab) to write one.",
            palette.muted(),
        )));
    }

    for review in &movie.reviews {
        let mut line = vec![
            Span::styled(
                review.reviewer.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ("),
        ];
        line.extend(star_spans(review.rating as f64, palette));
        line.push(Span::raw("): "));
        line.push(Span::raw(review.review_text.as_str()));
        content.push(Line::from(line));
    }

    let paragraph = Paragraph::new(content).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_trailer_section(frame: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let block = Block::default()
        .title("Trailer")
        .borders(Borders::ALL)
        .style(palette.base());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match &app.detail.trailer {
        TrailerState::Placeholder => vec![Line::from(Span::styled(
            "▶ Watch Trailer (t)",
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        ))],
        TrailerState::Searching => {
            frame.render_stateful_widget(
                throbber("Searching for trailer...", palette),
                inner,
                &mut app.throbber_state,
            );
            return;
        }
        TrailerState::Playing { video_id } => vec![
            Line::from(Span::styled(
                "▶ Playing trailer",
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(watch_url(video_id), palette.muted())),
        ],
        TrailerState::Unavailable => vec![
            Line::from(Span::styled(
                "Sorry, the trailer is currently unavailable.",
                Style::default().fg(palette.error),
            )),
            Line::from(Span::styled("(r) Try Again", palette.muted())),
        ],
    };

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_review_form(frame: &mut Frame, area: Rect, form: &ReviewForm, palette: &Palette) {
    let title = if form.submitting {
        "Add a Review - submitting..."
    } else {
        "Add a Review"
    };
    let border_style = if form.editing {
        Style::default().fg(palette.accent)
    } else {
        palette.base()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(palette.base())
        .border_style(border_style);

    let field_line = |field: ReviewField, label: &'static str, value: String| {
        let active = form.editing && form.field == field;
        let label_style = if active {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            palette.muted()
        };
        let mut spans = vec![Span::styled(label, label_style), Span::raw(value)];
        if active {
            spans.push(Span::styled("█", Style::default().fg(palette.accent)));
        }
        Line::from(spans)
    };

    let mut rating = star_spans(form.rating as f64, palette);
    rating.insert(
        0,
        Span::styled(
            "Rating:   ",
            if form.editing && form.field == ReviewField::Rating {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                palette.muted()
            },
        ),
    );

    let lines = vec![
        field_line(ReviewField::Reviewer, "Name:     ", form.reviewer.clone()),
        field_line(ReviewField::Text, "Review:   ", form.text.clone()),
        Line::from(rating),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

/// Renders error state
fn render_error_state(frame: &mut Frame, area: Rect, palette: &Palette, error: Option<&str>) {
    let error_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Failed to fetch movie details",
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            error.unwrap_or("No movie details available").to_string(),
            Style::default().fg(palette.error),
        )),
        Line::from(""),
        Line::from(Span::styled("Press (Esc) or (b) to go back", palette.muted())),
    ];

    let error_paragraph = Paragraph::new(error_text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(error_paragraph, area);
}
