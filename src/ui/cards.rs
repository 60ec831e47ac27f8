use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};

use crate::app::api::Movie;
use crate::ui::theme::Palette;

pub const STAR_SLOTS: usize = 5;
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// First 100 characters followed by "...", whether or not anything was cut.
pub fn truncated_description(description: &str) -> String {
    let mut preview: String = description
        .chars()
        .take(DESCRIPTION_PREVIEW_CHARS)
        .collect();
    preview.push_str("...");
    preview
}

/// Number of filled stars for a 0-5 rating.
pub fn filled_stars(rating: f64) -> usize {
    if rating.is_nan() {
        return 0;
    }
    rating.round().clamp(0.0, STAR_SLOTS as f64) as usize
}

pub fn star_spans(rating: f64, palette: &Palette) -> Vec<Span<'static>> {
    let filled = filled_stars(rating);
    (0..STAR_SLOTS)
        .map(|slot| {
            if slot < filled {
                Span::styled("★", Style::default().fg(palette.star))
            } else {
                Span::styled("☆", palette.muted())
            }
        })
        .collect()
}

/// Last path segment of the poster URL, shown where the image would go.
pub fn poster_reference(poster_url: &str) -> &str {
    poster_url
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("no poster")
}

pub fn movie_card(movie: &Movie, palette: &Palette) -> ListItem<'static> {
    let mut rating_line = star_spans(movie.average_rating, palette);
    rating_line.push(Span::styled(
        format!(" {:.1}", movie.average_rating),
        palette.muted(),
    ));

    ListItem::new(vec![
        Line::from(Span::styled(
            movie.name.clone(),
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(rating_line),
        Line::from(Span::styled(
            format!("  {}", truncated_description(&movie.description)),
            palette.muted(),
        )),
        Line::from(Span::styled(
            format!("  Poster: {}", poster_reference(&movie.poster_url)),
            palette.muted().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
    ])
}
