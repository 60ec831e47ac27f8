use ratatui::style::{Color, Style};

use crate::app::preference::DisplayMode;

/// Colours for one display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub star: Color,
    pub highlight: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Light => Palette {
                background: Color::White,
                text: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Blue,
                star: Color::Rgb(214, 158, 0),
                highlight: Color::Gray,
                error: Color::Red,
            },
            DisplayMode::Dark => Palette {
                background: Color::Black,
                text: Color::White,
                muted: Color::Gray,
                accent: Color::Cyan,
                star: Color::Yellow,
                highlight: Color::DarkGray,
                error: Color::LightRed,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }
}
