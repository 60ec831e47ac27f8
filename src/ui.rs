mod cards;
mod footer;
mod header;
mod loading;
mod main_content;
mod movie_detail;
mod theme;

#[allow(clippy::module_inception)]
mod ui;

pub use ui::ui;
