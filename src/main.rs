mod app;
mod config;
mod logging;
mod ui;

use std::error::Error;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use ratatui::Terminal;
use ratatui::crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::{Backend, CrosstermBackend};
use ratatui_image::picker::Picker;

use crate::app::api::HttpMovieApi;
use crate::app::preference::Preferences;
use crate::app::trailer::YouTubeSearch;
use crate::app::{App, Dispatcher, WorkerMessage};
use crate::config::Config;

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    let _log_guard = logging::init_logging(&config.log_dir());
    tracing::info!(
        "movie catalog v{} starting against {}",
        env!("CARGO_PKG_VERSION"),
        config.movie_api_url
    );

    // Ask the terminal about graphics support before raw mode takes over
    let picker = Picker::from_query_stdio().unwrap_or_else(|e| {
        tracing::warn!("terminal graphics query failed, using half blocks: {}", e);
        Picker::halfblocks()
    });

    let api = Arc::new(HttpMovieApi::new(config.movie_api_url.clone()));
    let trailers = Arc::new(YouTubeSearch::new(
        config.trailer_search_url.clone(),
        config.youtube_api_key.clone(),
    ));
    let (dispatcher, receiver) = Dispatcher::new(api, trailers);

    let mut app = App::new(Preferences::load(Preferences::default_path()), Some(picker));

    // setup terminal
    enable_raw_mode()?;
    let mut stderr = io::stderr(); // This is a special case. Normally using stdout is fine
    execute!(stderr, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &dispatcher, &receiver);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("event loop failed: {}", e);
    }
    tracing::info!("movie catalog exiting");
    result
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    dispatcher: &Dispatcher,
    receiver: &Receiver<WorkerMessage>,
) -> Result<(), Box<dyn Error>>
where
    B::Error: Error + 'static,
{
    if let Some(command) = app.reload() {
        dispatcher.dispatch(command);
    }

    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        // Fold in whatever the background threads finished since last frame
        while let Ok(message) = receiver.try_recv() {
            if let Some(command) = app.handle_message(message) {
                dispatcher.dispatch(command);
            }
        }

        let now = Instant::now();
        app.tick(now);

        // Poll for events with a timeout to allow UI updates
        if event::poll(app.poll_timeout(now))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Release {
                    // Skip events that are not KeyEventKind::Press
                    continue;
                }
                if let Some(command) = app.handle_key(key, Instant::now()) {
                    dispatcher.dispatch(command);
                }
            }
        }

        if app.exit {
            return Ok(());
        }
    }
}
