use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use throbber_widgets_tui::ThrobberState;

use crate::app::api::{Movie, MovieId};
use crate::app::detail::DetailSession;
use crate::app::filter::{SearchState, filter_movies};
use crate::app::preference::{DisplayMode, Preferences};
use crate::app::worker::{Command, WorkerMessage};

/// Upper bound on how long the event loop sleeps waiting for input.
const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentScreen {
    Main,
    MovieDetail,
}

/// Owns every piece of UI state. Handlers never do I/O themselves; they
/// hand back a `Command` for the dispatcher to run.
pub struct App {
    pub movies: Vec<Movie>,
    /// Positions in `movies` that pass the applied search.
    pub visible: Vec<usize>,
    pub current_screen: CurrentScreen,
    pub search: SearchState,
    pub loading_movies: bool,
    pub load_error: Option<String>,
    pub last_updated: Option<DateTime<Local>>,
    pub list_state: ListState,
    pub detail: DetailSession,
    pub preferences: Preferences,
    pub picker: Option<Picker>,
    pub poster_protocol: Option<StatefulProtocol>,
    pub loading_poster: bool,
    pub throbber_state: ThrobberState,
    pub exit: bool,
}

impl App {
    pub fn new(preferences: Preferences, picker: Option<Picker>) -> Self {
        Self {
            movies: Vec::new(),
            visible: Vec::new(),
            current_screen: CurrentScreen::Main,
            search: SearchState::default(),
            loading_movies: false,
            load_error: None,
            last_updated: None,
            list_state: ListState::default(),
            detail: DetailSession::default(),
            preferences,
            picker,
            poster_protocol: None,
            loading_poster: false,
            throbber_state: ThrobberState::default(),
            exit: false,
        }
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.preferences.mode
    }

    /// Kicks off a full catalog load unless one is already running.
    pub fn reload(&mut self) -> Option<Command> {
        if self.loading_movies {
            return None;
        }
        self.loading_movies = true;
        self.load_error = None;
        Some(Command::LoadCatalog)
    }

    pub fn visible_movies(&self) -> Vec<&Movie> {
        self.visible
            .iter()
            .filter_map(|&index| self.movies.get(index))
            .collect()
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        let row = self.list_state.selected()?;
        self.movies.get(*self.visible.get(row)?)
    }

    /// Recomputes the visible list from the whole catalog.
    fn refresh_visible(&mut self) {
        self.visible = filter_movies(&self.movies, &self.search.applied);
        self.list_state
            .select(if self.visible.is_empty() { None } else { Some(0) });
    }

    fn apply_search(&mut self, term: String) {
        tracing::debug!("applying search {:?}", term);
        self.search.applied = term;
        self.refresh_visible();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.refresh_visible();
    }

    /// Runs a due search and advances the spinner.
    pub fn tick(&mut self, now: Instant) {
        if let Some(term) = self.search.debouncer.take_ready(now) {
            self.apply_search(term);
        }
        self.throbber_state.calc_next();
    }

    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.search
            .debouncer
            .time_until_ready(now)
            .map_or(TICK, |due| due.min(TICK))
    }

    pub fn next_movie(&mut self) {
        let movie_count = self.visible.len();
        if movie_count == 0 {
            return;
        }

        let next = self
            .list_state
            .selected()
            .map_or(0, |current| (current + 1) % movie_count);
        self.list_state.select(Some(next));
    }

    pub fn previous_movie(&mut self) {
        let movie_count = self.visible.len();
        if movie_count == 0 {
            return;
        }

        let previous = match self.list_state.selected() {
            Some(0) | None => movie_count - 1,
            Some(current) => current - 1,
        };
        self.list_state.select(Some(previous));
    }

    pub fn open_selected(&mut self) -> Option<Command> {
        let id = self.selected_movie()?.id.clone();
        Some(self.open_detail(id))
    }

    pub fn open_detail(&mut self, id: MovieId) -> Command {
        tracing::info!("opening movie {}", id);
        let session = self.detail.open(id.clone());
        self.poster_protocol = None;
        self.loading_poster = false;
        self.current_screen = CurrentScreen::MovieDetail;
        Command::FetchDetail { session, id }
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
        self.poster_protocol = None;
        self.loading_poster = false;
        self.current_screen = CurrentScreen::Main;
    }

    pub fn submit_review(&mut self) -> Option<Command> {
        if self.detail.form.submitting {
            return None;
        }
        let id = self.detail.movie_id.clone()?;
        let review = self.detail.form.to_request()?;

        self.detail.form.submitting = true;
        Some(Command::SubmitReview {
            session: self.detail.session,
            id,
            review,
        })
    }

    pub fn watch_trailer(&mut self) -> Option<Command> {
        let title = self.detail.title()?.to_string();
        if !self.detail.trailer.begin_search() {
            return None;
        }
        Some(Command::SearchTrailer {
            session: self.detail.session,
            title,
        })
    }

    pub fn toggle_display_mode(&mut self) {
        match self.preferences.toggle() {
            Ok(mode) => tracing::info!("display mode set to {:?}", mode),
            Err(e) => tracing::warn!("display mode not saved: {}", e),
        }
    }

    /// Folds a finished background job into the state.
    pub fn handle_message(&mut self, message: WorkerMessage) -> Option<Command> {
        match message {
            WorkerMessage::CatalogLoaded(movies) => {
                tracing::info!("loaded {} movies", movies.len());
                self.movies = movies;
                self.loading_movies = false;
                self.last_updated = Some(Local::now());
                self.refresh_visible();
                None
            }
            WorkerMessage::CatalogFailed(error) => {
                tracing::error!("Error loading movies: {}", error);
                self.loading_movies = false;
                self.load_error = Some(error);
                None
            }
            WorkerMessage::DetailLoaded { session, movie } => {
                if !self.detail.is_current(session) {
                    tracing::debug!("dropping stale detail for {}", movie.id);
                    return None;
                }
                let poster_url = movie.poster_url.clone();
                self.detail.loaded(movie);

                let wants_poster = self.picker.is_some()
                    && self.poster_protocol.is_none()
                    && !self.loading_poster
                    && !poster_url.is_empty();
                if !wants_poster {
                    return None;
                }
                self.loading_poster = true;
                Some(Command::FetchPoster {
                    session,
                    url: poster_url,
                })
            }
            WorkerMessage::DetailFailed { session, error } => {
                if self.detail.is_current(session) {
                    tracing::error!("Error loading movie: {}", error);
                    self.detail.failed(error);
                } else {
                    tracing::debug!("dropping stale detail error: {}", error);
                }
                None
            }
            WorkerMessage::ReviewSubmitted { session, id } => {
                if !self.detail.is_current(session) {
                    tracing::debug!("review for {} stored after its overlay closed", id);
                    return None;
                }
                tracing::info!("review submitted for {}", id);
                self.detail.form.reset();
                self.detail.refresh();
                Some(Command::FetchDetail { session, id })
            }
            WorkerMessage::ReviewFailed { session, error } => {
                tracing::error!("Error submitting review: {}", error);
                if self.detail.is_current(session) {
                    // Form stays filled in so nothing typed is lost
                    self.detail.form.submitting = false;
                }
                None
            }
            WorkerMessage::TrailerFound { session, video_id } => {
                if self.detail.is_current(session) {
                    if video_id.is_none() {
                        tracing::warn!("no trailer found for {:?}", self.detail.title());
                    }
                    self.detail.trailer.finish(video_id);
                }
                None
            }
            WorkerMessage::TrailerFailed { session, error } => {
                tracing::error!("Error loading trailer: {}", error);
                if self.detail.is_current(session) {
                    self.detail.trailer.finish(None);
                }
                None
            }
            WorkerMessage::PosterLoaded { session, image } => {
                if self.detail.is_current(session) {
                    self.loading_poster = false;
                    if let Some(picker) = &self.picker {
                        self.poster_protocol = Some(picker.new_resize_protocol(image));
                    }
                }
                None
            }
            WorkerMessage::PosterFailed { session, error } => {
                tracing::warn!("poster unavailable: {}", error);
                if self.detail.is_current(session) {
                    self.loading_poster = false;
                }
                None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.exit = true;
            return None;
        }

        match self.current_screen {
            CurrentScreen::Main if self.search.focused => {
                self.handle_search_key(key, now);
                None
            }
            CurrentScreen::Main => self.handle_main_key(key),
            CurrentScreen::MovieDetail if self.detail.form.editing => self.handle_form_key(key),
            CurrentScreen::MovieDetail => self.handle_detail_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c) => self.search.push(c, now),
            KeyCode::Backspace => self.search.pop(now),
            KeyCode::Enter => self.search.focused = false,
            KeyCode::Esc => {
                self.search.focused = false;
                self.clear_search();
            }
            _ => {}
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('q') => self.exit = true,
            KeyCode::Char('/') => self.search.focused = true,
            KeyCode::Char('c') if self.search.shows_clear() => self.clear_search(),
            KeyCode::Char('g') => return self.reload(),
            KeyCode::Char('d') => self.toggle_display_mode(),
            KeyCode::Down | KeyCode::Char('j') => self.next_movie(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_movie(),
            KeyCode::Enter => return self.open_selected(),
            _ => {}
        }
        None
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('q') => self.exit = true,
            KeyCode::Esc | KeyCode::Char('b') => self.close_detail(),
            KeyCode::Char('t') => return self.watch_trailer(),
            KeyCode::Char('r') => self.detail.trailer.retry(),
            KeyCode::Char('d') => self.toggle_display_mode(),
            KeyCode::Tab if self.detail.movie.is_some() => self.detail.form.editing = true,
            _ => {}
        }
        None
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Enter {
            return self.submit_review();
        }

        let form = &mut self.detail.form;
        match key.code {
            KeyCode::Esc => form.editing = false,
            KeyCode::Tab => form.field = form.field.next(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Left => form.adjust_rating(-1),
            KeyCode::Right => form.adjust_rating(1),
            KeyCode::Char(c) => form.type_char(c),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::api::Review;
    use crate::app::review::ReviewField;
    use crate::app::trailer::TrailerState;
    use crate::app::worker::run_command;
    use crate::app::worker::tests::{FakeApi, FakeTrailers, dune};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(movies: Vec<Movie>) -> App {
        let mut app = App::new(Preferences::load(None), None);
        assert_eq!(app.reload(), Some(Command::LoadCatalog));
        app.handle_message(WorkerMessage::CatalogLoaded(movies));
        app
    }

    fn heat() -> Movie {
        Movie {
            id: MovieId::from("2"),
            name: "Heat".into(),
            description: "A heist in Los Angeles".into(),
            poster_url: String::new(),
            average_rating: 3.2,
            reviews: Vec::new(),
        }
    }

    fn type_search(app: &mut App, text: &str, start: Instant) {
        app.handle_key(key(KeyCode::Char('/')), start);
        for (offset, c) in text.chars().enumerate() {
            app.handle_key(
                key(KeyCode::Char(c)),
                start + Duration::from_millis(50 * offset as u64),
            );
        }
    }

    #[test]
    fn load_populates_and_clears_indicator() {
        let app = app_with(vec![dune(), heat()]);
        assert!(!app.loading_movies);
        assert_eq!(app.visible, vec![0, 1]);
        assert_eq!(app.selected_movie().map(|m| m.name.as_str()), Some("Dune"));
        assert!(app.last_updated.is_some());
    }

    #[test]
    fn failed_load_leaves_catalog_empty_and_indicator_cleared() {
        let mut app = App::new(Preferences::load(None), None);
        app.reload();
        app.handle_message(WorkerMessage::CatalogFailed("connection refused".into()));

        assert!(!app.loading_movies);
        assert!(app.movies.is_empty());
        assert_eq!(app.load_error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn reload_is_ignored_while_loading() {
        let mut app = App::new(Preferences::load(None), None);
        assert!(app.reload().is_some());
        assert!(app.reload().is_none());
    }

    #[test]
    fn searching_dune_in_any_case_finds_it() {
        let start = Instant::now();
        let mut app = app_with(vec![dune(), heat()]);

        type_search(&mut app, "DuNe", start);
        app.tick(start + Duration::from_secs(1));

        let names: Vec<_> = app.visible_movies().iter().map(|m| m.name.clone()).collect();
        assert_eq!(names, vec!["Dune"]);
    }

    #[test]
    fn unmatched_search_is_empty_and_offers_clear() {
        let start = Instant::now();
        let mut app = app_with(vec![dune()]);

        type_search(&mut app, "xyz", start);
        app.tick(start + Duration::from_secs(1));

        assert!(app.visible_movies().is_empty());
        assert!(app.search.shows_clear());
        assert_eq!(app.selected_movie(), None);

        app.handle_key(key(KeyCode::Enter), start + Duration::from_secs(1));
        app.handle_key(key(KeyCode::Char('c')), start + Duration::from_secs(1));
        assert_eq!(app.visible, vec![0]);
        assert!(!app.search.shows_clear());
        assert!(app.search.input.is_empty());
    }

    #[test]
    fn search_waits_for_quiet_period() {
        let start = Instant::now();
        let mut app = app_with(vec![dune(), heat()]);

        type_search(&mut app, "heat", start);
        // last key at +150ms, so +300ms is still inside its quiet period
        app.tick(start + Duration::from_millis(300));
        assert_eq!(app.visible, vec![0, 1]);

        app.tick(start + Duration::from_millis(450));
        assert_eq!(app.visible, vec![1]);
    }

    #[test]
    fn filtering_never_touches_catalog() {
        let start = Instant::now();
        let mut app = app_with(vec![dune(), heat()]);
        type_search(&mut app, "heat", start);
        app.tick(start + Duration::from_secs(1));

        assert_eq!(app.movies.len(), 2);
        assert_eq!(app.movies[0].name, "Dune");
    }

    #[test]
    fn enter_opens_highlighted_movie() {
        let mut app = app_with(vec![dune(), heat()]);
        app.handle_key(key(KeyCode::Down), Instant::now());

        let command = app.handle_key(key(KeyCode::Enter), Instant::now());
        assert_eq!(
            command,
            Some(Command::FetchDetail {
                session: app.detail.session,
                id: MovieId::from("2"),
            })
        );
        assert_eq!(app.current_screen, CurrentScreen::MovieDetail);
    }

    #[test]
    fn stale_detail_is_dropped() {
        let mut app = app_with(vec![dune(), heat()]);
        let Command::FetchDetail { session: first, .. } = app.open_detail(MovieId::from("1"))
        else {
            panic!("expected FetchDetail");
        };
        app.open_detail(MovieId::from("2"));

        app.handle_message(WorkerMessage::DetailLoaded {
            session: first,
            movie: dune(),
        });
        assert!(app.detail.movie.is_none());
        assert!(app.detail.loading);
    }

    #[test]
    fn submitted_review_refreshes_detail_and_clears_form() {
        let api = FakeApi::with(vec![dune()]);
        let trailers = FakeTrailers(None);
        let mut app = app_with(vec![dune()]);

        let fetch = app.open_detail(MovieId::from("1"));
        let loaded = run_command(&api, &trailers, fetch);
        assert_eq!(app.handle_message(loaded), None);

        let now = Instant::now();
        app.handle_key(key(KeyCode::Tab), now);
        for c in "Ana".chars() {
            app.handle_key(key(KeyCode::Char(c)), now);
        }
        app.handle_key(key(KeyCode::Tab), now);
        for c in "Great!".chars() {
            app.handle_key(key(KeyCode::Char(c)), now);
        }
        assert_eq!(app.detail.form.field, ReviewField::Text);

        let submit = app.handle_key(key(KeyCode::Enter), now).unwrap();
        assert!(app.handle_key(key(KeyCode::Enter), now).is_none());

        let submitted = run_command(&api, &trailers, submit);
        let refetch = app.handle_message(submitted).unwrap();
        assert!(app.detail.form.reviewer.is_empty());
        assert!(app.detail.form.text.is_empty());

        let reloaded = run_command(&api, &trailers, refetch);
        app.handle_message(reloaded);

        let reviews = &app.detail.movie.as_ref().unwrap().reviews;
        assert_eq!(
            reviews.last(),
            Some(&Review {
                reviewer: "Ana".into(),
                review_text: "Great!".into(),
                rating: 5,
            })
        );
    }

    #[test]
    fn failed_review_keeps_form_filled() {
        let mut app = app_with(vec![dune()]);
        app.open_detail(MovieId::from("1"));
        app.handle_message(WorkerMessage::DetailLoaded {
            session: app.detail.session,
            movie: dune(),
        });
        app.detail.form.reviewer = "Ana".into();
        app.detail.form.text = "Great!".into();

        app.submit_review().unwrap();
        app.handle_message(WorkerMessage::ReviewFailed {
            session: app.detail.session,
            error: "503".into(),
        });

        assert_eq!(app.detail.form.reviewer, "Ana");
        assert!(!app.detail.form.submitting);
        assert!(app.submit_review().is_some());
    }

    #[test]
    fn closing_while_trailer_plays_resets_it_for_next_open() {
        let mut app = app_with(vec![dune()]);
        app.open_detail(MovieId::from("1"));
        app.handle_message(WorkerMessage::DetailLoaded {
            session: app.detail.session,
            movie: dune(),
        });

        let Some(Command::SearchTrailer { session, title }) =
            app.handle_key(key(KeyCode::Char('t')), Instant::now())
        else {
            panic!("expected SearchTrailer");
        };
        assert_eq!(title, "Dune");
        assert!(app.handle_key(key(KeyCode::Char('t')), Instant::now()).is_none());

        app.handle_message(WorkerMessage::TrailerFound {
            session,
            video_id: Some("abc123".into()),
        });
        assert_eq!(
            app.detail.trailer,
            TrailerState::Playing {
                video_id: "abc123".into()
            }
        );

        app.handle_key(key(KeyCode::Esc), Instant::now());
        assert_eq!(app.current_screen, CurrentScreen::Main);

        app.handle_key(key(KeyCode::Enter), Instant::now());
        assert_eq!(app.detail.trailer, TrailerState::Placeholder);
    }

    #[test]
    fn missing_trailer_offers_retry() {
        let mut app = app_with(vec![dune()]);
        app.open_detail(MovieId::from("1"));
        app.handle_message(WorkerMessage::DetailLoaded {
            session: app.detail.session,
            movie: dune(),
        });
        app.watch_trailer().unwrap();
        app.handle_message(WorkerMessage::TrailerFailed {
            session: app.detail.session,
            error: "quota exceeded".into(),
        });
        assert_eq!(app.detail.trailer, TrailerState::Unavailable);

        app.handle_key(key(KeyCode::Char('r')), Instant::now());
        assert_eq!(app.detail.trailer, TrailerState::Placeholder);
    }

    #[test]
    fn poll_timeout_shrinks_for_pending_search() {
        let start = Instant::now();
        let mut app = app_with(vec![dune()]);
        assert_eq!(app.poll_timeout(start), TICK);

        type_search(&mut app, "d", start);
        assert_eq!(
            app.poll_timeout(start + Duration::from_millis(250)),
            Duration::from_millis(50)
        );
    }
}
