use crate::app::api::{Movie, MovieId};
use crate::app::review::ReviewForm;
use crate::app::trailer::TrailerState;

/// One open detail overlay, from open to close.
///
/// Every open and every close moves `session` forward. Background results
/// carry the session they were started for, and anything that does not match
/// the current one is dropped, so a slow response for a movie that was
/// already closed can never paint over a newer one.
#[derive(Debug, Default)]
pub struct DetailSession {
    pub session: u64,
    pub movie_id: Option<MovieId>,
    pub movie: Option<Movie>,
    pub loading: bool,
    pub error: Option<String>,
    pub form: ReviewForm,
    pub trailer: TrailerState,
}

impl DetailSession {
    pub fn is_open(&self) -> bool {
        self.movie_id.is_some()
    }

    pub fn is_current(&self, session: u64) -> bool {
        self.is_open() && self.session == session
    }

    /// Starts a fresh session for `id` and returns its token.
    pub fn open(&mut self, id: MovieId) -> u64 {
        self.session += 1;
        self.movie_id = Some(id);
        self.movie = None;
        self.loading = true;
        self.error = None;
        self.form.reset();
        self.trailer.reset();
        self.session
    }

    /// Ends the session. Trailer playback stops and the panel goes back to
    /// its placeholder whatever it was showing.
    pub fn close(&mut self) {
        self.session += 1;
        self.movie_id = None;
        self.movie = None;
        self.loading = false;
        self.error = None;
        self.form.editing = false;
        self.trailer.reset();
    }

    /// Marks a re-fetch of the same movie, keeping what is on screen until
    /// the new copy arrives.
    pub fn refresh(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn loaded(&mut self, movie: Movie) {
        self.loading = false;
        self.error = None;
        self.movie = Some(movie);
    }

    pub fn failed(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }

    pub fn title(&self) -> Option<&str> {
        self.movie.as_ref().map(|movie| movie.name.as_str())
    }
}
