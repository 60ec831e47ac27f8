use std::time::{Duration, Instant};

use crate::app::api::Movie;

/// Quiet period that has to pass after the last keystroke before a search runs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Returns the positions of the movies whose name or description contains
/// `term`, ignoring case. Order follows the catalog.
pub fn filter_movies(movies: &[Movie], term: &str) -> Vec<usize> {
    let needle = term.to_lowercase();

    movies
        .iter()
        .enumerate()
        .filter(|(_, movie)| {
            needle.is_empty()
                || movie.name.to_lowercase().contains(&needle)
                || movie.description.to_lowercase().contains(&needle)
        })
        .map(|(index, _)| index)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct PendingSearch {
    term: String,
    due: Instant,
}

/// Holds at most one scheduled search. Scheduling again replaces whatever was
/// pending, so a burst of keystrokes only ever runs the last one.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<PendingSearch>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule(&mut self, term: impl Into<String>, now: Instant) {
        self.pending = Some(PendingSearch {
            term: term.into(),
            due: now + self.delay,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Hands out the pending term once its quiet period is over.
    pub fn take_ready(&mut self, now: Instant) -> Option<String> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|pending| now >= pending.due);
        if !ready {
            return None;
        }
        self.pending.take().map(|pending| pending.term)
    }

    /// How long the event loop may sleep before the pending search is due.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|pending| pending.due.saturating_duration_since(now))
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

/// Search bar state: what is typed, what was last applied, and the debouncer
/// between the two.
#[derive(Debug, Default)]
pub struct SearchState {
    pub input: String,
    pub applied: String,
    pub focused: bool,
    pub debouncer: SearchDebouncer,
}

impl SearchState {
    pub fn push(&mut self, c: char, now: Instant) {
        self.input.push(c);
        self.debouncer.schedule(self.input.clone(), now);
    }

    pub fn pop(&mut self, now: Instant) {
        self.input.pop();
        self.debouncer.schedule(self.input.clone(), now);
    }

    /// The clear button is only offered while a non-empty search is applied.
    pub fn shows_clear(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.applied.clear();
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::api::MovieId;

    fn movie(id: &str, name: &str, description: &str) -> Movie {
        Movie {
            id: MovieId::from(id),
            name: name.to_string(),
            description: description.to_string(),
            poster_url: String::new(),
            average_rating: 0.0,
            reviews: Vec::new(),
        }
    }

    fn catalog() -> Vec<Movie> {
        vec![
            movie("1", "Dune", "Desert planet saga..."),
            movie("2", "Heat", "A heist in Los Angeles"),
            movie("3", "Arrival", "Linguist meets visitors from a distant planet"),
        ]
    }

    #[test]
    fn search_ignores_case() {
        let movies = catalog();
        for term in ["dune", "DUNE", "dUnE"] {
            assert_eq!(filter_movies(&movies, term), vec![0]);
        }
    }

    #[test]
    fn search_matches_description_and_keeps_catalog_order() {
        let movies = catalog();
        assert_eq!(filter_movies(&movies, "PLANET"), vec![0, 2]);
    }

    #[test]
    fn empty_term_returns_everything() {
        let movies = catalog();
        assert_eq!(filter_movies(&movies, ""), vec![0, 1, 2]);
    }

    #[test]
    fn unknown_term_returns_nothing() {
        assert!(filter_movies(&catalog(), "xyz").is_empty());
    }

    #[test]
    fn result_is_always_a_subsequence() {
        let movies = catalog();
        for term in ["a", "e", "in", "s", "planet", "z"] {
            let hits = filter_movies(&movies, term);
            assert!(hits.windows(2).all(|pair| pair[0] < pair[1]), "{term}");
        }
    }

    #[test]
    fn burst_of_input_runs_once_with_last_value() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::default();

        debouncer.schedule("d", start);
        debouncer.schedule("du", start + Duration::from_millis(100));
        debouncer.schedule("dun", start + Duration::from_millis(200));

        // 300ms after the first event but only 100ms after the last one
        assert_eq!(debouncer.take_ready(start + Duration::from_millis(300)), None);

        let fired = debouncer.take_ready(start + Duration::from_millis(500));
        assert_eq!(fired.as_deref(), Some("dun"));
        assert_eq!(debouncer.take_ready(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn cancel_drops_pending_search() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::default();
        debouncer.schedule("heat", start);
        debouncer.cancel();

        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.take_ready(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn time_until_ready_counts_down() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::default();
        assert_eq!(debouncer.time_until_ready(start), None);

        debouncer.schedule("x", start);
        assert_eq!(
            debouncer.time_until_ready(start + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            debouncer.time_until_ready(start + Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn clear_resets_input_and_pending_search() {
        let now = Instant::now();
        let mut search = SearchState::default();
        search.push('x', now);
        search.applied = "x".into();
        assert!(search.shows_clear());

        search.clear();
        assert!(search.input.is_empty());
        assert!(!search.shows_clear());
        assert!(!search.debouncer.is_pending());
    }
}
