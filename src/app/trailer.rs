use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

pub const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

#[derive(Debug, Error)]
pub enum TrailerError {
    #[error("no YouTube API key or trailer proxy configured")]
    MissingKey,
    #[error("trailer search failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("trailer search answered with status {0}")]
    Status(StatusCode),
    #[error("could not decode trailer search response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Looks up a single trailer video for a movie title.
pub trait TrailerSearch: Send + Sync {
    fn find_trailer(&self, movie_title: &str) -> Result<Option<String>, TrailerError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

/// YouTube Data API search, either direct (with a key) or through a proxy
/// that adds the key server-side.
pub struct YouTubeSearch {
    client: Client,
    search_url: String,
    api_key: Option<String>,
    via_proxy: bool,
}

impl YouTubeSearch {
    pub fn new(search_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            via_proxy: search_url.is_some(),
            search_url: search_url.unwrap_or_else(|| YOUTUBE_SEARCH_URL.to_string()),
            api_key,
        }
    }

    pub fn query_for(movie_title: &str) -> String {
        format!("{} official trailer", movie_title)
    }

    pub fn request_url(&self, movie_title: &str) -> Result<String, TrailerError> {
        let mut url = format!(
            "{}?part=snippet&q={}&type=video&maxResults=1",
            self.search_url,
            urlencoding::encode(&Self::query_for(movie_title))
        );

        match &self.api_key {
            Some(key) => url.push_str(&format!("&key={}", urlencoding::encode(key))),
            None if self.via_proxy => {}
            None => return Err(TrailerError::MissingKey),
        }

        Ok(url)
    }
}

impl TrailerSearch for YouTubeSearch {
    fn find_trailer(&self, movie_title: &str) -> Result<Option<String>, TrailerError> {
        let url = self.request_url(movie_title)?;
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(TrailerError::Transport)?;

        if !response.status().is_success() {
            return Err(TrailerError::Status(response.status()));
        }

        let body: SearchResponse = response.json().map_err(TrailerError::Decode)?;
        Ok(first_video_id(body))
    }
}

fn first_video_id(body: SearchResponse) -> Option<String> {
    body.items.into_iter().next().and_then(|item| item.id.video_id)
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// What the trailer panel of the detail overlay currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrailerState {
    #[default]
    Placeholder,
    Searching,
    Playing { video_id: String },
    Unavailable,
}

impl TrailerState {
    /// Starts a search unless one is already running or a video is playing.
    /// Returns whether a search should actually be issued.
    pub fn begin_search(&mut self) -> bool {
        if *self != TrailerState::Placeholder {
            return false;
        }
        *self = TrailerState::Searching;
        true
    }

    pub fn finish(&mut self, video_id: Option<String>) {
        *self = match video_id {
            Some(video_id) => TrailerState::Playing { video_id },
            None => TrailerState::Unavailable,
        };
    }

    /// "Try again": back to the button, only from the error state.
    pub fn retry(&mut self) {
        if *self == TrailerState::Unavailable {
            *self = TrailerState::Placeholder;
        }
    }

    /// Stops playback and drops any previous result.
    pub fn reset(&mut self) {
        *self = TrailerState::Placeholder;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_search_url_carries_key_and_single_result() {
        let search = YouTubeSearch::new(None, Some("secret".into()));
        let url = search.request_url("Dune").unwrap();

        assert!(url.starts_with(YOUTUBE_SEARCH_URL));
        assert!(url.contains("q=Dune%20official%20trailer"));
        assert!(url.contains("maxResults=1"));
        assert!(url.contains("type=video"));
        assert!(url.ends_with("&key=secret"));
    }

    #[test]
    fn proxy_search_needs_no_key() {
        let search = YouTubeSearch::new(Some("http://localhost:9000/trailers".into()), None);
        let url = search.request_url("Heat").unwrap();

        assert!(url.starts_with("http://localhost:9000/trailers?"));
        assert!(!url.contains("key="));
    }

    #[test]
    fn direct_search_without_key_is_refused() {
        let search = YouTubeSearch::new(None, None);
        assert!(matches!(
            search.request_url("Heat"),
            Err(TrailerError::MissingKey)
        ));
    }

    #[test]
    fn first_item_wins_and_empty_means_none() {
        let body: SearchResponse =
            serde_json::from_str(r#"{"items":[{"id":{"kind":"youtube#video","videoId":"abc123"}}]}"#)
                .unwrap();
        assert_eq!(first_video_id(body).as_deref(), Some("abc123"));

        let empty: SearchResponse = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert_eq!(first_video_id(empty), None);

        let missing: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(first_video_id(missing), None);
    }

    #[test]
    fn only_one_search_at_a_time() {
        let mut state = TrailerState::default();
        assert!(state.begin_search());
        assert!(!state.begin_search());

        state.finish(Some("abc".into()));
        assert!(!state.begin_search());
    }

    #[test]
    fn failed_search_can_be_retried() {
        let mut state = TrailerState::Searching;
        state.finish(None);
        assert_eq!(state, TrailerState::Unavailable);

        state.retry();
        assert_eq!(state, TrailerState::Placeholder);
        assert!(state.begin_search());
    }
}
