use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_MOVIE_API_URL: &str = "http://localhost:8080/api/movies";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be an http(s) URL, got {value:?}")]
    InvalidUrl { name: &'static str, value: String },
}

/// Runtime settings, all taken from the environment (or a `.env` file).
///
/// The YouTube key is never compiled in: it is either supplied here or kept
/// behind a proxy given as `TRAILER_SEARCH_URL`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub movie_api_url: String,
    pub youtube_api_key: Option<String>,
    pub trailer_search_url: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is the normal case
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let movie_api_url = match non_blank("MOVIE_API_URL") {
            Some(url) => checked_url("MOVIE_API_URL", url)?,
            None => DEFAULT_MOVIE_API_URL.to_string(),
        };

        let trailer_search_url = non_blank("TRAILER_SEARCH_URL")
            .map(|url| checked_url("TRAILER_SEARCH_URL", url))
            .transpose()?;

        Ok(Self {
            movie_api_url,
            youtube_api_key: non_blank("YOUTUBE_API_KEY"),
            trailer_search_url,
            log_dir: non_blank("MOVIE_CATALOG_LOG_DIR").map(PathBuf::from),
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join("movie-catalog-tui").join("logs"))
                .unwrap_or_else(|| std::env::temp_dir().join("movie-catalog-tui"))
        })
    }
}

fn checked_url(name: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::InvalidUrl { name, value })
    }
}
