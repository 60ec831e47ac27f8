use std::fmt;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Identifier of a movie as handed out by the backend.
///
/// The backend has been seen returning both numeric and string ids, so both
/// are accepted and kept in their textual form for building request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MovieId(pub String);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(value: &str) -> Self {
        MovieId(value.to_string())
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => MovieId(text),
            RawId::Number(number) => MovieId(number.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub reviewer: String,
    pub review_text: String,
    pub rating: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub poster_url: String,
    #[serde(default, deserialize_with = "rating_or_zero")]
    pub average_rating: f64,
    /// Only present on the single-movie endpoint.
    #[serde(default, deserialize_with = "reviews_or_empty")]
    pub reviews: Vec<Review>,
}

/// Body of `POST /movies/{id}/review`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub reviewer: String,
    pub review_text: String,
    pub rating: i64,
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn rating_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn reviews_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Review>, D::Error> {
    Ok(Option::<Vec<Review>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The backend movie API, as consumed by the background workers.
pub trait MovieApi: Send + Sync {
    fn list_movies(&self) -> Result<Vec<Movie>, ApiError>;
    fn get_movie(&self, id: &MovieId) -> Result<Movie, ApiError>;
    /// Only the status matters; the backend stores the review on any 2xx.
    fn submit_review(&self, id: &MovieId, review: &NewReview) -> Result<(), ApiError>;
}

pub struct HttpMovieApi {
    client: Client,
    base_url: String,
}

impl HttpMovieApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn movie_url(&self, id: &MovieId) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(&id.0))
    }

    pub fn review_url(&self, id: &MovieId) -> String {
        format!("{}/review", self.movie_url(id))
    }
}

/// Turns transport failures and non-2xx answers into errors.
fn check_status(
    url: &str,
    result: Result<reqwest::blocking::Response, reqwest::Error>,
) -> Result<reqwest::blocking::Response, ApiError> {
    let response = result.map_err(|source| ApiError::Transport {
        url: url.to_string(),
        source,
    })?;

    if !response.status().is_success() {
        return Err(ApiError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    Ok(response)
}

/// Checks the status and decodes the JSON body of a finished request.
fn read_json<T: for<'de> Deserialize<'de>>(
    url: &str,
    result: Result<reqwest::blocking::Response, reqwest::Error>,
) -> Result<T, ApiError> {
    check_status(url, result)?
        .json()
        .map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
}

impl MovieApi for HttpMovieApi {
    fn list_movies(&self) -> Result<Vec<Movie>, ApiError> {
        read_json(&self.base_url, self.client.get(&self.base_url).send())
    }

    fn get_movie(&self, id: &MovieId) -> Result<Movie, ApiError> {
        let url = self.movie_url(id);
        read_json(&url, self.client.get(&url).send())
    }

    fn submit_review(&self, id: &MovieId, review: &NewReview) -> Result<(), ApiError> {
        let url = self.review_url(id);
        check_status(&url, self.client.post(&url).json(review).send()).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Serves a single request with a canned status line and body.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            // The review body is a JSON object, so its closing brace ends the request
            while !request.ends_with(b"}") {
                let read = stream.read(&mut chunk).unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{}/api/movies", addr)
    }

    fn ana() -> NewReview {
        NewReview {
            reviewer: "Ana".into(),
            review_text: "Great!".into(),
            rating: 5,
        }
    }

    #[test]
    fn review_accepted_without_movie_body() {
        let api = HttpMovieApi::new(serve_once("201 Created", ""));
        assert!(api.submit_review(&MovieId::from("1"), &ana()).is_ok());
    }

    #[test]
    fn review_rejected_on_error_status() {
        let api = HttpMovieApi::new(serve_once("500 Internal Server Error", "{}"));
        assert!(matches!(
            api.submit_review(&MovieId::from("1"), &ana()),
            Err(ApiError::Status { status, .. }) if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[test]
    fn null_description_and_poster_decode_as_empty() {
        let movies: Vec<Movie> = serde_json::from_str(
            r#"[{"id":1,"name":"Dune","description":null,"posterUrl":"http://img/dune.jpg","averageRating":4.6},
                {"id":2,"name":"Heat","description":"A heist","posterUrl":null,"averageRating":3.0}]"#,
        )
        .unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].description, "");
        assert_eq!(movies[1].poster_url, "");
        assert_eq!(movies[1].description, "A heist");
    }

    #[test]
    fn summary_without_reviews_decodes() {
        let movies: Vec<Movie> = serde_json::from_str(
            r#"[{"id":1,"name":"Dune","description":"Desert planet saga...","posterUrl":"http://img/dune.jpg","averageRating":4.6}]"#,
        )
        .unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, MovieId::from("1"));
        assert_eq!(movies[0].poster_url, "http://img/dune.jpg");
        assert!(movies[0].reviews.is_empty());
    }

    #[test]
    fn detail_with_string_id_and_null_rating_decodes() {
        let movie: Movie = serde_json::from_str(
            r#"{"id":"abc","name":"Heat","description":"","posterUrl":"","averageRating":null,
                "reviews":[{"reviewer":"Ana","reviewText":"Great!","rating":5}]}"#,
        )
        .unwrap();

        assert_eq!(movie.id.to_string(), "abc");
        assert_eq!(movie.average_rating, 0.0);
        assert_eq!(movie.reviews[0].review_text, "Great!");
    }

    #[test]
    fn new_review_uses_backend_field_names() {
        let body = serde_json::to_value(NewReview {
            reviewer: "Ana".into(),
            review_text: "Great!".into(),
            rating: 5,
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({"reviewer": "Ana", "reviewText": "Great!", "rating": 5})
        );
    }

    #[test]
    fn request_paths_follow_backend_layout() {
        let api = HttpMovieApi::new("http://localhost:8080/api/movies");
        let id = MovieId::from("42");

        assert_eq!(api.movie_url(&id), "http://localhost:8080/api/movies/42");
        assert_eq!(
            api.review_url(&id),
            "http://localhost:8080/api/movies/42/review"
        );
    }
}
