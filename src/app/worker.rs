use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use image::DynamicImage;

use crate::app::api::{Movie, MovieApi, MovieId, NewReview};
use crate::app::poster::download_poster;
use crate::app::trailer::TrailerSearch;

/// Work the UI asks for. Key and message handlers on `App` only ever return
/// these; nothing on the UI thread touches the network.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadCatalog,
    FetchDetail { session: u64, id: MovieId },
    SubmitReview { session: u64, id: MovieId, review: NewReview },
    SearchTrailer { session: u64, title: String },
    FetchPoster { session: u64, url: String },
}

/// Results coming back from the background threads.
#[derive(Debug)]
pub enum WorkerMessage {
    CatalogLoaded(Vec<Movie>),
    CatalogFailed(String),
    DetailLoaded { session: u64, movie: Movie },
    DetailFailed { session: u64, error: String },
    ReviewSubmitted { session: u64, id: MovieId },
    ReviewFailed { session: u64, error: String },
    TrailerFound { session: u64, video_id: Option<String> },
    TrailerFailed { session: u64, error: String },
    PosterLoaded { session: u64, image: DynamicImage },
    PosterFailed { session: u64, error: String },
}

/// Runs one command to completion on the calling thread.
pub fn run_command(
    api: &dyn MovieApi,
    trailers: &dyn TrailerSearch,
    command: Command,
) -> WorkerMessage {
    match command {
        Command::LoadCatalog => match api.list_movies() {
            Ok(movies) => WorkerMessage::CatalogLoaded(movies),
            Err(e) => WorkerMessage::CatalogFailed(e.to_string()),
        },
        Command::FetchDetail { session, id } => match api.get_movie(&id) {
            Ok(movie) => WorkerMessage::DetailLoaded { session, movie },
            Err(e) => WorkerMessage::DetailFailed {
                session,
                error: e.to_string(),
            },
        },
        Command::SubmitReview {
            session,
            id,
            review,
        } => match api.submit_review(&id, &review) {
            Ok(()) => WorkerMessage::ReviewSubmitted { session, id },
            Err(e) => WorkerMessage::ReviewFailed {
                session,
                error: e.to_string(),
            },
        },
        Command::SearchTrailer { session, title } => match trailers.find_trailer(&title) {
            Ok(video_id) => WorkerMessage::TrailerFound { session, video_id },
            Err(e) => WorkerMessage::TrailerFailed {
                session,
                error: e.to_string(),
            },
        },
        Command::FetchPoster { session, url } => match download_poster(&url) {
            Ok(image) => WorkerMessage::PosterLoaded { session, image },
            Err(e) => WorkerMessage::PosterFailed {
                session,
                error: e.to_string(),
            },
        },
    }
}

/// Spawns a thread per command and funnels the results into one channel
/// that the event loop drains.
pub struct Dispatcher {
    api: Arc<dyn MovieApi>,
    trailers: Arc<dyn TrailerSearch>,
    sender: mpsc::Sender<WorkerMessage>,
}

impl Dispatcher {
    pub fn new(
        api: Arc<dyn MovieApi>,
        trailers: Arc<dyn TrailerSearch>,
    ) -> (Self, mpsc::Receiver<WorkerMessage>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                api,
                trailers,
                sender,
            },
            receiver,
        )
    }

    pub fn dispatch(&self, command: Command) {
        tracing::debug!("dispatching {:?}", command);

        let api = Arc::clone(&self.api);
        let trailers = Arc::clone(&self.trailers);
        let sender = self.sender.clone();

        thread::spawn(move || {
            let message = run_command(api.as_ref(), trailers.as_ref(), command);
            // The receiver only goes away when the app is shutting down
            let _ = sender.send(message);
        });
    }
}
