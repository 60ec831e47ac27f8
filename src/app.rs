pub mod api;
pub mod detail;
pub mod filter;
pub mod poster;
pub mod preference;
pub mod review;
pub mod trailer;
pub mod worker;

#[allow(clippy::module_inception)]
mod app;

pub use app::{App, CurrentScreen};
pub use worker::{Dispatcher, WorkerMessage};
