use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_PREFIX: &str = "movie-catalog";

/// Daily rolling log file in `dir`, creating the directory if needed.
pub fn file_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(dir)
}

/// Sends logs to a daily file; the terminal belongs to the UI.
///
/// Falls back to the temp dir when `dir` is unusable, and runs without a log
/// file when that fails too.
pub fn init_logging(dir: &Path) -> Option<WorkerGuard> {
    let fallback = std::env::temp_dir().join("movie-catalog-tui");
    let appender = match file_appender(dir) {
        Ok(appender) => appender,
        Err(first) => match file_appender(&fallback) {
            Ok(appender) => {
                eprintln!(
                    "Warning: cannot log to {}: {}. Logging to {} instead.",
                    dir.display(),
                    first,
                    fallback.display()
                );
                appender
            }
            Err(second) => {
                eprintln!(
                    "Warning: logging disabled, cannot write to {}: {}",
                    dir.display(),
                    second
                );
                return None;
            }
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("movie_catalog_tui=info"));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncreatable_log_dir_is_an_error_not_a_panic() {
        // A regular file cannot have a directory created underneath it
        let file = tempfile::NamedTempFile::new().unwrap();
        let dir = file.path().join("logs");

        assert!(file_appender(&dir).is_err());
    }

    #[test]
    fn log_dir_is_created_on_demand() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("logs");

        assert!(file_appender(&dir).is_ok());
        assert!(dir.is_dir());
    }
}
