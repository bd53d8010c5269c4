use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("config error: {0}")]
    Config(String),

    #[error("background task failed: {0}")]
    Task(String),
}
