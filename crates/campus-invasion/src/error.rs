use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the game simulation.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to write high score to {path}: {source}")]
    HighScoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
