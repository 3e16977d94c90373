//! Score keeping and the persisted high score.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GameError;
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    pub ships_left: u32,
    pub score: u64,
    pub level: u32,
    /// Survives `reset_stats`.
    pub high_score: u64,
}

impl GameStats {
    pub fn new(settings: &Settings, high_score: u64) -> Self {
        Self {
            ships_left: settings.ship_limit,
            score: 0,
            level: 1,
            high_score,
        }
    }

    pub fn reset_stats(&mut self, settings: &Settings) {
        self.ships_left = settings.ship_limit;
        self.score = 0;
        self.level = 1;
    }

    /// Returns true when the current score became the new high score.
    pub fn check_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}

/// Plain-text file holding a single integer.
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable file counts as zero.
    pub fn load(&self) -> u64 {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::info!(path = %self.path.display(), error = %e, "No saved high score");
                return 0;
            }
        };

        match raw.trim().parse::<u64>() {
            Ok(score) => {
                tracing::debug!(path = %self.path.display(), score, "Loaded high score");
                score
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt high score file");
                0
            }
        }
    }

    pub fn save(&self, score: u64) -> Result<(), GameError> {
        fs::write(&self.path, score.to_string()).map_err(|source| GameError::HighScoreWrite {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), score, "Saved high score");
        Ok(())
    }
}
