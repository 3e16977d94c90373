//! Front-end configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Front-end configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub high_score_path: PathBuf,
    /// Overrides the frame rate from the game settings.
    pub fps: Option<u32>,
    /// Fixed RNG seed for reproducible alien fire.
    pub seed: Option<u64>,
    /// Log file. Without one nothing is logged, since stdout is the game.
    pub log_path: Option<PathBuf>,
    pub bell: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            high_score_path: PathBuf::from("high_score.txt"),
            fps: None,
            seed: None,
            log_path: None,
            bell: true,
        }
    }
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl GameConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            high_score_path: lookup("HIGH_SCORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.high_score_path),
            fps: parsed(&lookup, "GAME_FPS").filter(|fps: &u32| *fps > 0),
            seed: parsed(&lookup, "GAME_SEED"),
            log_path: lookup("GAME_LOG").map(PathBuf::from),
            bell: lookup("GAME_BELL")
                .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "off" | "no"))
                .unwrap_or(defaults.bell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::from_lookup(lookup(&[]));
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = GameConfig::from_lookup(lookup(&[
            ("HIGH_SCORE_PATH", "/tmp/scores.txt"),
            ("GAME_FPS", "30"),
            ("GAME_SEED", "7"),
            ("GAME_LOG", "game.log"),
            ("GAME_BELL", "off"),
        ]));

        assert_eq!(config.high_score_path, PathBuf::from("/tmp/scores.txt"));
        assert_eq!(config.fps, Some(30));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.log_path, Some(PathBuf::from("game.log")));
        assert!(!config.bell);
    }

    #[test]
    fn test_bad_numbers_are_ignored() {
        let config = GameConfig::from_lookup(lookup(&[("GAME_FPS", "0"), ("GAME_SEED", "abc")]));
        assert_eq!(config.fps, None);
        assert_eq!(config.seed, None);
    }
}
