//! # Alien Invasion
//!
//! Terminal front-end: shoot down the fleet before it reaches you.

use std::io::{self, Stdout};

use anyhow::Context;
use campus_invasion::{Game, HighScoreStore, Settings};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use ratatui::{Terminal, backend::CrosstermBackend};

mod app;
mod config;
mod input;
mod telemetry;
mod view;

use app::App;
use config::GameConfig;
use input::InputState;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode, alternate screen and mouse capture. Returns whether the
/// terminal reports key releases.
fn setup_terminal() -> anyhow::Result<(Tui, bool)> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let release_events = supports_keyboard_enhancement().unwrap_or(false);
    if release_events {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok((terminal, release_events))
}

fn restore_terminal(terminal: &mut Tui, release_events: bool) -> io::Result<()> {
    if release_events {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = GameConfig::from_env();
    if let Some(path) = &config.log_path {
        telemetry::init_file_telemetry(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
    }

    let mut settings = Settings::default();
    if let Some(fps) = config.fps {
        settings.fps = fps;
    }
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let store = HighScoreStore::new(&config.high_score_path);
    tracing::info!(?config, "Starting Alien Invasion");

    let game = Game::new(settings, store, rng);

    let (mut terminal, release_events) = setup_terminal()?;
    let mut app = App::new(game, InputState::new(release_events), config.bell);
    let result = app.run(&mut terminal);
    let restored = restore_terminal(&mut terminal, release_events);
    shut_down(app.game(), result, restored)
}

/// Save the high score first so a loop or terminal error cannot lose it.
fn shut_down<R: Rng>(
    game: &Game<R>,
    run: anyhow::Result<()>,
    restored: io::Result<()>,
) -> anyhow::Result<()> {
    let saved = game.quit().context("saving high score");
    run?;
    restored.context("restoring terminal")?;
    saved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_at(path: &std::path::Path) -> Game<StdRng> {
        Game::new(
            Settings::default(),
            HighScoreStore::new(path),
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn test_high_score_saved_when_loop_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("high_score.txt");
        let game = game_at(&path);

        let result = shut_down(&game, Err(anyhow::anyhow!("terminal went away")), Ok(()));

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0");
    }

    #[test]
    fn test_high_score_saved_when_restore_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("high_score.txt");
        std::fs::write(&path, "1250").unwrap();
        let game = game_at(&path);

        let restored = Err(io::Error::other("leave alternate screen"));
        let result = shut_down(&game, Ok(()), restored);

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1250");
    }

    #[test]
    fn test_clean_shutdown_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("high_score.txt");

        assert!(shut_down(&game_at(&path), Ok(()), Ok(())).is_ok());
        assert!(path.exists());
    }
}
