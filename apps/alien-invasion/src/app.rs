//! The interactive frame loop.

use std::io::{self, Write};
use std::thread;
use std::time::Instant;

use campus_invasion::{Command, Game, GameEvent};
use crossterm::event;
use rand::Rng;
use ratatui::{Terminal, backend::Backend, layout::Rect};

use crate::input::{Action, InputState};
use crate::view;

pub struct App<R: Rng> {
    game: Game<R>,
    input: InputState,
    /// Where the playfield was last drawn, for mouse hit-testing.
    canvas_area: Rect,
    bell: bool,
}

impl<R: Rng> App<R> {
    pub fn new(game: Game<R>, input: InputState, bell: bool) -> Self {
        Self {
            game,
            input,
            canvas_area: Rect::default(),
            bell,
        }
    }

    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    /// Run until the player quits. One tick per frame, input drained between
    /// frames.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let frame = self.game.settings().frame_duration();
        let mut deadline = Instant::now();

        loop {
            terminal.draw(|f| self.canvas_area = view::draw(f, &self.game))?;
            deadline += frame;

            loop {
                let timeout = deadline.saturating_duration_since(Instant::now());
                if !event::poll(timeout)? {
                    break;
                }
                let event = event::read()?;
                for action in self.input.translate(&event, Instant::now()) {
                    let events = self.apply(action);
                    self.react(&events)?;
                }
                if self.game.quit_requested() {
                    tracing::info!("Quit requested");
                    return Ok(());
                }
            }

            for command in self.input.expire(Instant::now()) {
                self.game.handle(command);
            }

            let events = self.game.tick();
            if self.react(&events)? {
                thread::sleep(self.game.settings().ship_hit_pause);
            }

            // Never try to catch up on frames lost to a pause or a slow draw.
            let now = Instant::now();
            if deadline < now {
                deadline = now;
            }
        }
    }

    fn apply(&mut self, action: Action) -> Vec<GameEvent> {
        match action {
            Action::Game(command) => self.game.handle(command),
            Action::Click { column, row } => {
                match view::cell_to_game(self.canvas_area, self.game.settings(), column, row) {
                    Some((x, y)) => self.game.handle(Command::Click { x, y }),
                    None => Vec::new(),
                }
            }
        }
    }

    /// Ring for shots and explosions. Returns true when the ship was lost
    /// and the loop should pause.
    fn react(&self, events: &[GameEvent]) -> io::Result<bool> {
        let mut pause = false;
        let mut ring = false;

        for event in events {
            match event {
                GameEvent::Shot | GameEvent::AlienDestroyed { .. } | GameEvent::GameOver => {
                    ring = true
                }
                GameEvent::ShipLost { ships_left } => {
                    tracing::info!(ships_left, "Ship lost");
                    ring = true;
                    pause = true;
                }
                GameEvent::LevelUp { level } => tracing::info!(level, "Level up"),
                GameEvent::HighScore { score } => tracing::debug!(score, "New high score"),
            }
        }

        if ring && self.bell {
            let mut stdout = io::stdout();
            stdout.write_all(b"\x07")?;
            stdout.flush()?;
        }
        Ok(pause)
    }
}
