//! Terminal events to game commands.
//!
//! Terminals that implement the kitty keyboard protocol report key
//! releases, which map directly onto the ship's movement flags. Everywhere
//! else a held arrow key only shows up as a stream of auto-repeat presses,
//! so movement stays on for a short window that each repeat refreshes.

use std::time::{Duration, Instant};

use campus_invasion::Command;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

/// Long enough to bridge the terminal's initial auto-repeat delay.
const FIRST_HOLD: Duration = Duration::from_millis(500);
const REPEAT_HOLD: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Game(Command),
    /// Left click at a terminal cell; the view maps it to game coordinates.
    Click { column: u16, row: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn command(self, on: bool) -> Command {
        match self {
            Side::Left => Command::MoveLeft(on),
            Side::Right => Command::MoveRight(on),
        }
    }
}

#[derive(Debug)]
pub struct InputState {
    release_events: bool,
    left_until: Option<Instant>,
    right_until: Option<Instant>,
}

impl InputState {
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            left_until: None,
            right_until: None,
        }
    }

    pub fn translate(&mut self, event: &Event, now: Instant) -> Vec<Action> {
        match event {
            Event::Key(key) => self.key(key, now),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                vec![Action::Click {
                    column: mouse.column,
                    row: mouse.row,
                }]
            }
            _ => Vec::new(),
        }
    }

    /// Drop movement whose hold window ran out. Only relevant when the
    /// terminal does not report releases.
    pub fn expire(&mut self, now: Instant) -> Vec<Command> {
        let mut out = Vec::new();
        for side in [Side::Left, Side::Right] {
            let slot = self.slot(side);
            if matches!(*slot, Some(until) if now >= until) {
                *slot = None;
                out.push(side.command(false));
            }
        }
        out
    }

    fn key(&mut self, key: &KeyEvent, now: Instant) -> Vec<Action> {
        let mut out = Vec::new();

        if key.kind == KeyEventKind::Release {
            match key.code {
                KeyCode::Right => self.release(Side::Right, &mut out),
                KeyCode::Left => self.release(Side::Left, &mut out),
                _ => {}
            }
            return out;
        }

        match key.code {
            KeyCode::Right => self.press(Side::Right, now, &mut out),
            KeyCode::Left => self.press(Side::Left, now, &mut out),
            KeyCode::Char(' ') if key.kind == KeyEventKind::Press => {
                out.push(Action::Game(Command::Fire))
            }
            KeyCode::Char('p') | KeyCode::Enter => out.push(Action::Game(Command::Play)),
            KeyCode::Char('q') | KeyCode::Esc => out.push(Action::Game(Command::Quit)),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                out.push(Action::Game(Command::Quit))
            }
            _ => {}
        }
        out
    }

    fn press(&mut self, side: Side, now: Instant, out: &mut Vec<Action>) {
        if self.release_events {
            out.push(Action::Game(side.command(true)));
            return;
        }

        let slot = self.slot(side);
        let until = match *slot {
            Some(until) => until.max(now + REPEAT_HOLD),
            None => {
                out.push(Action::Game(side.command(true)));
                now + FIRST_HOLD
            }
        };
        *slot = Some(until);
    }

    fn release(&mut self, side: Side, out: &mut Vec<Action>) {
        *self.slot(side) = None;
        out.push(Action::Game(side.command(false)));
    }

    fn slot(&mut self, side: Side) -> &mut Option<Instant> {
        match side {
            Side::Left => &mut self.left_until,
            Side::Right => &mut self.right_until,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{MouseEvent, MouseEventKind};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    #[test]
    fn test_release_events_drive_movement() {
        let mut input = InputState::new(true);
        let now = Instant::now();

        assert_eq!(
            input.translate(&key(KeyCode::Right, KeyEventKind::Press), now),
            vec![Action::Game(Command::MoveRight(true))]
        );
        assert!(input.expire(now + Duration::from_secs(5)).is_empty());
        assert_eq!(
            input.translate(&key(KeyCode::Right, KeyEventKind::Release), now),
            vec![Action::Game(Command::MoveRight(false))]
        );
    }

    #[test]
    fn test_hold_window_expires_without_repeats() {
        let mut input = InputState::new(false);
        let now = Instant::now();

        let actions = input.translate(&key(KeyCode::Left, KeyEventKind::Press), now);
        assert_eq!(actions, vec![Action::Game(Command::MoveLeft(true))]);

        assert!(input.expire(now + Duration::from_millis(100)).is_empty());
        assert_eq!(
            input.expire(now + FIRST_HOLD),
            vec![Command::MoveLeft(false)]
        );
    }

    #[test]
    fn test_repeats_extend_hold_without_new_commands() {
        let mut input = InputState::new(false);
        let start = Instant::now();
        input.translate(&key(KeyCode::Right, KeyEventKind::Press), start);

        let later = start + Duration::from_millis(450);
        let actions = input.translate(&key(KeyCode::Right, KeyEventKind::Press), later);
        assert!(actions.is_empty());

        assert!(input.expire(start + FIRST_HOLD).is_empty());
        assert_eq!(
            input.expire(later + REPEAT_HOLD),
            vec![Command::MoveRight(false)]
        );
    }

    #[test]
    fn test_fire_only_on_press() {
        let mut input = InputState::new(true);
        let now = Instant::now();

        assert_eq!(
            input.translate(&key(KeyCode::Char(' '), KeyEventKind::Press), now),
            vec![Action::Game(Command::Fire)]
        );
        assert!(
            input
                .translate(&key(KeyCode::Char(' '), KeyEventKind::Repeat), now)
                .is_empty()
        );
    }

    #[test]
    fn test_left_click_is_reported_with_cell() {
        let mut input = InputState::new(true);
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 12,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });

        assert_eq!(
            input.translate(&click, Instant::now()),
            vec![Action::Click { column: 12, row: 7 }]
        );
    }
}
