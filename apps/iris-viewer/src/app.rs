//! Key handling and the redraw loop.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::Backend};

use crate::camera::Camera;
use crate::views::{self, Chart};

/// Degrees per arrow-key press.
const ROTATE_STEP: f64 = 5.0;
const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct App {
    chart: Chart,
    camera: Option<Camera>,
    panel: usize,
    quit: bool,
}

impl App {
    pub fn new(chart: Chart) -> Self {
        Self {
            camera: chart.camera(),
            chart,
            panel: 0,
            quit: false,
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        while !self.should_quit() {
            terminal.draw(|f| views::draw(f, &self.chart, self.camera(), self.panel()))?;

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
                _ => {}
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let panels = self.chart.panel_count();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Tab => self.panel = (self.panel + 1) % panels,
            KeyCode::BackTab => self.panel = (self.panel + panels - 1) % panels,
            KeyCode::Char('r') => {
                if let Some(camera) = &mut self.camera {
                    camera.reset();
                }
            }
            code => {
                let (d_elev, d_azim) = match code {
                    KeyCode::Left => (0.0, -ROTATE_STEP),
                    KeyCode::Right => (0.0, ROTATE_STEP),
                    KeyCode::Up => (ROTATE_STEP, 0.0),
                    KeyCode::Down => (-ROTATE_STEP, 0.0),
                    _ => return,
                };
                if let Some(camera) = &mut self.camera {
                    camera.rotate(d_elev, d_azim);
                    tracing::trace!(elev = camera.elev, azim = camera.azim, "Camera moved");
                }
            }
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn panel(&self) -> usize {
        self.panel
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_iris::Dataset;
    use campus_iris::analysis;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn preview_app() -> App {
        App::new(Chart::Preview(analysis::preview(&Dataset::iris().unwrap())))
    }

    #[test]
    fn test_tab_cycles_panels_both_ways() {
        let mut app = preview_app();
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.panel(), 1);
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.panel(), 0);
        app.handle_key(press(KeyCode::BackTab));
        assert_eq!(app.panel(), 1);
    }

    #[test]
    fn test_arrows_rotate_only_3d_charts() {
        let mut app = preview_app();
        app.handle_key(press(KeyCode::Left));
        assert!(app.camera().is_none());

        let plane = analysis::decision_plane(&Dataset::iris().unwrap()).unwrap();
        let mut app = App::new(Chart::Boundary(plane));
        assert_eq!(app.camera().map(|c| (c.elev, c.azim)), Some((20.0, 30.0)));

        app.handle_key(press(KeyCode::Left));
        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.camera().map(|c| (c.elev, c.azim)), Some((25.0, 25.0)));

        app.handle_key(press(KeyCode::Char('r')));
        assert_eq!(app.camera().map(|c| (c.elev, c.azim)), Some((20.0, 30.0)));
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            press(KeyCode::Char('q')),
            press(KeyCode::Esc),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = preview_app();
            app.handle_key(key);
            assert!(app.should_quit());
        }

        let mut app = preview_app();
        app.handle_key(press(KeyCode::Char('x')));
        assert!(!app.should_quit());
    }
}
