use crate::geometry::Rect;
use crate::settings::Settings;

pub const BUTTON_WIDTH: f32 = 200.0;
pub const BUTTON_HEIGHT: f32 = 50.0;

/// The "Play" button shown while the game is inactive.
#[derive(Debug, Clone)]
pub struct Button {
    pub rect: Rect,
    pub label: &'static str,
    pub button_color: (u8, u8, u8),
    pub text_color: (u8, u8, u8),
}

impl Button {
    pub fn play(settings: &Settings) -> Self {
        let mut rect = Rect::new(0.0, 0.0, BUTTON_WIDTH, BUTTON_HEIGHT);
        rect.set_center((settings.screen_width / 2.0, settings.screen_height / 2.0));
        Self {
            rect,
            label: "Play",
            button_color: (0, 135, 0),
            text_color: (255, 255, 255),
        }
    }
}
