use crate::geometry::Rect;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct Alien {
    pub rect: Rect,
}

impl Alien {
    pub fn new(settings: &Settings, x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, settings.alien_width, settings.alien_height),
        }
    }

    pub fn check_edges(&self, settings: &Settings) -> bool {
        self.rect.right() >= settings.screen_width || self.rect.left() <= 0.0
    }

    pub fn update(&mut self, settings: &Settings) {
        self.rect.x += settings.dynamic.alien_speed * settings.dynamic.fleet_direction;
    }
}

/// Lay out a full fleet: one alien-width gaps between columns, one
/// alien-height gaps between rows, and room left for the ship below.
pub fn create_fleet(settings: &Settings) -> Vec<Alien> {
    let (w, h) = (settings.alien_width, settings.alien_height);
    let mut fleet = Vec::new();

    let mut y = h;
    while y < settings.screen_height - 3.0 * h {
        let mut x = w;
        while x < settings.screen_width - 2.0 * w {
            fleet.push(Alien::new(settings, x, y));
            x += 2.0 * w;
        }
        y += 2.0 * h;
    }

    fleet
}
