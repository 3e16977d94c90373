use crate::geometry::Rect;
use crate::settings::Settings;

/// The player's ship, parked on the bottom edge.
#[derive(Debug, Clone)]
pub struct Ship {
    pub rect: Rect,
    pub moving_right: bool,
    pub moving_left: bool,
}

impl Ship {
    pub fn new(settings: &Settings) -> Self {
        let mut ship = Self {
            rect: Rect::new(0.0, 0.0, settings.ship_width, settings.ship_height),
            moving_right: false,
            moving_left: false,
        };
        ship.center_ship(settings);
        ship
    }

    /// Move according to the intent flags without leaving the screen.
    pub fn update(&mut self, settings: &Settings) {
        let speed = settings.dynamic.ship_speed;
        if self.moving_right && self.rect.right() < settings.screen_width {
            self.rect.x += speed;
        }
        if self.moving_left && self.rect.left() > 0.0 {
            self.rect.x -= speed;
        }
        self.rect.x = self
            .rect
            .x
            .clamp(0.0, (settings.screen_width - self.rect.width).max(0.0));
    }

    pub fn center_ship(&mut self, settings: &Settings) {
        self.rect
            .set_midbottom((settings.screen_width / 2.0, settings.screen_height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_stops_at_right_edge() {
        let settings = Settings::default();
        let mut ship = Ship::new(&settings);
        ship.moving_right = true;

        for _ in 0..1000 {
            ship.update(&settings);
        }
        assert_eq!(ship.rect.right(), settings.screen_width);
    }

    #[test]
    fn test_opposing_flags_cancel() {
        let settings = Settings::default();
        let mut ship = Ship::new(&settings);
        let start = ship.rect.x;
        ship.moving_left = true;
        ship.moving_right = true;

        ship.update(&settings);
        assert_eq!(ship.rect.x, start);
    }
}
