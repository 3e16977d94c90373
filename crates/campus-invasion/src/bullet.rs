//! Projectiles fired by the ship and by the fleet.

use crate::alien::Alien;
use crate::geometry::Rect;
use crate::settings::Settings;
use crate::ship::Ship;

/// A ship bullet travelling straight up.
#[derive(Debug, Clone)]
pub struct Bullet {
    pub rect: Rect,
}

impl Bullet {
    pub fn new(settings: &Settings, ship: &Ship) -> Self {
        let mut rect = Rect::new(0.0, 0.0, settings.bullet_width, settings.bullet_height);
        rect.set_midtop(ship.rect.midtop());
        Self { rect }
    }

    pub fn update(&mut self, settings: &Settings) {
        self.rect.y -= settings.dynamic.bullet_speed;
    }

    pub fn is_gone(&self) -> bool {
        self.rect.bottom() <= 0.0
    }
}

/// An alien bullet with a fixed velocity vector.
#[derive(Debug, Clone)]
pub struct AlienBullet {
    pub rect: Rect,
    pub dx: f32,
    pub dy: f32,
}

impl AlienBullet {
    pub fn new(settings: &Settings, alien: &Alien, (dx, dy): (f32, f32)) -> Self {
        let mut rect = Rect::new(
            0.0,
            0.0,
            settings.alien_bullet_width,
            settings.alien_bullet_height,
        );
        rect.set_midtop(alien.rect.midbottom());
        Self { rect, dx, dy }
    }

    pub fn update(&mut self) {
        self.rect.x += self.dx;
        self.rect.y += self.dy;
    }

    /// Off the bottom, or entirely past either side.
    pub fn is_gone(&self, settings: &Settings) -> bool {
        self.rect.top() >= settings.screen_height
            || self.rect.right() <= 0.0
            || self.rect.left() >= settings.screen_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_leaves_from_ship_nose() {
        let settings = Settings::default();
        let ship = Ship::new(&settings);
        let bullet = Bullet::new(&settings, &ship);

        assert_eq!(bullet.rect.midtop(), ship.rect.midtop());
    }

    #[test]
    fn test_bullet_gone_once_bottom_passes_top_edge() {
        let settings = Settings::default();
        let mut bullet = Bullet {
            rect: Rect::new(0.0, -12.0, 3.0, 15.0),
        };
        assert!(!bullet.is_gone());

        bullet.update(&settings);
        assert!(bullet.is_gone());
    }

    #[test]
    fn test_alien_bullet_gone_past_side() {
        let settings = Settings::default();
        let alien = Alien::new(&settings, 0.0, 100.0);
        let mut bullet = AlienBullet::new(&settings, &alien, (-2.0, 0.0));

        for _ in 0..40 {
            bullet.update();
        }
        assert!(bullet.is_gone(&settings));
    }
}
