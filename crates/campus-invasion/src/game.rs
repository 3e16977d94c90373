//! The frame loop.

use rand::Rng;

use crate::alien::{self, Alien};
use crate::bullet::{AlienBullet, Bullet};
use crate::button::Button;
use crate::error::GameError;
use crate::firing;
use crate::settings::Settings;
use crate::ship::Ship;
use crate::stats::{GameStats, HighScoreStore};

/// Player input, already decoded by the front-end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveRight(bool),
    MoveLeft(bool),
    Fire,
    Play,
    /// A mouse click in game coordinates.
    Click { x: f32, y: f32 },
    Quit,
}

/// Things the front-end may want to react to (sound, pause, status line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Shot,
    AlienDestroyed { count: usize },
    LevelUp { level: u32 },
    ShipLost { ships_left: u32 },
    GameOver,
    HighScore { score: u64 },
}

pub struct Game<R: Rng> {
    settings: Settings,
    stats: GameStats,
    ship: Ship,
    bullets: Vec<Bullet>,
    aliens: Vec<Alien>,
    alien_bullets: Vec<AlienBullet>,
    play_button: Button,
    active: bool,
    quit_requested: bool,
    store: HighScoreStore,
    rng: R,
}

impl<R: Rng> Game<R> {
    /// Build an inactive game showing a full fleet behind the Play button.
    pub fn new(settings: Settings, store: HighScoreStore, rng: R) -> Self {
        let high_score = store.load();
        let stats = GameStats::new(&settings, high_score);
        let ship = Ship::new(&settings);
        let aliens = alien::create_fleet(&settings);
        let play_button = Button::play(&settings);

        Self {
            settings,
            stats,
            ship,
            bullets: Vec::new(),
            aliens,
            alien_bullets: Vec::new(),
            play_button,
            active: false,
            quit_requested: false,
            store,
            rng,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn aliens(&self) -> &[Alien] {
        &self.aliens
    }

    pub fn alien_bullets(&self) -> &[AlienBullet] {
        &self.alien_bullets
    }

    pub fn play_button(&self) -> &Button {
        &self.play_button
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn handle(&mut self, command: Command) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match command {
            Command::MoveRight(on) => self.ship.moving_right = on,
            Command::MoveLeft(on) => self.ship.moving_left = on,
            Command::Fire => self.fire_bullet(&mut events),
            Command::Play => self.start_game(),
            Command::Click { x, y } => {
                if self.play_button.rect.collidepoint(x, y) {
                    self.start_game();
                }
            }
            Command::Quit => self.quit_requested = true,
        }
        events
    }

    /// Advance one frame. Does nothing while the game is inactive.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.active {
            return events;
        }

        self.ship.update(&self.settings);
        self.update_bullets(&mut events);

        self.update_aliens(&mut events);
        if !self.active {
            return events;
        }

        self.fire_alien_bullet();
        self.update_alien_bullets(&mut events);
        events
    }

    /// Persist the high score. Call once when leaving the game.
    pub fn quit(&self) -> Result<(), GameError> {
        tracing::info!(high_score = self.stats.high_score, "Saving high score");
        self.store.save(self.stats.high_score)
    }

    fn start_game(&mut self) {
        if self.active {
            return;
        }

        self.settings.initialize_dynamic_settings();
        self.stats.reset_stats(&self.settings);
        self.active = true;

        self.bullets.clear();
        self.alien_bullets.clear();
        self.aliens = alien::create_fleet(&self.settings);
        self.ship.center_ship(&self.settings);

        tracing::info!(high_score = self.stats.high_score, "New game");
    }

    fn fire_bullet(&mut self, events: &mut Vec<GameEvent>) {
        if !self.active || self.bullets.len() >= self.settings.bullets_allowed {
            return;
        }
        self.bullets.push(Bullet::new(&self.settings, &self.ship));
        events.push(GameEvent::Shot);
    }

    fn update_bullets(&mut self, events: &mut Vec<GameEvent>) {
        for bullet in &mut self.bullets {
            bullet.update(&self.settings);
        }
        self.bullets.retain(|b| !b.is_gone());

        self.check_bullet_alien_collisions(events);
    }

    fn check_bullet_alien_collisions(&mut self, events: &mut Vec<GameEvent>) {
        // Bullets are resolved in order; an alien already destroyed by an
        // earlier bullet cannot be hit again.
        let aliens = &mut self.aliens;
        let mut hits = Vec::new();
        self.bullets.retain(|bullet| {
            let before = aliens.len();
            aliens.retain(|a| !bullet.rect.colliderect(&a.rect));
            let destroyed = before - aliens.len();
            if destroyed > 0 {
                hits.push(destroyed);
            }
            destroyed == 0
        });

        for &count in &hits {
            self.stats.score += self.settings.dynamic.alien_points * count as u64;
            events.push(GameEvent::AlienDestroyed { count });
        }
        if !hits.is_empty() && self.stats.check_high_score() {
            events.push(GameEvent::HighScore {
                score: self.stats.high_score,
            });
        }

        if self.aliens.is_empty() {
            self.bullets.clear();
            self.aliens = alien::create_fleet(&self.settings);
            self.settings.increase_speed();
            self.stats.level += 1;

            tracing::debug!(level = self.stats.level, "Fleet destroyed");
            events.push(GameEvent::LevelUp {
                level: self.stats.level,
            });
        }
    }

    fn update_aliens(&mut self, events: &mut Vec<GameEvent>) {
        if self.aliens.iter().any(|a| a.check_edges(&self.settings)) {
            self.change_fleet_direction();
        }
        for alien in &mut self.aliens {
            alien.update(&self.settings);
        }

        if self
            .aliens
            .iter()
            .any(|a| a.rect.colliderect(&self.ship.rect))
        {
            self.ship_hit(events);
            if !self.active {
                return;
            }
        }

        let floor = self.settings.screen_height;
        if self.aliens.iter().any(|a| a.rect.bottom() >= floor) {
            self.ship_hit(events);
        }
    }

    fn change_fleet_direction(&mut self) {
        for alien in &mut self.aliens {
            alien.rect.y += self.settings.fleet_drop_speed;
        }
        self.settings.dynamic.fleet_direction *= -1.0;
    }

    fn fire_alien_bullet(&mut self) {
        if self.aliens.is_empty()
            || !firing::should_fire(self.settings.dynamic.alien_fire_probability, &mut self.rng)
        {
            return;
        }

        let shooter = self.rng.gen_range(0..self.aliens.len());
        let velocity =
            firing::alien_bullet_velocity(self.settings.dynamic.alien_bullet_speed, &mut self.rng);
        self.alien_bullets.push(AlienBullet::new(
            &self.settings,
            &self.aliens[shooter],
            velocity,
        ));
    }

    fn update_alien_bullets(&mut self, events: &mut Vec<GameEvent>) {
        for bullet in &mut self.alien_bullets {
            bullet.update();
        }
        let settings = &self.settings;
        self.alien_bullets.retain(|b| !b.is_gone(settings));

        if self
            .alien_bullets
            .iter()
            .any(|b| b.rect.colliderect(&self.ship.rect))
        {
            self.ship_hit(events);
        }
    }

    fn ship_hit(&mut self, events: &mut Vec<GameEvent>) {
        if self.stats.ships_left > 0 {
            self.stats.ships_left -= 1;

            self.bullets.clear();
            self.alien_bullets.clear();
            self.aliens = alien::create_fleet(&self.settings);
            self.ship.center_ship(&self.settings);

            tracing::debug!(ships_left = self.stats.ships_left, "Ship lost");
            events.push(GameEvent::ShipLost {
                ships_left: self.stats.ships_left,
            });
        } else {
            self.active = false;
            tracing::info!(
                score = self.stats.score,
                level = self.stats.level,
                "Game over"
            );
            events.push(GameEvent::GameOver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::geometry::Rect;

    fn game_in(dir: &tempfile::TempDir) -> Game<StdRng> {
        let store = HighScoreStore::new(dir.path().join("high_score.txt"));
        Game::new(Settings::default(), store, StdRng::seed_from_u64(42))
    }

    /// An active game whose fleet never shoots back.
    fn quiet_game(dir: &tempfile::TempDir) -> Game<StdRng> {
        let mut game = game_in(dir);
        game.handle(Command::Play);
        game.settings.dynamic.alien_fire_probability = 0.0;
        game
    }

    #[test]
    fn test_new_game_is_inactive_until_play() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game_in(&dir);

        assert!(!game.is_active());
        assert!(game.tick().is_empty());

        game.handle(Command::Play);
        assert!(game.is_active());
        assert_eq!(game.aliens().len(), 45);
        assert_eq!(game.stats().ships_left, 3);
    }

    #[test]
    fn test_click_outside_button_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game_in(&dir);

        game.handle(Command::Click { x: 10.0, y: 10.0 });
        assert!(!game.is_active());

        game.handle(Command::Click { x: 600.0, y: 400.0 });
        assert!(game.is_active());
    }

    #[test]
    fn test_fire_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = quiet_game(&dir);

        let shots = (0..15)
            .flat_map(|_| game.handle(Command::Fire))
            .filter(|e| *e == GameEvent::Shot)
            .count();
        assert_eq!(shots, 10);
        assert_eq!(game.bullets().len(), 10);
    }

    #[test]
    fn test_destroying_last_alien_levels_up_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = quiet_game(&dir);

        game.aliens = vec![Alien::new(&game.settings, 500.0, 300.0)];
        game.bullets = vec![
            Bullet {
                rect: Rect::new(525.0, 330.0, 3.0, 15.0),
            },
            Bullet {
                rect: Rect::new(100.0, 600.0, 3.0, 15.0),
            },
        ];

        let events = game.tick();

        assert!(events.contains(&GameEvent::AlienDestroyed { count: 1 }));
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
        assert_eq!(game.stats().score, 50);
        assert_eq!(game.stats().level, 2);
        assert!(game.bullets().is_empty());
        assert_eq!(game.aliens().len(), 45);

        let d = &game.settings().dynamic;
        assert!((d.alien_speed - 1.2).abs() < 1e-5);
        assert!((d.bullet_speed - 3.6).abs() < 1e-5);
        assert_eq!(d.alien_points, 75);
    }

    #[test]
    fn test_ship_loss_resets_the_board() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = quiet_game(&dir);

        game.ship.rect.x = 100.0;
        game.aliens = vec![Alien::new(&game.settings, 100.0, 740.0)];
        game.bullets = vec![Bullet {
            rect: Rect::new(900.0, 300.0, 3.0, 15.0),
        }];
        game.alien_bullets = vec![AlienBullet {
            rect: Rect::new(10.0, 10.0, 2.0, 10.0),
            dx: 0.0,
            dy: 0.0,
        }];

        let events = game.tick();

        assert_eq!(events, vec![GameEvent::ShipLost { ships_left: 2 }]);
        assert!(game.is_active());
        assert!(game.bullets().is_empty());
        assert!(game.alien_bullets().is_empty());
        assert_eq!(game.aliens().len(), 45);
        assert_eq!(game.ship().rect.x, 570.0);
    }

    #[test]
    fn test_ship_loss_without_lives_only_ends_game() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = quiet_game(&dir);

        game.stats.ships_left = 0;
        game.ship.rect.x = 100.0;
        game.aliens = vec![Alien::new(&game.settings, 100.0, 740.0)];
        game.bullets = vec![Bullet {
            rect: Rect::new(900.0, 300.0, 3.0, 15.0),
        }];

        let events = game.tick();

        assert_eq!(events, vec![GameEvent::GameOver]);
        assert!(!game.is_active());
        assert_eq!(game.aliens().len(), 1);
        assert_eq!(game.bullets().len(), 1);
        assert_eq!(game.ship().rect.x, 100.0);
    }

    #[test]
    fn test_alien_reaching_bottom_costs_a_ship() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = quiet_game(&dir);

        game.aliens = vec![Alien::new(&game.settings, 300.0, 745.0)];
        let events = game.tick();

        assert_eq!(events, vec![GameEvent::ShipLost { ships_left: 2 }]);
    }

    #[test]
    fn test_alien_bullet_hit_costs_a_ship() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = quiet_game(&dir);

        let (cx, top) = game.ship.rect.midtop();
        game.alien_bullets = vec![AlienBullet {
            rect: Rect::new(cx, top - 11.0, 2.0, 10.0),
            dx: 0.0,
            dy: 2.0,
        }];

        let events = game.tick();
        assert_eq!(events, vec![GameEvent::ShipLost { ships_left: 2 }]);
    }

    #[test]
    fn test_fleet_reverses_and_drops_at_edge() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = quiet_game(&dir);

        game.aliens = vec![Alien::new(&game.settings, 1140.0, 100.0)];
        game.tick();

        assert_eq!(game.settings().dynamic.fleet_direction, -1.0);
        assert_eq!(game.aliens()[0].rect.y, 110.0);
        assert_eq!(game.aliens()[0].rect.x, 1139.0);
    }

    #[test]
    fn test_quit_persists_high_score() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = quiet_game(&dir);
        game.stats.score = 4200;
        assert!(game.stats.check_high_score());

        game.handle(Command::Quit);
        assert!(game.quit_requested());
        game.quit().unwrap();

        let reloaded = game_in(&dir);
        assert_eq!(reloaded.stats().high_score, 4200);
    }
}
