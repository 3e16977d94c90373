//! Game tuning.

use std::time::Duration;

pub type Rgb = (u8, u8, u8);

/// Values that are reset at the start of every game and scaled on each
/// level-up.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicSettings {
    pub ship_speed: f32,
    pub bullet_speed: f32,
    pub alien_speed: f32,
    pub alien_fire_probability: f64,
    pub alien_bullet_speed: f32,
    /// `1.0` moves the fleet right, `-1.0` left.
    pub fleet_direction: f32,
    pub alien_points: u64,
}

impl Default for DynamicSettings {
    fn default() -> Self {
        Self {
            ship_speed: 4.0,
            bullet_speed: 3.0,
            alien_speed: 1.0,
            alien_fire_probability: 0.04,
            alien_bullet_speed: 2.0,
            fleet_direction: 1.0,
            alien_points: 50,
        }
    }
}

/// All game settings. Everything outside `dynamic` is fixed for the
/// lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub screen_width: f32,
    pub screen_height: f32,
    pub bg_color: Rgb,

    pub ship_limit: u32,
    pub ship_width: f32,
    pub ship_height: f32,

    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_color: Rgb,
    pub bullets_allowed: usize,

    pub alien_bullet_width: f32,
    pub alien_bullet_height: f32,
    pub alien_bullet_color: Rgb,

    pub alien_width: f32,
    pub alien_height: f32,
    pub fleet_drop_speed: f32,

    pub speedup_scale: f32,
    pub score_scale: f32,

    pub ship_hit_pause: Duration,
    pub fps: u32,

    pub dynamic: DynamicSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 1200.0,
            screen_height: 800.0,
            bg_color: (230, 230, 230),
            ship_limit: 3,
            ship_width: 60.0,
            ship_height: 48.0,
            bullet_width: 3.0,
            bullet_height: 15.0,
            bullet_color: (60, 60, 60),
            bullets_allowed: 10,
            alien_bullet_width: 2.0,
            alien_bullet_height: 10.0,
            alien_bullet_color: (255, 0, 0),
            alien_width: 60.0,
            alien_height: 58.0,
            fleet_drop_speed: 10.0,
            speedup_scale: 1.2,
            score_scale: 1.5,
            ship_hit_pause: Duration::from_millis(500),
            fps: 60,
            dynamic: DynamicSettings::default(),
        }
    }
}

impl Settings {
    pub fn initialize_dynamic_settings(&mut self) {
        self.dynamic = DynamicSettings::default();
    }

    /// Speed everything up and raise the per-alien score.
    pub fn increase_speed(&mut self) {
        let d = &mut self.dynamic;
        d.ship_speed *= self.speedup_scale;
        d.bullet_speed *= self.speedup_scale;
        d.alien_speed *= self.speedup_scale;
        d.alien_bullet_speed *= self.speedup_scale;
        d.alien_points = (d.alien_points as f32 * self.score_scale) as u64;
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_speed_scales_dynamic_values() {
        let mut settings = Settings::default();
        settings.increase_speed();

        let d = &settings.dynamic;
        assert!((d.ship_speed - 4.8).abs() < 1e-5);
        assert!((d.bullet_speed - 3.6).abs() < 1e-5);
        assert!((d.alien_speed - 1.2).abs() < 1e-5);
        assert!((d.alien_bullet_speed - 2.4).abs() < 1e-5);
        assert_eq!(d.alien_points, 75);

        settings.increase_speed();
        assert_eq!(settings.dynamic.alien_points, 112);
    }

    #[test]
    fn test_initialize_dynamic_settings_resets_direction() {
        let mut settings = Settings::default();
        settings.dynamic.fleet_direction = -1.0;
        settings.increase_speed();

        settings.initialize_dynamic_settings();
        assert_eq!(settings.dynamic, DynamicSettings::default());
    }
}
