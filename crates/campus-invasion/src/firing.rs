//! Random aiming for alien bullets.

use rand::Rng;

/// Draw a velocity `(dx, dy)` whose magnitude is exactly `speed`.
///
/// `dy` is an integer in `0..=floor(speed)` plus a uniform fraction, pulled
/// back by one if it overshoots `speed`. `dx` is the Pythagorean remainder
/// with a random sign, so the bullet always falls while drifting sideways.
pub fn alien_bullet_velocity<R: Rng + ?Sized>(speed: f32, rng: &mut R) -> (f32, f32) {
    let speed = speed.max(0.0);
    let whole = speed.floor() as u32;

    let mut dy = rng.gen_range(0..=whole) as f32 + rng.gen_range(0.0f32..1.0);
    if dy > speed {
        dy -= 1.0;
    }
    let dy = dy.clamp(0.0, speed);

    let dx = (speed * speed - dy * dy).max(0.0).sqrt();
    let dx = if rng.gen_bool(0.5) { dx } else { -dx };

    (dx, dy)
}

/// One draw per frame for the whole fleet.
pub fn should_fire<R: Rng + ?Sized>(probability: f64, rng: &mut R) -> bool {
    rng.gen_bool(probability.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    proptest! {
        #[test]
        fn prop_velocity_has_fixed_magnitude(speed in 0.1f32..40.0, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let (dx, dy) = alien_bullet_velocity(speed, &mut rng);

            let tolerance = 1e-4 * (speed * speed).max(1.0);
            prop_assert!((dx * dx + dy * dy - speed * speed).abs() <= tolerance);
            prop_assert!(dy >= 0.0);
            prop_assert!(dy <= speed);
        }
    }

    #[test]
    fn test_both_horizontal_directions_occur() {
        let mut rng = StdRng::seed_from_u64(7);
        let signs: Vec<bool> = (0..64)
            .map(|_| alien_bullet_velocity(2.0, &mut rng).0 >= 0.0)
            .collect();

        assert!(signs.iter().any(|&right| right));
        assert!(signs.iter().any(|&right| !right));
    }

    #[test]
    fn test_should_fire_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(!should_fire(0.0, &mut rng));
        assert!(should_fire(1.0, &mut rng));
        assert!(should_fire(3.0, &mut rng));
    }
}
