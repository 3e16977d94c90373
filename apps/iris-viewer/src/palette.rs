//! Chart colours.

use ratatui::style::Color;

/// Blue, red, green for setosa, versicolor, virginica.
pub const CLASS_RGB: [(u8, u8, u8); 3] = [
    (0x1f, 0x77, 0xb4),
    (0xd6, 0x27, 0x28),
    (0x2c, 0xa0, 0x2c),
];

pub const BOX_EDGE: Color = Color::Gray;
pub const WIREFRAME: Color = Color::Rgb(0x41, 0x69, 0xe1);
pub const BOUNDARY: Color = Color::Rgb(20, 20, 20);

const WHITE: (u8, u8, u8) = (255, 255, 255);

const COOLWARM: [(u8, u8, u8); 3] = [(59, 76, 192), (221, 221, 221), (180, 4, 38)];
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

pub fn class_color(class: usize) -> Color {
    let (r, g, b) = CLASS_RGB[class % CLASS_RGB.len()];
    Color::Rgb(r, g, b)
}

fn lerp(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Piecewise-linear ramp through evenly spaced anchors.
fn ramp(anchors: &[(u8, u8, u8)], t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let segments = (anchors.len() - 1) as f64;
    let i = ((t * segments).floor() as usize).min(anchors.len() - 2);
    let (r, g, b) = lerp(anchors[i], anchors[i + 1], t * segments - i as f64);
    Color::Rgb(r, g, b)
}

/// Blue at 0, grey at 0.5, red at 1.
pub fn coolwarm(t: f64) -> Color {
    ramp(&COOLWARM, t)
}

pub fn viridis(t: f64) -> Color {
    ramp(&VIRIDIS, t)
}

/// White at 0, the class colour at 1.
pub fn class_ramp(class: usize, t: f64) -> Color {
    ramp(&[WHITE, CLASS_RGB[class % CLASS_RGB.len()]], t)
}

/// The class colour washed out towards white, for filled regions.
pub fn class_tint(class: usize) -> Color {
    class_ramp(class, 0.4)
}

/// Snap `t ∈ [0, 1]` to one of `levels` bands so points can be batched per
/// colour.
pub fn band(t: f64, levels: usize) -> usize {
    ((t.clamp(0.0, 1.0) * levels as f64) as usize).min(levels - 1)
}

/// Centre of band `i`.
pub fn band_value(i: usize, levels: usize) -> f64 {
    (i as f64 + 0.5) / levels as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramps_hit_their_anchors() {
        assert_eq!(coolwarm(0.0), Color::Rgb(59, 76, 192));
        assert_eq!(coolwarm(0.5), Color::Rgb(221, 221, 221));
        assert_eq!(coolwarm(1.0), Color::Rgb(180, 4, 38));
        assert_eq!(coolwarm(7.0), coolwarm(1.0));
        assert_eq!(viridis(0.0), Color::Rgb(68, 1, 84));
        assert_eq!(class_ramp(1, 0.0), Color::Rgb(255, 255, 255));
        assert_eq!(class_ramp(1, 1.0), class_color(1));
    }

    #[test]
    fn test_bands_cover_unit_interval() {
        assert_eq!(band(0.0, 10), 0);
        assert_eq!(band(0.55, 10), 5);
        assert_eq!(band(1.0, 10), 9);
        assert!((band_value(9, 10) - 0.95).abs() < 1e-12);
    }
}
