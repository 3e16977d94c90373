//! Iso-lines of a gridded field (marching squares).

/// A line piece in grid coordinates.
pub type Segment2 = [(f64, f64); 2];

/// Segments where `values` crosses `level`.
///
/// `values[row][col]` is sampled at `(us[col], vs[row])`. A corner counts as
/// inside when its value is strictly above `level`. Saddle cells are split
/// by the mean of their four corners.
pub fn iso_segments(us: &[f64], vs: &[f64], values: &[Vec<f64>], level: f64) -> Vec<Segment2> {
    let mut segments = Vec::new();
    if us.len() < 2 || vs.len() < 2 {
        return segments;
    }

    for row in 0..vs.len() - 1 {
        for col in 0..us.len() - 1 {
            // Corners counter-clockwise from (col, row).
            let corners = [
                ((us[col], vs[row]), values[row][col]),
                ((us[col + 1], vs[row]), values[row][col + 1]),
                ((us[col + 1], vs[row + 1]), values[row + 1][col + 1]),
                ((us[col], vs[row + 1]), values[row + 1][col]),
            ];
            cell_segments(&corners, level, &mut segments);
        }
    }
    segments
}

fn cell_segments(corners: &[((f64, f64), f64); 4], level: f64, out: &mut Vec<Segment2>) {
    let inside = |i: usize| corners[i].1 > level;

    // Edge `e` joins corner `e` and corner `e + 1`.
    let crossing = |e: usize| {
        let (a, b) = (corners[e], corners[(e + 1) % 4]);
        if inside(e) == inside((e + 1) % 4) {
            return None;
        }
        let t = (level - a.1) / (b.1 - a.1);
        Some((a.0.0 + t * (b.0.0 - a.0.0), a.0.1 + t * (b.0.1 - a.0.1)))
    };
    let hits: Vec<(usize, (f64, f64))> = (0..4)
        .filter_map(|e| crossing(e).map(|p| (e, p)))
        .collect();

    match hits.as_slice() {
        [(_, p), (_, q)] => out.push([*p, *q]),
        [e0, e1, e2, e3] => {
            let mean = corners.iter().map(|c| c.1).sum::<f64>() / 4.0;
            if (mean > level) == inside(0) {
                // Corners 0 and 2 connect through the centre; cut off 1 and 3.
                out.push([e0.1, e1.1]);
                out.push([e2.1, e3.1]);
            } else {
                out.push([e3.1, e0.1]);
                out.push([e1.1, e2.1]);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_field_gives_straight_line() {
        let us = [0.0, 1.0, 2.0];
        let vs = [0.0, 1.0, 2.0];
        let values: Vec<Vec<f64>> = vs.iter().map(|_| us.to_vec()).collect();

        let segments = iso_segments(&us, &vs, &values, 0.5);

        assert_eq!(segments.len(), 2);
        for [p, q] in segments {
            assert!((p.0 - 0.5).abs() < 1e-12);
            assert!((q.0 - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_level_outside_field_gives_nothing() {
        let values = vec![vec![0.1, 0.2], vec![0.3, 0.4]];
        assert!(iso_segments(&[0.0, 1.0], &[0.0, 1.0], &values, 0.5).is_empty());
        assert!(iso_segments(&[0.0], &[0.0], &[vec![1.0]], 0.5).is_empty());
    }

    #[test]
    fn test_saddle_splits_into_two_segments() {
        let values = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let segments = iso_segments(&[0.0, 1.0], &[0.0, 1.0], &values, 0.5);

        assert_eq!(segments.len(), 2);
        for [p, q] in segments {
            // Each piece joins two edge midpoints on adjacent sides.
            assert!(p != q);
            assert!([p.0, p.1, q.0, q.1].iter().all(|c| [0.0, 0.5, 1.0].contains(c)));
        }
    }

    #[test]
    fn test_crossing_is_interpolated() {
        let values = vec![vec![0.0, 1.0], vec![0.0, 1.0]];
        let segments = iso_segments(&[2.0, 4.0], &[0.0, 1.0], &values, 0.25);

        assert_eq!(segments.len(), 1);
        let [p, q] = segments[0];
        assert_eq!(p.0, 2.5);
        assert_eq!(q.0, 2.5);
    }
}
