//! Evenly spaced samples and rectangular meshes.

use serde::Serialize;

/// Half-open range `[start, stop)` in steps of `step`.
///
/// The number of samples is `ceil((stop − start) / step)`, and each value is
/// `start + i · step`, so the last sample may land slightly past what
/// repeated addition would give.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || stop <= start {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// `n` samples from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + i as f64 * step })
                .collect()
        }
    }
}

/// The Cartesian product of two axes. Points run along `xs` first, then `ys`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl MeshGrid {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        Self { xs, ys }
    }

    /// A mesh covering `[lo − margin, hi + margin)` on both axes.
    pub fn around(x_range: (f64, f64), y_range: (f64, f64), margin: f64, step: f64) -> Self {
        Self::new(
            arange(x_range.0 - margin, x_range.1 + margin, step),
            arange(y_range.0 - margin, y_range.1 + margin, step),
        )
    }

    pub fn len(&self) -> usize {
        self.xs.len() * self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major `(x, y)` pairs: index `r · xs.len() + c` is `(xs[c], ys[r])`.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.ys
            .iter()
            .flat_map(move |&y| self.xs.iter().map(move |&x| (x, y)))
    }

    /// Map every point, keeping the row-major layout.
    pub fn map<T>(&self, mut f: impl FnMut(f64, f64) -> T) -> Vec<Vec<T>> {
        self.ys
            .iter()
            .map(|&y| self.xs.iter().map(|&x| f(x, y)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_arange_counts_like_numpy() {
        assert_eq!(arange(0.0, 1.0, 0.25), vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(arange(0.0, 1.0, 0.3).len(), 4);
        assert!(arange(1.0, 0.0, 0.1).is_empty());
        assert!(arange(0.0, 1.0, 0.0).is_empty());
    }

    #[test]
    fn test_linspace_hits_both_ends() {
        let v = linspace(4.0, 7.5, 100);
        assert_eq!(v.len(), 100);
        assert_eq!(v[0], 4.0);
        assert_eq!(v[99], 7.5);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(2.0, 3.0, 0).is_empty());
    }

    #[test]
    fn test_points_are_row_major() {
        let mesh = MeshGrid::new(vec![0.0, 1.0, 2.0], vec![10.0, 20.0]);
        let points: Vec<_> = mesh.points().collect();
        assert_eq!(points.len(), mesh.len());
        assert_eq!(points[1], (1.0, 10.0));
        assert_eq!(points[3], (0.0, 20.0));

        let grid = mesh.map(|x, y| x + y);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1][2], 22.0);
    }

    #[test]
    fn test_around_adds_margin() {
        let mesh = MeshGrid::around((1.0, 2.0), (0.0, 1.0), 0.5, 0.5);
        assert_eq!(mesh.xs, vec![0.5, 1.0, 1.5, 2.0]);
        assert_eq!(mesh.ys.first(), Some(&-0.5));
    }

    proptest! {
        #[test]
        fn prop_arange_steps_up_from_start(
            start in -10.0f64..10.0,
            width in 0.1f64..20.0,
            step in 0.01f64..2.0,
        ) {
            let v = arange(start, start + width, step);
            prop_assert!(!v.is_empty());
            prop_assert_eq!(v[0], start);
            prop_assert!(v.windows(2).all(|w| w[1] > w[0]));
        }

        #[test]
        fn prop_linspace_is_monotone(
            start in -10.0f64..10.0,
            width in 0.0f64..20.0,
            n in 2usize..200,
        ) {
            let v = linspace(start, start + width, n);
            prop_assert_eq!(v.len(), n);
            prop_assert_eq!(v[n - 1], start + width);
            prop_assert!(v.windows(2).all(|w| w[1] >= w[0]));
        }
    }
}
