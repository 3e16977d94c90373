//! A non-linear (RBF SVM) decision surface found by scanning along z.

use serde::Serialize;

use super::boundary::PLANE_FEATURES;
use super::{Bounds3, Wall, class_points, walls};
use crate::classifier::Classifier;
use crate::dataset::Dataset;
use crate::error::IrisError;
use crate::grid::{MeshGrid, linspace};
use crate::linalg::Matrix;
use crate::svm::{Gamma, SupportVectorClassifier};

pub const SURFACE_BOUNDS: Bounds3 = Bounds3 {
    x: (3.8, 7.5),
    y: (1.5, 5.0),
    z: (0.5, 5.5),
};

const SURFACE_RESOLUTION: usize = 30;
const SCAN_SAMPLES: usize = 100;
const WALL_RESOLUTION: usize = 50;
const PENALTY: f64 = 10.0;
/// Probability where the walls are split into the two classes.
pub const DECISION_LEVEL: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NonlinearSurface {
    pub bounds: Bounds3,
    pub mesh: MeshGrid,
    /// Height of the first zero crossing above each mesh point, if any.
    pub z: Vec<Vec<Option<f64>>>,
    pub walls: Vec<Wall>,
    /// The [`DECISION_LEVEL`] line on each wall, in wall order.
    pub contours: Vec<Vec<[[f64; 3]; 2]>>,
    pub points: [Vec<[f64; 3]>; 2],
    pub n_support: Vec<usize>,
}

/// Height where `decision` first changes sign along `zs`, linearly
/// interpolated between the two bracketing samples.
pub(crate) fn first_crossing(zs: &[f64], decision: &[f64]) -> Option<f64> {
    let sign = |d: f64| if d > 0.0 { 1 } else if d < 0.0 { -1 } else { 0 };
    let i = decision
        .windows(2)
        .position(|pair| sign(pair[0]) != sign(pair[1]))?;

    let (d1, d2) = (decision[i], decision[i + 1]);
    let (z1, z2) = (zs[i], zs[i + 1]);
    Some(z1 + (z2 - z1) * (-d1 / (d2 - d1)))
}

pub fn nonlinear_surface(data: &Dataset) -> Result<NonlinearSurface, IrisError> {
    let subset = data.binary_subset().select_features(&PLANE_FEATURES)?;
    let mut model = SupportVectorClassifier::rbf(Gamma::Auto, PENALTY);
    model.fit(&subset.data, &subset.target)?;

    let bounds = SURFACE_BOUNDS;
    let mesh = MeshGrid::new(
        linspace(bounds.x.0, bounds.x.1, SURFACE_RESOLUTION),
        linspace(bounds.y.0, bounds.y.1, SURFACE_RESOLUTION),
    );
    let zs = linspace(bounds.z.0, bounds.z.1, SCAN_SAMPLES);

    let mut z = Vec::with_capacity(mesh.ys.len());
    for &y in &mesh.ys {
        let mut row = Vec::with_capacity(mesh.xs.len());
        for &x in &mesh.xs {
            let scan = Matrix::from_fn(zs.len(), 3, |i, j| [x, y, zs[i]][j]);
            let decision = model.decision_function(&scan)?.column(0);
            row.push(first_crossing(&zs, &decision));
        }
        z.push(row);
    }

    let crossings = z.iter().flatten().filter(|v| v.is_some()).count();
    tracing::debug!(crossings, cells = mesh.len(), "Scanned non-linear surface");

    let walls = walls(&model, &bounds, WALL_RESOLUTION)?;
    let contours = walls.iter().map(|w| w.contour(DECISION_LEVEL)).collect();

    Ok(NonlinearSurface {
        bounds,
        walls,
        contours,
        mesh,
        z,
        points: [
            class_points(&subset.data, &subset.target, 0),
            class_points(&subset.data, &subset.target, 1),
        ],
        n_support: model.n_support(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_crossing_interpolates() {
        let zs = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(first_crossing(&zs, &[-3.0, -1.0, 1.0, -1.0]), Some(1.5));
        assert_eq!(first_crossing(&zs, &[-4.0, 0.0, 2.0, 3.0]), Some(1.0));
        assert_eq!(first_crossing(&zs, &[1.0, 2.0, 3.0, 4.0]), None);
    }

    #[test]
    fn test_surface_has_crossings_inside_bounds() {
        let surface = nonlinear_surface(&Dataset::iris().unwrap()).unwrap();
        assert_eq!(surface.z.len(), 30);
        assert!(surface.z.iter().all(|row| row.len() == 30));

        let heights: Vec<f64> = surface.z.iter().flatten().flatten().copied().collect();
        assert!(!heights.is_empty());
        assert!(heights.iter().all(|h| (0.5..=5.5).contains(h)));

        assert_eq!(surface.walls.len(), 3);
        assert!(surface.walls.iter().all(|w| w.values.len() == 50));
        assert!(surface.n_support.iter().sum::<usize>() > 0);
    }

    #[test]
    fn test_wall_contours_lie_on_their_walls() {
        let surface = nonlinear_surface(&Dataset::iris().unwrap()).unwrap();
        assert_eq!(surface.contours.len(), surface.walls.len());

        // Petal length separates the classes, so both upright walls are split.
        let side = &surface.contours[1];
        let back = &surface.contours[2];
        assert!(!side.is_empty());
        assert!(!back.is_empty());

        let b = surface.bounds;
        assert!(side.iter().flatten().all(|p| p[0] == b.x.0));
        assert!(back.iter().flatten().all(|p| p[1] == b.y.1));
        let within = |v: f64, (lo, hi): (f64, f64)| v >= lo - 1e-9 && v <= hi + 1e-9;
        for p in surface.contours.iter().flatten().flatten() {
            assert!(within(p[0], b.x) && within(p[1], b.y) && within(p[2], b.z));
        }
    }
}
