//! The linear decision plane between setosa and versicolor in 3-D.

use serde::Serialize;

use super::class_points;
use crate::classifier::{Classifier, accuracy};
use crate::dataset::Dataset;
use crate::error::IrisError;
use crate::grid::MeshGrid;
use crate::logistic::LogisticRegression;

/// Sepal length, sepal width, petal length.
pub(crate) const PLANE_FEATURES: [usize; 3] = [0, 1, 2];

const STEP: f64 = 0.2;
const MARGIN: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionPlane {
    /// `[w0, w1, w2]` for the plane `w · p + b = 0`.
    pub coef: [f64; 3],
    pub intercept: f64,
    pub mesh: MeshGrid,
    /// `z[row][col]` solves the plane at `(mesh.xs[col], mesh.ys[row])`.
    pub z: Vec<Vec<f64>>,
    /// Training points of class 0 then class 1.
    pub points: [Vec<[f64; 3]>; 2],
    pub training_accuracy: f64,
}

impl DecisionPlane {
    pub(crate) fn from_model(
        model: &LogisticRegression,
        mesh: MeshGrid,
    ) -> Result<Self, IrisError> {
        let coef = model.coef().ok_or(IrisError::NotFitted)?;
        let w = [coef[(0, 0)], coef[(0, 1)], coef[(0, 2)]];
        let b = model.intercept()[0];
        if w[2] == 0.0 {
            return Err(IrisError::DegeneratePlane);
        }

        let z = mesh.map(|x, y| -(w[0] * x + w[1] * y + b) / w[2]);
        Ok(Self {
            coef: w,
            intercept: b,
            mesh,
            z,
            points: [Vec::new(), Vec::new()],
            training_accuracy: 0.0,
        })
    }

    /// Height of the plane above `(x, y)`.
    pub fn z_at(&self, x: f64, y: f64) -> f64 {
        -(self.coef[0] * x + self.coef[1] * y + self.intercept) / self.coef[2]
    }
}

/// Fit `LogisticRegression(C = 1)` to the two-class subset and solve the
/// decision plane for petal length over a grid around the sepal data.
pub fn decision_plane(data: &Dataset) -> Result<DecisionPlane, IrisError> {
    let subset = data.binary_subset().select_features(&PLANE_FEATURES)?;

    let mut model = LogisticRegression::new(1.0);
    model.fit(&subset.data, &subset.target)?;
    let predicted = model.predict(&subset.data)?;

    let mesh = MeshGrid::around(
        subset.data.column_range(0),
        subset.data.column_range(1),
        MARGIN,
        STEP,
    );
    let mut plane = DecisionPlane::from_model(&model, mesh)?;
    plane.points = [
        class_points(&subset.data, &subset.target, 0),
        class_points(&subset.data, &subset.target, 1),
    ];
    plane.training_accuracy = accuracy(&predicted, &subset.target);

    tracing::debug!(
        coef = ?plane.coef,
        intercept = plane.intercept,
        accuracy = plane.training_accuracy,
        "Solved decision plane"
    );
    Ok(plane)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_separates_training_points() {
        let plane = decision_plane(&Dataset::iris().unwrap()).unwrap();

        assert_eq!(plane.training_accuracy, 1.0);
        assert_eq!(plane.points[0].len(), 50);
        assert_eq!(plane.points[1].len(), 50);

        // Sepal length 4.3..7.0 and width 2.0..4.4, padded by 0.5 in 0.2 steps.
        assert_eq!(plane.mesh.xs.len(), 19);
        assert_eq!(plane.mesh.ys.len(), 17);
        assert!((plane.mesh.xs[0] - 3.8).abs() < 1e-12);

        // Setosa sits on the negative side of the plane, versicolor on the
        // positive side.
        let side = |p: &[f64; 3]| {
            plane.coef[0] * p[0] + plane.coef[1] * p[1] + plane.coef[2] * p[2] + plane.intercept
        };
        assert!(plane.points[0].iter().all(|p| side(p) < 0.0));
        assert!(plane.points[1].iter().all(|p| side(p) > 0.0));
    }

    #[test]
    fn test_grid_matches_plane_equation() {
        let plane = decision_plane(&Dataset::iris().unwrap()).unwrap();
        let (row, col) = (3, 5);
        let expected = plane.z_at(plane.mesh.xs[col], plane.mesh.ys[row]);
        assert!((plane.z[row][col] - expected).abs() < 1e-12);
    }
}
