//! Class-1 probabilities projected onto the walls of a fixed plotting box,
//! with the linear decision plane drawn as a clipped wireframe.

use serde::Serialize;

use super::boundary::{DecisionPlane, PLANE_FEATURES};
use super::{Bounds3, Wall, class_points, walls};
use crate::classifier::Classifier;
use crate::dataset::Dataset;
use crate::error::IrisError;
use crate::grid::{MeshGrid, linspace};
use crate::logistic::LogisticRegression;

pub const PROJECTION_BOUNDS: Bounds3 = Bounds3 {
    x: (4.0, 7.5),
    y: (1.8, 4.8),
    z: (0.8, 5.5),
};

const WALL_RESOLUTION: usize = 100;
const WIREFRAME_RESOLUTION: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityProjection {
    pub bounds: Bounds3,
    pub walls: Vec<Wall>,
    pub wireframe_mesh: MeshGrid,
    /// Plane heights, `None` where the plane leaves the box.
    pub wireframe: Vec<Vec<Option<f64>>>,
    pub points: [Vec<[f64; 3]>; 2],
}

pub fn probability_projection(data: &Dataset) -> Result<ProbabilityProjection, IrisError> {
    let subset = data.binary_subset().select_features(&PLANE_FEATURES)?;
    let mut model = LogisticRegression::new(1.0);
    model.fit(&subset.data, &subset.target)?;

    let bounds = PROJECTION_BOUNDS;
    let walls = walls(&model, &bounds, WALL_RESOLUTION)?;

    let mesh = MeshGrid::new(
        linspace(bounds.x.0, bounds.x.1, WIREFRAME_RESOLUTION),
        linspace(bounds.y.0, bounds.y.1, WIREFRAME_RESOLUTION),
    );
    let plane = DecisionPlane::from_model(&model, mesh)?;
    let wireframe = plane
        .z
        .iter()
        .map(|row| {
            row.iter()
                .map(|&z| bounds.contains_z(z).then_some(z))
                .collect()
        })
        .collect();

    Ok(ProbabilityProjection {
        bounds,
        walls,
        wireframe_mesh: plane.mesh,
        wireframe,
        points: [
            class_points(&subset.data, &subset.target, 0),
            class_points(&subset.data, &subset.target, 1),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::WallSide;

    #[test]
    fn test_walls_sit_on_box_faces() {
        let projection = probability_projection(&Dataset::iris().unwrap()).unwrap();
        let sides: Vec<_> = projection.walls.iter().map(|w| w.side).collect();
        assert_eq!(sides, vec![WallSide::Bottom, WallSide::Side, WallSide::Back]);

        let bottom = &projection.walls[0];
        assert_eq!(bottom.values.len(), 100);
        assert!(bottom.values.iter().all(|row| row.len() == 100));
        assert_eq!(bottom.point(0, 0), [4.0, 1.8, 0.8]);
        assert_eq!(projection.walls[1].point(99, 0), [4.0, 1.8, 5.5]);
        assert_eq!(projection.walls[2].point(0, 99), [7.5, 4.8, 0.8]);

        for wall in &projection.walls {
            assert!(wall.values.iter().flatten().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn test_probability_rises_with_petal_length() {
        let projection = probability_projection(&Dataset::iris().unwrap()).unwrap();
        // Side wall: columns run along sepal width, rows up petal length.
        let side = &projection.walls[1];
        let column = 50;
        assert!(side.values[0][column] < 0.5);
        assert!(side.values[99][column] > 0.5);
    }

    #[test]
    fn test_wireframe_is_clipped_to_box() {
        let projection = probability_projection(&Dataset::iris().unwrap()).unwrap();
        assert_eq!(projection.wireframe.len(), 20);
        let heights: Vec<f64> = projection.wireframe.iter().flatten().flatten().copied().collect();
        assert!(!heights.is_empty());
        assert!(heights.iter().all(|z| (0.8..=5.5).contains(z)));
    }
}
