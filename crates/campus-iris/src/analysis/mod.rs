//! Chart-ready numbers for each Iris view.
//!
//! Every function here loads nothing and draws nothing: it takes the
//! dataset, fits what the chart needs and returns plain grids that a
//! front-end can render however it likes.

mod boundary;
mod comparison;
mod preview;
mod projection;
mod surface;

pub use boundary::{DecisionPlane, decision_plane};
pub use comparison::{ClassifierPanel, Comparison, comparison, comparison_with_step};
pub use preview::{BoxStats, FeatureBoxes, Preview, ScatterPanel, preview};
pub use projection::{PROJECTION_BOUNDS, ProbabilityProjection, probability_projection};
pub use surface::{DECISION_LEVEL, NonlinearSurface, SURFACE_BOUNDS, nonlinear_surface};

use serde::Serialize;

use crate::classifier::Classifier;
use crate::contour::iso_segments;
use crate::error::IrisError;
use crate::grid::linspace;
use crate::linalg::Matrix;

/// An axis-aligned plotting box in feature space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds3 {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

impl Bounds3 {
    pub fn contains_z(&self, z: f64) -> bool {
        z >= self.z.0 && z <= self.z.1
    }
}

/// Which face of the plotting box a probability map is painted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WallSide {
    /// `z = z_min`, spanned by x (columns) and y (rows).
    Bottom,
    /// `x = x_min`, spanned by y (columns) and z (rows).
    Side,
    /// `y = y_max`, spanned by x (columns) and z (rows).
    Back,
}

/// Class-1 probability sampled over one face of the box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wall {
    pub side: WallSide,
    pub offset: f64,
    pub us: Vec<f64>,
    pub vs: Vec<f64>,
    /// `values[row][col]` is the probability at `(us[col], vs[row])`.
    pub values: Vec<Vec<f64>>,
}

impl Wall {
    /// The 3-D point behind grid cell `(row, col)`.
    pub fn point(&self, row: usize, col: usize) -> [f64; 3] {
        self.lift(self.us[col], self.vs[row])
    }

    /// Where the probability crosses `level`, as 3-D segments on the wall.
    pub fn contour(&self, level: f64) -> Vec<[[f64; 3]; 2]> {
        iso_segments(&self.us, &self.vs, &self.values, level)
            .into_iter()
            .map(|[p, q]| [self.lift(p.0, p.1), self.lift(q.0, q.1)])
            .collect()
    }

    fn lift(&self, u: f64, v: f64) -> [f64; 3] {
        match self.side {
            WallSide::Bottom => [u, v, self.offset],
            WallSide::Side => [self.offset, u, v],
            WallSide::Back => [u, self.offset, v],
        }
    }
}

/// The three walls of `bounds`, each sampled `resolution × resolution`.
pub(crate) fn walls(
    clf: &dyn Classifier,
    bounds: &Bounds3,
    resolution: usize,
) -> Result<Vec<Wall>, IrisError> {
    let faces = [
        (WallSide::Bottom, bounds.z.0, bounds.x, bounds.y),
        (WallSide::Side, bounds.x.0, bounds.y, bounds.z),
        (WallSide::Back, bounds.y.1, bounds.x, bounds.z),
    ];

    faces
        .into_iter()
        .map(|(side, offset, u_range, v_range)| {
            let mut wall = Wall {
                side,
                offset,
                us: linspace(u_range.0, u_range.1, resolution),
                vs: linspace(v_range.0, v_range.1, resolution),
                values: Vec::new(),
            };
            let points: Vec<Vec<f64>> = (0..resolution)
                .flat_map(|r| (0..resolution).map(move |c| (r, c)))
                .map(|(r, c)| wall.point(r, c).to_vec())
                .collect();
            let proba = clf.predict_proba(&Matrix::from_rows(&points)?)?;
            wall.values = proba
                .column(1)
                .chunks(resolution)
                .map(<[f64]>::to_vec)
                .collect();
            Ok(wall)
        })
        .collect()
}

/// Training points grouped by class, as `[x, y, z]` triples.
pub(crate) fn class_points(data: &Matrix, target: &[usize], class: usize) -> Vec<[f64; 3]> {
    data.iter_rows()
        .zip(target)
        .filter(|(_, t)| **t == class)
        .map(|(row, _)| [row[0], row[1], row[2]])
        .collect()
}
