//! Orthographic view of a 3-D plotting box.
//!
//! The box is first scaled to the cube `[-1, 1]³`, then looked at from
//! azimuth `azim` (degrees around z, measured from +x) and elevation `elev`
//! (degrees above the xy plane).

use campus_iris::analysis::Bounds3;

const ELEV_LIMIT: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub elev: f64,
    pub azim: f64,
    home: (f64, f64),
}

impl Camera {
    pub fn new(elev: f64, azim: f64) -> Self {
        Self {
            elev,
            azim,
            home: (elev, azim),
        }
    }

    pub fn rotate(&mut self, d_elev: f64, d_azim: f64) {
        self.elev = (self.elev + d_elev).clamp(-ELEV_LIMIT, ELEV_LIMIT);
        self.azim = wrap_degrees(self.azim + d_azim);
    }

    pub fn reset(&mut self) {
        (self.elev, self.azim) = self.home;
    }

    /// Screen coordinates of a point already in the unit cube.
    pub fn project(&self, p: [f64; 3]) -> (f64, f64) {
        let (se, ce) = self.elev.to_radians().sin_cos();
        let (sa, ca) = self.azim.to_radians().sin_cos();
        let x = -sa * p[0] + ca * p[1];
        let y = -se * ca * p[0] - se * sa * p[1] + ce * p[2];
        (x, y)
    }
}

/// Wrap into `(-180, 180]`.
fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

/// A plotting box paired with a camera.
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    pub bounds: Bounds3,
    pub camera: Camera,
}

impl Scene {
    /// The farthest a projected cube corner can land from the origin.
    pub const EXTENT: f64 = 1.75;

    fn normalize(&self, p: [f64; 3]) -> [f64; 3] {
        let axis = |v: f64, (lo, hi): (f64, f64)| 2.0 * (v - lo) / (hi - lo) - 1.0;
        [
            axis(p[0], self.bounds.x),
            axis(p[1], self.bounds.y),
            axis(p[2], self.bounds.z),
        ]
    }

    pub fn project(&self, p: [f64; 3]) -> (f64, f64) {
        self.camera.project(self.normalize(p))
    }

    /// The twelve edges of the box in data coordinates.
    pub fn edges(&self) -> Vec<([f64; 3], [f64; 3])> {
        let Bounds3 { x, y, z } = self.bounds;
        let corner = |i: usize| {
            [
                if i & 1 == 0 { x.0 } else { x.1 },
                if i & 2 == 0 { y.0 } else { y.1 },
                if i & 4 == 0 { z.0 } else { z.1 },
            ]
        };
        let mut edges = Vec::with_capacity(12);
        for i in 0..8 {
            for bit in [1, 2, 4] {
                if i & bit == 0 {
                    edges.push((corner(i), corner(i | bit)));
                }
            }
        }
        edges
    }
}
