//! The three 3-D charts: a linear plane, wall projections and an SVM surface.

use campus_iris::analysis::{
    Bounds3, DecisionPlane, NonlinearSurface, ProbabilityProjection, Wall,
};
use campus_iris::dataset::FEATURE_NAMES;
use campus_iris::grid::MeshGrid;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        Block, Borders,
        canvas::{Canvas, Context, Line as Segment, Points},
    },
};

use super::{banded, paint_bands};
use crate::camera::{Camera, Scene};
use crate::palette;

const WALL_BANDS: usize = 16;
/// Every third mesh line is outlined on the SVM surface.
const SURFACE_WIRE_STRIDE: usize = 3;

fn scene_canvas<'a, F>(title: String, paint: F) -> Canvas<'a, F>
where
    F: Fn(&mut Context),
{
    Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(Marker::Braille)
        .x_bounds([-Scene::EXTENT, Scene::EXTENT])
        .y_bounds([-Scene::EXTENT, Scene::EXTENT])
        .paint(paint)
}

fn camera_title(camera: &Camera) -> String {
    format!(" elev {:.0}°  azim {:.0}° ", camera.elev, camera.azim)
}

fn segment(scene: &Scene, a: [f64; 3], b: [f64; 3], color: Color) -> Segment {
    let (x1, y1) = scene.project(a);
    let (x2, y2) = scene.project(b);
    Segment {
        x1,
        y1,
        x2,
        y2,
        color,
    }
}

fn paint_box(ctx: &mut Context, scene: &Scene) {
    for (a, b) in scene.edges() {
        ctx.draw(&segment(scene, a, b, palette::BOX_EDGE));
    }

    // Axis names next to the far end of each axis.
    let Bounds3 { x, y, z } = scene.bounds;
    let labels = [
        ([x.1, y.0, z.0], FEATURE_NAMES[0]),
        ([x.0, y.1, z.0], FEATURE_NAMES[1]),
        ([x.0, y.0, z.1], FEATURE_NAMES[2]),
    ];
    for (corner, name) in labels {
        let (px, py) = scene.project(corner);
        ctx.print(
            px,
            py,
            Line::styled(name, Style::default().fg(Color::DarkGray)),
        );
    }
}

fn paint_points(ctx: &mut Context, scene: &Scene, points: &[Vec<[f64; 3]>; 2]) {
    for (class, group) in points.iter().enumerate() {
        let coords: Vec<(f64, f64)> = group.iter().map(|p| scene.project(*p)).collect();
        ctx.draw(&Points {
            coords: &coords,
            color: palette::class_color(class),
        });
    }
}

fn paint_walls(ctx: &mut Context, scene: &Scene, walls: &[Wall]) {
    for wall in walls {
        let samples = wall.values.iter().enumerate().flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .map(move |(col, &p)| (scene.project(wall.point(row, col)), p))
        });
        paint_bands(ctx, &banded(samples, WALL_BANDS), palette::coolwarm);
    }
}

fn paint_contours(ctx: &mut Context, scene: &Scene, contours: &[Vec<[[f64; 3]; 2]>]) {
    for [a, b] in contours.iter().flatten() {
        ctx.draw(&segment(scene, *a, *b, palette::BOUNDARY));
    }
}

/// Lines between neighbouring mesh points where both heights are present.
fn paint_mesh(
    ctx: &mut Context,
    scene: &Scene,
    mesh: &MeshGrid,
    z: &[Vec<Option<f64>>],
    stride: usize,
    color: impl Fn(f64) -> Color,
) {
    let at = |row: usize, col: usize| z[row][col].map(|h| [mesh.xs[col], mesh.ys[row], h]);
    let rows = z.len();
    let cols = mesh.xs.len();

    for row in 0..rows {
        for col in 0..cols {
            let Some(here) = at(row, col) else { continue };
            let mut neighbours = Vec::with_capacity(2);
            if col + 1 < cols && row % stride == 0 {
                neighbours.push(at(row, col + 1));
            }
            if row + 1 < rows && col % stride == 0 {
                neighbours.push(at(row + 1, col));
            }
            for there in neighbours.into_iter().flatten() {
                let mid = (here[2] + there[2]) / 2.0;
                ctx.draw(&segment(scene, here, there, color(mid)));
            }
        }
    }
}

/// Height range of the training points, padded.
fn points_z_range(points: &[Vec<[f64; 3]>; 2]) -> (f64, f64) {
    let (lo, hi) = points
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p[2]), hi.max(p[2]))
        });
    (lo - 0.5, hi + 0.5)
}

pub fn draw_boundary(frame: &mut Frame, area: Rect, plane: &DecisionPlane, camera: Camera) {
    let mesh = &plane.mesh;
    let bounds = Bounds3 {
        x: (mesh.xs[0], mesh.xs[mesh.xs.len() - 1]),
        y: (mesh.ys[0], mesh.ys[mesh.ys.len() - 1]),
        z: points_z_range(&plane.points),
    };
    let scene = Scene { bounds, camera };
    let clipped: Vec<Vec<Option<f64>>> = plane
        .z
        .iter()
        .map(|row| {
            row.iter()
                .map(|&h| bounds.contains_z(h).then_some(h))
                .collect()
        })
        .collect();

    let title = format!(
        " training accuracy {:.0}% |{}",
        plane.training_accuracy * 100.0,
        camera_title(&camera)
    );
    let canvas = scene_canvas(title, |ctx| {
        paint_box(ctx, &scene);
        paint_mesh(ctx, &scene, mesh, &clipped, 1, |_| Color::Gray);
        ctx.layer();
        paint_points(ctx, &scene, &plane.points);
    });
    frame.render_widget(canvas, area);
}

pub fn draw_projection(
    frame: &mut Frame,
    area: Rect,
    projection: &ProbabilityProjection,
    camera: Camera,
) {
    let scene = Scene {
        bounds: projection.bounds,
        camera,
    };
    let canvas = scene_canvas(camera_title(&camera), |ctx| {
        paint_walls(ctx, &scene, &projection.walls);
        ctx.layer();
        paint_box(ctx, &scene);
        paint_mesh(
            ctx,
            &scene,
            &projection.wireframe_mesh,
            &projection.wireframe,
            1,
            |_| palette::WIREFRAME,
        );
        ctx.layer();
        paint_points(ctx, &scene, &projection.points);
    });
    frame.render_widget(canvas, area);
}

pub fn draw_surface(frame: &mut Frame, area: Rect, surface: &NonlinearSurface, camera: Camera) {
    let scene = Scene {
        bounds: surface.bounds,
        camera,
    };
    let (z_lo, z_hi) = surface.bounds.z;
    let title = format!(
        " support vectors {:?} |{}",
        surface.n_support,
        camera_title(&camera)
    );
    let canvas = scene_canvas(title, |ctx| {
        paint_walls(ctx, &scene, &surface.walls);
        ctx.layer();
        paint_box(ctx, &scene);
        paint_contours(ctx, &scene, &surface.contours);
        paint_mesh(ctx, &scene, &surface.mesh, &surface.z, 1, |h| {
            palette::viridis((h - z_lo) / (z_hi - z_lo))
        });
        ctx.layer();
        paint_mesh(
            ctx,
            &scene,
            &surface.mesh,
            &surface.z,
            SURFACE_WIRE_STRIDE,
            |_| palette::BOUNDARY,
        );
        ctx.layer();
        paint_points(ctx, &scene, &surface.points);
    });
    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_iris::{Dataset, analysis};
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_surface_draws_outlines() {
        let surface = analysis::nonlinear_surface(&Dataset::iris().unwrap()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(100, 50)).unwrap();

        terminal
            .draw(|f| draw_surface(f, f.size(), &surface, Camera::new(25.0, -55.0)))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("support vectors"));
        assert!(buffer.content().iter().any(|c| c.fg == palette::BOUNDARY));
    }
}
