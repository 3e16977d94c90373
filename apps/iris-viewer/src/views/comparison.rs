//! One classifier per page: its predicted regions and a probability map per
//! class, all over petal length × petal width.

use campus_iris::analysis::{ClassifierPanel, Comparison};
use campus_iris::grid::MeshGrid;
use ratatui::{
    Frame,
    layout::Rect,
    symbols::Marker,
    widgets::{
        Block, Borders,
        canvas::{Canvas, Context, Points},
    },
};

use super::{banded, cells, paint_bands};
use crate::palette;

const PROBABILITY_BANDS: usize = 20;

fn axis_bounds(values: &[f64]) -> [f64; 2] {
    match (values.first(), values.last()) {
        (Some(&lo), Some(&hi)) => [lo, hi],
        _ => [0.0, 1.0],
    }
}

fn mesh_canvas<'a, F>(mesh: &MeshGrid, title: String, paint: F) -> Canvas<'a, F>
where
    F: Fn(&mut Context),
{
    Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(Marker::Braille)
        .x_bounds(axis_bounds(&mesh.xs))
        .y_bounds(axis_bounds(&mesh.ys))
        .paint(paint)
}

fn paint_training_points(ctx: &mut Context, points: &[(f64, f64, usize)]) {
    for class in 0..palette::CLASS_RGB.len() {
        let coords: Vec<(f64, f64)> = points
            .iter()
            .filter(|p| p.2 == class)
            .map(|p| (p.0, p.1))
            .collect();
        ctx.draw(&Points {
            coords: &coords,
            color: palette::class_color(class),
        });
    }
}

/// Mesh points grouped by predicted class.
fn regions(mesh: &MeshGrid, panel: &ClassifierPanel, classes: usize) -> Vec<Vec<(f64, f64)>> {
    let mut groups = vec![Vec::new(); classes];
    for (row, predicted) in panel.predicted.iter().enumerate() {
        for (col, &class) in predicted.iter().enumerate() {
            if let Some(group) = groups.get_mut(class) {
                group.push((mesh.xs[col], mesh.ys[row]));
            }
        }
    }
    groups
}

pub fn draw(frame: &mut Frame, area: Rect, comparison: &Comparison, panel: usize) {
    let Some(classifier) = comparison.panels.get(panel) else {
        return;
    };
    let mesh = &comparison.mesh;
    let classes = comparison.target_names.len();
    let row = &cells(area, 1, classes + 1)[0];

    let title = format!(
        " {} · decision regions · accuracy {:.1}% ",
        classifier.name,
        classifier.training_accuracy * 100.0
    );
    let groups = regions(mesh, classifier, classes);
    let canvas = mesh_canvas(mesh, title, |ctx| {
        for (class, coords) in groups.iter().enumerate() {
            ctx.draw(&Points {
                coords,
                color: palette::class_tint(class),
            });
        }
        ctx.layer();
        paint_training_points(ctx, &comparison.points);
    });
    frame.render_widget(canvas, row[0]);

    for (class, grid) in classifier.probabilities.iter().enumerate().take(classes) {
        let samples = grid.iter().enumerate().flat_map(|(r, values)| {
            values
                .iter()
                .enumerate()
                .map(move |(c, &p)| ((mesh.xs[c], mesh.ys[r]), p))
        });
        let bands = banded(samples, PROBABILITY_BANDS);
        let title = format!(" P({}) ", comparison.target_names[class]);
        let canvas = mesh_canvas(mesh, title, |ctx| {
            paint_bands(ctx, &bands, |t| palette::class_ramp(class, t));
            ctx.layer();
            paint_training_points(ctx, &comparison.points);
        });
        frame.render_widget(canvas, row[class + 1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_iris::Dataset;
    use campus_iris::analysis;

    #[test]
    fn test_regions_cover_every_mesh_point() {
        let comparison = analysis::comparison_with_step(&Dataset::iris().unwrap(), 0.5).unwrap();
        for panel in &comparison.panels {
            let groups = regions(&comparison.mesh, panel, 3);
            let total: usize = groups.iter().map(Vec::len).sum();
            assert_eq!(total, comparison.mesh.len());
            assert!(groups.iter().all(|g| !g.is_empty()), "{}", panel.name);
        }
    }

    #[test]
    fn test_axis_bounds_fall_back_for_empty_axis() {
        assert_eq!(axis_bounds(&[]), [0.0, 1.0]);
        assert_eq!(axis_bounds(&[1.0, 2.0, 3.0]), [1.0, 3.0]);
    }
}
