//! Box plots per feature and the scatter matrix.

use campus_iris::analysis::{FeatureBoxes, Preview, ScatterPanel};
use campus_iris::dataset::FEATURE_NAMES;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    symbols::Marker,
    text::Line,
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Line as Segment, Points, Rectangle},
    },
};

use super::cells;
use crate::palette;

const BOX_HALF_WIDTH: f64 = 0.3;
const CAP_HALF_WIDTH: f64 = 0.12;

pub fn draw(frame: &mut Frame, area: Rect, preview: &Preview, panel: usize) {
    if panel == 0 {
        let grid = cells(area, 2, 2);
        for (i, feature) in preview.boxes.iter().enumerate() {
            draw_boxes(frame, grid[i / 2][i % 2], feature, &preview.target_names);
        }
    } else {
        draw_scatter_matrix(frame, area, preview);
    }
}

/// Data range covered by a feature's boxes, whiskers and outliers.
fn value_range(feature: &FeatureBoxes) -> (f64, f64) {
    feature
        .species
        .iter()
        .flat_map(|s| s.outliers.iter().copied().chain([s.whisker_low, s.whisker_high]))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

fn draw_boxes(frame: &mut Frame, area: Rect, feature: &FeatureBoxes, names: &[&'static str]) {
    let (lo, hi) = value_range(feature);
    let pad = ((hi - lo) * 0.1).max(0.1);
    let n = feature.species.len() as f64;

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", feature.feature)),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, n])
        .y_bounds([lo - pad, hi + pad])
        .paint(|ctx| {
            for (class, stats) in feature.species.iter().enumerate() {
                let color = palette::class_color(class);
                let cx = class as f64 + 0.5;
                let hline = |y: f64, half: f64| Segment {
                    x1: cx - half,
                    y1: y,
                    x2: cx + half,
                    y2: y,
                    color,
                };
                let vline = |y1: f64, y2: f64| Segment {
                    x1: cx,
                    y1,
                    x2: cx,
                    y2,
                    color,
                };

                ctx.draw(&Rectangle {
                    x: cx - BOX_HALF_WIDTH,
                    y: stats.q1,
                    width: 2.0 * BOX_HALF_WIDTH,
                    height: stats.q3 - stats.q1,
                    color,
                });
                ctx.draw(&hline(stats.median, BOX_HALF_WIDTH));
                ctx.draw(&vline(stats.whisker_low, stats.q1));
                ctx.draw(&vline(stats.q3, stats.whisker_high));
                ctx.draw(&hline(stats.whisker_low, CAP_HALF_WIDTH));
                ctx.draw(&hline(stats.whisker_high, CAP_HALF_WIDTH));

                let outliers: Vec<(f64, f64)> = stats.outliers.iter().map(|&v| (cx, v)).collect();
                ctx.draw(&Points {
                    coords: &outliers,
                    color: palette::BOX_EDGE,
                });

                if let Some(name) = names.get(class) {
                    ctx.print(
                        class as f64 + 0.1,
                        lo - pad,
                        Line::styled(*name, Style::default().fg(color)),
                    );
                }
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_scatter_matrix(frame: &mut Frame, area: Rect, preview: &Preview) {
    let n = FEATURE_NAMES.len();
    let grid = cells(area, n, n);

    for (f, name) in FEATURE_NAMES.iter().enumerate() {
        let label = Paragraph::new(*name)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(label, grid[f][f]);
    }

    for panel in &preview.scatter {
        draw_scatter(frame, grid[panel.y_feature][panel.x_feature], panel);
    }
}

fn draw_scatter(frame: &mut Frame, area: Rect, panel: &ScatterPanel) {
    let range = |pick: fn(&(f64, f64, usize)) -> f64| {
        panel
            .points
            .iter()
            .map(pick)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    };
    let (x_lo, x_hi) = range(|p| p.0);
    let (y_lo, y_hi) = range(|p| p.1);

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds([x_lo, x_hi])
        .y_bounds([y_lo, y_hi])
        .paint(|ctx| {
            for class in 0..palette::CLASS_RGB.len() {
                let coords: Vec<(f64, f64)> = panel
                    .points
                    .iter()
                    .filter(|p| p.2 == class)
                    .map(|p| (p.0, p.1))
                    .collect();
                ctx.draw(&Points {
                    coords: &coords,
                    color: palette::class_color(class),
                });
            }
        });
    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_iris::Dataset;
    use campus_iris::analysis;

    #[test]
    fn test_value_range_spans_whiskers_and_outliers() {
        let preview = analysis::preview(&Dataset::iris().unwrap());
        for feature in &preview.boxes {
            let (lo, hi) = value_range(feature);
            for stats in &feature.species {
                assert!(lo <= stats.whisker_low);
                assert!(hi >= stats.whisker_high);
                assert!(stats.outliers.iter().all(|v| (lo..=hi).contains(v)));
            }
        }
    }
}
