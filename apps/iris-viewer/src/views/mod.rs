//! Rendering each analysis into a terminal frame.

mod comparison;
mod preview;
mod scene;

use campus_iris::analysis::{
    Comparison, DecisionPlane, NonlinearSurface, Preview, ProbabilityProjection,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Paragraph,
        canvas::{Context, Points},
    },
};

use crate::camera::Camera;
use crate::palette;

/// A computed chart, ready to draw.
#[derive(Debug)]
pub enum Chart {
    Preview(Preview),
    Boundary(DecisionPlane),
    Probability(ProbabilityProjection),
    Nonlinear(NonlinearSurface),
    Comparison(Comparison),
}

impl Chart {
    pub fn title(&self) -> &'static str {
        match self {
            Chart::Preview(_) => "Iris feature overview",
            Chart::Boundary(_) => "Linear decision boundary",
            Chart::Probability(_) => "Probability projections",
            Chart::Nonlinear(_) => "Non-linear SVM surface with projections",
            Chart::Comparison(_) => "Classifier comparison",
        }
    }

    /// Pages reachable with Tab.
    pub fn panel_count(&self) -> usize {
        match self {
            Chart::Preview(_) => 2,
            Chart::Comparison(c) => c.panels.len().max(1),
            _ => 1,
        }
    }

    /// Starting viewpoint for the 3-D charts.
    pub fn camera(&self) -> Option<Camera> {
        match self {
            Chart::Boundary(_) => Some(Camera::new(20.0, 30.0)),
            Chart::Probability(_) => Some(Camera::new(25.0, -50.0)),
            Chart::Nonlinear(_) => Some(Camera::new(25.0, -55.0)),
            Chart::Preview(_) | Chart::Comparison(_) => None,
        }
    }
}

pub fn draw(frame: &mut Frame, chart: &Chart, camera: Option<&Camera>, panel: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    frame.render_widget(title_line(chart, panel), chunks[0]);
    let body = chunks[1];

    match (chart, camera) {
        (Chart::Preview(p), _) => preview::draw(frame, body, p, panel),
        (Chart::Comparison(c), _) => comparison::draw(frame, body, c, panel),
        (Chart::Boundary(p), Some(cam)) => scene::draw_boundary(frame, body, p, *cam),
        (Chart::Probability(p), Some(cam)) => scene::draw_projection(frame, body, p, *cam),
        (Chart::Nonlinear(s), Some(cam)) => scene::draw_surface(frame, body, s, *cam),
        _ => {}
    }

    frame.render_widget(help_line(chart), chunks[2]);
}

fn title_line(chart: &Chart, panel: usize) -> Paragraph<'static> {
    let mut spans = vec![Span::styled(
        format!(" {} ", chart.title()),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if chart.panel_count() > 1 {
        spans.push(Span::styled(
            format!(" [{}/{}]", panel + 1, chart.panel_count()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Paragraph::new(Line::from(spans))
}

fn help_line(chart: &Chart) -> Paragraph<'static> {
    let text = if chart.camera().is_some() {
        " ←/→/↑/↓ rotate   r reset view   q quit"
    } else {
        " Tab next panel   Shift-Tab previous   q quit"
    };
    Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

/// Split a grid of `[rows, cols]` equal cells out of `area`.
pub(crate) fn cells(area: Rect, rows: usize, cols: usize) -> Vec<Vec<Rect>> {
    let split = |n: usize| vec![Constraint::Ratio(1, n as u32); n];
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(split(rows))
        .split(area)
        .iter()
        .map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(split(cols))
                .split(*row)
                .to_vec()
        })
        .collect()
}

/// Group sampled values into colour bands so each band is one draw call.
pub(crate) fn banded(
    samples: impl IntoIterator<Item = ((f64, f64), f64)>,
    levels: usize,
) -> Vec<Vec<(f64, f64)>> {
    let mut bands = vec![Vec::new(); levels];
    for (point, value) in samples {
        bands[palette::band(value, levels)].push(point);
    }
    bands
}

pub(crate) fn paint_bands(
    ctx: &mut Context<'_>,
    bands: &[Vec<(f64, f64)>],
    color: impl Fn(f64) -> Color,
) {
    for (i, coords) in bands.iter().enumerate() {
        if !coords.is_empty() {
            ctx.draw(&Points {
                coords,
                color: color(palette::band_value(i, bands.len())),
            });
        }
    }
}
