//! Feature distributions: box plots per species and a scatter matrix.

use serde::Serialize;

use crate::dataset::Dataset;

/// Tukey box-plot summary with whiskers at 1.5 · IQR.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Most extreme samples still inside the whisker reach.
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// `None` for an empty sample.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let reach = 1.5 * (q3 - q1);
        let (lo, hi) = (q1 - reach, q3 + reach);

        let (inside, outliers): (Vec<f64>, Vec<f64>) =
            sorted.iter().partition(|v| (lo..=hi).contains(*v));
        Some(Self {
            q1,
            median,
            q3,
            whisker_low: inside.first().copied().unwrap_or(q1),
            whisker_high: inside.last().copied().unwrap_or(q3),
            outliers,
        })
    }
}

/// Linear-interpolated percentile of an already sorted, non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    sorted[below] + (sorted[above] - sorted[below]) * (rank - below as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureBoxes {
    pub feature: &'static str,
    /// One box per species, in class order.
    pub species: Vec<BoxStats>,
}

/// One off-diagonal cell of the scatter matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPanel {
    pub x_feature: usize,
    pub y_feature: usize,
    pub points: Vec<(f64, f64, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub target_names: Vec<&'static str>,
    pub boxes: Vec<FeatureBoxes>,
    pub scatter: Vec<ScatterPanel>,
}

pub fn preview(data: &Dataset) -> Preview {
    let n_classes = data.target_names.len();

    let boxes = data
        .feature_names
        .iter()
        .enumerate()
        .map(|(f, &feature)| FeatureBoxes {
            feature,
            species: (0..n_classes)
                .filter_map(|class| {
                    let samples: Vec<f64> = data.class_rows(class).map(|row| row[f]).collect();
                    BoxStats::from_samples(&samples)
                })
                .collect(),
        })
        .collect();

    let n = data.n_features();
    let scatter = (0..n)
        .flat_map(|y| (0..n).filter(move |&x| x != y).map(move |x| (x, y)))
        .map(|(x_feature, y_feature)| ScatterPanel {
            x_feature,
            y_feature,
            points: data
                .data
                .iter_rows()
                .zip(&data.target)
                .map(|(row, &t)| (row[x_feature], row[y_feature], t))
                .collect(),
        })
        .collect();

    Preview {
        target_names: data.target_names.clone(),
        boxes,
        scatter,
    }
}
