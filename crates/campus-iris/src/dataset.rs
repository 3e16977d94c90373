//! Fisher's Iris data (150 samples, 4 features, 3 species).
//!
//! The embedded copy carries the two corrected samples (rows 35 and 38)
//! that differ from the original UCI file.

use serde::Serialize;

use crate::error::IrisError;
use crate::linalg::Matrix;

const IRIS_CSV: &str = include_str!("../data/iris.csv");

pub const FEATURE_NAMES: [&str; 4] = [
    "sepal length (cm)",
    "sepal width (cm)",
    "petal length (cm)",
    "petal width (cm)",
];

pub const TARGET_NAMES: [&str; 3] = ["setosa", "versicolor", "virginica"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub data: Matrix,
    pub target: Vec<usize>,
    pub feature_names: Vec<&'static str>,
    pub target_names: Vec<&'static str>,
}

impl Dataset {
    pub fn iris() -> Result<Self, IrisError> {
        let mut rows = Vec::with_capacity(150);
        let mut target = Vec::with_capacity(150);

        for (idx, line) in IRIS_CSV.lines().enumerate().skip(1) {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 5 {
                return Err(IrisError::Dataset {
                    line: line_no,
                    reason: format!("expected 5 fields, found {}", fields.len()),
                });
            }

            let features = fields[..4]
                .iter()
                .map(|f| f.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| IrisError::Dataset {
                    line: line_no,
                    reason: e.to_string(),
                })?;
            let class = fields[4]
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|c| *c < TARGET_NAMES.len())
                .ok_or_else(|| IrisError::Dataset {
                    line: line_no,
                    reason: format!("unknown class {:?}", fields[4]),
                })?;

            rows.push(features);
            target.push(class);
        }

        let dataset = Self {
            data: Matrix::from_rows(&rows)?,
            target,
            feature_names: FEATURE_NAMES.to_vec(),
            target_names: TARGET_NAMES.to_vec(),
        };
        tracing::debug!(samples = dataset.len(), "Loaded iris dataset");
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.data.cols()
    }

    /// Setosa and versicolor only.
    pub fn binary_subset(&self) -> Self {
        self.filter_classes(&[0, 1])
    }

    pub fn filter_classes(&self, keep: &[usize]) -> Self {
        let indices: Vec<usize> = (0..self.len())
            .filter(|&i| keep.contains(&self.target[i]))
            .collect();
        Self {
            data: self.data.select_rows(&indices),
            target: indices.iter().map(|&i| self.target[i]).collect(),
            feature_names: self.feature_names.clone(),
            target_names: self.target_names.clone(),
        }
    }

    pub fn select_features(&self, features: &[usize]) -> Result<Self, IrisError> {
        Ok(Self {
            data: self.data.select_columns(features)?,
            target: self.target.clone(),
            feature_names: features.iter().map(|&j| self.feature_names[j]).collect(),
            target_names: self.target_names.clone(),
        })
    }

    /// Rows belonging to `class`.
    pub fn class_rows(&self, class: usize) -> impl Iterator<Item = &[f64]> {
        self.data
            .iter_rows()
            .zip(&self.target)
            .filter(move |(_, t)| **t == class)
            .map(|(row, _)| row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iris_shape_and_class_balance() {
        let iris = Dataset::iris().unwrap();
        assert_eq!(iris.len(), 150);
        assert_eq!(iris.n_features(), 4);
        for class in 0..3 {
            assert_eq!(iris.target.iter().filter(|&&t| t == class).count(), 50);
        }
    }

    #[test]
    fn test_class_means_match_reference() {
        let iris = Dataset::iris().unwrap();
        let expected = [
            [5.006, 3.428, 1.462, 0.246],
            [5.936, 2.770, 4.260, 1.326],
            [6.588, 2.974, 5.552, 2.026],
        ];

        for (class, means) in expected.iter().enumerate() {
            for (j, want) in means.iter().enumerate() {
                let got: f64 = iris.class_rows(class).map(|r| r[j]).sum::<f64>() / 50.0;
                assert!((got - want).abs() < 1e-9, "class {class} feature {j}: {got}");
            }
        }
    }

    #[test]
    fn test_corrected_rows() {
        let iris = Dataset::iris().unwrap();
        assert_eq!(iris.data.row(34), &[4.9, 3.1, 1.5, 0.2]);
        assert_eq!(iris.data.row(37), &[4.9, 3.6, 1.4, 0.1]);
    }

    #[test]
    fn test_binary_subset_and_feature_selection() {
        let iris = Dataset::iris().unwrap();
        let binary = iris.binary_subset().select_features(&[0, 1, 2]).unwrap();

        assert_eq!(binary.len(), 100);
        assert!(binary.target.iter().all(|&t| t < 2));
        assert_eq!(binary.n_features(), 3);
        assert_eq!(binary.feature_names[2], "petal length (cm)");
        assert!(iris.select_features(&[4]).is_err());
    }
}
