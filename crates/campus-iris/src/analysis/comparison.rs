//! Logistic regression, a linear SVM and a Gaussian process side by side on
//! the two petal features.

use serde::Serialize;

use crate::classifier::{Classifier, accuracy};
use crate::dataset::Dataset;
use crate::error::IrisError;
use crate::gp::GaussianProcessClassifier;
use crate::grid::MeshGrid;
use crate::linalg::Matrix;
use crate::logistic::LogisticRegression;
use crate::svm::SupportVectorClassifier;

/// Petal length, petal width.
const PETAL_FEATURES: [usize; 2] = [2, 3];
const DEFAULT_STEP: f64 = 0.05;
const MARGIN: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierPanel {
    pub name: String,
    /// `predicted[row][col]` is the class at `(mesh.xs[col], mesh.ys[row])`.
    pub predicted: Vec<Vec<usize>>,
    /// One grid per class, laid out like `predicted`.
    pub probabilities: Vec<Vec<Vec<f64>>>,
    pub training_accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub mesh: MeshGrid,
    pub target_names: Vec<&'static str>,
    pub points: Vec<(f64, f64, usize)>,
    pub panels: Vec<ClassifierPanel>,
}

pub fn comparison(data: &Dataset) -> Result<Comparison, IrisError> {
    comparison_with_step(data, DEFAULT_STEP)
}

/// Same as [`comparison`] with a custom mesh step.
pub fn comparison_with_step(data: &Dataset, step: f64) -> Result<Comparison, IrisError> {
    let petals = data.select_features(&PETAL_FEATURES)?;
    let mesh = MeshGrid::around(
        petals.data.column_range(0),
        petals.data.column_range(1),
        MARGIN,
        step,
    );
    let grid: Vec<Vec<f64>> = mesh.points().map(|(x, y)| vec![x, y]).collect();
    let grid = Matrix::from_rows(&grid)?;

    let mut classifiers: Vec<Box<dyn Classifier>> = vec![
        Box::new(LogisticRegression::new(1.0)),
        Box::new(SupportVectorClassifier::linear(1.0)),
        Box::new(GaussianProcessClassifier::new(1.0, 1.0)),
    ];

    let width = mesh.xs.len();
    let mut panels = Vec::with_capacity(classifiers.len());
    for clf in &mut classifiers {
        clf.fit(&petals.data, &petals.target)?;
        let training_accuracy = accuracy(&clf.predict(&petals.data)?, &petals.target);
        tracing::info!(classifier = clf.name(), training_accuracy, "Trained classifier");

        let predicted = clf
            .predict(&grid)?
            .chunks(width)
            .map(<[usize]>::to_vec)
            .collect();
        let proba = clf.predict_proba(&grid)?;
        let probabilities = (0..proba.cols())
            .map(|class| {
                proba
                    .column(class)
                    .chunks(width)
                    .map(<[f64]>::to_vec)
                    .collect()
            })
            .collect();

        panels.push(ClassifierPanel {
            name: clf.name().to_string(),
            predicted,
            probabilities,
            training_accuracy,
        });
    }

    Ok(Comparison {
        points: petals
            .data
            .iter_rows()
            .zip(&petals.target)
            .map(|(row, &t)| (row[0], row[1], t))
            .collect(),
        target_names: petals.target_names,
        mesh,
        panels,
    })
}
