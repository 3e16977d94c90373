//! The interface shared by every model.

use crate::error::IrisError;
use crate::linalg::{Matrix, argmax};

/// A fitted-in-place probabilistic classifier over class labels `0..k`.
///
/// `decision_function` returns one column for binary problems (positive
/// means the second class) and one column per class otherwise.
/// `predict_proba` always returns one column per class, rows summing to 1.
pub trait Classifier {
    fn name(&self) -> &str;

    fn fit(&mut self, x: &Matrix, y: &[usize]) -> Result<(), IrisError>;

    /// Sorted distinct labels seen by `fit`.
    fn classes(&self) -> &[usize];

    fn decision_function(&self, x: &Matrix) -> Result<Matrix, IrisError>;

    fn predict_proba(&self, x: &Matrix) -> Result<Matrix, IrisError>;

    fn predict(&self, x: &Matrix) -> Result<Vec<usize>, IrisError> {
        let scores = self.decision_function(x)?;
        let classes = self.classes();
        Ok(scores
            .iter_rows()
            .map(|row| {
                if row.len() == 1 {
                    classes[usize::from(row[0] > 0.0)]
                } else {
                    classes[argmax(row)]
                }
            })
            .collect())
    }
}

/// Validate training input and return the sorted class labels.
pub(crate) fn check_training_set(x: &Matrix, y: &[usize]) -> Result<Vec<usize>, IrisError> {
    if x.rows() != y.len() {
        return Err(IrisError::shape(
            format!("{} labels", x.rows()),
            y.len(),
        ));
    }
    let mut classes = y.to_vec();
    classes.sort_unstable();
    classes.dedup();
    if classes.len() < 2 {
        return Err(IrisError::SingleClass);
    }
    Ok(classes)
}

/// `+1.0` for `positive`, `-1.0` otherwise.
pub(crate) fn signed_labels(y: &[usize], positive: usize) -> Vec<f64> {
    y.iter()
        .map(|&t| if t == positive { 1.0 } else { -1.0 })
        .collect()
}

pub fn accuracy(predicted: &[usize], truth: &[usize]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let hits = predicted.iter().zip(truth).filter(|(p, t)| p == t).count();
    hits as f64 / truth.len() as f64
}
