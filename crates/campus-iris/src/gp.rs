//! Gaussian process classification with the Laplace approximation.
//!
//! Binary problems use a logistic likelihood over a latent GP with kernel
//! `amplitude · exp(-‖a − b‖² / 2ℓ²)`. More classes are handled one-vs-rest
//! with the per-class probabilities renormalised. Kernel hyperparameters
//! are taken as given.

use std::f64::consts::PI;

use crate::classifier::{Classifier, check_training_set};
use crate::error::IrisError;
use crate::linalg::{
    Matrix, argmax, back_substitute_transposed, cholesky, dot, forward_substitute, log1p_exp,
    sigmoid, squared_distance,
};

#[derive(Debug, Clone)]
struct LaplaceModel {
    train: Matrix,
    /// `t − π` at the posterior mode; the predictive mean weights.
    residual: Vec<f64>,
    sqrt_w: Vec<f64>,
    /// Cholesky factor of `I + W½ K W½`.
    factor: Matrix,
}

#[derive(Debug, Clone)]
pub struct GaussianProcessClassifier {
    pub amplitude: f64,
    pub length_scale: f64,
    pub max_iter: usize,
    classes: Vec<usize>,
    models: Vec<LaplaceModel>,
}

impl Default for GaussianProcessClassifier {
    /// `1.0 · RBF(1.0)`
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl GaussianProcessClassifier {
    pub fn new(amplitude: f64, length_scale: f64) -> Self {
        Self {
            amplitude,
            length_scale,
            max_iter: 100,
            classes: Vec::new(),
            models: Vec::new(),
        }
    }

    fn kernel(&self, a: &[f64], b: &[f64]) -> f64 {
        self.amplitude * (-squared_distance(a, b) / (2.0 * self.length_scale.powi(2))).exp()
    }

    fn fit_binary(&self, x: &Matrix, targets: &[f64]) -> Result<LaplaceModel, IrisError> {
        let n = x.rows();
        let k = Matrix::from_fn(n, n, |i, j| self.kernel(x.row(i), x.row(j)));

        let mut f = vec![0.0; n];
        let mut previous = f64::NEG_INFINITY;
        for iter in 0..self.max_iter {
            let pi: Vec<f64> = f.iter().map(|&v| sigmoid(v)).collect();
            let w: Vec<f64> = pi.iter().map(|p| p * (1.0 - p)).collect();
            let sqrt_w: Vec<f64> = w.iter().map(|v| v.sqrt()).collect();
            let factor = cholesky(&scaled_identity_plus(&k, &sqrt_w))?;

            // Newton step for the mode, written to avoid inverting K.
            let b: Vec<f64> = (0..n).map(|i| w[i] * f[i] + targets[i] - pi[i]).collect();
            let kb = k.mat_vec(&b);
            let scaled: Vec<f64> = (0..n).map(|i| sqrt_w[i] * kb[i]).collect();
            let solved = back_substitute_transposed(&factor, &forward_substitute(&factor, &scaled));
            let a: Vec<f64> = (0..n).map(|i| b[i] - sqrt_w[i] * solved[i]).collect();
            f = k.mat_vec(&a);

            let log_likelihood: f64 = f
                .iter()
                .zip(targets)
                .map(|(&fi, &t)| -log1p_exp(-(2.0 * t - 1.0) * fi))
                .sum();
            let log_det: f64 = (0..n).map(|i| factor[(i, i)].ln()).sum();
            let objective = -0.5 * dot(&a, &f) + log_likelihood - log_det;

            if objective - previous < 1e-10 {
                tracing::trace!(iter, objective, "Laplace mode found");
                break;
            }
            previous = objective;
        }

        let pi: Vec<f64> = f.iter().map(|&v| sigmoid(v)).collect();
        let sqrt_w: Vec<f64> = pi.iter().map(|p| (p * (1.0 - p)).sqrt()).collect();
        let factor = cholesky(&scaled_identity_plus(&k, &sqrt_w))?;

        Ok(LaplaceModel {
            train: x.clone(),
            residual: targets.iter().zip(&pi).map(|(t, p)| t - p).collect(),
            sqrt_w,
            factor,
        })
    }

    /// Latent mean and probit-averaged probability for one point.
    fn predict_one(&self, model: &LaplaceModel, x: &[f64]) -> (f64, f64) {
        let k_star: Vec<f64> = model.train.iter_rows().map(|row| self.kernel(row, x)).collect();
        let mean = dot(&k_star, &model.residual);

        let scaled: Vec<f64> = k_star
            .iter()
            .zip(&model.sqrt_w)
            .map(|(k, s)| k * s)
            .collect();
        let v = forward_substitute(&model.factor, &scaled);
        let variance = (self.amplitude - dot(&v, &v)).max(0.0);

        let probability = sigmoid(mean / (1.0 + PI * variance / 8.0).sqrt());
        (mean, probability)
    }

    fn fitted(&self, x: &Matrix) -> Result<(), IrisError> {
        let model = self.models.first().ok_or(IrisError::NotFitted)?;
        x.expect_cols(model.train.cols())
    }
}

/// `I + diag(s) · K · diag(s)`
fn scaled_identity_plus(k: &Matrix, s: &[f64]) -> Matrix {
    let n = k.rows();
    Matrix::from_fn(n, n, |i, j| {
        let delta = if i == j { 1.0 } else { 0.0 };
        delta + s[i] * k[(i, j)] * s[j]
    })
}

impl Classifier for GaussianProcessClassifier {
    fn name(&self) -> &str {
        "Gaussian Process"
    }

    fn fit(&mut self, x: &Matrix, y: &[usize]) -> Result<(), IrisError> {
        let classes = check_training_set(x, y)?;

        // A binary problem needs a single model for the second class.
        let positives: Vec<usize> = if classes.len() == 2 {
            vec![classes[1]]
        } else {
            classes.clone()
        };

        let mut models = Vec::with_capacity(positives.len());
        for positive in positives {
            let targets: Vec<f64> = y
                .iter()
                .map(|&t| if t == positive { 1.0 } else { 0.0 })
                .collect();
            models.push(self.fit_binary(x, &targets)?);
        }

        tracing::debug!(
            models = models.len(),
            amplitude = self.amplitude,
            length_scale = self.length_scale,
            "Fitted Gaussian process classifier"
        );
        self.classes = classes;
        self.models = models;
        Ok(())
    }

    fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Latent posterior means.
    fn decision_function(&self, x: &Matrix) -> Result<Matrix, IrisError> {
        self.fitted(x)?;
        Ok(Matrix::from_fn(x.rows(), self.models.len(), |i, m| {
            self.predict_one(&self.models[m], x.row(i)).0
        }))
    }

    fn predict_proba(&self, x: &Matrix) -> Result<Matrix, IrisError> {
        self.fitted(x)?;
        let k = self.classes.len();
        let mut out = Matrix::zeros(x.rows(), k);

        for i in 0..x.rows() {
            if k == 2 {
                let p = self.predict_one(&self.models[0], x.row(i)).1;
                out[(i, 0)] = 1.0 - p;
                out[(i, 1)] = p;
                continue;
            }
            let raw: Vec<f64> = self
                .models
                .iter()
                .map(|m| self.predict_one(m, x.row(i)).1)
                .collect();
            let total: f64 = raw.iter().sum();
            for (c, p) in raw.iter().enumerate() {
                out[(i, c)] = p / total;
            }
        }
        Ok(out)
    }

    fn predict(&self, x: &Matrix) -> Result<Vec<usize>, IrisError> {
        let proba = self.predict_proba(x)?;
        Ok(proba.iter_rows().map(|row| self.classes[argmax(row)]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::accuracy;
    use crate::dataset::Dataset;

    #[test]
    fn test_binary_gp_separates_setosa() {
        let data = Dataset::iris()
            .unwrap()
            .binary_subset()
            .select_features(&[2, 3])
            .unwrap();
        let mut clf = GaussianProcessClassifier::default();
        clf.fit(&data.data, &data.target).unwrap();

        let predicted = clf.predict(&data.data).unwrap();
        assert_eq!(accuracy(&predicted, &data.target), 1.0);
    }

    #[test]
    fn test_far_away_points_revert_to_prior() {
        let data = Dataset::iris()
            .unwrap()
            .binary_subset()
            .select_features(&[2, 3])
            .unwrap();
        let mut clf = GaussianProcessClassifier::default();
        clf.fit(&data.data, &data.target).unwrap();

        let far = Matrix::from_rows(&[vec![100.0, 100.0]]).unwrap();
        let proba = clf.predict_proba(&far).unwrap();
        assert!((proba[(0, 1)] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_one_vs_rest_on_petals() {
        let data = Dataset::iris().unwrap().select_features(&[2, 3]).unwrap();
        let mut clf = GaussianProcessClassifier::default();
        clf.fit(&data.data, &data.target).unwrap();

        let predicted = clf.predict(&data.data).unwrap();
        assert!(accuracy(&predicted, &data.target) > 0.9);

        let proba = clf.predict_proba(&data.data).unwrap();
        for row in proba.iter_rows() {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
        assert_eq!(clf.decision_function(&data.data).unwrap().cols(), 3);
    }
}
