//! L2-regularised logistic regression.
//!
//! Minimises `½‖W‖² + C·Σ log-loss` with the intercept left unpenalised,
//! using damped Newton steps: a sigmoid model for two classes and a
//! multinomial (softmax) model for more.

use crate::classifier::{Classifier, check_training_set};
use crate::error::IrisError;
use crate::linalg::{
    Matrix, cholesky, cholesky_solve, dot, log_sum_exp, log1p_exp, sigmoid, softmax,
};

/// Keeps the multinomial Hessian invertible along the intercept direction it
/// cannot see (adding a constant to every class score).
const INTERCEPT_RIDGE: f64 = 1e-8;

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
    classes: Vec<usize>,
    /// One row per score: a single row for binary problems.
    coef: Option<Matrix>,
    intercept: Vec<f64>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl LogisticRegression {
    pub fn new(c: f64) -> Self {
        Self {
            c,
            max_iter: 100,
            tol: 1e-8,
            classes: Vec::new(),
            coef: None,
            intercept: Vec::new(),
        }
    }

    pub fn coef(&self) -> Option<&Matrix> {
        self.coef.as_ref()
    }

    pub fn intercept(&self) -> &[f64] {
        &self.intercept
    }

    fn fitted(&self) -> Result<&Matrix, IrisError> {
        self.coef.as_ref().ok_or(IrisError::NotFitted)
    }

    fn scores(&self, x: &Matrix) -> Result<Matrix, IrisError> {
        let coef = self.fitted()?;
        x.expect_cols(coef.cols())?;
        Ok(Matrix::from_fn(x.rows(), coef.rows(), |i, k| {
            dot(x.row(i), coef.row(k)) + self.intercept[k]
        }))
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "Logistic Regression"
    }

    fn fit(&mut self, x: &Matrix, y: &[usize]) -> Result<(), IrisError> {
        let classes = check_training_set(x, y)?;
        let labels: Vec<usize> = y
            .iter()
            .map(|t| classes.iter().position(|c| c == t).unwrap_or_default())
            .collect();
        let d = x.cols();
        let n_models = if classes.len() == 2 { 1 } else { classes.len() };

        let theta = vec![0.0; n_models * (d + 1)];
        let theta = if n_models == 1 {
            minimize(theta, self.max_iter, self.tol, |t| {
                binary_objective(t, x, &labels, self.c)
            })?
        } else {
            minimize(theta, self.max_iter, self.tol, |t| {
                multinomial_objective(t, x, &labels, n_models, self.c)
            })?
        };

        let mut coef = Matrix::zeros(n_models, d);
        let mut intercept = Vec::with_capacity(n_models);
        for (k, chunk) in theta.chunks_exact(d + 1).enumerate() {
            coef.row_mut(k).copy_from_slice(&chunk[..d]);
            intercept.push(chunk[d]);
        }

        tracing::debug!(classes = classes.len(), c = self.c, "Fitted logistic regression");
        self.classes = classes;
        self.coef = Some(coef);
        self.intercept = intercept;
        Ok(())
    }

    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn decision_function(&self, x: &Matrix) -> Result<Matrix, IrisError> {
        self.scores(x)
    }

    fn predict_proba(&self, x: &Matrix) -> Result<Matrix, IrisError> {
        let scores = self.scores(x)?;
        if scores.cols() == 1 {
            return Ok(Matrix::from_fn(scores.rows(), 2, |i, k| {
                let p = sigmoid(scores[(i, 0)]);
                if k == 1 { p } else { 1.0 - p }
            }));
        }

        let mut proba = scores;
        for i in 0..proba.rows() {
            let p = softmax(proba.row(i));
            proba.row_mut(i).copy_from_slice(&p);
        }
        Ok(proba)
    }
}

struct Objective {
    value: f64,
    gradient: Vec<f64>,
    hessian: Matrix,
}

fn binary_objective(theta: &[f64], x: &Matrix, labels: &[usize], c: f64) -> Objective {
    let d = x.cols();
    let (w, b) = theta.split_at(d);
    let b = b[0];

    let mut value = 0.5 * dot(w, w);
    let mut gradient: Vec<f64> = w.iter().copied().chain([0.0]).collect();
    let mut hessian = Matrix::zeros(d + 1, d + 1);
    for a in 0..d {
        hessian[(a, a)] = 1.0;
    }

    let mut xt = vec![1.0; d + 1];
    for (row, &label) in x.iter_rows().zip(labels) {
        xt[..d].copy_from_slice(row);
        let z = dot(w, row) + b;
        let p = sigmoid(z);
        let t = label as f64;

        value += c * (log1p_exp(z) - t * z);
        let residual = c * (p - t);
        let curvature = c * p * (1.0 - p);
        for a in 0..=d {
            gradient[a] += residual * xt[a];
            for bb in 0..=d {
                hessian[(a, bb)] += curvature * xt[a] * xt[bb];
            }
        }
    }

    Objective {
        value,
        gradient,
        hessian,
    }
}

fn multinomial_objective(
    theta: &[f64],
    x: &Matrix,
    labels: &[usize],
    k: usize,
    c: f64,
) -> Objective {
    let d = x.cols();
    let stride = d + 1;
    let n_params = k * stride;

    let mut value = 0.0;
    let mut gradient = vec![0.0; n_params];
    let mut hessian = Matrix::zeros(n_params, n_params);
    for class in 0..k {
        let w = &theta[class * stride..class * stride + d];
        value += 0.5 * dot(w, w);
        for a in 0..d {
            gradient[class * stride + a] = w[a];
            hessian[(class * stride + a, class * stride + a)] = 1.0;
        }
        hessian[(class * stride + d, class * stride + d)] = INTERCEPT_RIDGE;
    }

    let mut xt = vec![1.0; stride];
    let mut z = vec![0.0; k];
    for (row, &label) in x.iter_rows().zip(labels) {
        xt[..d].copy_from_slice(row);
        for (class, zk) in z.iter_mut().enumerate() {
            *zk = dot(&theta[class * stride..(class + 1) * stride], &xt);
        }
        value += c * (log_sum_exp(&z) - z[label]);
        let p = softmax(&z);

        for kk in 0..k {
            let residual = c * (p[kk] - if kk == label { 1.0 } else { 0.0 });
            for a in 0..stride {
                gradient[kk * stride + a] += residual * xt[a];
            }
            for ll in 0..k {
                let weight = c * p[kk] * (if kk == ll { 1.0 } else { 0.0 } - p[ll]);
                if weight == 0.0 {
                    continue;
                }
                for a in 0..stride {
                    for bb in 0..stride {
                        hessian[(kk * stride + a, ll * stride + bb)] += weight * xt[a] * xt[bb];
                    }
                }
            }
        }
    }

    Objective {
        value,
        gradient,
        hessian,
    }
}

/// Damped Newton with a backtracking line search.
fn minimize(
    mut theta: Vec<f64>,
    max_iter: usize,
    tol: f64,
    objective: impl Fn(&[f64]) -> Objective,
) -> Result<Vec<f64>, IrisError> {
    let n = theta.len();

    for iter in 0..max_iter {
        let Objective {
            value,
            gradient,
            hessian,
        } = objective(&theta);

        let largest = gradient.iter().fold(0.0f64, |m, g| m.max(g.abs()));
        if largest < tol {
            tracing::trace!(iter, value, "Newton converged");
            return Ok(theta);
        }

        let factor = ridged_cholesky(&hessian)?;
        let step = cholesky_solve(&factor, &gradient);
        let slope = dot(&gradient, &step);

        let mut t = 1.0;
        let mut candidate = theta.clone();
        loop {
            for i in 0..n {
                candidate[i] = theta[i] - t * step[i];
            }
            if objective(&candidate).value <= value - 1e-4 * t * slope || t < 1e-10 {
                break;
            }
            t *= 0.5;
        }
        theta = candidate;
    }

    tracing::warn!(max_iter, "Newton solver hit the iteration limit");
    Ok(theta)
}

fn ridged_cholesky(hessian: &Matrix) -> Result<Matrix, IrisError> {
    let mut ridge = 0.0;
    loop {
        let mut shifted = hessian.clone();
        for i in 0..shifted.rows() {
            shifted[(i, i)] += ridge;
        }
        match cholesky(&shifted) {
            Ok(l) => return Ok(l),
            Err(_) if ridge < 1e6 => ridge = if ridge == 0.0 { 1e-10 } else { ridge * 10.0 },
            Err(e) => return Err(e),
        }
    }
}
