//! C-support vector classification.
//!
//! Each pair of classes gets its own machine, trained with SMO using the
//! maximal-violating-pair working set. Multiclass predictions vote across
//! the pairs. Probabilities come from a Platt sigmoid per pair, coupled
//! across pairs for more than two classes.

use crate::classifier::{Classifier, check_training_set, signed_labels};
use crate::error::IrisError;
use crate::linalg::{Matrix, dot, squared_distance};

const TAU: f64 = 1e-12;
const MIN_PROB: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gamma {
    /// `1 / n_features`.
    Auto,
    Value(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    Linear,
    Rbf { gamma: Gamma },
}

#[derive(Debug, Clone, Copy)]
enum FittedKernel {
    Linear,
    Rbf(f64),
}

impl FittedKernel {
    fn eval(self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            FittedKernel::Linear => dot(a, b),
            FittedKernel::Rbf(gamma) => (-gamma * squared_distance(a, b)).exp(),
        }
    }
}

/// One trained two-class machine. Positive scores favour `positive`.
#[derive(Debug, Clone)]
struct PairMachine {
    negative: usize,
    positive: usize,
    support: Matrix,
    /// `α_i y_i` for each support vector.
    dual_coef: Vec<f64>,
    rho: f64,
    platt_a: f64,
    platt_b: f64,
}

impl PairMachine {
    fn decision(&self, kernel: FittedKernel, x: &[f64]) -> f64 {
        self.support
            .iter_rows()
            .zip(&self.dual_coef)
            .map(|(sv, coef)| coef * kernel.eval(sv, x))
            .sum::<f64>()
            - self.rho
    }

    /// Probability of the positive class.
    fn probability(&self, decision: f64) -> f64 {
        let f = decision * self.platt_a + self.platt_b;
        let p = if f >= 0.0 {
            (-f).exp() / (1.0 + (-f).exp())
        } else {
            1.0 / (1.0 + f.exp())
        };
        p.clamp(MIN_PROB, 1.0 - MIN_PROB)
    }
}

#[derive(Debug, Clone)]
pub struct SupportVectorClassifier {
    pub kernel: Kernel,
    pub c: f64,
    /// Stopping tolerance on the KKT violation.
    pub tol: f64,
    pub max_iter: usize,
    classes: Vec<usize>,
    fitted_kernel: Option<FittedKernel>,
    machines: Vec<PairMachine>,
}

impl SupportVectorClassifier {
    pub fn new(kernel: Kernel, c: f64) -> Self {
        Self {
            kernel,
            c,
            tol: 1e-3,
            max_iter: 1_000_000,
            classes: Vec::new(),
            fitted_kernel: None,
            machines: Vec::new(),
        }
    }

    pub fn linear(c: f64) -> Self {
        Self::new(Kernel::Linear, c)
    }

    pub fn rbf(gamma: Gamma, c: f64) -> Self {
        Self::new(Kernel::Rbf { gamma }, c)
    }

    /// Number of support vectors per pair machine.
    pub fn n_support(&self) -> Vec<usize> {
        self.machines.iter().map(|m| m.support.rows()).collect()
    }

    fn fitted(&self, x: &Matrix) -> Result<FittedKernel, IrisError> {
        let kernel = self.fitted_kernel.ok_or(IrisError::NotFitted)?;
        if let Some(m) = self.machines.first() {
            x.expect_cols(m.support.cols())?;
        }
        Ok(kernel)
    }

    /// Raw pair decisions, one column per machine.
    fn pair_decisions(&self, x: &Matrix) -> Result<Matrix, IrisError> {
        let kernel = self.fitted(x)?;
        Ok(Matrix::from_fn(x.rows(), self.machines.len(), |i, m| {
            self.machines[m].decision(kernel, x.row(i))
        }))
    }
}

impl Classifier for SupportVectorClassifier {
    fn name(&self) -> &str {
        match self.kernel {
            Kernel::Linear => "Linear SVM",
            Kernel::Rbf { .. } => "RBF SVM",
        }
    }

    fn fit(&mut self, x: &Matrix, y: &[usize]) -> Result<(), IrisError> {
        let classes = check_training_set(x, y)?;
        let kernel = match self.kernel {
            Kernel::Linear => FittedKernel::Linear,
            Kernel::Rbf { gamma: Gamma::Auto } => {
                FittedKernel::Rbf(1.0 / x.cols().max(1) as f64)
            }
            Kernel::Rbf {
                gamma: Gamma::Value(g),
            } => FittedKernel::Rbf(g),
        };

        let mut machines = Vec::new();
        for (a, &negative) in classes.iter().enumerate() {
            for &positive in &classes[a + 1..] {
                let rows: Vec<usize> = (0..y.len())
                    .filter(|&i| y[i] == negative || y[i] == positive)
                    .collect();
                let sub_x = x.select_rows(&rows);
                let sub_y: Vec<usize> = rows.iter().map(|&i| y[i]).collect();
                machines.push(self.train_pair(kernel, &sub_x, &sub_y, negative, positive));
            }
        }

        tracing::debug!(
            classifier = self.name(),
            machines = machines.len(),
            "Fitted support vector classifier"
        );
        self.classes = classes;
        self.fitted_kernel = Some(kernel);
        self.machines = machines;
        Ok(())
    }

    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn decision_function(&self, x: &Matrix) -> Result<Matrix, IrisError> {
        let pairs = self.pair_decisions(x)?;
        if self.classes.len() == 2 {
            return Ok(pairs);
        }

        // Votes, nudged by the summed confidences so ties break sensibly.
        let k = self.classes.len();
        let mut out = Matrix::zeros(x.rows(), k);
        for i in 0..x.rows() {
            let mut votes = vec![0.0; k];
            let mut confidence = vec![0.0; k];
            for (m, machine) in self.machines.iter().enumerate() {
                let neg = self.class_index(machine.negative);
                let pos = self.class_index(machine.positive);
                let d = pairs[(i, m)];
                confidence[neg] -= d;
                confidence[pos] += d;
                if d > 0.0 {
                    votes[pos] += 1.0;
                } else {
                    votes[neg] += 1.0;
                }
            }
            for c in 0..k {
                out[(i, c)] = votes[c] + confidence[c] / (3.0 * (confidence[c].abs() + 1.0));
            }
        }
        Ok(out)
    }

    fn predict_proba(&self, x: &Matrix) -> Result<Matrix, IrisError> {
        let pairs = self.pair_decisions(x)?;
        let k = self.classes.len();
        let mut out = Matrix::zeros(x.rows(), k);

        for i in 0..x.rows() {
            if k == 2 {
                let p = self.machines[0].probability(pairs[(i, 0)]);
                out[(i, 0)] = 1.0 - p;
                out[(i, 1)] = p;
                continue;
            }

            // r[a][b] = P(a | a or b)
            let mut r = Matrix::zeros(k, k);
            for (m, machine) in self.machines.iter().enumerate() {
                let neg = self.class_index(machine.negative);
                let pos = self.class_index(machine.positive);
                let p = machine.probability(pairs[(i, m)]);
                r[(pos, neg)] = p;
                r[(neg, pos)] = 1.0 - p;
            }
            let p = couple_pairwise(&r);
            out.row_mut(i).copy_from_slice(&p);
        }
        Ok(out)
    }
}

impl SupportVectorClassifier {
    fn class_index(&self, class: usize) -> usize {
        self.classes.iter().position(|&c| c == class).unwrap_or_default()
    }

    fn train_pair(
        &self,
        kernel: FittedKernel,
        x: &Matrix,
        y: &[usize],
        negative: usize,
        positive: usize,
    ) -> PairMachine {
        let labels = signed_labels(y, positive);
        let n = x.rows();
        let gram = Matrix::from_fn(n, n, |i, j| kernel.eval(x.row(i), x.row(j)));

        let (alpha, rho) = smo(&gram, &labels, self.c, self.tol, self.max_iter);

        let support_rows: Vec<usize> = (0..n).filter(|&i| alpha[i] > 0.0).collect();
        let mut machine = PairMachine {
            negative,
            positive,
            support: x.select_rows(&support_rows),
            dual_coef: support_rows.iter().map(|&i| alpha[i] * labels[i]).collect(),
            rho,
            platt_a: 0.0,
            platt_b: 0.0,
        };

        let decisions: Vec<f64> = x
            .iter_rows()
            .map(|row| machine.decision(kernel, row))
            .collect();
        let (a, b) = platt_sigmoid(&decisions, &labels);
        machine.platt_a = a;
        machine.platt_b = b;
        machine
    }
}

/// Solve the C-SVC dual for a precomputed Gram matrix. Returns the
/// multipliers and the offset `rho` (decision = Σ αᵢyᵢK(xᵢ,x) − rho).
fn smo(gram: &Matrix, y: &[f64], c: f64, tol: f64, max_iter: usize) -> (Vec<f64>, f64) {
    let n = y.len();
    let q = |i: usize, j: usize| y[i] * y[j] * gram[(i, j)];

    let mut alpha = vec![0.0; n];
    let mut grad = vec![-1.0; n];
    let upper = |a: f64| a >= c;
    let lower = |a: f64| a <= 0.0;

    let mut iter = 0;
    loop {
        // Maximal violating pair.
        let mut i_best = None;
        let mut g_max = f64::NEG_INFINITY;
        let mut j_best = None;
        let mut g_min = f64::INFINITY;
        for t in 0..n {
            let yg = -y[t] * grad[t];
            let in_up = (y[t] > 0.0 && !upper(alpha[t])) || (y[t] < 0.0 && !lower(alpha[t]));
            let in_low = (y[t] < 0.0 && !upper(alpha[t])) || (y[t] > 0.0 && !lower(alpha[t]));
            if in_up && yg > g_max {
                g_max = yg;
                i_best = Some(t);
            }
            if in_low && yg < g_min {
                g_min = yg;
                j_best = Some(t);
            }
        }

        let (i, j) = match (i_best, j_best) {
            (Some(i), Some(j)) if g_max - g_min >= tol => (i, j),
            _ => break,
        };
        if iter >= max_iter {
            tracing::warn!(max_iter, "SMO hit the iteration limit");
            break;
        }
        iter += 1;

        let (old_i, old_j) = (alpha[i], alpha[j]);
        if y[i] != y[j] {
            let quad = (gram[(i, i)] + gram[(j, j)] - 2.0 * gram[(i, j)]).max(TAU);
            let delta = (-grad[i] - grad[j]) / quad;
            let diff = alpha[i] - alpha[j];
            alpha[i] += delta;
            alpha[j] += delta;
            if diff > 0.0 {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = diff;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = -diff;
            }
            if diff > 0.0 {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = c - diff;
                }
            } else if alpha[j] > c {
                alpha[j] = c;
                alpha[i] = c + diff;
            }
        } else {
            let quad = (gram[(i, i)] + gram[(j, j)] - 2.0 * gram[(i, j)]).max(TAU);
            let delta = (grad[i] - grad[j]) / quad;
            let sum = alpha[i] + alpha[j];
            alpha[i] -= delta;
            alpha[j] += delta;
            if sum > c {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = sum - c;
                }
            } else if alpha[j] < 0.0 {
                alpha[j] = 0.0;
                alpha[i] = sum;
            }
            if sum > c {
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = sum - c;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = sum;
            }
        }

        let (di, dj) = (alpha[i] - old_i, alpha[j] - old_j);
        for t in 0..n {
            grad[t] += q(t, i) * di + q(t, j) * dj;
        }
    }
    tracing::trace!(iter, "SMO finished");

    // Offset from the free multipliers, or the middle of the feasible
    // interval when every multiplier sits at a bound.
    let (mut ub, mut lb) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut free, mut free_sum) = (0usize, 0.0);
    for t in 0..n {
        let yg = y[t] * grad[t];
        if upper(alpha[t]) {
            if y[t] < 0.0 {
                ub = ub.min(yg);
            } else {
                lb = lb.max(yg);
            }
        } else if lower(alpha[t]) {
            if y[t] > 0.0 {
                ub = ub.min(yg);
            } else {
                lb = lb.max(yg);
            }
        } else {
            free += 1;
            free_sum += yg;
        }
    }
    let rho = if free > 0 {
        free_sum / free as f64
    } else {
        (ub + lb) / 2.0
    };

    (alpha, rho)
}

/// Fit `P(y = +1 | f) = 1 / (1 + exp(A f + B))` by Newton's method with
/// Platt's smoothed targets.
fn platt_sigmoid(decisions: &[f64], labels: &[f64]) -> (f64, f64) {
    let prior1 = labels.iter().filter(|&&l| l > 0.0).count() as f64;
    let prior0 = labels.len() as f64 - prior1;
    let hi = (prior1 + 1.0) / (prior1 + 2.0);
    let lo = 1.0 / (prior0 + 2.0);
    let targets: Vec<f64> = labels.iter().map(|&l| if l > 0.0 { hi } else { lo }).collect();

    let loss = |a: f64, b: f64| -> f64 {
        decisions
            .iter()
            .zip(&targets)
            .map(|(&f, &t)| {
                let fab = f * a + b;
                if fab >= 0.0 {
                    t * fab + (-fab).exp().ln_1p()
                } else {
                    (t - 1.0) * fab + fab.exp().ln_1p()
                }
            })
            .sum()
    };

    let mut a = 0.0;
    let mut b = ((prior0 + 1.0) / (prior1 + 1.0)).ln();
    let mut value = loss(a, b);
    const SIGMA: f64 = 1e-12;

    for _ in 0..100 {
        let (mut h11, mut h22, mut h21) = (SIGMA, SIGMA, 0.0);
        let (mut g1, mut g2) = (0.0, 0.0);
        for (&f, &t) in decisions.iter().zip(&targets) {
            let fab = f * a + b;
            let (p, q) = if fab >= 0.0 {
                let e = (-fab).exp();
                (e / (1.0 + e), 1.0 / (1.0 + e))
            } else {
                let e = fab.exp();
                (1.0 / (1.0 + e), e / (1.0 + e))
            };
            let d2 = p * q;
            h11 += f * f * d2;
            h22 += d2;
            h21 += f * d2;
            let d1 = t - p;
            g1 += f * d1;
            g2 += d1;
        }
        if g1.abs() < 1e-5 && g2.abs() < 1e-5 {
            break;
        }

        let det = h11 * h22 - h21 * h21;
        let da = -(h22 * g1 - h21 * g2) / det;
        let db = -(-h21 * g1 + h11 * g2) / det;
        let gd = g1 * da + g2 * db;

        let mut step = 1.0;
        while step >= 1e-10 {
            let (na, nb) = (a + step * da, b + step * db);
            let candidate = loss(na, nb);
            if candidate < value + 1e-4 * step * gd {
                a = na;
                b = nb;
                value = candidate;
                break;
            }
            step /= 2.0;
        }
        if step < 1e-10 {
            tracing::debug!("Platt line search failed");
            break;
        }
    }
    (a, b)
}

/// Combine pairwise probabilities into one distribution over `k` classes.
fn couple_pairwise(r: &Matrix) -> Vec<f64> {
    let k = r.rows();
    let mut q = Matrix::zeros(k, k);
    for t in 0..k {
        for j in 0..k {
            if j != t {
                q[(t, t)] += r[(j, t)] * r[(j, t)];
                q[(t, j)] = -r[(j, t)] * r[(t, j)];
            }
        }
    }

    let mut p = vec![1.0 / k as f64; k];
    let mut qp = vec![0.0; k];
    let eps = 0.005 / k as f64;
    for _ in 0..100.max(k) {
        let mut pqp = 0.0;
        for t in 0..k {
            qp[t] = dot(q.row(t), &p);
            pqp += p[t] * qp[t];
        }
        let max_error = qp.iter().fold(0.0f64, |m, v| m.max((v - pqp).abs()));
        if max_error < eps {
            break;
        }
        for t in 0..k {
            let diff = (-qp[t] + pqp) / q[(t, t)];
            p[t] += diff;
            pqp = (pqp + diff * (diff * q[(t, t)] + 2.0 * qp[t])) / (1.0 + diff) / (1.0 + diff);
            for j in 0..k {
                qp[j] = (qp[j] + diff * q[(t, j)]) / (1.0 + diff);
                p[j] /= 1.0 + diff;
            }
        }
    }
    p
}
