//! Dense row-major matrices and the handful of routines the classifiers need.

use std::ops::{Index, IndexMut};

use serde::Serialize;

use crate::error::IrisError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, IrisError> {
        if data.len() != rows * cols {
            return Err(IrisError::shape(
                format!("{} values for {rows}x{cols}", rows * cols),
                data.len(),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, IrisError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(IrisError::shape(format!("{cols} columns"), row.len()));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(move |i| self.row(i))
    }

    pub fn column(&self, j: usize) -> Vec<f64> {
        (0..self.rows).map(|i| self[(i, j)]).collect()
    }

    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Self {
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }

    pub fn select_columns(&self, indices: &[usize]) -> Result<Self, IrisError> {
        if let Some(&bad) = indices.iter().find(|&&j| j >= self.cols) {
            return Err(IrisError::FeatureIndex {
                index: bad,
                available: self.cols,
            });
        }
        Ok(Self::from_fn(self.rows, indices.len(), |i, k| {
            self[(i, indices[k])]
        }))
    }

    /// Column-wise minimum and maximum.
    pub fn column_range(&self, j: usize) -> (f64, f64) {
        self.iter_rows()
            .map(|r| r[j])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    pub fn mat_vec(&self, v: &[f64]) -> Vec<f64> {
        self.iter_rows().map(|r| dot(r, v)).collect()
    }

    pub fn expect_cols(&self, cols: usize) -> Result<(), IrisError> {
        if self.cols == cols {
            Ok(())
        } else {
            Err(IrisError::shape(format!("{cols} features"), self.cols))
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Logistic function, stable for large |z|.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow.
pub fn log1p_exp(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max.is_infinite() {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}

pub fn softmax(values: &[f64]) -> Vec<f64> {
    let lse = log_sum_exp(values);
    values.iter().map(|v| (v - lse).exp()).collect()
}

/// Index of the largest value; the first one wins ties.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Lower-triangular `L` with `L Lᵀ = a`.
pub fn cholesky(a: &Matrix) -> Result<Matrix, IrisError> {
    let n = a.rows();
    if a.cols() != n {
        return Err(IrisError::shape("square matrix", format!("{}x{}", n, a.cols())));
    }

    let mut l = Matrix::zeros(n, n);
    for j in 0..n {
        let mut diag = a[(j, j)];
        for k in 0..j {
            diag -= l[(j, k)] * l[(j, k)];
        }
        if diag <= 0.0 || !diag.is_finite() {
            return Err(IrisError::NotPositiveDefinite);
        }
        let diag = diag.sqrt();
        l[(j, j)] = diag;

        for i in (j + 1)..n {
            let mut s = a[(i, j)];
            for k in 0..j {
                s -= l[(i, k)] * l[(j, k)];
            }
            l[(i, j)] = s / diag;
        }
    }
    Ok(l)
}

/// Solve `L x = b` for lower-triangular `L`.
pub fn forward_substitute(l: &Matrix, b: &[f64]) -> Vec<f64> {
    let n = l.rows();
    let mut x = vec![0.0; n];
    for i in 0..n {
        let mut s = b[i];
        for k in 0..i {
            s -= l[(i, k)] * x[k];
        }
        x[i] = s / l[(i, i)];
    }
    x
}

/// Solve `Lᵀ x = b` for lower-triangular `L`.
pub fn back_substitute_transposed(l: &Matrix, b: &[f64]) -> Vec<f64> {
    let n = l.rows();
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut s = b[i];
        for k in (i + 1)..n {
            s -= l[(k, i)] * x[k];
        }
        x[i] = s / l[(i, i)];
    }
    x
}

/// Solve `a x = b` given the Cholesky factor of `a`.
pub fn cholesky_solve(l: &Matrix, b: &[f64]) -> Vec<f64> {
    back_substitute_transposed(l, &forward_substitute(l, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cholesky_solves_spd_system() {
        let a = Matrix::from_rows(&[
            vec![4.0, 12.0, -16.0],
            vec![12.0, 37.0, -43.0],
            vec![-16.0, -43.0, 98.0],
        ])
        .unwrap();
        let l = cholesky(&a).unwrap();
        assert_eq!(l[(0, 0)], 2.0);
        assert_eq!(l[(1, 0)], 6.0);
        assert_eq!(l[(2, 2)], 3.0);

        let x = cholesky_solve(&l, &[1.0, 2.0, 3.0]);
        let back = a.mat_vec(&x);
        for (got, want) in back.iter().zip([1.0, 2.0, 3.0]) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cholesky_rejects_indefinite() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
        assert_eq!(cholesky(&a), Err(IrisError::NotPositiveDefinite));
    }

    #[test]
    fn test_softmax_is_stable() {
        let p = softmax(&[1000.0, 1000.0, -1000.0]);
        assert!((p[0] - 0.5).abs() < 1e-12);
        assert!(p[2] < 1e-300);
        assert!((sigmoid(-800.0)).abs() < 1e-300);
        assert!((log1p_exp(800.0) - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_select_columns_checks_bounds() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.select_columns(&[1]).unwrap().column(0), vec![2.0, 4.0]);
        assert!(matches!(
            m.select_columns(&[2]),
            Err(IrisError::FeatureIndex { index: 2, .. })
        ));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
    }
}
