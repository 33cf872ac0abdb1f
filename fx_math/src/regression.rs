//! Ridge-regularised least squares
//!
//! Solves `(XᵀX + Λ)β = Xᵀy` with a per-column penalty `Λ = diag(λ_j)` using a
//! Cholesky factorisation. A zero penalty leaves a column unregularised.

use crate::{MathError, Result};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Ridge regression with one penalty per design column
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    penalties: Vec<f64>,
}

/// Coefficients of a fitted ridge regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeFit {
    coefficients: Vec<f64>,
}

impl RidgeRegression {
    /// Create a new ridge regression with the given column penalties
    pub fn new(penalties: Vec<f64>) -> Result<Self> {
        if penalties.is_empty() {
            return Err(MathError::InvalidInput(
                "At least one design column is required".to_string(),
            ));
        }
        if penalties.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(MathError::InvalidInput(
                "Penalties must be finite and non-negative".to_string(),
            ));
        }

        Ok(Self { penalties })
    }

    /// Number of design columns this regression expects
    pub fn width(&self) -> usize {
        self.penalties.len()
    }

    /// Fit the coefficients to design rows and targets
    pub fn fit(&self, rows: &[Vec<f64>], targets: &[f64]) -> Result<RidgeFit> {
        if rows.len() != targets.len() {
            return Err(MathError::InvalidInput(format!(
                "Design rows ({}) don't match targets ({})",
                rows.len(),
                targets.len()
            )));
        }
        if rows.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a regression without observations".to_string(),
            ));
        }

        let width = self.width();
        if let Some(row) = rows.iter().find(|r| r.len() != width) {
            return Err(MathError::InvalidInput(format!(
                "Design row has {} columns, expected {}",
                row.len(),
                width
            )));
        }
        if targets.iter().any(|y| !y.is_finite()) || rows.iter().flatten().any(|x| !x.is_finite())
        {
            return Err(MathError::InvalidInput(
                "Design and targets must be finite".to_string(),
            ));
        }

        let x = DMatrix::from_fn(rows.len(), width, |i, j| rows[i][j]);
        let y = DVector::from_column_slice(targets);
        let xt = x.transpose();

        let mut gram = &xt * &x;
        for (j, penalty) in self.penalties.iter().enumerate() {
            gram[(j, j)] += penalty;
        }
        let rhs = &xt * &y;

        let cholesky = gram.cholesky().ok_or_else(|| {
            MathError::CalculationError(
                "Normal equations are not positive definite".to_string(),
            )
        })?;
        let beta = cholesky.solve(&rhs);

        if beta.iter().any(|b| !b.is_finite()) {
            return Err(MathError::CalculationError(
                "Regression produced non-finite coefficients".to_string(),
            ));
        }

        Ok(RidgeFit {
            coefficients: beta.iter().copied().collect(),
        })
    }
}

impl RidgeFit {
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Dot product of a design row with the fitted coefficients
    pub fn predict(&self, row: &[f64]) -> f64 {
        row.iter()
            .zip(self.coefficients.iter())
            .map(|(x, b)| x * b)
            .sum()
    }

    /// Contribution of the columns in `range` to a design row's prediction
    pub fn partial(&self, row: &[f64], range: std::ops::Range<usize>) -> f64 {
        row[range.clone()]
            .iter()
            .zip(self.coefficients[range].iter())
            .map(|(x, b)| x * b)
            .sum()
    }
}
