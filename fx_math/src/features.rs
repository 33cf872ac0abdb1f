//! Design-matrix features for additive models
//!
//! Contains the regressors an additive trend + seasonality model is built from:
//! - Piecewise-linear trend with hinge terms at potential changepoints
//! - Fourier series terms for periodic seasonality

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Piecewise-linear trend: intercept, slope and one hinge per changepoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseTrend {
    changepoints: Vec<f64>,
}

impl PiecewiseTrend {
    /// Create a trend with explicit changepoint locations on the scaled time axis
    pub fn new(changepoints: Vec<f64>) -> Result<Self> {
        if changepoints.iter().any(|c| !c.is_finite()) {
            return Err(MathError::InvalidInput(
                "Changepoints must be finite".to_string(),
            ));
        }
        if changepoints.windows(2).any(|w| w[1] < w[0]) {
            return Err(MathError::InvalidInput(
                "Changepoints must be sorted ascending".to_string(),
            ));
        }

        Ok(Self { changepoints })
    }

    /// Place potential changepoints uniformly over the first `range` share of history.
    ///
    /// `t` is the scaled, ascending time axis of the observations. The number of
    /// changepoints is capped so that each one sits on a distinct observation.
    pub fn uniform(t: &[f64], n_changepoints: usize, range: f64) -> Result<Self> {
        if t.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot place changepoints on an empty time axis".to_string(),
            ));
        }
        if range <= 0.0 || range > 1.0 {
            return Err(MathError::InvalidInput(
                "Changepoint range must be in (0, 1]".to_string(),
            ));
        }

        let hist_size = ((t.len() as f64) * range).floor() as usize;
        let count = n_changepoints.min(hist_size.saturating_sub(1));
        if count == 0 {
            return Self::new(Vec::new());
        }

        // Skip the first index: a changepoint at the origin duplicates the slope
        let last = (hist_size - 1) as f64;
        let changepoints = (1..=count)
            .map(|i| {
                let idx = (last * i as f64 / count as f64).round() as usize;
                t[idx]
            })
            .collect();

        Self::new(changepoints)
    }

    /// Changepoint locations on the scaled time axis
    pub fn changepoints(&self) -> &[f64] {
        &self.changepoints
    }

    /// Number of regressors this trend contributes
    pub fn width(&self) -> usize {
        2 + self.changepoints.len()
    }

    /// Append `[1, t, max(0, t - c_1), ...]` to a design row
    pub fn write_terms(&self, t: f64, row: &mut Vec<f64>) {
        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints.iter().map(|&c| (t - c).max(0.0)));
    }
}

/// Fourier series approximating a periodic signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourierSeries {
    period: f64,
    order: usize,
}

impl FourierSeries {
    /// Create a new Fourier series with the given period (in days) and order
    pub fn new(period: f64, order: usize) -> Result<Self> {
        if !period.is_finite() || period <= 0.0 {
            return Err(MathError::InvalidInput(
                "Period must be a positive number of days".to_string(),
            ));
        }
        if order == 0 {
            return Err(MathError::InvalidInput(
                "Fourier order must be greater than zero".to_string(),
            ));
        }

        Ok(Self { period, order })
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of regressors this series contributes
    pub fn width(&self) -> usize {
        2 * self.order
    }

    /// Append `[sin(2πk·day/P), cos(2πk·day/P)]` for k = 1..=order to a design row
    pub fn write_terms(&self, day: f64, row: &mut Vec<f64>) {
        for k in 1..=self.order {
            let angle = 2.0 * PI * k as f64 * day / self.period;
            row.push(angle.sin());
            row.push(angle.cos());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_changepoints_within_range() {
        let t: Vec<f64> = (0..100).map(|i| i as f64 / 99.0).collect();
        let trend = PiecewiseTrend::uniform(&t, 25, 0.8).unwrap();

        assert_eq!(trend.changepoints().len(), 25);
        assert!(trend.changepoints().iter().all(|&c| c > 0.0 && c <= 0.8));
        assert!(trend.changepoints().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_changepoints_capped_by_history() {
        let t: Vec<f64> = (0..10).map(|i| i as f64 / 9.0).collect();
        let trend = PiecewiseTrend::uniform(&t, 25, 0.8).unwrap();

        // floor(10 * 0.8) = 8 observations in range, at most 7 changepoints
        assert_eq!(trend.changepoints().len(), 7);
        assert_eq!(trend.width(), 9);
    }

    #[test]
    fn test_trend_terms() {
        let trend = PiecewiseTrend::new(vec![0.25, 0.5]).unwrap();
        let mut row = Vec::new();
        trend.write_terms(0.4, &mut row);

        assert_eq!(row.len(), 4);
        assert_relative_eq!(row[0], 1.0);
        assert_relative_eq!(row[1], 0.4);
        assert_relative_eq!(row[2], 0.15, epsilon = 1e-12);
        assert_relative_eq!(row[3], 0.0);
    }

    #[test]
    fn test_unsorted_changepoints_rejected() {
        assert!(PiecewiseTrend::new(vec![0.5, 0.25]).is_err());
    }

    #[test]
    fn test_fourier_terms_are_periodic() {
        let weekly = FourierSeries::new(7.0, 3).unwrap();
        let mut a = Vec::new();
        let mut b = Vec::new();
        weekly.write_terms(3.0, &mut a);
        weekly.write_terms(10.0, &mut b);

        assert_eq!(a.len(), weekly.width());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fourier_invalid_parameters() {
        assert!(FourierSeries::new(0.0, 3).is_err());
        assert!(FourierSeries::new(7.0, 0).is_err());
    }
}
