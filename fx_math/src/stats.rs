//! Summary statistics used for scaling and prediction intervals

use crate::{MathError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty slice".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> Result<f64> {
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    Ok(variance.sqrt())
}

/// Half the variance of first differences.
///
/// For a random walk plus white noise this estimates the noise variance
/// without fitting a model first. Returns zero for fewer than two values.
pub fn difference_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let mean = diffs.iter().sum::<f64>() / diffs.len() as f64;
    let variance = diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / diffs.len() as f64;

    variance / 2.0
}

/// Two-sided standard normal quantile for a central interval of the given width.
///
/// `interval_width = 0.8` returns `z` such that `P(-z < Z < z) = 0.8`.
pub fn central_quantile(interval_width: f64) -> Result<f64> {
    if interval_width <= 0.0 || interval_width >= 1.0 {
        return Err(MathError::InvalidInput(
            "Interval width must be between 0 and 1".to_string(),
        ));
    }

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| MathError::CalculationError(format!("Standard normal: {}", e)))?;

    Ok(normal.inverse_cdf(0.5 + interval_width / 2.0))
}
