//! # FX Math
//!
//! Numeric building blocks for fitting additive time-series models.
//! This crate provides the design-matrix features (piecewise-linear trend
//! hinges and Fourier seasonality terms), a ridge-regularised least squares
//! solver and the summary statistics used to derive prediction intervals.

use thiserror::Error;

pub mod features;
pub mod regression;
pub mod stats;

/// Errors that can occur in model-fitting calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for model math operations
pub type Result<T> = std::result::Result<T, MathError>;
