//! Forecasting models for exchange-rate series

use crate::data::CleanSeries;
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Model output for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Point forecast, `trend + seasonal`
    pub predicted_rate: f64,
    /// Lower bound of the prediction interval
    pub lower: f64,
    /// Upper bound of the prediction interval
    pub upper: f64,
    /// Trend component
    pub trend: f64,
    /// Sum of the seasonal components
    pub seasonal: f64,
}

/// Trained forecast model.
///
/// Produced by one fit and owned by whoever asked for the fit; it is never
/// shared between pipeline invocations.
pub trait TrainedForecastModel: Debug {
    /// Predict each of `dates`, in order. Dates may lie inside or beyond the training history.
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<ForecastPoint>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a cleaned series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a cleaned series
    fn train(&self, series: &CleanSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod additive;

pub use additive::{AdditiveModel, ModelConfig, TrainedAdditiveModel};
