//! Fits a model to a cleaned series and projects it onto a daily grid

use crate::data::CleanSeries;
use crate::error::{PredictionError, Result};
use crate::models::{AdditiveModel, ForecastModel, ForecastPoint, TrainedForecastModel};
use crate::utils::{daily_dates, days_between};
use chrono::{Days, NaiveDate};

/// A trained model together with its projection
#[derive(Debug, Clone)]
pub struct Projection<T> {
    pub model: T,
    /// One point per calendar day from the series start through today + horizon
    pub points: Vec<ForecastPoint>,
}

/// Runs one fit and one projection per call; the trained model is handed back
/// to the caller and not retained.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine<M = AdditiveModel> {
    model: M,
}

impl<M: ForecastModel> ForecastEngine<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Calendar days from `today` to `travel_date`; negative horizons are rejected
    pub fn horizon(today: NaiveDate, travel_date: NaiveDate) -> Result<u64> {
        let days = days_between(today, travel_date);
        u64::try_from(days).map_err(|_| PredictionError::not_in_future())
    }

    /// Fit the model and predict every day from the series start through `today + horizon`
    pub fn project(
        &self,
        series: &CleanSeries,
        today: NaiveDate,
        horizon: u64,
    ) -> Result<Projection<M::Trained>> {
        let start = series
            .first_date()
            .ok_or_else(|| PredictionError::Forecast("cannot project an empty series".to_string()))?;
        let end = today
            .checked_add_days(Days::new(horizon))
            .ok_or_else(|| PredictionError::Forecast("horizon out of range".to_string()))?;

        let model = self.model.train(series)?;
        let points = model.predict(&daily_dates(start, end))?;

        Ok(Projection { model, points })
    }
}
