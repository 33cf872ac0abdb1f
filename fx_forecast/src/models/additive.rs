//! Additive trend + seasonality model
//!
//! `y(t) = g(t) + s_yearly(t) + s_weekly(t)` where `g` is a piecewise-linear
//! trend with potential changepoints over the early part of history and each
//! `s` is a Fourier series. Coefficients are the ridge-regularised least
//! squares solution on the scaled series; the penalties play the role of the
//! priors on changepoint deltas and seasonal amplitudes.

use crate::data::CleanSeries;
use crate::error::{PredictionError, Result};
use crate::models::{ForecastModel, ForecastPoint, TrainedForecastModel};
use crate::utils::{days_between, days_since_epoch};
use chrono::NaiveDate;
use fx_math::features::{FourierSeries, PiecewiseTrend};
use fx_math::regression::{RidgeFit, RidgeRegression};
use fx_math::stats::{central_quantile, difference_variance, mean, std_dev};
use serde::{Deserialize, Serialize};
use tracing::debug;

const YEARLY_PERIOD: f64 = 365.25;
const WEEKLY_PERIOD: f64 = 7.0;
const SLOPE_PRIOR_SCALE: f64 = 5.0;
/// Keeps the normal equations positive definite on noiseless input
const MIN_PENALTY: f64 = 1e-6;

/// Parameters of the additive model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Potential trend changepoints
    pub n_changepoints: usize,
    /// Share of history, from the start, in which changepoints are placed
    pub changepoint_range: f64,
    /// Prior scale of changepoint rate adjustments; larger means a more flexible trend
    pub changepoint_prior_scale: f64,
    /// Prior scale of seasonal amplitudes
    pub seasonality_prior_scale: f64,
    /// Fourier order of yearly seasonality, 0 disables it
    pub yearly_order: usize,
    /// Fourier order of weekly seasonality, 0 disables it
    pub weekly_order: usize,
    /// Width of the prediction interval
    pub interval_width: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            yearly_order: 10,
            weekly_order: 3,
            interval_width: 0.8,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(PredictionError::Forecast(
                "changepoint_range must be in (0, 1]".to_string(),
            ));
        }
        if !(self.changepoint_prior_scale > 0.0 && self.seasonality_prior_scale > 0.0) {
            return Err(PredictionError::Forecast(
                "prior scales must be positive".to_string(),
            ));
        }
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(PredictionError::Forecast(
                "interval_width must be in (0, 1)".to_string(),
            ));
        }

        Ok(())
    }
}

/// A named Fourier seasonality
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seasonality {
    pub name: String,
    pub series: FourierSeries,
}

/// Additive trend + seasonality model
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    name: String,
    config: ModelConfig,
}

/// Fitted additive model
#[derive(Debug, Clone, Serialize)]
pub struct TrainedAdditiveModel {
    name: String,
    first_date: NaiveDate,
    last_date: NaiveDate,
    span_days: f64,
    /// Rates are divided by this before fitting
    scale: f64,
    /// Mean of the scaled rates, added back to every prediction
    offset: f64,
    trend: PiecewiseTrend,
    seasonalities: Vec<Seasonality>,
    fit: RidgeFit,
    residual_sigma: f64,
    z: f64,
    observations: usize,
}

impl AdditiveModel {
    /// Create a new additive model
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            name: "Additive trend + seasonality".to_string(),
            config,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn seasonalities_for(&self, span_days: f64) -> Result<Vec<Seasonality>> {
        let mut seasonalities = Vec::new();
        if self.config.yearly_order > 0 && span_days >= 2.0 * YEARLY_PERIOD {
            seasonalities.push(Seasonality {
                name: "yearly".to_string(),
                series: FourierSeries::new(YEARLY_PERIOD, self.config.yearly_order)?,
            });
        }
        if self.config.weekly_order > 0 && span_days >= 2.0 * WEEKLY_PERIOD {
            seasonalities.push(Seasonality {
                name: "weekly".to_string(),
                series: FourierSeries::new(WEEKLY_PERIOD, self.config.weekly_order)?,
            });
        }

        Ok(seasonalities)
    }
}

impl Default for AdditiveModel {
    fn default() -> Self {
        Self {
            name: "Additive trend + seasonality".to_string(),
            config: ModelConfig::default(),
        }
    }
}

fn design_row(trend: &PiecewiseTrend, seasonalities: &[Seasonality], t: f64, day: f64) -> Vec<f64> {
    let width = trend.width() + seasonalities.iter().map(|s| s.series.width()).sum::<usize>();
    let mut row = Vec::with_capacity(width);
    trend.write_terms(t, &mut row);
    for seasonality in seasonalities {
        seasonality.series.write_terms(day, &mut row);
    }
    row
}

impl ForecastModel for AdditiveModel {
    type Trained = TrainedAdditiveModel;

    fn train(&self, series: &CleanSeries) -> Result<Self::Trained> {
        let (first_date, last_date) = match (series.first_date(), series.last_date()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(PredictionError::Forecast(
                    "cannot fit an empty series".to_string(),
                ))
            }
        };
        let span_days = days_between(first_date, last_date) as f64;
        if span_days <= 0.0 {
            return Err(PredictionError::Forecast(
                "series must span at least two distinct days".to_string(),
            ));
        }

        let scale = series.rates().iter().fold(0.0_f64, |m, r| m.max(r.abs()));
        if scale <= 0.0 || !scale.is_finite() {
            return Err(PredictionError::Forecast(
                "series has no positive finite rate".to_string(),
            ));
        }
        let scaled: Vec<f64> = series.rates().iter().map(|r| r / scale).collect();
        // Centred targets: a constant series solves to all-zero coefficients
        let offset = mean(&scaled)?;
        let y: Vec<f64> = scaled.iter().map(|v| v - offset).collect();
        let t: Vec<f64> = series
            .dates()
            .iter()
            .map(|d| days_between(first_date, *d) as f64 / span_days)
            .collect();

        let trend = PiecewiseTrend::uniform(
            &t,
            self.config.n_changepoints,
            self.config.changepoint_range,
        )?;
        let seasonalities = self.seasonalities_for(span_days)?;

        // Ridge penalties are noise variance over prior variance
        let noise = difference_variance(&y);
        let penalty = |prior_scale: f64| (noise / prior_scale.powi(2)).max(MIN_PENALTY);
        let mut penalties = vec![0.0, penalty(SLOPE_PRIOR_SCALE)];
        penalties.extend(
            std::iter::repeat(penalty(self.config.changepoint_prior_scale))
                .take(trend.changepoints().len()),
        );
        for seasonality in &seasonalities {
            penalties.extend(
                std::iter::repeat(penalty(self.config.seasonality_prior_scale))
                    .take(seasonality.series.width()),
            );
        }

        let rows: Vec<Vec<f64>> = t
            .iter()
            .zip(series.dates())
            .map(|(&ti, d)| design_row(&trend, &seasonalities, ti, days_since_epoch(*d)))
            .collect();
        let fit = RidgeRegression::new(penalties)?.fit(&rows, &y)?;

        let residuals: Vec<f64> = rows
            .iter()
            .zip(series.rates())
            .map(|(row, rate)| rate - (fit.predict(row) + offset) * scale)
            .collect();
        let residual_sigma = std_dev(&residuals)?;
        let z = central_quantile(self.config.interval_width)?;

        debug!(
            observations = series.len(),
            changepoints = trend.changepoints().len(),
            seasonalities = seasonalities.len(),
            residual_sigma,
            "fitted additive model"
        );

        Ok(TrainedAdditiveModel {
            name: self.name.clone(),
            first_date,
            last_date,
            span_days,
            scale,
            offset,
            trend,
            seasonalities,
            fit,
            residual_sigma,
            z,
            observations: series.len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedAdditiveModel {
    /// Standard deviation of in-sample residuals, in rate units
    pub fn residual_sigma(&self) -> f64 {
        self.residual_sigma
    }

    /// Number of observations the model was fitted on
    pub fn observations(&self) -> usize {
        self.observations
    }

    pub fn first_date(&self) -> NaiveDate {
        self.first_date
    }

    /// Last date with an observation; later dates are extrapolated
    pub fn last_date(&self) -> NaiveDate {
        self.last_date
    }

    /// Potential changepoint dates of the trend
    pub fn changepoint_dates(&self) -> Vec<NaiveDate> {
        self.trend
            .changepoints()
            .iter()
            .filter_map(|c| {
                let offset = (c * self.span_days).round() as u64;
                self.first_date
                    .checked_add_days(chrono::Days::new(offset))
            })
            .collect()
    }

    /// Names of the seasonalities included in the fit
    pub fn seasonality_names(&self) -> Vec<&str> {
        self.seasonalities.iter().map(|s| s.name.as_str()).collect()
    }

    fn predict_one(&self, date: NaiveDate) -> Result<ForecastPoint> {
        let t = days_between(self.first_date, date) as f64 / self.span_days;
        let row = design_row(&self.trend, &self.seasonalities, t, days_since_epoch(date));

        let predicted_rate = (self.fit.predict(&row) + self.offset) * self.scale;
        let trend = (self.fit.partial(&row, 0..self.trend.width()) + self.offset) * self.scale;
        if !predicted_rate.is_finite() || !trend.is_finite() {
            return Err(PredictionError::Forecast(format!(
                "non-finite prediction for {}",
                date
            )));
        }

        // Interval widens with distance past the last observation
        let ahead = days_between(self.last_date, date).max(0) as f64;
        let half_width =
            self.z * self.residual_sigma * (1.0 + ahead / self.observations as f64).sqrt();

        Ok(ForecastPoint {
            date,
            predicted_rate,
            lower: predicted_rate - half_width,
            upper: predicted_rate + half_width,
            trend,
            seasonal: predicted_rate - trend,
        })
    }
}

impl TrainedForecastModel for TrainedAdditiveModel {
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<ForecastPoint>> {
        dates.iter().map(|d| self.predict_one(*d)).collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::daily_dates;
    use approx::assert_relative_eq;
    use chrono::Days;
    use std::f64::consts::PI;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn series_from(f: impl Fn(NaiveDate, usize) -> f64, days: u64) -> CleanSeries {
        let dates = daily_dates(start(), start() + Days::new(days - 1));
        let rates = dates.iter().enumerate().map(|(i, d)| f(*d, i)).collect();
        CleanSeries::new_unchecked(dates, rates)
    }

    #[test]
    fn test_constant_series_stays_flat() {
        let series = series_from(|_, _| 1.2, 40);
        let trained = AdditiveModel::default().train(&series).unwrap();

        let future = daily_dates(start() + Days::new(40), start() + Days::new(60));
        let points = trained.predict(&future).unwrap();
        for point in &points {
            assert_relative_eq!(point.predicted_rate, 1.2, epsilon = 1e-6);
            assert_relative_eq!(point.seasonal, 0.0, epsilon = 1e-6);
        }
        // Bit-identical, so ties between days are real ties
        assert!(points
            .windows(2)
            .all(|w| w[0].predicted_rate == w[1].predicted_rate));
        assert!(trained.residual_sigma() < 1e-6);
    }

    #[test]
    fn test_linear_trend_extrapolates() {
        let series = series_from(|_, i| 1.0 + 0.001 * i as f64, 60);
        let trained = AdditiveModel::default().train(&series).unwrap();

        let target = start() + Days::new(69);
        let point = &trained.predict(&[target]).unwrap()[0];
        assert_relative_eq!(point.predicted_rate, 1.069, epsilon = 1e-5);
    }

    #[test]
    fn test_weekly_seasonality_recovered() {
        let weekly = |d: NaiveDate, _: usize| 1.0 + 0.01 * (2.0 * PI * days_since_epoch(d) / 7.0).sin();
        let series = series_from(weekly, 120);
        let trained = AdditiveModel::default().train(&series).unwrap();

        assert_eq!(trained.seasonality_names(), vec!["weekly"]);
        let future = daily_dates(start() + Days::new(120), start() + Days::new(134));
        for point in trained.predict(&future).unwrap() {
            assert_relative_eq!(point.predicted_rate, weekly(point.date, 0), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_yearly_seasonality_needs_two_years() {
        let short = series_from(|_, i| 1.0 + (i % 5) as f64 * 0.001, 400);
        let trained = AdditiveModel::default().train(&short).unwrap();
        assert_eq!(trained.seasonality_names(), vec!["weekly"]);

        let long = series_from(|_, i| 1.0 + (i % 5) as f64 * 0.001, 800);
        let trained = AdditiveModel::default().train(&long).unwrap();
        assert_eq!(trained.seasonality_names(), vec!["yearly", "weekly"]);
    }

    #[test]
    fn test_interval_widens_with_horizon() {
        let noisy = |_: NaiveDate, i: usize| 1.0 + if i % 2 == 0 { 0.01 } else { -0.01 };
        let series = series_from(noisy, 60);
        let trained = AdditiveModel::default().train(&series).unwrap();

        let points = trained
            .predict(&[start() + Days::new(59), start() + Days::new(90)])
            .unwrap();
        let near = points[0].upper - points[0].lower;
        let far = points[1].upper - points[1].lower;

        assert!(near > 0.0);
        assert!(far > near);
        for p in &points {
            assert!(p.lower <= p.predicted_rate && p.predicted_rate <= p.upper);
            assert_relative_eq!(p.trend + p.seasonal, p.predicted_rate, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_changepoints_fall_inside_history() {
        let series = series_from(|_, i| 1.0 + 0.001 * i as f64, 100);
        let trained = AdditiveModel::default().train(&series).unwrap();
        let dates = trained.changepoint_dates();

        assert_eq!(dates.len(), 25);
        assert!(dates.iter().all(|d| *d > trained.first_date() && *d < trained.last_date()));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ModelConfig {
            interval_width: 1.5,
            ..ModelConfig::default()
        };
        assert!(AdditiveModel::new(config).is_err());
    }
}
