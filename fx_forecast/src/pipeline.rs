//! One synchronous prediction: fetch, validate, forecast, select

use crate::currency::CurrencyPair;
use crate::engine::ForecastEngine;
use crate::error::{PredictionError, Result};
use crate::fetcher::SeriesFetcher;
use crate::models::{AdditiveModel, ForecastModel, ForecastPoint};
use crate::selection::{Candidate, CandidateSelector, DateWindow};
use crate::source::RateSource;
use crate::validation::SeriesValidator;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Source of "now" for a pipeline run
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stopped at a fixed moment, for replays and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Clock fixed at midnight of `date`
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Where a pipeline run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Validating,
    Forecasting,
    Selecting,
    Succeeded,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Validating => "validating",
            Stage::Forecasting => "forecasting",
            Stage::Selecting => "selecting",
            Stage::Succeeded => "succeeded",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A pair and the day the traveller leaves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub pair: CurrencyPair,
    pub travel_date: NaiveDate,
}

impl ForecastRequest {
    pub fn new(pair: CurrencyPair, travel_date: NaiveDate) -> Self {
        Self { pair, travel_date }
    }
}

/// A successful prediction
#[derive(Debug, Clone, Serialize)]
pub struct Prediction<T> {
    pub symbol: String,
    pub generated_on: NaiveDate,
    pub travel_date: NaiveDate,
    /// Best days in rank order, at most [`crate::selection::TOP_K`]
    pub candidates: Vec<Candidate>,
    /// Every day from the first observation through the travel date
    pub forecast: Vec<ForecastPoint>,
    /// The fitted model behind `forecast`
    pub model: T,
}

/// Outcome of one pipeline run
pub type PredictionResult<T> = Result<Prediction<T>>;

/// Fetch → validate → forecast → select, short-circuiting on the first failure.
///
/// Holds only configuration and the source; every call fits its own model.
#[derive(Debug, Clone)]
pub struct ForecastPipeline<S, M = AdditiveModel, C = SystemClock> {
    fetcher: SeriesFetcher<S>,
    validator: SeriesValidator,
    engine: ForecastEngine<M>,
    selector: CandidateSelector,
    clock: C,
}

impl<S: RateSource> ForecastPipeline<S> {
    /// Pipeline with the default additive model and the system clock
    pub fn new(source: S) -> Self {
        Self {
            fetcher: SeriesFetcher::new(source),
            validator: SeriesValidator::new(),
            engine: ForecastEngine::default(),
            selector: CandidateSelector::new(),
            clock: SystemClock,
        }
    }
}

impl<S, M, C> ForecastPipeline<S, M, C>
where
    S: RateSource,
    M: ForecastModel,
    C: Clock,
{
    pub fn with_model<N: ForecastModel>(self, model: N) -> ForecastPipeline<S, N, C> {
        ForecastPipeline {
            fetcher: self.fetcher,
            validator: self.validator,
            engine: ForecastEngine::new(model),
            selector: self.selector,
            clock: self.clock,
        }
    }

    pub fn with_clock<K: Clock>(self, clock: K) -> ForecastPipeline<S, M, K> {
        ForecastPipeline {
            fetcher: self.fetcher,
            validator: self.validator,
            engine: self.engine,
            selector: self.selector,
            clock,
        }
    }

    pub fn source(&self) -> &S {
        self.fetcher.source()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Predict the best exchange days for a currency pair
    pub fn predict(&self, request: &ForecastRequest) -> PredictionResult<M::Trained> {
        self.predict_symbol(&request.pair.symbol(), request.travel_date)
    }

    /// Predict the best exchange days for a raw provider symbol
    pub fn predict_symbol(&self, symbol: &str, travel_date: NaiveDate) -> PredictionResult<M::Trained> {
        let now = self.clock.now();
        let today = now.date();

        match self.run(symbol, now, travel_date) {
            Ok(prediction) => {
                info!(
                    stage = %Stage::Succeeded,
                    symbol,
                    %today,
                    %travel_date,
                    candidates = prediction.candidates.len(),
                    "prediction ready"
                );
                Ok(prediction)
            }
            Err(err) => {
                warn!(
                    stage = %Stage::Failed,
                    symbol,
                    %today,
                    %travel_date,
                    error = %err,
                    "prediction failed"
                );
                Err(err)
            }
        }
    }

    fn run(
        &self,
        symbol: &str,
        now: NaiveDateTime,
        travel_date: NaiveDate,
    ) -> PredictionResult<M::Trained> {
        let today = now.date();
        if travel_date <= today {
            return Err(PredictionError::not_in_future());
        }

        debug!(stage = %Stage::Fetching, symbol);
        let raw = self.fetcher.fetch(symbol, today);

        debug!(stage = %Stage::Validating, symbol, rows = raw.len());
        let series = self.validator.validate(raw)?;

        let horizon = ForecastEngine::<M>::horizon(today, travel_date)?;
        debug!(
            stage = %Stage::Forecasting,
            symbol,
            model = self.engine.model().name(),
            observations = series.len(),
            horizon
        );
        let projection = self.engine.project(&series, today, horizon)?;

        debug!(stage = %Stage::Selecting, symbol, points = projection.points.len());
        let window = DateWindow::new(now, travel_date.and_time(chrono::NaiveTime::MIN));
        let candidates = self.selector.select(&projection.points, &window)?;

        Ok(Prediction {
            symbol: symbol.to_string(),
            generated_on: today,
            travel_date,
            candidates,
            forecast: projection.points,
            model: projection.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RateSeries;
    use crate::error::SourceError;
    use std::cell::Cell;

    /// Source that counts calls and serves a fixed series
    #[derive(Debug, Default)]
    struct CountingSource {
        calls: Cell<usize>,
        series: RateSeries,
    }

    impl RateSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch_closes(
            &self,
            _symbol: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> std::result::Result<RateSeries, SourceError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.series.clone())
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Fetching.to_string(), "fetching");
        assert_eq!(Stage::Failed.to_string(), "failed");
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::on(date("2026-10-16"));
        assert_eq!(clock.today(), date("2026-10-16"));
    }

    #[test]
    fn test_past_travel_date_skips_fetch() {
        let pipeline = ForecastPipeline::new(CountingSource::default())
            .with_clock(FixedClock::on(date("2026-10-16")));

        for travel in ["2026-10-16", "2026-10-01"] {
            let err = pipeline.predict_symbol("USDINR=X", date(travel)).unwrap_err();
            assert_eq!(err, PredictionError::not_in_future());
        }
        assert_eq!(pipeline.source().calls.get(), 0);
    }

    #[test]
    fn test_empty_fetch_is_no_valid_data() {
        let pipeline = ForecastPipeline::new(CountingSource::default())
            .with_clock(FixedClock::on(date("2026-10-16")));

        let err = pipeline.predict_symbol("USDINR=X", date("2026-10-26")).unwrap_err();

        assert_eq!(err, PredictionError::no_valid_data());
        assert_eq!(pipeline.source().calls.get(), 1);
    }
}
