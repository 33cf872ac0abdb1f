//! Fixed-lookback retrieval of daily closing rates

use crate::data::RateSeries;
use crate::source::RateSource;
use chrono::{Months, NaiveDate};
use tracing::{debug, warn};

/// History requested for every fetch: five years
pub const LOOKBACK_MONTHS: u32 = 60;

/// Fetches five years of daily closes ending today.
///
/// Provider failures are not fatal here: they are logged and reported as an
/// empty series, leaving rejection to the validator.
#[derive(Debug, Clone)]
pub struct SeriesFetcher<S> {
    source: S,
}

impl<S: RateSource> SeriesFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// First day of the lookback window ending at `today`
    pub fn lookback_start(today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(LOOKBACK_MONTHS))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Fetch the lookback window for `symbol`; never fails
    pub fn fetch(&self, symbol: &str, today: NaiveDate) -> RateSeries {
        let start = Self::lookback_start(today);

        match self.source.fetch_closes(symbol, start, today) {
            Ok(series) => {
                debug!(
                    source = self.source.name(),
                    symbol,
                    observations = series.len(),
                    "fetched rate history"
                );
                series
            }
            Err(err) => {
                warn!(
                    source = self.source.name(),
                    symbol,
                    error = %err,
                    "rate history unavailable"
                );
                RateSeries::default()
            }
        }
    }
}
