//! Market-data providers for historical closing rates

use crate::data::{DataLoader, RateSeries};
use crate::error::SourceError;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

mod yahoo;

pub use yahoo::YahooFinance;

/// A provider of daily closing rates.
///
/// Implementations make at most one outbound call per fetch and return the
/// raw series, missing observations included.
pub trait RateSource {
    /// Provider name, for logs
    fn name(&self) -> &str;

    /// Fetch daily closes for `symbol` between `start` and `end`, both inclusive
    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, SourceError>;
}

impl<S: RateSource + ?Sized> RateSource for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, SourceError> {
        (**self).fetch_closes(symbol, start, end)
    }
}

impl<S: RateSource + ?Sized> RateSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, SourceError> {
        (**self).fetch_closes(symbol, start, end)
    }
}

/// Offline provider backed by a CSV export of daily rates.
///
/// The symbol is ignored; rows outside the requested range are dropped.
#[derive(Debug, Clone)]
pub struct CsvRateSource {
    path: PathBuf,
}

impl CsvRateSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RateSource for CsvRateSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_closes(
        &self,
        _symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, SourceError> {
        let series = DataLoader::from_csv(&self.path)?;

        Ok(RateSeries::new(
            series
                .into_observations()
                .into_iter()
                .filter(|o| o.date >= start && o.date <= end)
                .collect(),
        ))
    }
}
