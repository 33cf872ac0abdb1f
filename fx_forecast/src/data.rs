//! Exchange-rate series handling

use crate::error::SourceError;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One daily closing rate; `rate` is `None` when the provider had no value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub rate: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, rate: Option<f64>) -> Self {
        Self { date, rate }
    }

    /// The rate, if present, finite and strictly positive
    pub fn usable_rate(&self) -> Option<f64> {
        self.rate.filter(|r| r.is_finite() && *r > 0.0)
    }
}

/// Raw closing-rate series as delivered by a provider.
///
/// May be unsorted, contain duplicate dates or missing rates; see
/// [`crate::validation::SeriesValidator`] for the cleaned form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSeries {
    observations: Vec<Observation>,
}

impl RateSeries {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Create a series from parallel dates and rates
    pub fn from_rates(dates: Vec<NaiveDate>, rates: Vec<f64>) -> Self {
        Self {
            observations: dates
                .into_iter()
                .zip(rates)
                .map(|(date, rate)| Observation::new(date, Some(rate)))
                .collect(),
        }
    }

    /// Create a series of consecutive calendar days starting at `start`
    pub fn daily(start: NaiveDate, rates: &[f64]) -> Self {
        Self {
            observations: rates
                .iter()
                .enumerate()
                .filter_map(|(i, &rate)| {
                    start
                        .checked_add_days(Days::new(i as u64))
                        .map(|date| Observation::new(date, Some(rate)))
                })
                .collect(),
        }
    }

    pub fn push(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn into_observations(self) -> Vec<Observation> {
        self.observations
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Number of observations carrying a usable rate
    pub fn usable_len(&self) -> usize {
        self.observations
            .iter()
            .filter(|o| o.usable_rate().is_some())
            .count()
    }
}

/// Cleaned series: ascending dates, no duplicates, every rate present and positive.
///
/// Only constructed by [`crate::validation::SeriesValidator`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanSeries {
    dates: Vec<NaiveDate>,
    rates: Vec<f64>,
}

impl CleanSeries {
    pub(crate) fn new_unchecked(dates: Vec<NaiveDate>, rates: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), rates.len());
        Self { dates, rates }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Loader for closing-rate series stored as CSV
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a raw series from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<RateSeries, SourceError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a raw series from any CSV reader with a header row.
    ///
    /// Dates may carry a time suffix (`2024-01-02 00:00:00+00:00`); only the
    /// calendar date is kept. Empty or unparseable rate cells become missing
    /// observations.
    pub fn from_reader<R: Read>(reader: R) -> Result<RateSeries, SourceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let date_idx = Self::detect_date_column(&headers)?;
        let close_idx = Self::detect_close_column(&headers)?;

        let mut series = RateSeries::default();
        for record in rdr.records() {
            let record = record?;
            let raw_date = record.get(date_idx).unwrap_or_default();
            let date = parse_date(raw_date).ok_or_else(|| {
                SourceError::ParseError(format!("Invalid date '{}'", raw_date))
            })?;
            let rate = record
                .get(close_idx)
                .and_then(|cell| cell.parse::<f64>().ok());

            series.push(Observation::new(date, rate));
        }

        Ok(series)
    }

    /// Detect the date column by header name
    fn detect_date_column(headers: &csv::StringRecord) -> Result<usize, SourceError> {
        headers
            .iter()
            .position(|name| {
                let lower = name.to_lowercase();
                lower.contains("date") || lower.contains("time") || lower == "ds"
            })
            .ok_or_else(|| SourceError::ParseError("No date column found in data".to_string()))
    }

    /// Detect the closing-rate column, preferring an exact `close` header
    fn detect_close_column(headers: &csv::StringRecord) -> Result<usize, SourceError> {
        let names: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        names
            .iter()
            .position(|n| n == "close")
            .or_else(|| names.iter().position(|n| n.contains("close")))
            .or_else(|| {
                names
                    .iter()
                    .position(|n| n.contains("price") || n == "rate" || n == "y")
            })
            .ok_or_else(|| SourceError::ParseError("No close column found in data".to_string()))
    }
}

/// Parse the leading `YYYY-MM-DD` of a date or timestamp string
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
