//! Sufficiency and well-formedness checks on fetched series

use crate::data::{CleanSeries, RateSeries};
use crate::error::{PredictionError, Result};
use std::collections::HashSet;
use tracing::debug;

/// Fewest usable observations the model is fitted on
pub const MIN_OBSERVATIONS: usize = 30;

/// Turns a raw provider series into a [`CleanSeries`] or rejects it
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesValidator;

impl SeriesValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate and clean a raw series.
    ///
    /// 1. Empty series, or no usable rate at all: no valid data.
    /// 2. Drop missing rates, keep the first observation per date, sort by date.
    /// 3. Fewer than [`MIN_OBSERVATIONS`] remaining: insufficient history.
    pub fn validate(&self, raw: RateSeries) -> Result<CleanSeries> {
        if raw.is_empty() || raw.usable_len() == 0 {
            return Err(PredictionError::no_valid_data());
        }

        let raw_len = raw.len();
        let mut seen = HashSet::with_capacity(raw_len);
        let mut rows: Vec<_> = raw
            .into_observations()
            .into_iter()
            .filter_map(|o| o.usable_rate().map(|rate| (o.date, rate)))
            .filter(|(date, _)| seen.insert(*date))
            .collect();
        rows.sort_by_key(|(date, _)| *date);

        debug!(
            raw = raw_len,
            usable = rows.len(),
            dropped = raw_len - rows.len(),
            "cleaned rate history"
        );

        if rows.len() < MIN_OBSERVATIONS {
            return Err(PredictionError::insufficient_history());
        }

        let (dates, rates) = rows.into_iter().unzip();
        Ok(CleanSeries::new_unchecked(dates, rates))
    }
}
