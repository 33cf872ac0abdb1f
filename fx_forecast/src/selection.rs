//! Picks the best exchange days out of a projection

use crate::error::{PredictionError, Result};
use crate::models::ForecastPoint;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Number of candidate days returned
pub const TOP_K: usize = 3;

/// A ranked forecast day inside the selection window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    /// 1-based rank, 1 being the highest predicted rate
    pub rank: usize,
    pub point: ForecastPoint,
}

impl Candidate {
    pub fn date(&self) -> NaiveDate {
        self.point.date
    }

    pub fn predicted_rate(&self) -> f64 {
        self.point.predicted_rate
    }
}

/// The half-open day range `(after, until]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    after: NaiveDate,
    until: NaiveDate,
}

impl DateWindow {
    /// Window from a moment in time to the travel moment, both truncated to the day
    pub fn new(now: NaiveDateTime, travel: NaiveDateTime) -> Self {
        Self::between(now.date(), travel.date())
    }

    pub fn between(after: NaiveDate, until: NaiveDate) -> Self {
        Self { after, until }
    }

    pub fn after(&self) -> NaiveDate {
        self.after
    }

    pub fn until(&self) -> NaiveDate {
        self.until
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.after && date <= self.until
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CandidateSelector {
    top_k: usize,
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self { top_k: TOP_K }
    }
}

impl CandidateSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Highest predicted rates inside `window`, ties broken by the earlier date.
    ///
    /// Fewer than `top_k` windowed points is fine; none at all is an [`PredictionError::EmptyWindow`].
    pub fn select(&self, forecast: &[ForecastPoint], window: &DateWindow) -> Result<Vec<Candidate>> {
        let mut windowed: Vec<&ForecastPoint> =
            forecast.iter().filter(|p| window.contains(p.date)).collect();

        if windowed.is_empty() {
            return Err(PredictionError::EmptyWindow);
        }

        windowed.sort_by(|a, b| {
            b.predicted_rate
                .total_cmp(&a.predicted_rate)
                .then_with(|| a.date.cmp(&b.date))
        });

        Ok(windowed
            .into_iter()
            .take(self.top_k)
            .enumerate()
            .map(|(i, point)| Candidate {
                rank: i + 1,
                point: point.clone(),
            })
            .collect())
    }
}
