//! Yahoo Finance chart API provider

use super::RateSource;
use crate::config::ProviderConfig;
use crate::data::{Observation, RateSeries};
use crate::error::SourceError;
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Blocking client for the Yahoo Finance v8 chart endpoint
#[derive(Debug, Clone)]
pub struct YahooFinance {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl YahooFinance {
    /// Create a new client from provider settings
    pub fn new(config: &ProviderConfig) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Build the chart URL for a daily range; `end` is made inclusive
    fn build_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let period1 = start.and_time(NaiveTime::default()).and_utc().timestamp();
        let period2 = end
            .checked_add_days(Days::new(1))
            .unwrap_or(end)
            .and_time(NaiveTime::default())
            .and_utc()
            .timestamp();

        format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, period1, period2
        )
    }

    /// Parse a chart payload into a raw closing-rate series.
    ///
    /// Timestamps are shifted into the exchange's timezone before being
    /// truncated to a calendar date; `null` closes become missing observations.
    fn parse_response(json: &str) -> Result<RateSeries, SourceError> {
        let response: YahooResponse =
            serde_json::from_str(json).map_err(|e| SourceError::ParseError(e.to_string()))?;

        if let Some(error) = response.chart.error {
            return Err(SourceError::ApiError {
                code: error.code,
                description: error.description,
            });
        }

        let results = response.chart.result.ok_or(SourceError::NoData)?;
        let data = results.first().ok_or(SourceError::NoData)?;
        let offset = data.meta.as_ref().map_or(0, |m| m.gmtoffset);
        let closes = data
            .indicators
            .quote
            .first()
            .map(|q| q.close.as_slice())
            .unwrap_or_default();

        let mut series = RateSeries::default();
        for (i, &ts) in data.timestamp.iter().enumerate() {
            let date = DateTime::from_timestamp(ts + offset, 0)
                .ok_or_else(|| SourceError::ParseError(format!("Invalid timestamp {}", ts)))?
                .date_naive();
            let rate = closes.get(i).copied().flatten();

            series.push(Observation::new(date, rate));
        }

        if series.is_empty() {
            return Err(SourceError::NoData);
        }

        Ok(series)
    }
}

impl RateSource for YahooFinance {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, SourceError> {
        let url = self.build_url(symbol, start, end);
        debug!(%url, "requesting chart");

        let text = self.client.get(&url).send()?.text()?;

        Self::parse_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> YahooFinance {
        YahooFinance::new(&ProviderConfig {
            base_url: "https://query1.finance.yahoo.com/v8/finance/chart/".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_build_url() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let url = client().build_url("USDINR=X", start, end);

        assert_eq!(
            url,
            "https://query1.finance.yahoo.com/v8/finance/chart/USDINR=X\
             ?period1=1704067200&period2=1733097600&interval=1d"
        );
    }

    #[test]
    fn test_parse_response_with_nulls() {
        let json = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},"timestamp":[1704067200,1704153600,1704240000],"indicators":{"quote":[{"open":[83.1,null,83.3],"close":[83.2,null,83.4]}]}}],"error":null}}"#;
        let series = YahooFinance::parse_response(json).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.usable_len(), 2);
        assert_eq!(
            series.observations()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(series.observations()[1].rate, None);
    }

    #[test]
    fn test_parse_response_applies_gmt_offset() {
        // 2024-06-02 23:00 UTC is 2024-06-03 00:00 in London summer time
        let json = r#"{"chart":{"result":[{"meta":{"gmtoffset":3600},"timestamp":[1717369200],"indicators":{"quote":[{"close":[1.27]}]}}],"error":null}}"#;
        let series = YahooFinance::parse_response(json).unwrap();

        assert_eq!(
            series.observations()[0].date,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
        );
    }

    #[test]
    fn test_parse_response_api_error() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(
            YahooFinance::parse_response(json),
            Err(SourceError::ApiError { .. })
        ));
    }

    #[test]
    fn test_parse_response_no_data() {
        let empty = r#"{"chart":{"result":[],"error":null}}"#;
        assert!(matches!(
            YahooFinance::parse_response(empty),
            Err(SourceError::NoData)
        ));

        let no_timestamps = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(matches!(
            YahooFinance::parse_response(no_timestamps),
            Err(SourceError::NoData)
        ));
    }

    #[test]
    fn test_parse_response_invalid_json() {
        assert!(matches!(
            YahooFinance::parse_response("not json"),
            Err(SourceError::ParseError(_))
        ));
    }
}
