use chrono::NaiveDate;
use fx_forecast::data::DataLoader;
use fx_forecast::error::SourceError;
use fx_forecast::validation::{SeriesValidator, MIN_OBSERVATIONS};
use fx_forecast::PredictionError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn test_yahoo_style_export() {
    let csv = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-02 00:00:00+00:00,83.2,83.4,83.1,83.30,83.31,0
2024-01-03 00:00:00+00:00,83.3,83.5,83.2,,83.35,0
2024-01-04 00:00:00+00:00,83.4,83.6,83.3,83.50,83.52,0
";
    let series = DataLoader::from_reader(csv.as_bytes()).unwrap();

    let rows: Vec<(NaiveDate, Option<f64>)> = series
        .observations()
        .iter()
        .map(|o| (o.date, o.rate))
        .collect();
    assert_eq!(
        rows,
        vec![
            (date("2024-01-02"), Some(83.30)),
            (date("2024-01-03"), None),
            (date("2024-01-04"), Some(83.50)),
        ]
    );
    assert_eq!(series.usable_len(), 2);
}

#[test]
fn test_minimal_headers() {
    let csv = "ds,y\n2024-01-02,1.1\n2024-01-03,1.2\n";
    let series = DataLoader::from_reader(csv.as_bytes()).unwrap();
    assert_eq!(series.len(), 2);

    let csv = "timestamp,price\n2024-01-02T12:00:00,1.1\n";
    let series = DataLoader::from_reader(csv.as_bytes()).unwrap();
    assert_eq!(series.observations()[0].date, date("2024-01-02"));
}

#[test]
fn test_missing_columns() {
    let err = DataLoader::from_reader("when,close\n2024-01-02,1.0\n".as_bytes()).unwrap_err();
    assert!(matches!(err, SourceError::ParseError(_)));

    let err = DataLoader::from_reader("date,volume\n2024-01-02,10\n".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("No close column"));
}

#[test]
fn test_bad_date_is_rejected() {
    let err = DataLoader::from_reader("date,close\n02/01/2024,1.0\n".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("Invalid date"));
}

#[test]
fn test_loaded_file_through_validator() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,close").unwrap();
    let start = date("2024-03-01");
    for (i, day) in start.iter_days().take(MIN_OBSERVATIONS).enumerate() {
        // Every fifth row unusable
        let cell = if i % 5 == 0 { "nan".to_string() } else { format!("{:.4}", 1.08 + i as f64 * 1e-4) };
        writeln!(file, "{day},{cell}").unwrap();
    }

    let raw = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(raw.len(), MIN_OBSERVATIONS);

    let err = SeriesValidator::new().validate(raw).unwrap_err();
    assert_eq!(err, PredictionError::insufficient_history());
}
