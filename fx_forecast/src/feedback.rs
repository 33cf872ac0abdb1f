//! User reviews collected after a prediction

use crate::error::FeedbackError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One review, optionally with a contact address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    email: Option<String>,
    review: String,
    timestamp: NaiveDateTime,
}

impl Feedback {
    /// Blank reviews are rejected; a blank email counts as none
    pub fn new(
        email: Option<String>,
        review: impl Into<String>,
        timestamp: NaiveDateTime,
    ) -> Result<Self, FeedbackError> {
        let review = review.into().trim().to_string();
        if review.is_empty() {
            return Err(FeedbackError::EmptyReview);
        }
        let email = email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Ok(Self {
            email,
            review,
            timestamp,
        })
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn review(&self) -> &str {
        &self.review
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

/// Row layout of the feedback file
#[derive(Debug, Serialize, Deserialize)]
struct FeedbackRecord {
    email: String,
    review: String,
    timestamp: String,
}

impl From<&Feedback> for FeedbackRecord {
    fn from(feedback: &Feedback) -> Self {
        Self {
            email: feedback.email.clone().unwrap_or_default(),
            review: feedback.review.clone(),
            timestamp: feedback.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Somewhere reviews are stored
pub trait FeedbackSink {
    fn record(&self, feedback: &Feedback) -> Result<(), FeedbackError>;
}

/// Appends reviews to a CSV file with an `email,review,timestamp` header
#[derive(Debug, Clone)]
pub struct CsvFeedbackSink {
    path: PathBuf,
}

impl CsvFeedbackSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every stored review
    pub fn load(&self) -> Result<Vec<Feedback>, FeedbackError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut entries = Vec::new();

        for row in reader.deserialize() {
            let record: FeedbackRecord = row?;
            let timestamp = NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT)
                .map_err(|e| FeedbackError::CsvError(format!("bad timestamp: {}", e)))?;
            entries.push(Feedback::new(Some(record.email), record.review, timestamp)?);
        }

        Ok(entries)
    }
}

impl FeedbackSink for CsvFeedbackSink {
    fn record(&self, feedback: &Feedback) -> Result<(), FeedbackError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(FeedbackRecord::from(feedback))?;
        writer.flush()?;

        info!(path = %self.path.display(), "feedback recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_blank_review_rejected() {
        assert!(matches!(
            Feedback::new(None, "   ", at(9)),
            Err(FeedbackError::EmptyReview)
        ));
    }

    #[test]
    fn test_blank_email_is_none() {
        let feedback = Feedback::new(Some(" ".to_string()), "Great", at(9)).unwrap();
        assert_eq!(feedback.email(), None);
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempdir().unwrap();
        let sink = CsvFeedbackSink::new(dir.path().join("feedback.csv"));

        sink.record(&Feedback::new(Some("a@example.com".to_string()), "Useful", at(9)).unwrap())
            .unwrap();
        sink.record(&Feedback::new(None, "Rates, but late", at(10)).unwrap())
            .unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(
            contents,
            "email,review,timestamp\n\
             a@example.com,Useful,2026-10-16 09:30:00\n\
             ,\"Rates, but late\",2026-10-16 10:30:00\n"
        );

        let loaded = sink.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].review(), "Rates, but late");
        assert_eq!(loaded[1].email(), None);
    }
}
