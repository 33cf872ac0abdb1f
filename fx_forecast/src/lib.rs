//! # FX Forecast
//!
//! Predict the best days to exchange currency before a trip.
//!
//! ## Features
//!
//! - Daily closing rates from Yahoo Finance or a local CSV file
//! - Validation and cleaning of the rate history
//! - An additive trend + seasonality model with prediction intervals
//! - Ranking of the best days between today and the travel date
//! - Reminder mails and a feedback log as optional collaborators
//!
//! ## Pipeline
//!
//! A single call runs `fetch → validate → forecast → select` and either
//! returns the ranked candidate days or the reason no prediction was made:
//!
//! ```rust,no_run
//! use fx_forecast::config::AppConfig;
//! use fx_forecast::currency::{Currency, CurrencyPair};
//! use fx_forecast::pipeline::{ForecastPipeline, ForecastRequest};
//! use fx_forecast::source::YahooFinance;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let pair = CurrencyPair::new("USD".parse::<Currency>()?, "INR".parse::<Currency>()?)?;
//! let travel_date = chrono::NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
//!
//! let pipeline = ForecastPipeline::new(YahooFinance::new(&config.provider)?);
//! match pipeline.predict(&ForecastRequest::new(pair, travel_date)) {
//!     Ok(prediction) => {
//!         for candidate in &prediction.candidates {
//!             println!("{} {:.4}", candidate.date(), candidate.predicted_rate());
//!         }
//!     }
//!     Err(reason) => println!("{reason}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod currency;
pub mod data;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod fetcher;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod selection;
pub mod source;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::currency::{Currency, CurrencyPair};
pub use crate::data::{CleanSeries, DataLoader, Observation, RateSeries};
pub use crate::error::{ErrorKind, PredictionError};
pub use crate::models::{ForecastModel, ForecastPoint, TrainedForecastModel};
pub use crate::pipeline::{ForecastPipeline, ForecastRequest, Prediction, PredictionResult};
pub use crate::selection::{Candidate, TOP_K};
pub use crate::source::RateSource;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
