//! # travel-fx
//!
//! Command-line front end: which days before a trip are best to exchange currency.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use fx_forecast::currency::COUNTRY_CURRENCIES;
use fx_forecast::feedback::{CsvFeedbackSink, Feedback, FeedbackSink};
use fx_forecast::notify::{Notifier, SmtpNotifier};
use fx_forecast::source::{CsvRateSource, RateSource, YahooFinance};
use fx_forecast::{AppConfig, Currency, CurrencyPair, ForecastPipeline, ForecastRequest};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

const DISCLAIMER: &str =
    "Disclaimer: This is an automated statistical forecast, not financial advice.";

#[derive(Parser)]
#[command(name = "travel-fx", version)]
#[command(about = "Predict the best days to exchange currency before a trip", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast the best exchange days up to a travel date
    Predict {
        /// Currency you hold (code like USD, or a country name)
        #[arg(long, value_parser = parse_currency)]
        from: Currency,

        /// Currency you need at the destination
        #[arg(long, value_parser = parse_currency)]
        to: Currency,

        /// Travel date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Read rates from a CSV export instead of Yahoo Finance
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Mail the result to this address
        #[arg(long)]
        email: Option<String>,

        /// Print the full prediction as JSON
        #[arg(long)]
        json: bool,
    },

    /// Leave a review
    Feedback {
        /// Review text
        #[arg(long)]
        review: String,

        /// Contact address (optional)
        #[arg(long)]
        email: Option<String>,
    },

    /// List the supported countries and their currencies
    Currencies,
}

fn parse_currency(raw: &str) -> std::result::Result<Currency, String> {
    match Currency::for_country(raw) {
        Some(currency) => Ok(currency),
        None => raw.parse().map_err(|e: fx_forecast::PredictionError| e.to_string()),
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("reading configuration")?;
    info!(version = fx_forecast::VERSION, "travel-fx starting");

    match cli.command {
        Commands::Predict {
            from,
            to,
            date,
            csv,
            email,
            json,
        } => predict(&config, from, to, date, csv, email, json),
        Commands::Feedback { review, email } => {
            let feedback = Feedback::new(email, review, Local::now().naive_local())?;
            CsvFeedbackSink::new(&config.feedback_path).record(&feedback)?;
            println!("Thank you for your feedback!");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Currencies => {
            for (country, code) in COUNTRY_CURRENCIES {
                println!("{code}  {country}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn predict(
    config: &AppConfig,
    from: Currency,
    to: Currency,
    travel_date: NaiveDate,
    csv: Option<PathBuf>,
    email: Option<String>,
    json: bool,
) -> Result<ExitCode> {
    let pair = match CurrencyPair::new(from, to) {
        Ok(pair) => pair,
        Err(reason) => {
            eprintln!("{reason}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let source: Box<dyn RateSource> = match csv {
        Some(path) => Box::new(CsvRateSource::new(path)),
        None => Box::new(YahooFinance::new(&config.provider)?),
    };

    let request = ForecastRequest::new(pair, travel_date);
    let prediction = match ForecastPipeline::new(source).predict(&request) {
        Ok(prediction) => {
            info!(pair = %request.pair, %travel_date, "prediction complete");
            prediction
        }
        Err(reason) => {
            eprintln!("{reason}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
    } else {
        println!("Best days to exchange {} before {}:", request.pair, travel_date);
        for candidate in &prediction.candidates {
            println!(
                "{} – Predicted Rate: {:.4}",
                candidate.date().format("%A, %Y-%m-%d"),
                candidate.predicted_rate()
            );
        }
        println!("\n{DISCLAIMER}");
    }

    if let Some(recipient) = email {
        let mail = config.require_mail()?;
        SmtpNotifier::new(mail)?.send_reminder(&recipient, &prediction.candidates)?;
        println!("Reminder sent to {recipient}.");
    }

    Ok(ExitCode::SUCCESS)
}
