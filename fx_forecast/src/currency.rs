//! Currency codes and provider pair symbols

use crate::error::{PredictionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Countries offered for selection and the currency each one uses
pub const COUNTRY_CURRENCIES: [(&str, &str); 7] = [
    ("United States", "USD"),
    ("India", "INR"),
    ("United Kingdom", "GBP"),
    ("Euro Area", "EUR"),
    ("Japan", "JPY"),
    ("Australia", "AUD"),
    ("Canada", "CAD"),
];

/// A three-letter uppercase currency code such as `USD`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Look up the currency of a country from [`COUNTRY_CURRENCIES`], ignoring case
    pub fn for_country(country: &str) -> Option<Self> {
        COUNTRY_CURRENCIES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(country.trim()))
            .map(|(_, code)| Currency(code.to_string()))
    }
}

impl FromStr for Currency {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PredictionError::InvalidRequest(format!(
                "'{}' is not a three-letter currency code.",
                s.trim()
            )));
        }

        Ok(Currency(code))
    }
}

impl TryFrom<String> for Currency {
    type Error = PredictionError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Conversion from `base` into `quote`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    base: Currency,
    quote: Currency,
}

impl CurrencyPair {
    /// Create a new pair; converting a currency into itself is rejected
    pub fn new(base: Currency, quote: Currency) -> Result<Self> {
        if base == quote {
            return Err(PredictionError::same_currency());
        }

        Ok(Self { base, quote })
    }

    pub fn base(&self) -> &Currency {
        &self.base
    }

    pub fn quote(&self) -> &Currency {
        &self.quote
    }

    /// Market-data symbol in Yahoo Finance FX notation, e.g. `USDINR=X`
    pub fn symbol(&self) -> String {
        format!("{}{}=X", self.base, self.quote)
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
