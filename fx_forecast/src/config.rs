//! Process configuration read from the environment

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Yahoo Finance v8 chart endpoint
pub const DEFAULT_PROVIDER_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_FEEDBACK_PATH: &str = "feedback.csv";

/// Market-data provider settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Outgoing mail account for reminders
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    pub sender_email: String,
    #[serde(skip_serializing, default)]
    pub sender_password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

// Keeps the password out of logs
impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("sender_email", &self.sender_email)
            .field("sender_password", &"***")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

/// Everything the binary needs, built once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    /// `None` unless both sender address and password are set
    pub mail: Option<MailConfig>,
    pub feedback_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            mail: None,
            feedback_path: PathBuf::from(DEFAULT_FEEDBACK_PATH),
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = ProviderConfig {
            base_url: get("FX_PROVIDER_URL").unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string()),
            timeout: Duration::from_secs(parse_or(
                "FX_HTTP_TIMEOUT_SECS",
                get("FX_HTTP_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT_SECS,
            )?),
        };

        let mail = match (get("SENDER_EMAIL"), get("SENDER_PASSWORD")) {
            (Some(sender_email), Some(sender_password)) => Some(MailConfig {
                sender_email,
                sender_password,
                smtp_host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                smtp_port: parse_or("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
            }),
            _ => None,
        };

        let feedback_path =
            PathBuf::from(get("FEEDBACK_PATH").unwrap_or_else(|| DEFAULT_FEEDBACK_PATH.to_string()));

        Ok(Self {
            provider,
            mail,
            feedback_path,
        })
    }

    /// Mail settings, or a config error naming what is missing
    pub fn require_mail(&self) -> Result<&MailConfig, ConfigError> {
        self.mail
            .as_ref()
            .ok_or_else(|| ConfigError::Missing("SENDER_EMAIL/SENDER_PASSWORD".to_string()))
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.require_mail().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("FX_PROVIDER_URL", "http://localhost:9000/chart"),
            ("FX_HTTP_TIMEOUT_SECS", "5"),
            ("SENDER_EMAIL", "me@example.com"),
            ("SENDER_PASSWORD", "secret"),
            ("SMTP_PORT", "2525"),
            ("FEEDBACK_PATH", "/tmp/reviews.csv"),
        ]))
        .unwrap();

        assert_eq!(config.provider.base_url, "http://localhost:9000/chart");
        assert_eq!(config.provider.timeout, Duration::from_secs(5));
        let mail = config.require_mail().unwrap();
        assert_eq!(mail.smtp_host, DEFAULT_SMTP_HOST);
        assert_eq!(mail.smtp_port, 2525);
        assert_eq!(config.feedback_path, PathBuf::from("/tmp/reviews.csv"));
    }

    #[test]
    fn test_mail_needs_both_credentials() {
        let config = AppConfig::from_lookup(lookup(&[("SENDER_EMAIL", "me@example.com")])).unwrap();
        assert!(config.mail.is_none());
    }

    #[test]
    fn test_invalid_number() {
        let err = AppConfig::from_lookup(lookup(&[("FX_HTTP_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "FX_HTTP_TIMEOUT_SECS".to_string(),
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn test_password_not_serialized() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SENDER_EMAIL", "me@example.com"),
            ("SENDER_PASSWORD", "secret"),
        ]))
        .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("me@example.com"));
        assert!(!json.contains("secret"));
        assert!(!json.contains("sender_password"));
    }

    #[test]
    fn test_password_not_in_debug() {
        let mail = MailConfig {
            sender_email: "me@example.com".to_string(),
            sender_password: "secret".to_string(),
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
        };
        assert!(!format!("{mail:?}").contains("secret"));
    }
}
