use std::env;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_FULL_NODE_URL: &str = "http://localhost:8083/v1a";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Number of most recent transactions the scenario leaves behind.
pub const TX_COUNT: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },

    #[error("{var} must be a positive whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must be one of color, plain, log, csv; got {value:?}")]
    InvalidReportFormat { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Color,
    Plain,
    Log,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "color" => Ok(Self::Color),
            "plain" => Ok(Self::Plain),
            "log" => Ok(Self::Log),
            "csv" => Ok(Self::Csv),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub report_format: ReportFormat,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FULL_NODE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            report_format: ReportFormat::Color,
        }
    }
}

impl NodeConfig {
    /// Reads overrides from the process environment. Call `dotenv()` first
    /// to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("FULL_NODE_URL") {
            let invalid = || ConfigError::InvalidUrl {
                var: "FULL_NODE_URL",
                value: value.clone(),
            };
            let url = Url::parse(value.trim()).map_err(|_| invalid())?;
            if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
                return Err(invalid());
            }
            config.base_url = url.as_str().trim_end_matches('/').to_string();
        }

        if let Some(value) = lookup("FULL_NODE_TIMEOUT_SECS") {
            let secs = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    var: "FULL_NODE_TIMEOUT_SECS",
                    value: value.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(value) = lookup("CHECK_REPORT") {
            config.report_format =
                value.parse().map_err(|_| ConfigError::InvalidReportFormat {
                    var: "CHECK_REPORT",
                    value: value.clone(),
                })?;
        }

        Ok(config)
    }

    pub fn transactions_url(&self) -> String {
        format!("{}/transaction", self.base_url)
    }
}
