//! Runtime configuration read from `TUNA_*` environment variables.
//!
//! Numeric variables that fail to parse fall back to their defaults. An
//! unrecognized `TUNA_ENV` is an error, since silently running a production
//! deployment in development mode would serve mock data.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;

use crate::client::RetryConfig;
use crate::error::AnalyticsError;

pub const DEFAULT_API_BASE: &str = "https://api.defituna.com";
pub const DEFAULT_PRICE_API_BASE: &str = "https://api.coingecko.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_FALLBACK_SOL_PRICE: f64 = 20.0;

/// Deployment mode. Decides what happens when live data is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Fetch failures surface as [`AnalyticsError::DataUnavailable`].
    Production,
    /// Fetch failures are logged and replaced with mock data.
    #[default]
    Development,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(AnalyticsError::Config(format!(
                "unknown environment '{}'. Valid options: production, development",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub price_api_base: String,
    pub environment: Environment,
    pub timeout: Duration,
    pub retry: RetryConfig,
    /// YAML file overriding the bundled tracked wallets.
    pub wallets_file: Option<PathBuf>,
    /// SOL price used for revenue when the price API is unreachable.
    pub fallback_sol_price: f64,
    /// Launch date of the protocol. Records before it are dropped.
    pub protocol_start: Option<NaiveDate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            price_api_base: DEFAULT_PRICE_API_BASE.to_string(),
            environment: Environment::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
            wallets_file: None,
            fallback_sol_price: DEFAULT_FALLBACK_SOL_PRICE,
            protocol_start: None,
        }
    }
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, AnalyticsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AnalyticsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match non_empty("TUNA_ENV") {
            Some(value) => value.parse()?,
            None => defaults.environment,
        };

        let protocol_start = match non_empty("TUNA_PROTOCOL_START") {
            Some(value) => Some(
                NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                    AnalyticsError::Config(format!(
                        "invalid TUNA_PROTOCOL_START '{}': expected YYYY-MM-DD",
                        value
                    ))
                })?,
            ),
            None => None,
        };

        Ok(Self {
            api_base: non_empty("TUNA_API_BASE").unwrap_or(defaults.api_base),
            price_api_base: non_empty("TUNA_PRICE_API_BASE").unwrap_or(defaults.price_api_base),
            environment,
            timeout: Duration::from_secs(parse_or(
                non_empty("TUNA_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT_SECS,
            )),
            retry: RetryConfig {
                max_retries: parse_or(non_empty("TUNA_RETRY_MAX"), defaults.retry.max_retries),
                base_delay_ms: parse_or(
                    non_empty("TUNA_RETRY_BASE_MS"),
                    defaults.retry.base_delay_ms,
                ),
                max_delay_ms: parse_or(
                    non_empty("TUNA_RETRY_MAX_MS"),
                    defaults.retry.max_delay_ms,
                ),
            },
            wallets_file: non_empty("TUNA_WALLETS_FILE").map(PathBuf::from),
            fallback_sol_price: parse_or(
                non_empty("TUNA_FALLBACK_SOL_PRICE"),
                DEFAULT_FALLBACK_SOL_PRICE,
            ),
            protocol_start,
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base, "https://api.defituna.com");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_retries, 3);
    }

    #[test]
    fn overrides_apply() {
        let config = Config::from_lookup(lookup(&[
            ("TUNA_API_BASE", "http://localhost:9000"),
            ("TUNA_ENV", "Production"),
            ("TUNA_TIMEOUT_SECS", "5"),
            ("TUNA_RETRY_MAX", "0"),
            ("TUNA_WALLETS_FILE", "/etc/tuna/wallets.yml"),
            ("TUNA_FALLBACK_SOL_PRICE", "142.5"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "http://localhost:9000");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(
            config.wallets_file,
            Some(PathBuf::from("/etc/tuna/wallets.yml"))
        );
        assert_eq!(config.fallback_sol_price, 142.5);
    }

    #[test]
    fn bad_numbers_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("TUNA_TIMEOUT_SECS", "soon"),
            ("TUNA_RETRY_BASE_MS", "-1"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.retry.base_delay_ms, RetryConfig::default().base_delay_ms);
    }

    #[test]
    fn unknown_environment_is_error() {
        let err = Config::from_lookup(lookup(&[("TUNA_ENV", "staging")])).unwrap_err();
        assert!(matches!(err, AnalyticsError::Config(_)));
    }

    #[test]
    fn protocol_start_parsed() {
        let config =
            Config::from_lookup(lookup(&[("TUNA_PROTOCOL_START", "2023-09-15")])).unwrap();
        assert_eq!(config.protocol_start, NaiveDate::from_ymd_opt(2023, 9, 15));
    }

    #[test]
    fn bad_protocol_start_is_error() {
        let err =
            Config::from_lookup(lookup(&[("TUNA_PROTOCOL_START", "15/09/2023")])).unwrap_err();
        assert!(matches!(err, AnalyticsError::Config(_)));
    }

    #[test]
    fn environment_parse() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(Environment::Production.to_string(), "production");
    }
}
