//! Process configuration, read once at startup.

use std::str::FromStr;

use crate::error::ConfigError;
use crate::ors::{DEFAULT_BASE_URL, DEFAULT_PROFILE, OrsConfig};

#[derive(Debug, Clone)]
pub struct Config {
    pub ors: OrsConfig,
    /// Upper bound on simultaneous geocoder calls.
    pub geocode_concurrency: usize,
    /// Retries for transient geocoder failures.
    pub geocode_max_retries: u32,
}

impl Config {
    /// Load configuration from environment variables, after `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ORS_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing { key: "ORS_API_KEY" })?;

        let ors = OrsConfig {
            api_key,
            base_url: lookup("ORS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            profile: lookup("ORS_PROFILE").unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
            timeout_secs: parse_or(&lookup, "HTTP_TIMEOUT_SECS", 10)?,
        };

        let geocode_concurrency: usize = parse_or(&lookup, "GEOCODE_CONCURRENCY", 4)?;
        if geocode_concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "GEOCODE_CONCURRENCY",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            ors,
            geocode_concurrency,
            geocode_max_retries: parse_or(&lookup, "GEOCODE_MAX_RETRIES", 2)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
            key,
            value,
            reason: err.to_string(),
        }),
    }
}
